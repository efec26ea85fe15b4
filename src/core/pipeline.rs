use crate::domain::model::{Outcome, PipelineRun, Record, RecordSource, RunEntry};
use crate::domain::ports::{ProgressReporter, Transform};
use crate::utils::error::{ProcError, Result};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// How many leading fields of the original record each log entry keeps.
pub const SAMPLE_FIELD_COUNT: usize = 3;

/// Default reporter: structured log lines per record plus a final summary.
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn on_record(&self, total_rows: usize, entry: &RunEntry) {
        if entry.outcome.success {
            tracing::info!("✅ Record {}/{} processed", entry.row_number, total_rows);
        } else {
            tracing::warn!(
                "❌ Record {}/{} failed: {}",
                entry.row_number,
                total_rows,
                entry.outcome.error_message()
            );
        }
    }

    fn on_complete(&self, run: &PipelineRun) {
        tracing::info!(
            "📊 Run complete: {} succeeded, {} failed, {} total",
            run.success_count,
            run.failure_count,
            run.total_rows
        );
    }
}

/// Silent reporter for embedded use.
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn on_record(&self, _total_rows: usize, _entry: &RunEntry) {}
    fn on_complete(&self, _run: &PipelineRun) {}
}

/// Iterates a record source in order, invokes the caller-supplied
/// transformation per record and accumulates an ordered result log.
/// Per-record failures never escape `run`; the log always has exactly one
/// entry per source row.
pub struct ProcessingPipeline {
    reporter: Box<dyn ProgressReporter>,
}

impl ProcessingPipeline {
    pub fn new() -> Self {
        Self {
            reporter: Box::new(TracingReporter),
        }
    }

    pub fn with_reporter(reporter: Box<dyn ProgressReporter>) -> Self {
        Self { reporter }
    }

    pub fn run<T>(&self, source: &RecordSource, transform: &T) -> Result<PipelineRun>
    where
        T: Transform + ?Sized,
    {
        if source.fields().is_empty() && !source.is_empty() {
            return Err(ProcError::invalid_input(
                "record source declares no fields but contains rows",
            ));
        }

        let total_rows = source.total_rows();
        tracing::debug!("Processing {} records from '{}'", total_rows, source.name());

        let mut log = Vec::with_capacity(total_rows);
        let mut success_count = 0;
        let mut failure_count = 0;

        for index in 0..total_rows {
            let (outcome, record_sample) = match source.get_record(index) {
                // Fetch failure: logged without consulting the transform.
                None => (Outcome::failure("record fetch failed"), Record::default()),
                Some(record) => {
                    let outcome = invoke(transform, index, &record);
                    (outcome, record.sample(SAMPLE_FIELD_COUNT))
                }
            };

            if outcome.success {
                success_count += 1;
            } else {
                failure_count += 1;
            }

            let entry = RunEntry {
                index,
                row_number: index + 1,
                outcome,
                record_sample,
            };
            self.reporter.on_record(total_rows, &entry);
            log.push(entry);
        }

        let run = PipelineRun {
            total_rows,
            success_count,
            failure_count,
            log,
        };
        self.reporter.on_complete(&run);
        Ok(run)
    }
}

impl Default for ProcessingPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// A failing transformation must never abort the run: `Err` returns and
/// panics both collapse into failure outcomes, and a failure without a
/// message gets the fixed default so the log never carries empty errors.
fn invoke<T>(transform: &T, index: usize, record: &Record) -> Outcome
where
    T: Transform + ?Sized,
{
    match catch_unwind(AssertUnwindSafe(|| transform.classify(index, record))) {
        Ok(Ok(outcome)) => normalize(outcome),
        Ok(Err(e)) => Outcome::failure(e.to_string()),
        Err(panic) => Outcome::failure(panic_message(panic)),
    }
}

fn normalize(mut outcome: Outcome) -> Outcome {
    if !outcome.success {
        outcome.error = Some(outcome.error_message());
    }
    outcome
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("transformation panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("transformation panicked: {}", s)
    } else {
        "transformation panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FieldValue, DEFAULT_ERROR_MESSAGE};
    use crate::domain::ports::TransformFn;
    use std::cell::Cell;

    fn three_row_source() -> RecordSource {
        RecordSource::new(
            "test",
            vec!["id".to_string(), "name".to_string()],
            vec![
                vec![FieldValue::from(1i64), FieldValue::from("Ana")],
                vec![FieldValue::from(2i64), FieldValue::from("Luis")],
                vec![FieldValue::from(3i64), FieldValue::Null],
            ],
        )
    }

    fn quiet_pipeline() -> ProcessingPipeline {
        ProcessingPipeline::with_reporter(Box::new(NullReporter))
    }

    #[test]
    fn test_all_success_counts() {
        let source = three_row_source();
        let transform = TransformFn(|_: usize, _: &Record| -> Result<Outcome> { Ok(Outcome::ok()) });

        let run = quiet_pipeline().run(&source, &transform).unwrap();

        assert_eq!(run.total_rows, 3);
        assert_eq!(run.success_count, 3);
        assert_eq!(run.failure_count, 0);
        assert_eq!(run.log.len(), 3);
    }

    #[test]
    fn test_log_preserves_input_order() {
        let source = three_row_source();
        let transform = TransformFn(|_: usize, _: &Record| -> Result<Outcome> { Ok(Outcome::ok()) });

        let run = quiet_pipeline().run(&source, &transform).unwrap();

        for (i, entry) in run.log.iter().enumerate() {
            assert_eq!(entry.index, i);
            assert_eq!(entry.row_number, i + 1);
        }
    }

    #[test]
    fn test_err_return_becomes_failure_outcome() {
        let source = three_row_source();
        let transform = TransformFn(|_: usize, _: &Record| -> Result<Outcome> {
            Err(ProcError::TransformError {
                message: "bad value".to_string(),
            })
        });

        let run = quiet_pipeline().run(&source, &transform).unwrap();

        assert_eq!(run.failure_count, 3);
        for entry in &run.log {
            assert!(!entry.outcome.success);
            assert!(entry.outcome.error.as_deref().unwrap().contains("bad value"));
        }
    }

    #[test]
    fn test_panic_is_absorbed() {
        let source = three_row_source();
        let transform = TransformFn(|index: usize, _: &Record| -> Result<Outcome> {
            if index == 1 {
                panic!("division by zero");
            }
            Ok(Outcome::ok())
        });

        let run = quiet_pipeline().run(&source, &transform).unwrap();

        assert_eq!(run.success_count, 2);
        assert_eq!(run.failure_count, 1);
        let failed = &run.log[1].outcome;
        assert!(!failed.success);
        assert!(failed.error.as_deref().unwrap().contains("division by zero"));
    }

    #[test]
    fn test_failure_without_message_gets_default() {
        let source = three_row_source();
        let transform = TransformFn(|_: usize, _: &Record| -> Result<Outcome> {
            Ok(Outcome {
                success: false,
                error: None,
                payload: serde_json::Map::new(),
            })
        });

        let run = quiet_pipeline().run(&source, &transform).unwrap();

        for entry in &run.log {
            assert_eq!(entry.outcome.error.as_deref(), Some(DEFAULT_ERROR_MESSAGE));
        }
    }

    #[test]
    fn test_fetch_failure_skips_transform() {
        let source = RecordSource::new(
            "broken",
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec![FieldValue::from(1i64), FieldValue::from(2i64)],
                vec![FieldValue::from(3i64)], // arity mismatch
            ],
        );

        let calls = Cell::new(0usize);
        let transform = TransformFn(|_: usize, _: &Record| -> Result<Outcome> {
            calls.set(calls.get() + 1);
            Ok(Outcome::ok())
        });

        let run = quiet_pipeline().run(&source, &transform).unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(run.log.len(), 2);
        assert_eq!(run.success_count, 1);
        assert_eq!(run.failure_count, 1);
        assert_eq!(
            run.log[1].outcome.error.as_deref(),
            Some("record fetch failed")
        );
        assert!(run.log[1].record_sample.is_empty());
    }

    #[test]
    fn test_record_sample_limited_to_three_fields() {
        let source = RecordSource::new(
            "wide",
            vec!["a", "b", "c", "d", "e"]
                .into_iter()
                .map(String::from)
                .collect(),
            vec![vec![
                FieldValue::from(1i64),
                FieldValue::from(2i64),
                FieldValue::from(3i64),
                FieldValue::from(4i64),
                FieldValue::from(5i64),
            ]],
        );
        let transform = TransformFn(|_: usize, _: &Record| -> Result<Outcome> { Ok(Outcome::ok()) });

        let run = quiet_pipeline().run(&source, &transform).unwrap();

        let sample = &run.log[0].record_sample;
        assert_eq!(sample.len(), 3);
        let fields: Vec<&str> = sample.iter().map(|(name, _)| name).collect();
        assert_eq!(fields, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_source_yields_empty_run() {
        let source = RecordSource::new("empty", vec!["a".to_string()], vec![]);
        let transform = TransformFn(|_: usize, _: &Record| -> Result<Outcome> { Ok(Outcome::ok()) });

        let run = quiet_pipeline().run(&source, &transform).unwrap();

        assert_eq!(run.total_rows, 0);
        assert_eq!(run.success_count, 0);
        assert_eq!(run.failure_count, 0);
        assert!(run.log.is_empty());
    }

    #[test]
    fn test_schemaless_source_with_rows_is_invalid() {
        let source = RecordSource::new("invalid", vec![], vec![vec![]]);
        let transform = TransformFn(|_: usize, _: &Record| -> Result<Outcome> { Ok(Outcome::ok()) });

        let result = quiet_pipeline().run(&source, &transform);

        assert!(matches!(result, Err(ProcError::InvalidInput { .. })));
    }

    #[test]
    fn test_reporter_called_per_record_and_on_complete() {
        use std::rc::Rc;

        #[derive(Clone)]
        struct CountingReporter {
            records: Rc<Cell<usize>>,
            completes: Rc<Cell<usize>>,
        }

        impl ProgressReporter for CountingReporter {
            fn on_record(&self, _total_rows: usize, _entry: &RunEntry) {
                self.records.set(self.records.get() + 1);
            }
            fn on_complete(&self, _run: &PipelineRun) {
                self.completes.set(self.completes.get() + 1);
            }
        }

        let reporter = CountingReporter {
            records: Rc::new(Cell::new(0)),
            completes: Rc::new(Cell::new(0)),
        };

        let source = three_row_source();
        let transform = TransformFn(|_: usize, _: &Record| -> Result<Outcome> { Ok(Outcome::ok()) });
        let pipeline = ProcessingPipeline::with_reporter(Box::new(reporter.clone()));

        pipeline.run(&source, &transform).unwrap();

        assert_eq!(reporter.records.get(), 3);
        assert_eq!(reporter.completes.get(), 1);
    }

    #[test]
    fn test_mixed_outcomes_reconcile() {
        let source = three_row_source();
        let transform = TransformFn(|index: usize, record: &Record| -> Result<Outcome> {
            if record.get("name").map(|v| v.is_null()).unwrap_or(true) {
                Ok(Outcome::failure(format!("record {} has no name", index)))
            } else {
                Ok(Outcome::ok())
            }
        });

        let run = quiet_pipeline().run(&source, &transform).unwrap();

        assert_eq!(run.success_count, 2);
        assert_eq!(run.failure_count, 1);
        assert_eq!(run.success_count + run.failure_count, run.total_rows);
        assert!(run.log[2]
            .outcome
            .error
            .as_deref()
            .unwrap()
            .contains("has no name"));
    }
}
