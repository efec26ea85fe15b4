use crate::domain::model::{Outcome, PipelineRun, Record, RunEntry};
use crate::utils::error::Result;

/// The single plugin point of the pipeline: one capability, implemented by
/// callers. A transformation may fail by returning `Err` (or by panicking);
/// the pipeline absorbs both into failure outcomes.
pub trait Transform {
    fn classify(&self, index: usize, record: &Record) -> Result<Outcome>;
}

/// Adapter letting a plain closure serve as a transformation.
pub struct TransformFn<F>(pub F);

impl<F> Transform for TransformFn<F>
where
    F: Fn(usize, &Record) -> Result<Outcome>,
{
    fn classify(&self, index: usize, record: &Record) -> Result<Outcome> {
        (self.0)(index, record)
    }
}

/// Observer invoked as the pipeline advances. Keeps the run loop free of
/// output formatting; the default implementation logs through `tracing`.
pub trait ProgressReporter {
    fn on_record(&self, total_rows: usize, entry: &RunEntry);
    fn on_complete(&self, run: &PipelineRun);
}

/// Byte-level persistence behind the exporter.
pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}
