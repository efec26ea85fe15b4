use crate::domain::model::{PipelineRun, Record, RecordSource};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ExportRow {
    row_number: usize,
    data: Record,
}

/// Derive the destination from the input name: the extension is replaced
/// by the `_export.json` suffix, keeping any directory part.
pub fn default_export_path(source_name: &str) -> String {
    let base = Path::new(source_name).with_extension("");
    format!("{}_export.json", base.display())
}

/// Serializes a record source or a finished pipeline run to pretty-printed
/// UTF-8 JSON through the storage port. Atomic visibility (no partial file
/// on failure) is the storage implementation's contract.
pub struct Exporter<S: Storage> {
    storage: S,
}

impl<S: Storage> Exporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Write the full source as `[{row_number, data}]`, 1-based numbering,
    /// nulls kept explicit. Returns the destination path.
    pub fn export_source(&self, source: &RecordSource, dest: Option<&str>) -> Result<String> {
        let path = dest
            .map(str::to_string)
            .unwrap_or_else(|| default_export_path(source.name()));

        let mut rows = Vec::with_capacity(source.total_rows());
        for index in 0..source.total_rows() {
            match source.get_record(index) {
                Some(record) => rows.push(ExportRow {
                    row_number: index + 1,
                    data: record,
                }),
                None => {
                    tracing::warn!("⚠️ Skipping unreadable record {} during export", index);
                }
            }
        }

        self.write_json(&path, &rows)?;
        tracing::info!("📁 Exported {} records to: {}", rows.len(), path);
        Ok(path)
    }

    /// Write a pipeline run with its counts and full log.
    pub fn export_run(&self, run: &PipelineRun, dest: &str) -> Result<String> {
        self.write_json(dest, run)?;
        tracing::info!("📁 Exported run log ({} entries) to: {}", run.log.len(), dest);
        Ok(dest.to_string())
    }

    fn write_json<T: Serialize>(&self, path: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.storage.write_file(path, json.as_bytes())
    }
}
