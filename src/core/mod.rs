pub mod export;
pub mod extract;
pub mod pipeline;
pub mod transforms;
pub mod traversal;

pub use crate::domain::model::{
    ColumnSummary, FieldValue, Outcome, PipelineRun, Record, RecordSource, RunEntry,
};
pub use crate::domain::ports::{ProgressReporter, Storage, Transform, TransformFn};
pub use crate::utils::error::Result;
