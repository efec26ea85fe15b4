pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::storage::LocalStorage;
pub use config::JobConfig;
pub use core::export::Exporter;
pub use core::pipeline::ProcessingPipeline;
pub use domain::model::{
    FieldValue, Outcome, PipelineRun, Record, RecordSource, RunEntry,
};
pub use domain::ports::{Transform, TransformFn};
pub use utils::error::{ProcError, Result};
