use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Transformation failed: {message}")]
    TransformError { message: String },

    #[error("Export to '{path}' failed: {source}")]
    ExportError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ProcError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ProcError::InvalidInput {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcError>;
