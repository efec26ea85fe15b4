use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extension, validate_path, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "recproc")]
#[command(about = "Batch record processing: per-record pipeline, column analysis and JSON export")]
pub struct CliConfig {
    /// Input records file (CSV or JSON array of objects)
    pub input: String,

    /// TOML job description file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Export destination (defaults to <input>_export.json)
    #[arg(long)]
    pub export: Option<String>,

    /// Also export the run log
    #[arg(long)]
    pub export_run_log: bool,

    /// Log per-column analysis before processing
    #[arg(long)]
    pub analyze: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable system monitoring
    #[arg(long)]
    pub monitor: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_file_extension("input", &self.input, &["csv", "json"])?;

        if let Some(config) = &self.config {
            validate_file_extension("config", config, &["toml"])?;
        }
        if let Some(export) = &self.export {
            validate_path("export", export)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> CliConfig {
        CliConfig {
            input: "data.csv".to_string(),
            config: None,
            export: None,
            export_run_log: false,
            analyze: false,
            verbose: false,
            monitor: false,
        }
    }

    #[test]
    fn test_valid_inputs() {
        assert!(base_config().validate().is_ok());

        let mut json_input = base_config();
        json_input.input = "rows.json".to_string();
        assert!(json_input.validate().is_ok());
    }

    #[test]
    fn test_unsupported_input_extension() {
        let mut config = base_config();
        config.input = "data.xlsx".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_must_be_toml() {
        let mut config = base_config();
        config.config = Some("job.yaml".to_string());
        assert!(config.validate().is_err());
    }
}
