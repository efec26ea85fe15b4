use crate::core::transforms::CleanFields;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// TOML job description driving the CLI: which file to process, which
/// fields the cleanup transform enforces, which keys to extract and where
/// exports go.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub job: JobSection,
    pub source: Option<SourceSection>,
    pub process: Option<ProcessSection>,
    pub extract: Option<ExtractSection>,
    pub export: Option<ExportSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSection {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    pub path: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessSection {
    pub required_fields: Option<Vec<String>>,
    /// field name -> regex the (trimmed) text value must match
    pub patterns: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractSection {
    pub keys: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSection {
    pub destination: Option<String>,
    pub run_log: Option<bool>,
}

impl JobConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Assemble the configured cleanup transform. Pattern compilation
    /// failures surface as config errors before any processing starts.
    pub fn build_transform(&self) -> Result<CleanFields> {
        let mut transform = CleanFields::new();

        if let Some(process) = &self.process {
            if let Some(required) = &process.required_fields {
                transform = transform.with_required(required.clone());
            }
            if let Some(patterns) = &process.patterns {
                for (field, pattern) in patterns {
                    transform = transform.with_pattern(field.clone(), pattern)?;
                }
            }
        }

        Ok(transform)
    }

    pub fn run_log_enabled(&self) -> bool {
        self.export
            .as_ref()
            .and_then(|e| e.run_log)
            .unwrap_or(false)
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            job: JobSection {
                name: "ad-hoc".to_string(),
                description: None,
            },
            source: None,
            process: None,
            extract: None,
            export: None,
        }
    }
}

impl Validate for JobConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("job.name", &self.job.name)?;

        if let Some(source) = &self.source {
            if let Some(path) = &source.path {
                validate_path("source.path", path)?;
                validate_file_extension("source.path", path, &["csv", "json"])?;
            }
        }

        if let Some(process) = &self.process {
            if let Some(required) = &process.required_fields {
                for field in required {
                    validate_non_empty_string("process.required_fields", field)?;
                }
            }
        }

        if let Some(extract) = &self.extract {
            if let Some(keys) = &extract.keys {
                for key in keys {
                    validate_non_empty_string("extract.keys", key)?;
                }
            }
        }

        if let Some(export) = &self.export {
            if let Some(destination) = &export.destination {
                validate_path("export.destination", destination)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ProcError;

    const FULL_CONFIG: &str = r#"
[job]
name = "invoices"
description = "Nightly invoice batch"

[source]
path = "invoices.csv"
format = "csv"

[process]
required_fields = ["cufe", "total"]

[process.patterns]
cufe = "^[0-9a-f]{8}$"

[extract]
keys = ["cufe", "total"]

[export]
destination = "out/invoices_export.json"
run_log = true
"#;

    #[test]
    fn test_parse_full_config() {
        let config = JobConfig::from_str(FULL_CONFIG).unwrap();

        assert_eq!(config.job.name, "invoices");
        assert_eq!(
            config.source.as_ref().unwrap().path.as_deref(),
            Some("invoices.csv")
        );
        assert_eq!(
            config.process.as_ref().unwrap().required_fields,
            Some(vec!["cufe".to_string(), "total".to_string()])
        );
        assert!(config.run_log_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_config() {
        let config = JobConfig::from_str("[job]\nname = \"tiny\"\n").unwrap();
        assert!(config.validate().is_ok());
        assert!(!config.run_log_enabled());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = JobConfig::from_str("not valid [toml");
        assert!(matches!(result, Err(ProcError::ConfigParseError(_))));
    }

    #[test]
    fn test_empty_job_name_fails_validation() {
        let config = JobConfig::from_str("[job]\nname = \"  \"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_source_extension_fails_validation() {
        let config =
            JobConfig::from_str("[job]\nname = \"x\"\n[source]\npath = \"data.xlsx\"\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ProcError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_build_transform_rejects_bad_pattern() {
        let config = JobConfig::from_str(
            "[job]\nname = \"x\"\n[process.patterns]\ncode = \"([open\"\n",
        )
        .unwrap();
        assert!(config.build_transform().is_err());
    }

    #[test]
    fn test_build_transform_applies_rules() {
        use crate::domain::model::{FieldValue, Record};
        use crate::domain::ports::Transform;

        let config = JobConfig::from_str(FULL_CONFIG).unwrap();
        let transform = config.build_transform().unwrap();

        let record = Record::new(vec![
            ("cufe".to_string(), FieldValue::Null),
            ("total".to_string(), FieldValue::from(10i64)),
        ]);
        let outcome = transform.classify(0, &record).unwrap();

        assert!(!outcome.success);
        assert!(outcome.error.as_deref().unwrap().contains("cufe"));
    }
}
