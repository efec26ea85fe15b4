use crate::domain::model::{FieldValue, Outcome, Record};
use crate::domain::ports::Transform;
use crate::utils::error::{ProcError, Result};
use regex::Regex;

/// General-purpose cleanup transformation: rejects records with missing
/// required fields or pattern violations, otherwise trims text values and
/// reports how many fields were populated.
#[derive(Default)]
pub struct CleanFields {
    required: Vec<String>,
    patterns: Vec<(String, Regex)>,
}

impl CleanFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_required(mut self, fields: Vec<String>) -> Self {
        self.required = fields;
        self
    }

    pub fn with_pattern(mut self, field: impl Into<String>, pattern: &str) -> Result<Self> {
        let field = field.into();
        let regex = Regex::new(pattern).map_err(|e| ProcError::InvalidConfigValueError {
            field: field.clone(),
            value: pattern.to_string(),
            reason: format!("invalid pattern: {}", e),
        })?;
        self.patterns.push((field, regex));
        Ok(self)
    }
}

impl Transform for CleanFields {
    fn classify(&self, _index: usize, record: &Record) -> Result<Outcome> {
        let missing: Vec<&str> = self
            .required
            .iter()
            .filter(|field| record.get(field).map_or(true, FieldValue::is_null))
            .map(String::as_str)
            .collect();

        if !missing.is_empty() {
            return Ok(Outcome::failure(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        for (field, regex) in &self.patterns {
            if let Some(FieldValue::Text(text)) = record.get(field) {
                if !regex.is_match(text.trim()) {
                    return Ok(Outcome::failure(format!(
                        "field '{}' does not match the expected pattern",
                        field
                    )));
                }
            }
        }

        let mut cleaned = serde_json::Map::new();
        let mut processed_fields = 0usize;
        for (name, value) in record.iter() {
            if value.is_null() {
                continue;
            }
            processed_fields += 1;
            let cell = match value {
                FieldValue::Text(s) => serde_json::Value::String(s.trim().to_string()),
                other => serde_json::to_value(other)?,
            };
            cleaned.insert(name.to_string(), cell);
        }

        let mut payload = serde_json::Map::new();
        payload.insert("processed_fields".to_string(), processed_fields.into());
        payload.insert(
            "processed_data".to_string(),
            serde_json::Value::Object(cleaned),
        );
        Ok(Outcome::ok_with(payload))
    }
}
