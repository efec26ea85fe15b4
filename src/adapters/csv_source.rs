use crate::domain::model::{FieldValue, RecordSource};
use crate::utils::error::Result;
use chrono::NaiveDate;
use std::path::Path;

/// Scalar inference for one CSV cell: empty cells become explicit nulls,
/// then booleans, numbers and ISO dates are recognized; anything else
/// stays text as written.
pub(crate) fn parse_cell(raw: &str) -> FieldValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FieldValue::Null;
    }
    match trimmed {
        "true" => return FieldValue::Bool(true),
        "false" => return FieldValue::Bool(false),
        _ => {}
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return FieldValue::Number(i.into());
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return FieldValue::Number(n);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return FieldValue::Date(d);
    }
    FieldValue::Text(raw.to_string())
}

/// Load a headed CSV file into a record source. The header row becomes the
/// declared field list; every data row is inferred cell by cell.
pub fn load_csv(path: impl AsRef<Path>) -> Result<RecordSource> {
    let path = path.as_ref();
    tracing::info!("📊 Loading file: {}", path.display());

    let mut reader = csv::Reader::from_path(path)?;
    let fields: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result?;
        rows.push(row.iter().map(parse_cell).collect());
    }

    tracing::info!(
        "✅ Loaded {} records with {} columns",
        rows.len(),
        fields.len()
    );
    Ok(RecordSource::new(path.display().to_string(), fields, rows))
}
