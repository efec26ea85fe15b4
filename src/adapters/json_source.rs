use crate::domain::model::{FieldValue, RecordSource};
use crate::utils::error::{ProcError, Result};
use chrono::NaiveDate;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Decode a JSON document for traversal or extraction.
pub fn load_value(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    tracing::info!("📊 Loading file: {}", path.display());
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn scalar_from_json(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Number(n) => FieldValue::Number(n.clone()),
        Value::String(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(d) => FieldValue::Date(d),
            Err(_) => FieldValue::Text(s.clone()),
        },
        // Records hold scalars only; a nested container in a cell is kept
        // leniently as its compact JSON text.
        container => FieldValue::Text(container.to_string()),
    }
}

/// Build a record source from a decoded document: an array of objects
/// (non-object elements skipped) or a single object. The first object's
/// keys in document order become the declared schema; fields absent from
/// later objects are explicit nulls.
pub fn source_from_value(name: &str, value: &Value) -> Result<RecordSource> {
    let objects: Vec<&serde_json::Map<String, Value>> = match value {
        Value::Array(items) => {
            let objects: Vec<_> = items.iter().filter_map(Value::as_object).collect();
            if objects.len() < items.len() {
                tracing::warn!(
                    "⚠️ Skipped {} non-object elements in '{}'",
                    items.len() - objects.len(),
                    name
                );
            }
            objects
        }
        Value::Object(object) => vec![object],
        _ => {
            return Err(ProcError::invalid_input(
                "document must be an object or an array of objects",
            ))
        }
    };

    let fields: Vec<String> = objects
        .first()
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default();

    let rows = objects
        .iter()
        .map(|object| {
            fields
                .iter()
                .map(|field| object.get(field).map(scalar_from_json).unwrap_or(FieldValue::Null))
                .collect()
        })
        .collect();

    Ok(RecordSource::new(name, fields, rows))
}

/// Load a JSON file straight into a record source.
pub fn load_records(path: impl AsRef<Path>) -> Result<RecordSource> {
    let path = path.as_ref();
    let value = load_value(path)?;
    let source = source_from_value(&path.display().to_string(), &value)?;
    tracing::info!(
        "✅ Loaded {} records with {} columns",
        source.total_rows(),
        source.fields().len()
    );
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_from_first_object_in_document_order() {
        let doc = json!([
            {"zeta": 1, "alpha": 2},
            {"alpha": 3}
        ]);
        let source = source_from_value("doc.json", &doc).unwrap();

        assert_eq!(source.fields(), &["zeta", "alpha"]);

        let second = source.get_record(1).unwrap();
        assert_eq!(second.get("zeta"), Some(&FieldValue::Null));
        assert_eq!(second.get("alpha"), Some(&FieldValue::Number(3.into())));
    }

    #[test]
    fn test_single_object_becomes_one_record() {
        let doc = json!({"id": 9, "name": "solo"});
        let source = source_from_value("doc.json", &doc).unwrap();

        assert_eq!(source.total_rows(), 1);
        assert_eq!(
            source.get_record(0).unwrap().get("name"),
            Some(&FieldValue::Text("solo".to_string()))
        );
    }

    #[test]
    fn test_non_object_elements_skipped() {
        let doc = json!([{"id": 1}, "noise", {"id": 2}]);
        let source = source_from_value("doc.json", &doc).unwrap();
        assert_eq!(source.total_rows(), 2);
    }

    #[test]
    fn test_scalar_root_is_invalid() {
        let result = source_from_value("doc.json", &json!(true));
        assert!(matches!(result, Err(ProcError::InvalidInput { .. })));
    }

    #[test]
    fn test_iso_strings_become_dates() {
        let doc = json!([{"joined": "2021-05-03", "name": "Ana"}]);
        let source = source_from_value("doc.json", &doc).unwrap();

        let record = source.get_record(0).unwrap();
        assert_eq!(
            record.get("joined"),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2021, 5, 3).unwrap()))
        );
    }

    #[test]
    fn test_nested_container_cell_kept_as_text() {
        let doc = json!([{"id": 1, "tags": ["a", "b"]}]);
        let source = source_from_value("doc.json", &doc).unwrap();

        let record = source.get_record(0).unwrap();
        assert_eq!(
            record.get("tags"),
            Some(&FieldValue::Text(r#"["a","b"]"#.to_string()))
        );
    }
}
