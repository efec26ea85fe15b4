use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// Fallback error text for a failure outcome that carries no message.
pub const DEFAULT_ERROR_MESSAGE: &str = "unspecified processing error";

/// One cell value. Absent/empty values are always `Null`, never key absence.
///
/// Untagged so records serialize the way the upstream documents look:
/// nulls stay explicit, dates become ISO-8601 strings. Variant order
/// matters for deserialization: `Date` is tried before `Text` so that
/// `YYYY-MM-DD` strings come back as dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Date(NaiveDate),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn type_tag(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Number(_) => "number",
            FieldValue::Date(_) => "date",
            FieldValue::Text(_) => "text",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n)
            .map(FieldValue::Number)
            .unwrap_or(FieldValue::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

/// One row, materialized as ordered field-name/value pairs. Field order is
/// the source's declaration order and survives serialization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new(entries: Vec<(String, FieldValue)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First `n` fields in declaration order, for diagnostic log entries.
    pub fn sample(&self, n: usize) -> Record {
        Record {
            entries: self.entries.iter().take(n).cloned().collect(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, FieldValue>()? {
                    entries.push((name, value));
                }
                Ok(Record { entries })
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Per-field analysis of a loaded source.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub field: String,
    pub type_tag: String,
    pub non_null_count: usize,
    pub null_count: usize,
    pub distinct_count: usize,
    pub samples: Vec<String>,
}

/// The full ordered collection of records plus the declared field list.
/// Created once by a loader, read many times by index, never mutated.
#[derive(Debug, Clone)]
pub struct RecordSource {
    name: String,
    fields: Vec<String>,
    rows: Vec<Vec<FieldValue>>,
}

impl RecordSource {
    pub fn new(name: impl Into<String>, fields: Vec<String>, rows: Vec<Vec<FieldValue>>) -> Self {
        Self {
            name: name.into(),
            fields,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Materialize the record at `index`. Returns `None` when the index is
    /// out of range or the stored row does not match the declared schema;
    /// callers treat that as a per-record fetch failure, not a crash.
    pub fn get_record(&self, index: usize) -> Option<Record> {
        let row = self.rows.get(index)?;
        if row.len() != self.fields.len() {
            return None;
        }
        Some(Record::new(
            self.fields.iter().cloned().zip(row.iter().cloned()).collect(),
        ))
    }

    /// Per-column stats: inferred type, null accounting, distinct count and
    /// up to 3 sample values in row order.
    pub fn column_summaries(&self) -> Vec<ColumnSummary> {
        self.fields
            .iter()
            .enumerate()
            .map(|(col, field)| {
                let mut tags: HashSet<&'static str> = HashSet::new();
                let mut distinct: HashSet<String> = HashSet::new();
                let mut non_null_count = 0;
                let mut null_count = 0;
                let mut samples = Vec::new();

                for row in &self.rows {
                    match row.get(col) {
                        None | Some(FieldValue::Null) => null_count += 1,
                        Some(value) => {
                            non_null_count += 1;
                            tags.insert(value.type_tag());
                            let rendered = value.to_string();
                            if distinct.insert(rendered.clone()) && samples.len() < 3 {
                                samples.push(rendered);
                            }
                        }
                    }
                }

                let type_tag = match tags.len() {
                    0 => "null".to_string(),
                    1 => tags.into_iter().next().unwrap().to_string(),
                    _ => "mixed".to_string(),
                };

                ColumnSummary {
                    field: field.clone(),
                    type_tag,
                    non_null_count,
                    null_count,
                    distinct_count: distinct.len(),
                    samples,
                }
            })
            .collect()
    }
}

/// Result of one per-record transformation. On failure `error` carries the
/// description; on success the flattened payload carries caller-defined
/// fields, mirroring the loosely-shaped outcome documents this replaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl Outcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
            payload: serde_json::Map::new(),
        }
    }

    pub fn ok_with(payload: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            success: true,
            error: None,
            payload,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            payload: serde_json::Map::new(),
        }
    }

    /// Error text used for accounting: the outcome's own message when
    /// present and non-empty, the fixed default otherwise.
    pub fn error_message(&self) -> String {
        self.error
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
            .to_string()
    }
}

/// One log line of a pipeline run. `record_sample` keeps the first few
/// fields of the original record so failures can be traced back without
/// duplicating whole rows in the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEntry {
    pub index: usize,
    pub row_number: usize,
    pub outcome: Outcome,
    pub record_sample: Record,
}

/// Aggregate result of one full pass over a source. Immutable once built;
/// `log.len() == total_rows` and `success_count + failure_count ==
/// total_rows` hold for every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    pub total_rows: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub log: Vec<RunEntry>,
}
