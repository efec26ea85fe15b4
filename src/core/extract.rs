use crate::utils::error::{ProcError, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// One extracted record: the wanted keys in caller order, absent keys
/// resolved to null. Serializes as a JSON object in that same order.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    entries: Vec<(String, Value)>,
}

impl Projection {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
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
}

impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn project(object: &serde_json::Map<String, Value>, wanted: &[String]) -> Projection {
    Projection {
        entries: wanted
            .iter()
            .map(|key| {
                (
                    key.clone(),
                    object.get(key).cloned().unwrap_or(Value::Null),
                )
            })
            .collect(),
    }
}

/// Top-level key extraction over a decoded document. A list input yields
/// one projection per object element (non-object elements are skipped, not
/// errors); an object input yields a single projection. Output order
/// matches input order; each projection's keys follow `wanted` exactly.
pub fn extract_keys(doc: &Value, wanted: &[String]) -> Result<Vec<Projection>> {
    if wanted.is_empty() {
        return Err(ProcError::invalid_input("no keys requested for extraction"));
    }

    match doc {
        Value::Array(elements) => Ok(elements
            .iter()
            .filter_map(|element| element.as_object())
            .map(|object| project(object, wanted))
            .collect()),
        Value::Object(object) => Ok(vec![project(object, wanted)]),
        _ => Err(ProcError::invalid_input(
            "document must be an object or an array of objects",
        )),
    }
}
