//! Structured log record: an insertion-ordered map of named fields
//!
//! Every record handed to a formatter carries the base fields
//! [`LOG_TIME`], [`TRACE_ID`] and [`LOG_TYPE`] followed by the caller's
//! fields in the order they were supplied.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wall-clock capture time, fractional seconds since the Unix epoch
pub const LOG_TIME: &str = "logTime";
/// Distributed trace identifier (empty when unknown)
pub const TRACE_ID: &str = "traceId";
/// Name of the log type the record was validated against
pub const LOG_TYPE: &str = "logType";

/// Value type for structured record fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Map(IndexMap<String, FieldValue>),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Map(map) => {
                write!(f, "{{")?;
                for (idx, (k, v)) in map.iter().enumerate() {
                    if idx > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}={}", k, v)?;
                }
                write!(f, "}}")
            }
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl FieldValue {
    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect(),
            ),
            FieldValue::Null => serde_json::Value::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<LogRecord> for FieldValue {
    fn from(record: LogRecord) -> Self {
        FieldValue::Map(record.fields)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Ordered mapping from field name to value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRecord {
    fields: IndexMap<String, FieldValue>,
}

impl LogRecord {
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// Add a field to the record
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a field to the record (mutable version)
    ///
    /// Replacing an existing key keeps its original position.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<FieldValue>
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(key)
    }

    /// Remove a field, keeping the order of the remaining ones
    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// True when the field exists and is not null
    pub fn is_set(&self, key: &str) -> bool {
        self.fields.get(key).is_some_and(|v| !v.is_null())
    }

    pub fn fields(&self) -> &IndexMap<String, FieldValue> {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut IndexMap<String, FieldValue> {
        &mut self.fields
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, FieldValue> {
        self.fields.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Overlay `other` on top of this record
    ///
    /// Keys from `other` win on collision; keys already present keep their
    /// position, new keys are appended.
    pub fn merge_from(&mut self, other: LogRecord) {
        for (key, value) in other.fields {
            self.fields.insert(key, value);
        }
    }

    /// Convert the record to a JSON object
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json_value()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for LogRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for LogRecord {
    type Item = (String, FieldValue);
    type IntoIter = indexmap::map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a LogRecord {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = indexmap::map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self
            .fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{}", line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = LogRecord::new();
        assert!(record.is_empty());
    }

    #[test]
    fn test_record_preserves_insertion_order() {
        let record = LogRecord::new()
            .with_field("zeta", 1)
            .with_field("alpha", "two")
            .with_field("mid", true);

        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_merge_from_overrides_in_place() {
        let mut base = LogRecord::new()
            .with_field("logTime", 1.5)
            .with_field("traceId", "")
            .with_field("logType", "order");
        let caller = LogRecord::new()
            .with_field("orderId", "A1")
            .with_field("traceId", "t-9");

        base.merge_from(caller);

        let keys: Vec<&str> = base.keys().collect();
        assert_eq!(keys, vec!["logTime", "traceId", "logType", "orderId"]);
        assert_eq!(base.get("traceId"), Some(&FieldValue::from("t-9")));
    }

    #[test]
    fn test_is_set_treats_null_as_absent() {
        let record = LogRecord::new()
            .with_field("present", "x")
            .with_field("empty", FieldValue::Null);

        assert!(record.is_set("present"));
        assert!(!record.is_set("empty"));
        assert!(!record.is_set("missing"));
        assert!(record.contains_key("empty"));
    }

    #[test]
    fn test_display_format() {
        let record = LogRecord::new()
            .with_field("key1", "value1")
            .with_field("key2", 42);

        assert_eq!(record.to_string(), "key1=value1 key2=42");
    }

    #[test]
    fn test_json_value_conversion() {
        let nested = LogRecord::new().with_field("city", "Seoul");
        let record = LogRecord::new()
            .with_field("amount", 100)
            .with_field("ratio", 0.5)
            .with_field("address", nested);

        let json = record.to_json_value();
        assert_eq!(json["amount"], 100);
        assert_eq!(json["ratio"], 0.5);
        assert_eq!(json["address"]["city"], "Seoul");
    }

    #[test]
    fn test_deserialize_untagged_values() {
        let record: LogRecord =
            serde_json::from_str(r#"{"a":"x","b":3,"c":1.25,"d":false,"e":null,"f":{"g":1}}"#)
                .unwrap();

        assert_eq!(record.get("a"), Some(&FieldValue::String("x".into())));
        assert_eq!(record.get("b"), Some(&FieldValue::Int(3)));
        assert_eq!(record.get("c"), Some(&FieldValue::Float(1.25)));
        assert_eq!(record.get("d"), Some(&FieldValue::Bool(false)));
        assert_eq!(record.get("e"), Some(&FieldValue::Null));
        assert!(matches!(record.get("f"), Some(FieldValue::Map(_))));
    }
}
