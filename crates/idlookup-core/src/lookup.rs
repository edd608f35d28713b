//! # Lookup Outcomes
//!
//! A single-row lookup ends in one of two ways: a row came back, or none
//! did. [`Lookup`] makes that explicit. The serialized form keeps the
//! service's `{result}` / `{error}` envelope, and exactly one of the two
//! keys is ever present.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Message carried by every zero-row lookup.
pub const RECORD_NOT_FOUND: &str = "Record not found";

/// One result row: column name to value, in select-list order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column insertion.
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.0.insert(column.to_string(), value.into());
        self
    }

    /// Insert or replace a column value.
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.0.insert(column.into(), value);
    }

    /// Raw value of a column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Column value as text.
    ///
    /// Strings are returned as-is and numbers in their decimal form.
    /// `NULL`, absent columns, and structured values yield `None`.
    pub fn text(&self, column: &str) -> Option<String> {
        match self.0.get(column)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A lookup that matched no rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct NotFound {
    reason: String,
}

impl NotFound {
    /// Not-found with the standard message.
    pub fn record() -> Self {
        Self {
            reason: RECORD_NOT_FOUND.to_string(),
        }
    }

    /// Human-readable reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Default for NotFound {
    fn default() -> Self {
        Self::record()
    }
}

/// Outcome of a single-row lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The first matching row.
    Found(T),
    /// No row matched.
    Missing(NotFound),
}

impl<T> Lookup<T> {
    /// Take the first row of a result set, or [`Lookup::Missing`] when empty.
    pub fn first_of(rows: impl IntoIterator<Item = T>) -> Self {
        match rows.into_iter().next() {
            Some(row) => Self::Found(row),
            None => Self::Missing(NotFound::record()),
        }
    }

    /// The found value, if any.
    pub fn result(&self) -> Option<&T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Missing(_) => None,
        }
    }

    /// The not-found reason, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Found(_) => None,
            Self::Missing(nf) => Some(nf.reason()),
        }
    }

    /// Whether a row was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Convert into a `Result` so callers can use `?`.
    pub fn found(self) -> Result<T, NotFound> {
        match self {
            Self::Found(value) => Ok(value),
            Self::Missing(nf) => Err(nf),
        }
    }

    /// Map the found value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::Missing(nf) => Lookup::Missing(nf),
        }
    }
}

impl<T: Serialize> Serialize for Lookup<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Found(value) => map.serialize_entry("result", value)?,
            Self::Missing(nf) => map.serialize_entry("error", nf.reason())?,
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_result_set_is_missing() {
        let lookup = Lookup::<Record>::first_of(Vec::new());
        assert!(!lookup.is_found());
        assert!(lookup.result().is_none());
        assert_eq!(lookup.error(), Some(RECORD_NOT_FOUND));
    }

    #[test]
    fn first_row_wins() {
        let rows = vec![
            Record::new().with("eid", "E-1"),
            Record::new().with("eid", "E-2"),
        ];
        let lookup = Lookup::first_of(rows);
        assert_eq!(lookup.result().and_then(|r| r.text("eid")), Some("E-1".into()));
        assert!(lookup.error().is_none());
    }

    #[test]
    fn serialized_envelope_never_carries_both() {
        let found = serde_json::to_value(Lookup::Found(Record::new().with("uid", 7))).unwrap();
        assert_eq!(found, json!({"result": {"uid": 7}}));

        let missing = serde_json::to_value(Lookup::<Record>::Missing(NotFound::record())).unwrap();
        assert_eq!(missing, json!({"error": "Record not found"}));
    }

    #[test]
    fn found_converts_to_result() {
        let ok = Lookup::Found(1).found();
        assert_eq!(ok, Ok(1));
        let err = Lookup::<i32>::Missing(NotFound::record()).found().unwrap_err();
        assert_eq!(err.to_string(), RECORD_NOT_FOUND);
    }

    #[test]
    fn record_text_stringifies_scalars() {
        let record = Record::new()
            .with("employer_id", 42)
            .with("email", "a@b.c")
            .with("flag", true)
            .with("rules", json!({"behaviors": []}))
            .with("nothing", Value::Null);
        assert_eq!(record.text("employer_id"), Some("42".into()));
        assert_eq!(record.text("email"), Some("a@b.c".into()));
        assert_eq!(record.text("flag"), Some("true".into()));
        assert_eq!(record.text("rules"), None);
        assert_eq!(record.text("nothing"), None);
        assert_eq!(record.text("absent"), None);
        assert_eq!(record.len(), 5);
    }

    #[test]
    fn record_serializes_as_plain_object() {
        let record = Record::new().with("email", "x@y.z");
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"email":"x@y.z"}"#);
    }
}
