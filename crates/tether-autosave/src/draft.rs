//! Draft content and task identifiers

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of the task a draft belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Create from any string-like id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as `&str`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Accumulated field edits for one task
///
/// An insertion-ordered map of field name to JSON value. Merging is shallow:
/// a field present in the update replaces the stored value and keeps its
/// original position; nested objects are replaced, not merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Draft(IndexMap<String, Value>);

impl Draft {
    /// Empty draft
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow-merge `partial` into this draft
    pub fn merge(&mut self, partial: Draft) {
        for (field, value) in partial.0 {
            self.0.insert(field, value);
        }
    }

    /// Set one field
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// With one field set
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Value of a field
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field has been edited
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field names in insertion order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Draft {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<IndexMap<String, Value>> for Draft {
    fn from(value: IndexMap<String, Value>) -> Self {
        Self(value)
    }
}

impl TryFrom<Value> for Draft {
    type Error = Value;

    /// Accepts a JSON object; any other value is handed back unchanged
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_is_shallow_and_order_preserving() {
        let mut draft = Draft::new()
            .with("title", "Quarterly filing")
            .with("meta", json!({ "a": 1, "b": 2 }));

        draft.merge(
            Draft::new()
                .with("notes", "call accountant")
                .with("title", "Q3 filing")
                .with("meta", json!({ "b": 3 })),
        );

        assert_eq!(draft.fields().collect::<Vec<_>>(), ["title", "meta", "notes"]);
        assert_eq!(draft.get("title"), Some(&json!("Q3 filing")));
        assert_eq!(draft.get("meta"), Some(&json!({ "b": 3 })));
    }

    #[test]
    fn serializes_as_plain_object() {
        let draft = Draft::new().with("b", 2).with("a", 1);
        assert_eq!(serde_json::to_string(&draft).unwrap(), r#"{"b":2,"a":1}"#);
    }

    #[test]
    fn only_objects_convert() {
        let draft = Draft::try_from(json!({ "done": true })).unwrap();
        assert_eq!(draft.len(), 1);
        assert!(Draft::try_from(json!([1, 2])).is_err());
    }
}
