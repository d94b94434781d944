//! Response state threaded through the pipelines.

use serde_json::{Map, Value};

/// The keyed response state threaded through the handler and output
/// pipelines.
///
/// Mutation follows replacement semantics: a unit either returns a whole
/// new state (which becomes the working state for all subsequent units) or
/// declines, leaving the state unchanged. Units never patch the state in
/// place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseState {
    entries: Map<String, Value>,
}

impl ResponseState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Insert a value, replacing any previous value under the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether the state holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Merge another state into this one. Keys from `other` win on overlap.
    pub fn merge(&mut self, other: ResponseState) {
        self.entries.extend(other.entries);
    }

    /// Iterate over entries, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Consume the state into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.entries)
    }

    /// Build a state from a JSON value, if it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(entries) => Some(Self { entries }),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for ResponseState {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(String, Value)> for ResponseState {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_prefers_other() {
        let mut base = ResponseState::new();
        base.insert("a", 1);
        base.insert("b", 2);

        let mut other = ResponseState::new();
        other.insert("b", 3);
        other.insert("c", 4);

        base.merge(other);
        assert_eq!(base.get("a"), Some(&json!(1)));
        assert_eq!(base.get("b"), Some(&json!(3)));
        assert_eq!(base.get("c"), Some(&json!(4)));
    }

    #[test]
    fn round_trips_through_value() {
        let mut state = ResponseState::new();
        state.insert("key", "value");
        let restored = ResponseState::from_value(state.clone().into_value()).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn from_value_rejects_non_objects() {
        assert!(ResponseState::from_value(json!([1, 2, 3])).is_none());
    }
}
