//! Session implementations.

use cadre_core::SessionStore;
use serde_json::Value;
use std::collections::HashMap;

/// In-memory session store.
///
/// Suitable for tests and single-process deployments; persistent stores
/// implement [`SessionStore`] over their own storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    values: HashMap<String, Value>,
    active: bool,
}

impl MemorySession {
    /// Create an inactive (unauthenticated) session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an active (authenticated) session.
    pub fn authenticated() -> Self {
        Self {
            values: HashMap::new(),
            active: true,
        }
    }

    /// Mark the session active or inactive.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn delete(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_or_falls_back() {
        let mut session = MemorySession::new();
        assert_eq!(session.get_or("missing", json!([])), json!([]));
        session.set("present", json!("value"));
        assert_eq!(session.get_or("present", json!([])), json!("value"));
        session.delete("present");
        assert_eq!(session.get("present"), None);
    }
}
