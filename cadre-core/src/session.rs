//! Session seam.

use serde_json::Value;

/// Per-user session state.
///
/// Besides ordinary key/value storage this is the substrate for the
/// flash/redirect handoff: the engine stashes a computed response here
/// before redirecting and consumes it on the following request.
pub trait SessionStore: Send {
    /// Look up a session value.
    fn get(&self, key: &str) -> Option<Value>;

    /// Look up a session value, falling back to `default`.
    fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Store a session value.
    fn set(&mut self, key: &str, value: Value);

    /// Remove a session value. No-op if absent.
    fn delete(&mut self, key: &str);

    /// Whether this session belongs to an authenticated user.
    fn is_active(&self) -> bool;
}
