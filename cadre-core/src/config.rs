//! Configuration seam.

use serde_json::Value;

/// Read-only configuration values consumed by the engine.
///
/// The engine only ever reads; loading and persistence are the
/// implementation's concern (see `cadre-std` for in-memory and file-backed
/// implementations).
pub trait Config: Send + Sync {
    /// Look up a configuration value by name.
    fn get(&self, name: &str) -> Option<&Value>;

    /// Look up a string value by name.
    fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }
}
