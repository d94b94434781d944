//! Configuration implementations.

use cadre_core::Config;
use serde_json::{Map, Value};
use std::path::Path;

/// In-memory configuration, built up programmatically.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    values: Map<String, Value>,
}

impl MemoryConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a configuration value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }
}

impl Config for MemoryConfig {
    fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

/// File-backed configuration: a JSON object loaded once at startup.
///
/// An unreadable or unparsable source yields an empty configuration rather
/// than an error; missing config is an expected deployment state.
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    values: Map<String, Value>,
}

impl FileConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let values = match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(values)) => values,
                Ok(_) | Err(_) => {
                    tracing::warn!(path = %path.display(), "config source is not a JSON object, ignoring");
                    Map::new()
                }
            },
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "config source unreadable, starting empty");
                Map::new()
            }
        };
        Self { values }
    }

    /// All loaded values.
    pub fn dump(&self) -> &Map<String, Value> {
        &self.values
    }
}

impl Config for FileConfig {
    fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}
