//! Factory tables mapping unit names to constructors.
//!
//! Registrations in a [`ModuleRegistry`](crate::registry::ModuleRegistry)
//! carry only names; the catalog is what turns a name plus its registered
//! args into a live unit. Keeping the table explicit gives checkable
//! dispatch: a name with no factory is a skippable anomaly, not a crash.

use cadre_core::{BoxError, DynHandlerUnit, DynOutputUnit};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Constructor for a handler unit. Receives the descriptor's args.
pub type HandlerFactory =
    Box<dyn Fn(&Value) -> Result<Arc<dyn DynHandlerUnit>, BoxError> + Send + Sync>;

/// Constructor for an output unit. Receives the descriptor's args.
pub type OutputFactory =
    Box<dyn Fn(&Value) -> Result<Arc<dyn DynOutputUnit>, BoxError> + Send + Sync>;

/// Name-to-constructor tables for both unit kinds.
#[derive(Default)]
pub struct UnitCatalog {
    handlers: HashMap<String, HandlerFactory>,
    outputs: HashMap<String, OutputFactory>,
}

impl UnitCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler unit constructor under `name`.
    pub fn register_handler(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(&Value) -> Result<Arc<dyn DynHandlerUnit>, BoxError> + Send + Sync + 'static,
    ) {
        self.handlers.insert(name.into(), Box::new(factory));
    }

    /// Register an output unit constructor under `name`.
    pub fn register_output(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(&Value) -> Result<Arc<dyn DynOutputUnit>, BoxError> + Send + Sync + 'static,
    ) {
        self.outputs.insert(name.into(), Box::new(factory));
    }

    /// Construct the handler unit registered under `name`, if any.
    ///
    /// `None` means the name is unknown; `Some(Err)` means the factory
    /// rejected the args. Pipelines treat both as a skipped unit.
    pub fn resolve_handler(
        &self,
        name: &str,
        args: &Value,
    ) -> Option<Result<Arc<dyn DynHandlerUnit>, BoxError>> {
        self.handlers.get(name).map(|factory| factory(args))
    }

    /// Construct the output unit registered under `name`, if any.
    pub fn resolve_output(
        &self,
        name: &str,
        args: &Value,
    ) -> Option<Result<Arc<dyn DynOutputUnit>, BoxError>> {
        self.outputs.get(name).map(|factory| factory(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadre_std::testing::{RecordingHandlerUnit, StaticOutputUnit};

    #[test]
    fn resolves_registered_names_only() {
        let mut catalog = UnitCatalog::new();
        catalog.register_handler("known", |_args| Ok(Arc::new(RecordingHandlerUnit::new())));
        catalog.register_output("known_out", |_args| {
            Ok(Arc::new(StaticOutputUnit::fragment("x")))
        });

        assert!(catalog.resolve_handler("known", &Value::Null).is_some());
        assert!(catalog.resolve_handler("unknown", &Value::Null).is_none());
        assert!(catalog.resolve_output("known_out", &Value::Null).is_some());
        assert!(catalog.resolve_output("known", &Value::Null).is_none());
    }

    #[test]
    fn factory_errors_surface_as_some_err() {
        let mut catalog = UnitCatalog::new();
        catalog.register_handler("picky", |args| {
            if args.is_null() {
                Err("args required".into())
            } else {
                Ok(Arc::new(RecordingHandlerUnit::new()))
            }
        });

        assert!(matches!(
            catalog.resolve_handler("picky", &Value::Null),
            Some(Err(_))
        ));
        assert!(matches!(
            catalog.resolve_handler("picky", &Value::Bool(true)),
            Some(Ok(_))
        ));
    }
}
