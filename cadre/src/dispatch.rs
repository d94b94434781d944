//! The handler pipeline.

use crate::catalog::UnitCatalog;
use crate::registry::ModuleRegistry;
use cadre_core::{Config, ResponseState};
use cadre_std::diagnostics::DiagnosticLog;

/// Runs a page's handler ordering against a response state.
///
/// Units execute in registration order. A unit whose gate requires
/// authentication is skipped for unauthenticated requests; a unit whose
/// name cannot be resolved is skipped with a diagnostic; a unit that fails
/// is skipped with a diagnostic. None of these abort the pipeline.
pub struct Dispatcher<'a> {
    registry: &'a ModuleRegistry,
    catalog: &'a UnitCatalog,
    config: &'a dyn Config,
    diagnostics: &'a DiagnosticLog,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher over the given collaborators.
    pub fn new(
        registry: &'a ModuleRegistry,
        catalog: &'a UnitCatalog,
        config: &'a dyn Config,
        diagnostics: &'a DiagnosticLog,
    ) -> Self {
        Self {
            registry,
            catalog,
            config,
            diagnostics,
        }
    }

    /// Run the handler ordering for `page`, returning the final state.
    ///
    /// After the ordering completes, a missing `language` key is filled
    /// from the `default_language` config value when that value is set.
    pub async fn run(
        &self,
        page: &str,
        state: ResponseState,
        is_authenticated: bool,
    ) -> ResponseState {
        let mut state = state;
        for descriptor in self.registry.list_for_page(page) {
            if descriptor.requires_auth && !is_authenticated {
                tracing::trace!(page, unit = %descriptor.name, "skipping gated handler unit");
                continue;
            }
            let unit = match self.catalog.resolve_handler(&descriptor.name, &descriptor.args) {
                Some(Ok(unit)) => unit,
                Some(Err(err)) => {
                    self.diagnostics.report(format!(
                        "handler unit '{}' could not be constructed: {err}",
                        descriptor.name
                    ));
                    continue;
                }
                None => {
                    self.diagnostics.report(format!(
                        "handler unit '{}' activated but not found",
                        descriptor.name
                    ));
                    continue;
                }
            };
            match unit.process_dyn(&state).await {
                Ok(Some(next)) => state = next,
                Ok(None) => {}
                Err(err) => {
                    self.diagnostics
                        .report(format!("handler unit '{}' failed: {err}", descriptor.name));
                }
            }
        }

        if !state.contains_key("language") {
            if let Some(language) = self.config.get_str("default_language") {
                state.insert("language", language);
            }
        }
        state
    }
}
