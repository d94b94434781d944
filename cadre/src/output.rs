//! The output pipeline.

use crate::catalog::UnitCatalog;
use crate::registry::ModuleRegistry;
use cadre_core::{FormatKind, Rendered, ResponseState};
use cadre_std::diagnostics::DiagnosticLog;

/// What an output pipeline produced for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedResponse {
    /// One merged object (structured format).
    Structured(ResponseState),
    /// Concatenated fragments (document format).
    Document(String),
}

/// Runs a page's output ordering against the final response state.
///
/// Behavior branches on the format kind:
///
/// - `Structured`: the working object starts as the input state. Each
///   eligible unit that returns a non-empty object wholly replaces it, so
///   the last producing unit wins per overlapping key.
/// - `Document`: every eligible unit's fragment is appended in order, empty
///   fragments included, and the result is the concatenation.
///
/// Gating and unresolved-unit handling match the handler pipeline.
pub struct OutputPipeline<'a> {
    registry: &'a ModuleRegistry,
    catalog: &'a UnitCatalog,
    diagnostics: &'a DiagnosticLog,
}

impl<'a> OutputPipeline<'a> {
    /// Create a pipeline over the given collaborators.
    pub fn new(
        registry: &'a ModuleRegistry,
        catalog: &'a UnitCatalog,
        diagnostics: &'a DiagnosticLog,
    ) -> Self {
        Self {
            registry,
            catalog,
            diagnostics,
        }
    }

    /// Run the output ordering for `page`.
    pub async fn run(
        &self,
        page: &str,
        state: &ResponseState,
        kind: FormatKind,
        is_authenticated: bool,
    ) -> RenderedResponse {
        let mut working = state.clone();
        let mut fragments: Vec<String> = Vec::new();

        for descriptor in self.registry.list_for_page(page) {
            if descriptor.requires_auth && !is_authenticated {
                tracing::trace!(page, unit = %descriptor.name, "skipping gated output unit");
                continue;
            }
            let unit = match self.catalog.resolve_output(&descriptor.name, &descriptor.args) {
                Some(Ok(unit)) => unit,
                Some(Err(err)) => {
                    self.diagnostics.report(format!(
                        "output unit '{}' could not be constructed: {err}",
                        descriptor.name
                    ));
                    continue;
                }
                None => {
                    self.diagnostics.report(format!(
                        "output unit '{}' activated but not found",
                        descriptor.name
                    ));
                    continue;
                }
            };
            // Structured units see the current working object; document
            // units see the unchanged input state.
            let rendered = match kind {
                FormatKind::Structured => unit.render_dyn(&working, kind).await,
                FormatKind::Document => unit.render_dyn(state, kind).await,
            };
            match (kind, rendered) {
                (FormatKind::Structured, Ok(Rendered::Object(object))) => {
                    if !object.is_empty() {
                        working = object;
                    }
                }
                (FormatKind::Document, Ok(Rendered::Fragment(fragment))) => {
                    fragments.push(fragment);
                }
                (_, Ok(mismatched)) => {
                    self.diagnostics.report(format!(
                        "output unit '{}' returned {} in {} mode",
                        descriptor.name,
                        match mismatched {
                            Rendered::Object(_) => "an object",
                            Rendered::Fragment(_) => "a fragment",
                        },
                        kind.as_str()
                    ));
                }
                (_, Err(err)) => {
                    self.diagnostics
                        .report(format!("output unit '{}' failed: {err}", descriptor.name));
                }
            }
        }

        match kind {
            FormatKind::Structured => RenderedResponse::Structured(working),
            FormatKind::Document => RenderedResponse::Document(fragments.concat()),
        }
    }
}
