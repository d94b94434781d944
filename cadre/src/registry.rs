//! Per-page ordered unit registrations.
//!
//! A [`ModuleRegistry`] holds, for each page key, an insertion-ordered list
//! of [`UnitDescriptor`]s. Registration supports anchor-relative placement:
//! a new unit can be inserted immediately before or after an already
//! registered unit instead of being appended.
//!
//! The engine keeps two registries, one for handler units and one for
//! output units; they are the same type.

use cadre_core::RegistryError;
use cadre_std::diagnostics::DiagnosticLog;
use serde_json::Value;
use std::collections::HashMap;

/// A registered unit: name, authentication gate, and opaque configuration
/// passed to the unit's factory at resolution time.
///
/// Identity is (page, name); a name is unique within a page.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDescriptor {
    /// Unit name, resolved through the catalog at dispatch time.
    pub name: String,
    /// Skip this unit unless the requester is authenticated.
    pub requires_auth: bool,
    /// Opaque configuration forwarded to the unit factory.
    pub args: Value,
}

/// Where to place a unit relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Immediately before the anchor.
    Before,
    /// Immediately after the anchor.
    #[default]
    After,
}

/// Optional registration parameters for [`ModuleRegistry::register_with`].
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    /// Name of an existing unit to insert relative to. Without an anchor
    /// the new unit is appended.
    pub anchor: Option<String>,
    /// Side of the anchor to insert on.
    pub placement: Placement,
    /// Opaque configuration for the unit factory.
    pub args: Value,
}

impl RegisterOptions {
    /// Insert relative to `anchor` on the given side.
    pub fn anchored(anchor: impl Into<String>, placement: Placement) -> Self {
        Self {
            anchor: Some(anchor.into()),
            placement,
            args: Value::Null,
        }
    }

    /// Attach factory configuration.
    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }
}

/// Per-page ordered collection of unit registrations.
#[derive(Default)]
pub struct ModuleRegistry {
    pages: HashMap<String, Vec<UnitDescriptor>>,
    diagnostics: DiagnosticLog,
}

impl ModuleRegistry {
    /// Create an empty registry reporting to `diagnostics`.
    pub fn new(diagnostics: DiagnosticLog) -> Self {
        Self {
            pages: HashMap::new(),
            diagnostics,
        }
    }

    /// Register a unit at the end of a page's ordering.
    pub fn register(
        &mut self,
        page: &str,
        name: &str,
        requires_auth: bool,
    ) -> Result<(), RegistryError> {
        self.register_with(page, name, requires_auth, RegisterOptions::default())
    }

    /// Register a unit with explicit placement and factory configuration.
    ///
    /// Both failure modes are non-fatal by contract: the registry is left
    /// unchanged, a diagnostic is recorded, and the error is returned for
    /// callers that want to react.
    pub fn register_with(
        &mut self,
        page: &str,
        name: &str,
        requires_auth: bool,
        options: RegisterOptions,
    ) -> Result<(), RegistryError> {
        let entries = self.pages.entry(page.to_string()).or_default();
        if entries.iter().any(|unit| unit.name == name) {
            let err = RegistryError::DuplicateUnit {
                page: page.to_string(),
                name: name.to_string(),
            };
            self.diagnostics.report(err.to_string());
            return Err(err);
        }

        let descriptor = UnitDescriptor {
            name: name.to_string(),
            requires_auth,
            args: options.args,
        };
        match options.anchor {
            Some(anchor) => match entries.iter().position(|unit| unit.name == anchor) {
                Some(index) => {
                    let index = match options.placement {
                        Placement::Before => index,
                        Placement::After => index + 1,
                    };
                    entries.insert(index, descriptor);
                    Ok(())
                }
                None => {
                    let err = RegistryError::AnchorNotFound {
                        page: page.to_string(),
                        anchor,
                    };
                    self.diagnostics.report(err.to_string());
                    Err(err)
                }
            },
            None => {
                entries.push(descriptor);
                Ok(())
            }
        }
    }

    /// Remove a unit from a page's ordering. No-op if absent.
    pub fn remove(&mut self, page: &str, name: &str) {
        if let Some(entries) = self.pages.get_mut(page) {
            entries.retain(|unit| unit.name != name);
        }
    }

    /// Ordered snapshot of a page's registrations; empty if none.
    pub fn list_for_page(&self, page: &str) -> Vec<UnitDescriptor> {
        self.pages.get(page).cloned().unwrap_or_default()
    }
}
