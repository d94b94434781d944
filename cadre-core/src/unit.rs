//! Unit traits: the building blocks of the request pipelines.
//!
//! A unit is a named component registered against a page. Handler units run
//! first and shape the [`ResponseState`]; output units run second and turn
//! the final state into a response. Both decide per invocation whether to
//! contribute anything at all.
//!
//! # Static vs Dynamic Dispatch
//!
//! The primary traits use native `async fn` for zero-cost static dispatch.
//! For dynamic dispatch (registries, factory tables), use the object-safe
//! [`DynHandlerUnit`] / [`DynOutputUnit`] companions; blanket impls convert
//! automatically.

use crate::error::BoxError;
use crate::state::ResponseState;
use std::{future::Future, pin::Pin};

/// The shape an output pipeline produces, derived from the request kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// One merged object; each contributing unit's replacement wholly
    /// overwrites the working object, so the last writer wins per key.
    Structured,
    /// An ordered fragment sequence, concatenated in unit order.
    Document,
}

impl FormatKind {
    /// Stable name for diagnostics and router metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatKind::Structured => "structured",
            FormatKind::Document => "document",
        }
    }
}

/// What an output unit produced for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// A whole replacement object. An empty object means "no output" in a
    /// structured pipeline.
    Object(ResponseState),
    /// A document fragment. Empty fragments are still appended in order.
    Fragment(String),
}

/// A unit in the handler pipeline.
///
/// Receives the current response state and either returns a full
/// replacement (`Some`) or declines (`None`), leaving the state unchanged
/// for subsequent units.
///
/// # Example
///
/// ```rust,ignore
/// struct DateUnit;
///
/// impl HandlerUnit for DateUnit {
///     async fn process(&self, state: &ResponseState) -> Result<Option<ResponseState>, BoxError> {
///         let mut next = state.clone();
///         next.insert("date", today());
///         Ok(Some(next))
///     }
/// }
/// ```
pub trait HandlerUnit: Send + Sync + 'static {
    /// Run the unit against the current state.
    fn process(
        &self,
        state: &ResponseState,
    ) -> impl Future<Output = Result<Option<ResponseState>, BoxError>> + Send;
}

/// Dynamic object-safe version of [`HandlerUnit`].
pub trait DynHandlerUnit: Send + Sync + 'static {
    /// Run the unit against the current state (dynamic dispatch version).
    fn process_dyn<'a>(
        &'a self,
        state: &'a ResponseState,
    ) -> Pin<Box<dyn Future<Output = Result<Option<ResponseState>, BoxError>> + Send + 'a>>;
}

// Blanket implementation: any HandlerUnit is a DynHandlerUnit.
impl<T: HandlerUnit> DynHandlerUnit for T {
    fn process_dyn<'a>(
        &'a self,
        state: &'a ResponseState,
    ) -> Pin<Box<dyn Future<Output = Result<Option<ResponseState>, BoxError>> + Send + 'a>> {
        Box::pin(self.process(state))
    }
}

/// A unit in the output pipeline.
///
/// Receives the working state and the pipeline's format kind, and returns
/// what it rendered. Structured pipelines expect [`Rendered::Object`];
/// document pipelines expect [`Rendered::Fragment`].
pub trait OutputUnit: Send + Sync + 'static {
    /// Render this unit's contribution.
    fn render(
        &self,
        state: &ResponseState,
        kind: FormatKind,
    ) -> impl Future<Output = Result<Rendered, BoxError>> + Send;
}

/// Dynamic object-safe version of [`OutputUnit`].
pub trait DynOutputUnit: Send + Sync + 'static {
    /// Render this unit's contribution (dynamic dispatch version).
    fn render_dyn<'a>(
        &'a self,
        state: &'a ResponseState,
        kind: FormatKind,
    ) -> Pin<Box<dyn Future<Output = Result<Rendered, BoxError>> + Send + 'a>>;
}

// Blanket implementation: any OutputUnit is a DynOutputUnit.
impl<T: OutputUnit> DynOutputUnit for T {
    fn render_dyn<'a>(
        &'a self,
        state: &'a ResponseState,
        kind: FormatKind,
    ) -> Pin<Box<dyn Future<Output = Result<Rendered, BoxError>> + Send + 'a>> {
        Box::pin(self.render(state, kind))
    }
}
