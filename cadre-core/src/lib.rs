//! # cadre-core
//!
//! Core traits for the Cadre modular request framework.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! unit authors and collaborator implementations that don't need the full
//! `cadre-std` implementation or the `cadre` engine.
//!
//! # Architecture
//!
//! Cadre composes independently-registered units into one request/response
//! cycle. The pieces defined here are the seams everything else plugs into:
//!
//! ## Units
//!
//! A *unit* is a named component registered against a page. There are two
//! kinds, each a trait in this crate:
//!
//! - [`HandlerUnit`] — runs in the handler pipeline and may replace the
//!   working [`ResponseState`], or decline and leave it untouched.
//! - [`OutputUnit`] — runs in the output pipeline and contributes either a
//!   whole replacement object (structured responses) or an ordered fragment
//!   (document responses), expressed as [`Rendered`].
//!
//! Both traits use native `async fn` for zero-cost static dispatch and have
//! object-safe `Dyn*` companions ([`DynHandlerUnit`], [`DynOutputUnit`]) for
//! use in registries and factory tables.
//!
//! ## Collaborators
//!
//! The engine talks to its surroundings only through traits:
//!
//! - [`Config`] — read-only configuration values.
//! - [`SessionStore`] — per-user session state, also the storage substrate
//!   for the flash/redirect handoff.
//! - [`Connector`] — establishes an opaque remote-protocol connection for
//!   the connection pool; the wire protocol is deliberately not modeled.
//!
//! # Error Types
//!
//! - [`RegistryError`] — registration conflicts and anchor misses
//! - [`PoolError`] — connection pool failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod config;
mod connector;
mod error;
mod session;
mod state;
mod unit;

// Re-exports
pub use config::Config;
pub use connector::{ConnectionHandle, Connector, Credentials, ServerProfile};
pub use error::{BoxError, PoolError, RegistryError};
pub use session::SessionStore;
pub use state::ResponseState;
pub use unit::{
    DynHandlerUnit, DynOutputUnit, FormatKind, HandlerUnit, OutputUnit, Rendered,
};
