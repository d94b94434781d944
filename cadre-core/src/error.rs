//! Error types for Cadre.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`RegistryError`] - Rejected unit registrations
//! - [`PoolError`] - Connection pool failures
//!
//! Every variant here is recoverable at the call site. Registration errors
//! are additionally reported to the diagnostic log by the engine and never
//! abort a pipeline; pool errors are ordinary failed results for the caller
//! to translate into a user-facing message.

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by unit registration.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A unit with this name is already registered for the page. The
    /// existing registration is kept; re-registration never overwrites.
    #[error("unit '{name}' already registered for page '{page}'")]
    DuplicateUnit {
        /// Page the registration targeted.
        page: String,
        /// Name of the rejected unit.
        name: String,
    },

    /// An anchor-relative insert named an anchor that is not in the page's
    /// current ordering. The registration is dropped, not appended.
    #[error("anchor '{anchor}' not found for page '{page}'")]
    AnchorNotFound {
        /// Page the registration targeted.
        page: String,
        /// The missing anchor name.
        anchor: String,
    },
}

/// Errors raised by the connection pool.
#[derive(Error, Debug)]
pub enum PoolError {
    /// No connection descriptor exists under the given id.
    #[error("no connection registered under id '{0}'")]
    UnknownConnection(String),

    /// Neither explicit arguments nor retained credentials yielded a full
    /// user/password pair. No connection attempt was made.
    #[error("no credentials available for connection '{0}'")]
    CredentialsMissing(String),

    /// The underlying connection attempt failed. The descriptor is left
    /// disconnected and no credentials were stored.
    #[error("connection attempt for '{id}' failed")]
    Connect {
        /// Id of the descriptor the attempt was made for.
        id: String,
        /// The connector's error.
        #[source]
        source: BoxError,
    },
}
