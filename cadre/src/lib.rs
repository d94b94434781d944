//! # cadre - Page-Scoped Unit Pipelines
//!
//! `cadre` composes independently-registered handler and output units into
//! a single request/response cycle, and manages a pool of stateful remote
//! protocol connections alongside it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cadre::prelude::*;
//!
//! let mut engine = RequestCycle::new(Box::new(MemoryConfig::new()));
//! engine.catalog_mut().register_handler("date", |_args| Ok(Arc::new(DateUnit)));
//! engine.handlers_mut().register("home", "date", false)?;
//!
//! let outcome = engine.run(&Request::http("home"), &mut session).await;
//! ```
//!
//! The moving parts:
//!
//! - [`ModuleRegistry`] — per-page ordered unit registrations with
//!   anchor-relative insertion
//! - [`UnitCatalog`] — explicit factory tables from unit name to constructor
//! - [`Dispatcher`] / [`OutputPipeline`] — the two pipeline halves
//! - [`ConnectionPool`] — lazily-connecting keyed store of remote sessions
//! - [`RequestCycle`] — the orchestrator, including flash/redirect

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod catalog;
mod cycle;
mod dispatch;
mod flash;
mod output;
mod pool;
mod registry;

pub use catalog::{HandlerFactory, OutputFactory, UnitCatalog};
pub use cycle::{CycleOutcome, Request, RequestCycle, RequestKind};
pub use dispatch::Dispatcher;
pub use output::{OutputPipeline, RenderedResponse};
pub use pool::{ConnectOptions, ConnectionPool, PoolReport};
pub use registry::{ModuleRegistry, Placement, RegisterOptions, UnitDescriptor};

pub use cadre_core::{
    BoxError, Config, ConnectionHandle, Connector, Credentials, DynHandlerUnit, DynOutputUnit,
    FormatKind, HandlerUnit, OutputUnit, PoolError, RegistryError, Rendered, ResponseState,
    ServerProfile, SessionStore,
};

/// Standard collaborator implementations.
pub mod std_impl {
    pub use cadre_std::config::{FileConfig, MemoryConfig};
    pub use cadre_std::connectors::{TcpConnector, TcpHandle};
    pub use cadre_std::diagnostics::{DiagnosticLog, MessageLog};
    pub use cadre_std::session::MemorySession;
}

/// Testing utilities.
pub mod testing {
    pub use cadre_std::testing::{
        ConnectRecord, FailingHandlerUnit, InsertHandlerUnit, RecordingHandlerUnit,
        ScriptedConnector, ScriptedHandle, StaticOutputUnit,
    };
}

/// Prelude module - common imports for Cadre.
///
/// # Usage
///
/// ```rust,ignore
/// use cadre::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Config, ConnectOptions, ConnectionHandle, ConnectionPool, Connector, Credentials,
        CycleOutcome, Dispatcher, FormatKind, HandlerUnit, ModuleRegistry, OutputPipeline,
        OutputUnit, Placement, PoolError, RegisterOptions, RegistryError, Rendered,
        RenderedResponse, Request, RequestCycle, RequestKind, ResponseState, ServerProfile,
        SessionStore, UnitCatalog,
    };
    pub use crate::std_impl::{DiagnosticLog, MemoryConfig, MemorySession, MessageLog};
}
