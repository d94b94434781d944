//! # cadre-std
//!
//! Standard implementations for the Cadre modular request framework.
//!
//! This crate provides:
//! - **Configuration**: [`MemoryConfig`], [`FileConfig`]
//! - **Sessions**: [`MemorySession`]
//! - **Diagnostics**: [`DiagnosticLog`], [`MessageLog`]
//! - **Connectors**: [`TcpConnector`] (plain TCP and TLS)
//! - **Testing utilities**: [`testing`]
//!
//! [`MemoryConfig`]: config::MemoryConfig
//! [`FileConfig`]: config::FileConfig
//! [`MemorySession`]: session::MemorySession
//! [`DiagnosticLog`]: diagnostics::DiagnosticLog
//! [`MessageLog`]: diagnostics::MessageLog
//! [`TcpConnector`]: connectors::TcpConnector

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use cadre_core;

// Modules
pub mod config;
pub mod connectors;
pub mod diagnostics;
pub mod session;
pub mod testing;
