//! Connection seam for the pool.
//!
//! The pool treats the remote protocol as an opaque connectable resource: a
//! [`Connector`] turns a [`ServerProfile`] plus [`Credentials`] into a live
//! [`ConnectionHandle`], and the handle knows how to close itself. What
//! flows over the connection is the consuming protocol layer's business.

use crate::error::BoxError;
use std::{fmt, future::Future};

/// Where and how to reach a remote server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerProfile {
    /// Server hostname or address.
    pub server: String,
    /// TCP port.
    pub port: u16,
    /// Whether to negotiate TLS.
    pub tls: bool,
}

impl ServerProfile {
    /// Create a profile.
    pub fn new(server: impl Into<String>, port: u16, tls: bool) -> Self {
        Self {
            server: server.into(),
            port,
            tls,
        }
    }
}

/// A user/password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login name.
    pub user: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Create a credential pair.
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

// The password never appears in debug output or logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A live connection produced by a [`Connector`].
pub trait ConnectionHandle: Send + Sync + 'static {
    /// Close the underlying connection. Must be idempotent: closing an
    /// already-closed handle is a no-op.
    fn close(&self) -> impl Future<Output = ()> + Send;
}

/// Establishes remote connections for the pool.
///
/// Implementations may or may not use the credentials during establishment;
/// a plain transport connector hands authentication off to the protocol
/// layer that consumes the handle.
pub trait Connector: Send + Sync + 'static {
    /// The handle type this connector produces.
    type Handle: ConnectionHandle;

    /// Open a connection to `profile` with `credentials`, optionally
    /// seeding the connection's local cache from `cache`.
    fn connect(
        &self,
        profile: &ServerProfile,
        credentials: &Credentials,
        cache: Option<&[u8]>,
    ) -> impl Future<Output = Result<Self::Handle, BoxError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_password() {
        let creds = Credentials::new("user", "hunter2");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("user"));
        assert!(!rendered.contains("hunter2"));
    }
}
