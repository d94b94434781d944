//! Pooled manager of stateful remote-protocol connections.
//!
//! The pool is a keyed store of connection descriptors. Connections are
//! established lazily by [`connect`](ConnectionPool::connect), reused while
//! live, and torn down by [`cleanup`](ConnectionPool::cleanup) without
//! destroying the descriptor, so a later connect can go straight back up —
//! optionally with credentials retained from an earlier connect.
//!
//! Each descriptor walks `absent` → `present/disconnected` →
//! `present/connected` → `present/disconnected` (cleanup) → `absent`
//! (remove).

use cadre_core::{ConnectionHandle, Connector, Credentials, PoolError, ServerProfile};
use cadre_std::diagnostics::DiagnosticLog;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// One pooled connection descriptor.
struct ConnectionEntry<H> {
    profile: ServerProfile,
    retained: Option<Credentials>,
    handle: Option<Arc<H>>,
}

/// Optional parameters for [`ConnectionPool::connect`].
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    /// Seed for the new connection's local cache.
    pub cache: Option<Vec<u8>>,
    /// Explicit user; takes precedence over the retained one.
    pub user: Option<String>,
    /// Explicit password; takes precedence over the retained one.
    pub password: Option<String>,
    /// Store the effective credentials on the descriptor on success,
    /// overwriting any previously retained pair.
    pub retain_credentials: bool,
}

impl ConnectOptions {
    /// Connect with whatever the descriptor has retained.
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply an explicit user.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Supply an explicit password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Retain the effective credentials on success.
    pub fn retain(mut self) -> Self {
        self.retain_credentials = true;
        self
    }

    /// Seed the connection's local cache.
    pub fn cache(mut self, cache: impl Into<Vec<u8>>) -> Self {
        self.cache = Some(cache.into());
        self
    }
}

/// Sanitized view of one descriptor.
///
/// Always carries server/port/TLS; carries retained credentials only in a
/// full dump and only when they exist. Never carries the live handle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolReport {
    /// Server hostname or address.
    pub server: String,
    /// TCP port.
    pub port: u16,
    /// Whether TLS is requested.
    pub tls: bool,
    /// Retained user, full dumps only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Retained password, full dumps only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Keyed store of remote-connection descriptors.
///
/// Ids are caller-supplied strings or pool-assigned sequential integers
/// (rendered as strings).
pub struct ConnectionPool<C: Connector> {
    connector: C,
    entries: HashMap<String, ConnectionEntry<C::Handle>>,
    next_index: u64,
    diagnostics: DiagnosticLog,
}

impl<C: Connector> ConnectionPool<C> {
    /// Create an empty pool over `connector`, reporting to `diagnostics`.
    pub fn new(connector: C, diagnostics: DiagnosticLog) -> Self {
        Self {
            connector,
            entries: HashMap::new(),
            next_index: 0,
            diagnostics,
        }
    }

    /// Insert a new descriptor in the disconnected state and return its id.
    ///
    /// With `id = None` the pool assigns the next sequential index. A
    /// caller-supplied id that already exists replaces the old descriptor.
    pub fn add(&mut self, profile: ServerProfile, id: Option<&str>) -> String {
        let id = match id {
            Some(id) => id.to_string(),
            None => {
                let id = self.next_index.to_string();
                self.next_index += 1;
                id
            }
        };
        self.entries.insert(
            id.clone(),
            ConnectionEntry {
                profile,
                retained: None,
                handle: None,
            },
        );
        id
    }

    /// Delete a descriptor entirely.
    pub fn remove(&mut self, id: &str) -> Result<(), PoolError> {
        self.entries
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PoolError::UnknownConnection(id.to_string()))
    }

    /// Return the live handle for `id`, connecting first if necessary.
    ///
    /// An already-connected descriptor returns its handle immediately with
    /// no new connection attempt. Otherwise explicit credentials from
    /// `options` are combined with the descriptor's retained ones (explicit
    /// fields win); if both sources together don't yield a full pair, no
    /// attempt is made. On success the handle is stored for reuse and, when
    /// requested, the effective credentials are retained. On failure the
    /// descriptor stays disconnected and no credentials are stored.
    pub async fn connect(
        &mut self,
        id: &str,
        options: ConnectOptions,
    ) -> Result<Arc<C::Handle>, PoolError> {
        let Some(entry) = self.entries.get_mut(id) else {
            return Err(PoolError::UnknownConnection(id.to_string()));
        };
        if let Some(handle) = &entry.handle {
            tracing::debug!(id, "reusing live connection");
            return Ok(Arc::clone(handle));
        }

        let retained = entry.retained.as_ref();
        let user = options
            .user
            .or_else(|| retained.map(|creds| creds.user.clone()));
        let password = options
            .password
            .or_else(|| retained.map(|creds| creds.password.clone()));
        let credentials = match (user, password) {
            (Some(user), Some(password)) => Credentials { user, password },
            _ => {
                let err = PoolError::CredentialsMissing(id.to_string());
                self.diagnostics.report(err.to_string());
                return Err(err);
            }
        };

        match self
            .connector
            .connect(&entry.profile, &credentials, options.cache.as_deref())
            .await
        {
            Ok(handle) => {
                tracing::debug!(id, server = %entry.profile.server, "connection established");
                let handle = Arc::new(handle);
                entry.handle = Some(Arc::clone(&handle));
                if options.retain_credentials {
                    entry.retained = Some(credentials);
                }
                Ok(handle)
            }
            Err(source) => Err(PoolError::Connect {
                id: id.to_string(),
                source,
            }),
        }
    }

    /// Clear retained credentials on a descriptor. The live handle, if any,
    /// is unaffected. No-op if the descriptor is absent.
    pub fn forget_credentials(&mut self, id: &str) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.retained = None;
        }
    }

    /// Sanitized view of one descriptor, or `None` if the id is unknown.
    pub fn dump(&self, id: &str, full: bool) -> Option<PoolReport> {
        self.entries.get(id).map(|entry| Self::report(entry, full))
    }

    /// Sanitized views of all descriptors, keyed by id.
    pub fn dump_all(&self, full: bool) -> BTreeMap<String, PoolReport> {
        self.entries
            .iter()
            .map(|(id, entry)| (id.clone(), Self::report(entry, full)))
            .collect()
    }

    /// Close the connection for `id` if it is live. The descriptor and any
    /// retained credentials stay intact for a later connect.
    pub async fn cleanup(&mut self, id: &str) {
        if let Some(entry) = self.entries.get_mut(id) {
            if let Some(handle) = entry.handle.take() {
                handle.close().await;
            }
        }
    }

    /// Close every live connection in the pool.
    pub async fn cleanup_all(&mut self) {
        for entry in self.entries.values_mut() {
            if let Some(handle) = entry.handle.take() {
                handle.close().await;
            }
        }
    }

    /// Whether a descriptor exists for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Whether the descriptor for `id` holds a live connection.
    pub fn is_connected(&self, id: &str) -> bool {
        self.entries
            .get(id)
            .is_some_and(|entry| entry.handle.is_some())
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool holds no descriptors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn report(entry: &ConnectionEntry<C::Handle>, full: bool) -> PoolReport {
        let retained = if full { entry.retained.as_ref() } else { None };
        PoolReport {
            server: entry.profile.server.clone(),
            port: entry.profile.port,
            tls: entry.profile.tls,
            user: retained.map(|creds| creds.user.clone()),
            password: retained.map(|creds| creds.password.clone()),
        }
    }
}
