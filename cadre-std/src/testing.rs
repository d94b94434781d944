//! Testing utilities for Cadre.
//!
//! This module provides utilities to make testing units, pipelines, and the
//! connection pool easier.
//!
//! # Features
//!
//! - [`RecordingHandlerUnit`]: a handler unit that records every state it sees
//! - [`InsertHandlerUnit`]: a handler unit that adds one key to the state
//! - [`StaticOutputUnit`]: an output unit with a fixed, inspectable result
//! - [`ScriptedConnector`]: a connector with programmable outcomes and
//!   attempt/close counting

use cadre_core::{
    BoxError, ConnectionHandle, Connector, Credentials, FormatKind, HandlerUnit, OutputUnit,
    Rendered, ResponseState, ServerProfile,
};
use serde_json::Value;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

// ============================================================================
// Recording Handler Unit
// ============================================================================

/// A handler unit that records every state it is invoked with and returns a
/// programmable replacement.
///
/// # Example
///
/// ```rust,ignore
/// let unit = RecordingHandlerUnit::new();
/// let probe = unit.clone();
///
/// // register `unit` through the catalog, run the dispatcher...
///
/// assert_eq!(probe.call_count(), 1);
/// ```
pub struct RecordingHandlerUnit {
    calls: Arc<Mutex<Vec<ResponseState>>>,
    output: Arc<Mutex<Option<ResponseState>>>,
}

impl RecordingHandlerUnit {
    /// Create a unit that declines to mutate the state.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            output: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a unit that always returns `output` as a replacement state.
    pub fn with_output(output: ResponseState) -> Self {
        let unit = Self::new();
        unit.set_output(Some(output));
        unit
    }

    /// Set the replacement state to return (`None` = decline).
    pub fn set_output(&self, output: Option<ResponseState>) {
        *self.output.lock().unwrap() = output;
    }

    /// States this unit was invoked with.
    pub fn calls(&self) -> Vec<ResponseState> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of invocations.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for RecordingHandlerUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RecordingHandlerUnit {
    fn clone(&self) -> Self {
        Self {
            calls: self.calls.clone(),
            output: self.output.clone(),
        }
    }
}

impl HandlerUnit for RecordingHandlerUnit {
    async fn process(&self, state: &ResponseState) -> Result<Option<ResponseState>, BoxError> {
        self.calls.lock().unwrap().push(state.clone());
        Ok(self.output.lock().unwrap().clone())
    }
}

// ============================================================================
// Insert Handler Unit
// ============================================================================

/// A handler unit that returns the incoming state with one extra key.
pub struct InsertHandlerUnit {
    key: String,
    value: Value,
}

impl InsertHandlerUnit {
    /// Create a unit inserting `key` = `value`.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl HandlerUnit for InsertHandlerUnit {
    async fn process(&self, state: &ResponseState) -> Result<Option<ResponseState>, BoxError> {
        let mut next = state.clone();
        next.insert(self.key.clone(), self.value.clone());
        Ok(Some(next))
    }
}

// ============================================================================
// Failing Handler Unit
// ============================================================================

/// A handler unit that always fails, for exercising non-fatal continuation.
pub struct FailingHandlerUnit;

impl HandlerUnit for FailingHandlerUnit {
    async fn process(&self, _state: &ResponseState) -> Result<Option<ResponseState>, BoxError> {
        Err("scripted handler failure".into())
    }
}

// ============================================================================
// Static Output Unit
// ============================================================================

/// An output unit that always renders the same result and records the
/// format kinds it was invoked with.
pub struct StaticOutputUnit {
    rendered: Rendered,
    kinds: Arc<Mutex<Vec<FormatKind>>>,
}

impl StaticOutputUnit {
    /// Create a unit that renders `rendered` on every invocation.
    pub fn new(rendered: Rendered) -> Self {
        Self {
            rendered,
            kinds: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shorthand for a fragment-producing unit.
    pub fn fragment(fragment: impl Into<String>) -> Self {
        Self::new(Rendered::Fragment(fragment.into()))
    }

    /// Shorthand for an object-producing unit.
    pub fn object(state: ResponseState) -> Self {
        Self::new(Rendered::Object(state))
    }

    /// Format kinds this unit was invoked with.
    pub fn kinds(&self) -> Vec<FormatKind> {
        self.kinds.lock().unwrap().clone()
    }

    /// Number of invocations.
    pub fn call_count(&self) -> usize {
        self.kinds.lock().unwrap().len()
    }
}

impl Clone for StaticOutputUnit {
    fn clone(&self) -> Self {
        Self {
            rendered: self.rendered.clone(),
            kinds: self.kinds.clone(),
        }
    }
}

impl OutputUnit for StaticOutputUnit {
    async fn render(
        &self,
        _state: &ResponseState,
        kind: FormatKind,
    ) -> Result<Rendered, BoxError> {
        self.kinds.lock().unwrap().push(kind);
        Ok(self.rendered.clone())
    }
}

// ============================================================================
// Scripted Connector
// ============================================================================

/// What a [`ScriptedConnector`] saw on one connect attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectRecord {
    /// The profile the attempt targeted.
    pub profile: ServerProfile,
    /// The effective credentials the pool resolved.
    pub credentials: Credentials,
    /// The cache seed, if one was supplied.
    pub cache: Option<Vec<u8>>,
}

/// A connector with programmable outcomes.
///
/// # Example
///
/// ```rust,ignore
/// let connector = ScriptedConnector::new();
/// let probe = connector.clone();
/// let mut pool = ConnectionPool::new(connector);
///
/// // drive the pool...
///
/// assert_eq!(probe.attempts(), 1);
/// ```
pub struct ScriptedConnector {
    failing: Arc<AtomicBool>,
    attempts: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    records: Arc<Mutex<Vec<ConnectRecord>>>,
}

impl ScriptedConnector {
    /// Create a connector whose attempts all succeed.
    pub fn new() -> Self {
        Self {
            failing: Arc::new(AtomicBool::new(false)),
            attempts: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make subsequent attempts fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of connect attempts, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Number of handles that have been closed.
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Everything the connector saw, in order.
    pub fn records(&self) -> Vec<ConnectRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl Default for ScriptedConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ScriptedConnector {
    fn clone(&self) -> Self {
        Self {
            failing: self.failing.clone(),
            attempts: self.attempts.clone(),
            closes: self.closes.clone(),
            records: self.records.clone(),
        }
    }
}

impl Connector for ScriptedConnector {
    type Handle = ScriptedHandle;

    async fn connect(
        &self,
        profile: &ServerProfile,
        credentials: &Credentials,
        cache: Option<&[u8]>,
    ) -> Result<ScriptedHandle, BoxError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.records.lock().unwrap().push(ConnectRecord {
            profile: profile.clone(),
            credentials: credentials.clone(),
            cache: cache.map(<[u8]>::to_vec),
        });
        if self.failing.load(Ordering::SeqCst) {
            return Err("scripted connect failure".into());
        }
        Ok(ScriptedHandle {
            closed: AtomicBool::new(false),
            closes: self.closes.clone(),
        })
    }
}

/// Handle produced by [`ScriptedConnector`].
#[derive(Debug)]
pub struct ScriptedHandle {
    closed: AtomicBool,
    closes: Arc<AtomicUsize>,
}

impl ScriptedHandle {
    /// Whether this handle has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl ConnectionHandle for ScriptedHandle {
    async fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}
