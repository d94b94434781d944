//! Append-only diagnostic and user-message logs.
//!
//! Two sinks with the same shape but different audiences:
//!
//! - [`DiagnosticLog`] collects non-fatal anomalies (duplicate
//!   registrations, unresolved units, missing credentials) for operators.
//! - [`MessageLog`] collects user-visible messages that ride along with the
//!   response, including across a flash/redirect boundary.
//!
//! Both are cheaply clonable handles over shared storage, so the engine and
//! any number of units can append to the same log. Every append is also
//! emitted through `tracing`.

use std::sync::{Arc, Mutex};

/// Append-only log of non-fatal anomalies.
#[derive(Clone, Default)]
pub struct DiagnosticLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl DiagnosticLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic line.
    pub fn report(&self, line: impl Into<String>) {
        let line = line.into();
        tracing::debug!(target: "cadre::diagnostics", "{line}");
        self.entries
            .lock()
            .expect("diagnostic log lock poisoned")
            .push(line);
    }

    /// Snapshot of all recorded diagnostics.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .expect("diagnostic log lock poisoned")
            .clone()
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .expect("diagnostic log lock poisoned")
            .len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all recorded diagnostics.
    pub fn clear(&self) {
        self.entries
            .lock()
            .expect("diagnostic log lock poisoned")
            .clear();
    }
}

/// Append-only log of user-visible messages.
#[derive(Clone, Default)]
pub struct MessageLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    pub fn push(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(target: "cadre::messages", "{message}");
        self.entries
            .lock()
            .expect("message log lock poisoned")
            .push(message);
    }

    /// Snapshot of all accumulated messages.
    pub fn snapshot(&self) -> Vec<String> {
        self.entries
            .lock()
            .expect("message log lock poisoned")
            .clone()
    }

    /// Take all accumulated messages, leaving the log empty. Used when
    /// flashing messages across a redirect.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(
            &mut *self
                .entries
                .lock()
                .expect("message log lock poisoned"),
        )
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .expect("message log lock poisoned")
            .is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let log = DiagnosticLog::new();
        let other = log.clone();
        other.report("first");
        log.report("second");
        assert_eq!(log.entries(), vec!["first", "second"]);
    }

    #[test]
    fn drain_empties_the_message_log() {
        let log = MessageLog::new();
        log.push("saved");
        assert_eq!(log.drain(), vec!["saved"]);
        assert!(log.is_empty());
        assert!(log.drain().is_empty());
    }
}
