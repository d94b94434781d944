//! Shared fixtures for the integration tests.

use cadre::prelude::*;
use cadre::BoxError;

/// Build a state from string pairs.
pub fn state_of(pairs: &[(&str, &str)]) -> ResponseState {
    let mut state = ResponseState::new();
    for (key, value) in pairs {
        state.insert(*key, *value);
    }
    state
}

/// An output unit that renders one state key as a document fragment, or an
/// empty fragment when the key is absent.
pub struct EchoOutputUnit {
    key: String,
}

impl EchoOutputUnit {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl OutputUnit for EchoOutputUnit {
    async fn render(
        &self,
        state: &ResponseState,
        _kind: FormatKind,
    ) -> Result<Rendered, BoxError> {
        let fragment = state
            .get(&self.key)
            .and_then(|value| value.as_str())
            .unwrap_or_default();
        Ok(Rendered::Fragment(fragment.to_string()))
    }
}
