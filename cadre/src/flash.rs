//! Flash carry-over across a redirect boundary.
//!
//! After a state-changing request the orchestrator stashes the computed
//! state and accumulated user messages in the session, then redirects. The
//! follow-up request consumes the stash exactly once. The record is keyed
//! by a token (the page that produced it): a follow-up for a different page
//! leaves the record in place instead of silently dropping it.
//!
//! Per record the machine is: absent (`Normal`) → stored (`Flashed`) →
//! deleted on a matching consume (`Consumed`).

use cadre_core::{ResponseState, SessionStore};
use serde_json::{Value, json};

const FLASH_KEY: &str = "flash_payload";

/// Persist the computed state and messages for the post-redirect request.
pub(crate) fn stash(
    session: &mut dyn SessionStore,
    token: &str,
    state: ResponseState,
    messages: Vec<String>,
) {
    session.set(
        FLASH_KEY,
        json!({
            "token": token,
            "state": state.into_value(),
            "messages": messages,
        }),
    );
}

/// Take the stored flash if its token matches, deleting it from the
/// session. A non-matching token leaves the record untouched; a malformed
/// record is discarded.
pub(crate) fn consume(
    session: &mut dyn SessionStore,
    token: &str,
) -> Option<(ResponseState, Vec<String>)> {
    let record = session.get(FLASH_KEY)?;
    let Some(stored_token) = record.get("token").and_then(Value::as_str) else {
        session.delete(FLASH_KEY);
        return None;
    };
    if stored_token != token {
        return None;
    }
    session.delete(FLASH_KEY);

    let state = record
        .get("state")
        .cloned()
        .and_then(ResponseState::from_value)
        .unwrap_or_default();
    let messages = record
        .get("messages")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Some((state, messages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadre_std::session::MemorySession;

    fn state_with(key: &str, value: &str) -> ResponseState {
        let mut state = ResponseState::new();
        state.insert(key, value);
        state
    }

    #[test]
    fn consume_is_at_most_once() {
        let mut session = MemorySession::authenticated();
        stash(
            &mut session,
            "home",
            state_with("outcome", "saved"),
            vec!["settings saved".to_string()],
        );

        let (state, messages) = consume(&mut session, "home").unwrap();
        assert_eq!(state, state_with("outcome", "saved"));
        assert_eq!(messages, vec!["settings saved"]);
        assert!(consume(&mut session, "home").is_none());
    }

    #[test]
    fn non_matching_token_leaves_the_record() {
        let mut session = MemorySession::authenticated();
        stash(&mut session, "home", state_with("outcome", "saved"), vec![]);

        assert!(consume(&mut session, "settings").is_none());
        // Still there for the matching request.
        assert!(consume(&mut session, "home").is_some());
    }

    #[test]
    fn malformed_record_is_discarded() {
        let mut session = MemorySession::authenticated();
        session.set(FLASH_KEY, json!({"state": {}}));
        assert!(consume(&mut session, "home").is_none());
        assert_eq!(session.get(FLASH_KEY), None);
    }
}
