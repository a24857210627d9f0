//! Test utilities for research-sync
//!
//! Fixtures shared by the unit tests: an API client over a
//! [`FakeTransport`], canned response bodies and a fixed [`TokenSource`].

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use crate::api::fake::FakeTransport;
use crate::api::{ChatSession, ResearchApi};
use crate::auth::TokenSource;

/// API client that sends through `transport` with a generous timeout
pub fn fake_api(transport: &Arc<FakeTransport>) -> ResearchApi {
    ResearchApi::new(transport.clone(), Duration::from_secs(5))
}

/// Body of a successful `GET /api/users/me`
pub fn sample_user_json() -> Value {
    json!({
        "id": 7,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com"
    })
}

/// One history entry of `session_id` as the server sends it
pub fn sample_message_json(session_id: &str) -> Value {
    json!({
        "id": 1,
        "user_id": 7,
        "session_id": session_id,
        "session_name": "Fusion",
        "message": "fusion energy",
        "response": "# Report",
        "created_at": "2024-05-01T10:00:00"
    })
}

/// Session with the name and timestamp the chat tests script
pub fn session(id: &str) -> ChatSession {
    ChatSession {
        session_id: id.to_string(),
        session_name: format!("S {}", id),
        created_at: "t".to_string(),
    }
}

/// Token source that always answers the same way
#[derive(Debug, Clone)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn signed_in(token: &str) -> Self {
        Self(Some(token.to_string()))
    }

    pub fn signed_out() -> Self {
        Self(None)
    }
}

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChatMessage, User};

    #[test]
    fn test_fixtures_decode_as_wire_types() {
        let user: User = serde_json::from_value(sample_user_json()).unwrap();
        assert_eq!(user.id, 7);

        let message: ChatMessage = serde_json::from_value(sample_message_json("s")).unwrap();
        assert_eq!(message.session_id, "s");
    }

    #[test]
    fn test_static_token() {
        assert_eq!(StaticToken::signed_in("t").bearer_token().as_deref(), Some("t"));
        assert_eq!(StaticToken::signed_out().bearer_token(), None);
    }
}
