//! Wire types for the research assistant API
//!
//! Field names follow the server's JSON exactly, including its spelling
//! quirks (`resault`, `refresh_tokken`).

use serde::{Deserialize, Serialize};

/// Authenticated user profile as returned by `/api/users/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned user id
    pub id: i64,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Login email
    pub email: String,
}

impl User {
    /// "First Last"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One research session in the user's session list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session key
    pub session_id: String,
    /// Human-readable session name
    pub session_name: String,
    /// Creation timestamp, verbatim from the server
    pub created_at: String,
}

/// One prompt/response turn within a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: i64,
    pub session_id: String,
    pub session_name: String,
    /// The prompt (research topic)
    pub message: String,
    /// The generated report
    pub response: String,
    pub created_at: String,
}

/// Body of `POST /api/users/signup` (credential exchange)
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /api/users/signin` (registration)
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Token pair returned by both credential endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Bearer token for subsequent calls
    pub access_token: String,
    /// Refresh token; the login endpoint spells the field `refresh_tokken`
    #[serde(default, alias = "refresh_tokken")]
    pub refresh_token: Option<String>,
}

/// Response of `GET /api/users/get-sessions`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionsResponse {
    #[serde(default)]
    pub sessions: Vec<ChatSession>,
}

/// Body of `POST /api/ai/initiate-research`
#[derive(Debug, Clone, Serialize)]
pub struct ResearchRequest<'a> {
    pub topic: &'a str,
    pub analyst_number: u32,
    /// Always serialized, `null` starts a new session
    pub session_id: Option<&'a str>,
}

/// Response of `POST /api/ai/initiate-research` for a new session
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResearchResponse {
    /// Id of the newly created session
    pub session_id: String,
    /// Generated analyst personas; the server names this field `resault`
    #[serde(rename = "resault", default)]
    pub analysts: serde_json::Value,
}

/// Body of `POST /api/ai/research-analyst-feedback`
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRequest<'a> {
    pub session_id: &'a str,
    pub feedback: &'a str,
}

/// Structured view over the feedback endpoint's payload.
///
/// The server answers with a two-element array `[result, token_usage]`.
/// Any other shape is kept whole in `result`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackOutcome {
    /// Regenerated analysts, or the final report once approved
    pub result: serde_json::Value,
    /// Token accounting reported by the server, when present
    pub token_usage: Option<serde_json::Value>,
}

impl FeedbackOutcome {
    /// Split a raw feedback payload
    ///
    /// # Examples
    ///
    /// ```
    /// use research_sync::api::FeedbackOutcome;
    /// use serde_json::json;
    ///
    /// let outcome = FeedbackOutcome::from_value(&json!(["report", {"total": 12}]));
    /// assert_eq!(outcome.result, json!("report"));
    /// assert_eq!(outcome.token_usage, Some(json!({"total": 12})));
    /// ```
    pub fn from_value(value: &serde_json::Value) -> Self {
        match value.as_array() {
            Some(items) if items.len() == 2 => Self {
                result: items[0].clone(),
                token_usage: Some(items[1].clone()),
            },
            _ => Self {
                result: value.clone(),
                token_usage: None,
            },
        }
    }
}

/// Error body shape used by the server for non-success statuses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}
