//! Typed client for the research assistant endpoints
//!
//! [`ResearchApi`] turns each endpoint into one async method. Every call is
//! bounded by the configured timeout and races the caller's
//! [`CancellationToken`]; the first of response, timeout or cancellation
//! decides the outcome.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::transport::{ApiRequest, ApiResponse, HttpTransport};
use super::types::{
    ChatMessage, ChatSession, ErrorBody, FeedbackRequest, LoginRequest, RegisterRequest,
    ResearchRequest, ResearchResponse, SessionsResponse, TokenResponse, User,
};
use crate::error::ApiError;

/// Endpoint paths consumed by the client
pub mod paths {
    use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

    /// Everything outside the RFC 3986 unreserved set, dots included
    const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'~');

    pub const LOGIN: &str = "/api/users/signup";
    pub const REGISTER: &str = "/api/users/signin";
    pub const PROFILE: &str = "/api/users/me";
    pub const SESSIONS: &str = "/api/users/get-sessions";
    pub const SESSION_HISTORY: &str = "/api/users/get-session-history";
    pub const INITIATE_RESEARCH: &str = "/api/ai/initiate-research";
    pub const ANALYST_FEEDBACK: &str = "/api/ai/research-analyst-feedback";

    /// Path of the history endpoint for one session.
    ///
    /// The id is encoded as a single path segment, so `/`, `?` and `#` in it
    /// cannot change the endpoint or add a query.
    pub fn session_history(session_id: &str) -> String {
        format!(
            "{}/{}",
            SESSION_HISTORY,
            utf8_percent_encode(session_id, SEGMENT)
        )
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Research API client over an [`HttpTransport`]
#[derive(Debug, Clone)]
pub struct ResearchApi {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl ResearchApi {
    /// Create a client. `timeout` bounds each call end to end.
    pub fn new(transport: Arc<dyn HttpTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Per-call timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Exchange credentials for a token (`POST /api/users/signup`)
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<TokenResponse> {
        let request = ApiRequest::post(paths::LOGIN, &LoginRequest { email, password })?;
        self.call(request, cancel).await
    }

    /// Create an account and receive a token (`POST /api/users/signin`)
    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<TokenResponse> {
        let body = RegisterRequest {
            first_name,
            last_name,
            email,
            password,
        };
        let request = ApiRequest::post(paths::REGISTER, &body)?;
        self.call(request, cancel).await
    }

    /// Fetch the profile of the token's owner (`GET /api/users/me`)
    pub async fn fetch_profile(&self, token: &str, cancel: &CancellationToken) -> ApiResult<User> {
        let request = ApiRequest::get(paths::PROFILE).with_bearer(token);
        self.call(request, cancel).await
    }

    /// List the user's sessions. A body without `sessions` yields an empty list.
    pub async fn list_sessions(
        &self,
        token: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<Vec<ChatSession>> {
        let request = ApiRequest::get(paths::SESSIONS).with_bearer(token);
        let response: SessionsResponse = self.call(request, cancel).await?;
        Ok(response.sessions)
    }

    /// Message history of one session, oldest first as returned
    pub async fn session_history(
        &self,
        token: &str,
        session_id: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<Vec<ChatMessage>> {
        // Dot segments are normalised away by URL resolution even when encoded
        if session_id.is_empty() || session_id.chars().all(|c| c == '.') {
            return Err(ApiError::Transport(format!(
                "Invalid session id {:?}",
                session_id
            )));
        }
        let request = ApiRequest::get(paths::session_history(session_id)).with_bearer(token);
        self.call(request, cancel).await
    }

    /// Start a new research session
    pub async fn initiate_research(
        &self,
        token: &str,
        topic: &str,
        analyst_number: u32,
        cancel: &CancellationToken,
    ) -> ApiResult<ResearchResponse> {
        let body = ResearchRequest {
            topic,
            analyst_number,
            session_id: None,
        };
        let request = ApiRequest::post(paths::INITIATE_RESEARCH, &body)?.with_bearer(token);
        self.call(request, cancel).await
    }

    /// Send analyst feedback for a session; the payload is returned as-is
    pub async fn analyst_feedback(
        &self,
        token: &str,
        session_id: &str,
        feedback: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<serde_json::Value> {
        let body = FeedbackRequest {
            session_id,
            feedback,
        };
        let request = ApiRequest::post(paths::ANALYST_FEEDBACK, &body)?.with_bearer(token);
        self.call(request, cancel).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<T> {
        let path = request.path.clone();
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(path = %path, "API request cancelled");
                return Err(ApiError::Cancelled);
            }
            outcome = tokio::time::timeout(self.timeout, self.transport.send(request)) => match outcome {
                Ok(result) => result?,
                Err(_) => {
                    tracing::warn!(path = %path, timeout_secs = self.timeout.as_secs(), "API request timed out");
                    return Err(ApiError::Timeout(self.timeout));
                }
            },
        };
        decode(response)
    }
}

fn decode<T: DeserializeOwned>(response: ApiResponse) -> ApiResult<T> {
    if !response.is_success() {
        return Err(ApiError::Status {
            status: response.status,
            detail: extract_detail(&response.body),
        });
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Malformed(e.to_string()))
}

/// Pull a usable `detail` out of an error body. Empty strings count as absent.
fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
