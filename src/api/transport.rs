//! HTTP transport port
//!
//! [`HttpTransport`] is the boundary between the stores and the network.
//! It moves one request and returns the raw status and body; decoding,
//! timeouts and cancellation live in [`crate::api::ResearchApi`].
//!
//! - [`ReqwestTransport`] -- production implementation over `reqwest`.
//! - [`crate::api::fake::FakeTransport`] -- scripted in-process fake used in
//!   tests (cfg(test) only).

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::error::{ApiError, Result, SyncError};

/// HTTP method used by the research API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// One outbound request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute path starting with `/api/`
    pub path: String,
    /// Sent as `Authorization: Bearer <token>` when present
    pub bearer: Option<String>,
    /// JSON body for POST requests
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Build a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            bearer: None,
            body: None,
        }
    }

    /// Build a POST request carrying `body` as JSON
    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> std::result::Result<Self, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Malformed(format!("failed to encode request body: {}", e)))?;
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            bearer: None,
            body: Some(body),
        })
    }

    /// Attach a bearer token
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// Raw response as received from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over the HTTP client.
///
/// Implementations return `Err` only when no response was obtained; any
/// status code, including 4xx and 5xx, is an `Ok` response.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync + fmt::Debug {
    /// Issue `request` and wait for the full response body
    async fn send(&self, request: ApiRequest) -> std::result::Result<ApiResponse, ApiError>;
}

/// Extra time the HTTP client allows beyond the per-call timeout
pub const SOCKET_TIMEOUT_GRACE: Duration = Duration::from_secs(5);

/// `reqwest`-backed transport rooted at the API base URL.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use url::Url;
/// use research_sync::api::ReqwestTransport;
///
/// let transport = ReqwestTransport::new(
///     Url::parse("http://localhost:8000").unwrap(),
///     Duration::from_secs(30),
/// ).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: url::Url,
}

impl ReqwestTransport {
    /// Build a transport for calls bounded by `timeout`.
    ///
    /// The client's own timeout sits [`SOCKET_TIMEOUT_GRACE`] past `timeout`,
    /// so an expired call resolves as [`ApiError::Timeout`] from the API
    /// client rather than as a transport failure.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Http`] if the TLS backend fails to initialise.
    pub fn new(base_url: url::Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout + SOCKET_TIMEOUT_GRACE)
            .build()
            .map_err(SyncError::Http)?;
        Ok(Self { client, base_url })
    }

    /// Base URL every request path is joined onto
    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> std::result::Result<url::Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Transport(format!("invalid request path {}: {}", path, e)))
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> std::result::Result<ApiResponse, ApiError> {
        let url = self.endpoint(&request.path)?;
        tracing::debug!(method = %request.method, path = %request.path, "Sending API request");

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(path = %request.path, "API request failed: {}", e);
            ApiError::Transport(format!("Failed to reach server: {}", e))
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read response body: {}", e)))?;

        tracing::debug!(path = %request.path, status, "API response received");
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_request_encodes_body() {
        let request = ApiRequest::post("/api/x", &json!({"a": 1}))
            .unwrap()
            .with_bearer("tok");
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body, Some(json!({"a": 1})));
        assert_eq!(request.bearer.as_deref(), Some("tok"));
    }

    #[test]
    fn test_response_success_range() {
        let ok = ApiResponse {
            status: 201,
            body: String::new(),
        };
        let bad = ApiResponse {
            status: 400,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }

    #[test]
    fn test_endpoint_joins_absolute_path() {
        let transport = ReqwestTransport::new(
            url::Url::parse("http://localhost:8000/").unwrap(),
            Duration::from_secs(5),
        )
        .unwrap();
        let url = transport
            .endpoint("/api/users/get-session-history/abc")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/users/get-session-history/abc"
        );
    }

    #[test]
    fn test_endpoint_keeps_encoded_session_id_in_one_segment() {
        let transport = ReqwestTransport::new(
            url::Url::parse("http://localhost:8000/").unwrap(),
            Duration::from_secs(5),
        )
        .unwrap();

        let url = transport
            .endpoint(&crate::api::paths::session_history("../a/b?c=1#d"))
            .unwrap();

        let segments: Vec<_> = url.path_segments().unwrap().collect();
        assert_eq!(
            segments,
            vec!["api", "users", "get-session-history", "%2E%2E%2Fa%2Fb%3Fc%3D1%23d"]
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }
}
