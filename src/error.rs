//! Error types for research-sync
//!
//! This module defines the error types used throughout the crate, using
//! `thiserror` for ergonomic error handling. Two layers exist:
//!
//! - [`SyncError`] covers setup and infrastructure failures (configuration,
//!   token storage, IO) and travels inside `anyhow::Error` via [`Result`].
//! - [`ApiError`] classifies the outcome of a single remote call. Store
//!   actions catch it at their boundary and turn it into an
//!   [`ActionFailure`] or a stored error message; it never escapes an action.

use std::time::Duration;

use thiserror::Error;

/// Main error type for research-sync setup and infrastructure operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token storage errors (file backend, lock failures)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Failure of a single remote call.
///
/// Transport, status and malformed-body failures are the three kinds a
/// request can end in; `Timeout` and `Cancelled` come from the call wrapper
/// in [`crate::api::ResearchApi`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never reached the server or no response came back
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("HTTP {status}{}", .detail.as_deref().map(|d| format!(": {}", d)).unwrap_or_default())]
    Status {
        /// HTTP status code
        status: u16,
        /// The `detail` field of the JSON error body, when present
        detail: Option<String>,
    },

    /// The response body could not be decoded
    #[error("Malformed response body: {0}")]
    Malformed(String),

    /// The call exceeded the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The call was cancelled before it settled
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Resolve the human-readable message shown for a failed action.
    ///
    /// A server-supplied `detail` wins; any other status error falls back to
    /// `default`. Every other kind describes itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use research_sync::error::ApiError;
    ///
    /// let err = ApiError::Status { status: 400, detail: Some("bad credentials".into()) };
    /// assert_eq!(err.user_message("Login failed"), "bad credentials");
    ///
    /// let err = ApiError::Status { status: 500, detail: None };
    /// assert_eq!(err.user_message("Login failed"), "Login failed");
    /// ```
    pub fn user_message(&self, default: &str) -> String {
        match self {
            ApiError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::Status { detail: None, .. } => default.to_string(),
            other => other.to_string(),
        }
    }
}

/// Failure half of a result-returning store action (`{success: false, error}`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ActionFailure {
    /// Human-readable reason
    pub message: String,
}

impl ActionFailure {
    /// Message returned by auth-gated actions invoked without a token
    pub const NOT_AUTHENTICATED: &'static str = "Not authenticated";

    /// Create a failure with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure returned when no bearer token is available
    pub fn not_authenticated() -> Self {
        Self::new(Self::NOT_AUTHENTICATED)
    }
}

/// Outcome of a result-returning store action
pub type ActionResult<T = ()> = std::result::Result<T, ActionFailure>;

/// Result type alias for research-sync setup operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
