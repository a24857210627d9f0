//! Research API access
//!
//! - [`types`] -- wire types shared with the server.
//! - [`transport`] -- the [`HttpTransport`] port and its `reqwest`
//!   implementation.
//! - [`client`] -- [`ResearchApi`], one typed method per endpoint with
//!   timeout and cancellation.
//! - `fake` -- scripted transport for unit tests (cfg(test) only).

pub mod client;
pub mod transport;
pub mod types;

#[cfg(test)]
pub mod fake;

pub use client::{paths, ResearchApi};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, ReqwestTransport};
pub use types::{ChatMessage, ChatSession, FeedbackOutcome, ResearchResponse, TokenResponse, User};
