//! research-sync - observable client state for the research assistant API
//!
//! This library keeps the client-side state of a research assistant: who is
//! signed in, which research sessions exist, which one is open and what the
//! presentation flags are. State lives in observable stores that notify
//! subscribers synchronously after every change.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `store`: Observable store primitive, derived views, request trackers
//! - `api`: HTTP transport port, wire types and the typed API client
//! - `storage`: Bearer token persistence (keyring, file, memory)
//! - `auth`, `chat`, `ui`: The three application stores
//! - `app`: Container wiring the stores together
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`, `commands`: Command-line interface and handlers
//!
//! # Example
//!
//! ```no_run
//! use research_sync::{AppState, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let app = AppState::from_config(&config)?;
//!     app.initialize();
//!     let _sub = app.chat.subscribe(|state| println!("{} sessions", state.sessions.len()));
//!     app.chat.load_sessions().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod auth;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod storage;
pub mod store;
pub mod ui;

// Re-export commonly used types
pub use app::AppState;
pub use auth::{AuthState, AuthStore, TokenSource};
pub use chat::{ChatState, ChatStore, CurrentSession, StartedResearch};
pub use config::Config;
pub use error::{ActionFailure, ActionResult, ApiError, Result, SyncError};
pub use store::{Derived, Store, Subscription};
pub use ui::{Theme, UiState, UiStore};

#[cfg(test)]
pub mod test_utils;
