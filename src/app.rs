//! Application state container
//!
//! [`AppState`] wires the stores to one API client and one token storage.
//! The chat store reads its bearer token from the auth store through
//! [`TokenSource`], so both always agree on who is signed in.

use std::sync::Arc;

use crate::api::{HttpTransport, ReqwestTransport, ResearchApi};
use crate::auth::{AuthStore, TokenSource};
use crate::chat::{ChatStore, CurrentSession};
use crate::config::Config;
use crate::error::Result;
use crate::storage::{self, TokenStorage};
use crate::ui::{UiState, UiStore};

/// Every store the client holds, built from one [`Config`]
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    pub auth: AuthStore,
    pub chat: ChatStore,
    pub ui: UiStore,
    /// Active session view over `chat`
    pub current_session: CurrentSession,
}

impl AppState {
    /// Assemble the stores over an explicit transport and token storage
    pub fn new(
        config: Config,
        transport: Arc<dyn HttpTransport>,
        storage: Arc<dyn TokenStorage>,
    ) -> Self {
        let api = ResearchApi::new(transport, config.api.timeout());
        let auth = AuthStore::new(api.clone(), storage);
        let token_source: Arc<dyn TokenSource> = Arc::new(auth.clone());
        let chat = ChatStore::new(api, token_source);
        let ui = UiStore::new(UiState::from(&config.ui));
        let current_session = chat.current_session();

        Self {
            config,
            auth,
            chat,
            ui,
            current_session,
        }
    }

    /// Assemble the stores over HTTP with the configured storage backend
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid, the HTTP client cannot be
    /// built or the storage location cannot be resolved
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::new(config.api.url()?, config.api.timeout())?;
        let storage = storage::from_config(&config.storage)?;
        tracing::debug!(base_url = %transport.base_url(), "Application state assembled");
        Ok(Self::new(config.clone(), Arc::new(transport), storage))
    }

    /// Restore a persisted session into the auth store
    pub fn initialize(&self) {
        self.auth.initialize_auth();
    }

    /// Cancel every request in flight from any store
    pub fn cancel_pending(&self) {
        self.auth.cancel_pending();
        self.chat.cancel_pending();
    }
}
