//! Authentication state
//!
//! [`AuthStore`] owns the signed-in user, the bearer token and the
//! authenticated/loading flags. Its actions talk to the credential and
//! profile endpoints and persist the token through a [`TokenStorage`].
//!
//! `login` and `register` never fail past their boundary: every failure is
//! converted into an [`ActionFailure`] carrying a readable message, and the
//! loading flag is cleared on every path. Only the most recent sign-in
//! attempt may commit; `logout` supersedes any attempt still in flight.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::{ResearchApi, User};
use crate::error::{ActionFailure, ActionResult, ApiError};
use crate::storage::TokenStorage;
use crate::store::{CancelScope, RequestTicket, RequestTracker, Store, Subscription};

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";
const SUPERSEDED: &str = "Sign-in superseded by a newer request";

/// Authentication state.
///
/// `is_authenticated` implies `token` is present. A restored session may
/// carry a token without a `user`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

/// Read access to the current bearer token.
///
/// Stores that issue authenticated requests depend on this capability
/// rather than on the auth store itself.
pub trait TokenSource: Send + Sync {
    /// Current bearer token, if any
    fn bearer_token(&self) -> Option<String>;
}

/// Store of [`AuthState`] plus the sign-in actions
#[derive(Debug, Clone)]
pub struct AuthStore {
    state: Store<AuthState>,
    api: ResearchApi,
    storage: Arc<dyn TokenStorage>,
    sign_in: Arc<RequestTracker>,
    pending: Arc<CancelScope>,
}

impl AuthStore {
    /// Create a signed-out store
    pub fn new(api: ResearchApi, storage: Arc<dyn TokenStorage>) -> Self {
        Self {
            state: Store::new(AuthState::default()),
            api,
            storage,
            sign_in: Arc::new(RequestTracker::new()),
            pending: Arc::new(CancelScope::new()),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AuthState) + Send + Sync + 'static,
    {
        self.state.subscribe(listener)
    }

    pub fn get(&self) -> AuthState {
        self.state.get()
    }

    /// Exchange email and password for a token, then fetch the profile.
    ///
    /// A failed profile fetch is not fatal: the store becomes authenticated
    /// with `user` absent.
    pub async fn login(&self, email: &str, password: &str) -> ActionResult {
        let (ticket, cancel) = self.begin();
        tracing::debug!("Signing in");

        match self.api.login(email, password, &cancel).await {
            Ok(tokens) => self.complete_sign_in(ticket, tokens.access_token, &cancel).await,
            Err(e) => Err(self.fail(ticket, e, LOGIN_FAILED)),
        }
    }

    /// Create an account, then sign in with the returned token.
    ///
    /// The user record comes from the profile endpoint so its id is the
    /// server's; a failed profile fetch leaves `user` absent, as for `login`.
    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> ActionResult {
        let (ticket, cancel) = self.begin();
        tracing::debug!("Registering new account");

        match self
            .api
            .register(first_name, last_name, email, password, &cancel)
            .await
        {
            Ok(tokens) => self.complete_sign_in(ticket, tokens.access_token, &cancel).await,
            Err(e) => Err(self.fail(ticket, e, REGISTRATION_FAILED)),
        }
    }

    /// Forget the token and return to the initial state. Cannot fail.
    pub fn logout(&self) {
        self.sign_in.invalidate();
        self.pending.cancel_all();
        if let Err(e) = self.storage.clear() {
            tracing::warn!("Failed to clear persisted auth token: {:#}", e);
        }
        self.state.set(AuthState::default());
        tracing::info!("Signed out");
    }

    /// Restore a previously persisted token without validating it.
    ///
    /// Call once at start-up. The profile is not fetched, so `user` stays
    /// absent.
    pub fn initialize_auth(&self) {
        match self.storage.load() {
            Ok(Some(token)) => {
                self.state.update(|s| AuthState {
                    token: Some(token),
                    is_authenticated: true,
                    ..s
                });
                tracing::debug!("Restored persisted auth token");
            }
            Ok(None) => tracing::debug!("No persisted auth token"),
            Err(e) => tracing::warn!("Failed to read persisted auth token: {:#}", e),
        }
    }

    /// Cancel every auth request in flight; each resolves as a failure
    pub fn cancel_pending(&self) {
        self.pending.cancel_all();
    }

    fn begin(&self) -> (RequestTicket, CancellationToken) {
        self.state.update(|s| AuthState {
            is_loading: true,
            ..s
        });
        (self.sign_in.begin(), self.pending.token())
    }

    async fn complete_sign_in(
        &self,
        ticket: RequestTicket,
        token: String,
        cancel: &CancellationToken,
    ) -> ActionResult {
        if !self.sign_in.is_current(ticket) {
            return Err(ActionFailure::new(SUPERSEDED));
        }

        let user = match self.api.fetch_profile(&token, cancel).await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Profile fetch failed, continuing without user: {}", e);
                None
            }
        };

        if !self.sign_in.is_current(ticket) {
            tracing::debug!("Discarding superseded sign-in");
            return Err(ActionFailure::new(SUPERSEDED));
        }

        if let Err(e) = self.storage.save(&token) {
            tracing::warn!("Failed to persist auth token: {:#}", e);
        }

        let user_id = user.as_ref().map(|u| u.id);
        self.state.set(AuthState {
            user,
            token: Some(token),
            is_authenticated: true,
            is_loading: false,
        });
        tracing::info!(?user_id, "Signed in");
        Ok(())
    }

    fn fail(&self, ticket: RequestTicket, error: ApiError, default: &str) -> ActionFailure {
        let message = error.user_message(default);
        tracing::warn!(error = %error, "Sign-in failed");
        if self.sign_in.is_current(ticket) {
            self.state.update(|s| AuthState {
                is_loading: false,
                ..s
            });
        }
        ActionFailure::new(message)
    }
}

impl TokenSource for AuthStore {
    fn bearer_token(&self) -> Option<String> {
        self.state.with(|s| s.token.clone())
    }
}
