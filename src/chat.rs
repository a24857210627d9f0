//! Research session state
//!
//! [`ChatStore`] owns the session list, the active session and its message
//! history, plus the loading/generating/error flags. Every network action is
//! gated on a bearer token read from the injected [`TokenSource`]; without a
//! token no request is issued.
//!
//! Failures never escape an action. They are recorded in `error`, and the
//! action's busy flag is cleared on every path. When calls of the same kind
//! overlap, only the most recently issued one commits.

use std::fmt;
use std::sync::Arc;

use crate::api::{ChatMessage, ChatSession, ResearchApi};
use crate::auth::TokenSource;
use crate::error::{ActionFailure, ActionResult, ApiError};
use crate::store::{CancelScope, Derived, RequestTracker, Store, Subscription};

const SESSIONS_FAILED: &str = "Failed to load sessions";
const HISTORY_FAILED: &str = "Failed to load session history";
const RESEARCH_FAILED: &str = "Failed to start research";
const FEEDBACK_FAILED: &str = "Failed to submit feedback";

/// Session and message state.
///
/// `current_session_id` may briefly name a session not yet present in
/// `sessions`; lookups treat that as a miss.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    /// Sessions in server order
    pub sessions: Vec<ChatSession>,
    pub current_session_id: Option<String>,
    /// History of the current session
    pub current_messages: Vec<ChatMessage>,
    pub is_loading: bool,
    pub is_generating: bool,
    pub error: Option<String>,
}

impl ChatState {
    /// The session named by `current_session_id`, if it is loaded
    pub fn current_session(&self) -> Option<&ChatSession> {
        let id = self.current_session_id.as_deref()?;
        self.sessions.iter().find(|s| s.session_id == id)
    }
}

/// Read-only view of the active [`ChatSession`]
pub type CurrentSession = Derived<ChatState, Option<ChatSession>>;

/// A research session created by [`ChatStore::start_new_research`]
#[derive(Debug, Clone, PartialEq)]
pub struct StartedResearch {
    pub session_id: String,
    /// Analyst personas proposed for the topic
    pub analysts: serde_json::Value,
}

#[derive(Debug, Default)]
struct Trackers {
    sessions: RequestTracker,
    history: RequestTracker,
    research: RequestTracker,
    feedback: RequestTracker,
}

#[derive(Clone, Copy)]
enum Busy {
    Loading,
    Generating,
}

/// Store of [`ChatState`] plus the session actions
#[derive(Clone)]
pub struct ChatStore {
    state: Store<ChatState>,
    api: ResearchApi,
    auth: Arc<dyn TokenSource>,
    trackers: Arc<Trackers>,
    pending: Arc<CancelScope>,
}

impl fmt::Debug for ChatStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatStore")
            .field("state", &self.state)
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl ChatStore {
    /// Create an empty store reading its bearer token from `auth`
    pub fn new(api: ResearchApi, auth: Arc<dyn TokenSource>) -> Self {
        Self {
            state: Store::new(ChatState::default()),
            api,
            auth,
            trackers: Arc::new(Trackers::default()),
            pending: Arc::new(CancelScope::new()),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ChatState) + Send + Sync + 'static,
    {
        self.state.subscribe(listener)
    }

    pub fn get(&self) -> ChatState {
        self.state.get()
    }

    /// View of the active session, recomputed on every change to this store
    pub fn current_session(&self) -> CurrentSession {
        Derived::new(&self.state, |state: &ChatState| {
            state.current_session().cloned()
        })
    }

    /// Replace `sessions` with the server's list.
    ///
    /// No-op without a token. On failure `sessions` is left as it was.
    pub async fn load_sessions(&self) {
        let Some(token) = self.auth.bearer_token() else {
            tracing::debug!("Skipping session list load: not authenticated");
            return;
        };

        self.start(Busy::Loading);
        let ticket = self.trackers.sessions.begin();
        tracing::debug!("Loading session list");
        let outcome = self.api.list_sessions(&token, &self.pending.token()).await;

        if !self.trackers.sessions.is_current(ticket) {
            tracing::debug!("Discarding superseded session list response");
            return;
        }

        match outcome {
            Ok(sessions) => {
                tracing::info!(count = sessions.len(), "Loaded sessions");
                self.state.update(|s| ChatState {
                    sessions,
                    is_loading: false,
                    ..s
                });
            }
            Err(e) => {
                self.record_failure(&e, SESSIONS_FAILED, Busy::Loading);
            }
        }
    }

    /// Make `session_id` current and load its messages.
    ///
    /// No-op without a token. On failure the previous current session and
    /// messages are kept.
    pub async fn load_session_history(&self, session_id: &str) {
        let Some(token) = self.auth.bearer_token() else {
            tracing::debug!("Skipping history load: not authenticated");
            return;
        };

        self.start(Busy::Loading);
        let ticket = self.trackers.history.begin();
        tracing::debug!(session_id, "Loading session history");
        let outcome = self
            .api
            .session_history(&token, session_id, &self.pending.token())
            .await;

        if !self.trackers.history.is_current(ticket) {
            tracing::debug!(session_id, "Discarding superseded history response");
            return;
        }

        match outcome {
            Ok(messages) => {
                tracing::info!(session_id, count = messages.len(), "Loaded session history");
                let session_id = session_id.to_string();
                self.state.update(|s| ChatState {
                    current_session_id: Some(session_id),
                    current_messages: messages,
                    is_loading: false,
                    ..s
                });
            }
            Err(e) => {
                self.record_failure(&e, HISTORY_FAILED, Busy::Loading);
            }
        }
    }

    /// Ask the server to start a research session on `topic` with
    /// `analyst_number` analysts.
    ///
    /// The session list is not touched; callers reload it when they want the
    /// new session to appear.
    pub async fn start_new_research(
        &self,
        topic: &str,
        analyst_number: u32,
    ) -> ActionResult<StartedResearch> {
        let token = self
            .auth
            .bearer_token()
            .ok_or_else(ActionFailure::not_authenticated)?;

        self.start(Busy::Generating);
        let ticket = self.trackers.research.begin();
        tracing::debug!(analyst_number, "Initiating research");
        let outcome = self
            .api
            .initiate_research(&token, topic, analyst_number, &self.pending.token())
            .await;
        let current = self.trackers.research.is_current(ticket);

        match outcome {
            Ok(response) => {
                tracing::info!(session_id = %response.session_id, "Research started");
                if current {
                    self.finish(Busy::Generating);
                }
                Ok(StartedResearch {
                    session_id: response.session_id,
                    analysts: response.analysts,
                })
            }
            Err(e) if current => Err(self.record_failure(&e, RESEARCH_FAILED, Busy::Generating)),
            Err(e) => Err(ActionFailure::new(e.user_message(RESEARCH_FAILED))),
        }
    }

    /// Send analyst feedback for `session_id` and return the server payload.
    ///
    /// On success the session list is reloaded with [`Self::load_sessions`]
    /// before this returns, so `sessions` reflects any session the feedback
    /// completed.
    pub async fn submit_analyst_feedback(
        &self,
        session_id: &str,
        feedback: &str,
    ) -> ActionResult<serde_json::Value> {
        let token = self
            .auth
            .bearer_token()
            .ok_or_else(ActionFailure::not_authenticated)?;

        self.start(Busy::Generating);
        let ticket = self.trackers.feedback.begin();
        tracing::debug!(session_id, "Submitting analyst feedback");
        let outcome = self
            .api
            .analyst_feedback(&token, session_id, feedback, &self.pending.token())
            .await;
        let current = self.trackers.feedback.is_current(ticket);

        match outcome {
            Ok(data) => {
                tracing::info!(session_id, "Analyst feedback accepted");
                if current {
                    self.finish(Busy::Generating);
                }
                self.load_sessions().await;
                Ok(data)
            }
            Err(e) if current => Err(self.record_failure(&e, FEEDBACK_FAILED, Busy::Generating)),
            Err(e) => Err(ActionFailure::new(e.user_message(FEEDBACK_FAILED))),
        }
    }

    pub fn set_current_session(&self, session_id: Option<String>) {
        self.state.update(|s| ChatState {
            current_session_id: session_id,
            ..s
        });
    }

    pub fn clear_error(&self) {
        self.state.update(|s| ChatState { error: None, ..s });
    }

    /// Cancel every request in flight from this store; each records a
    /// "Request cancelled" failure
    pub fn cancel_pending(&self) {
        self.pending.cancel_all();
    }

    fn start(&self, busy: Busy) {
        self.state.update(|s| match busy {
            Busy::Loading => ChatState {
                is_loading: true,
                error: None,
                ..s
            },
            Busy::Generating => ChatState {
                is_generating: true,
                error: None,
                ..s
            },
        });
    }

    fn finish(&self, busy: Busy) {
        self.state.update(|s| match busy {
            Busy::Loading => ChatState {
                is_loading: false,
                ..s
            },
            Busy::Generating => ChatState {
                is_generating: false,
                ..s
            },
        });
    }

    fn record_failure(&self, error: &ApiError, default: &str, busy: Busy) -> ActionFailure {
        let message = error.user_message(default);
        tracing::warn!(error = %error, "{}", default);
        let stored = message.clone();
        self.state.update(|s| {
            let s = ChatState {
                error: Some(stored),
                ..s
            };
            match busy {
                Busy::Loading => ChatState {
                    is_loading: false,
                    ..s
                },
                Busy::Generating => ChatState {
                    is_generating: false,
                    ..s
                },
            }
        });
        ActionFailure::new(message)
    }
}
