//! Presentation-only state
//!
//! [`UiStore`] owns the sidebar, theme and mobile flags. Its mutators are
//! synchronous and cannot fail; it never touches the network.

use serde::{Deserialize, Serialize};

use crate::config::UiConfig;
use crate::store::{Store, Subscription};

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// UI flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub sidebar_open: bool,
    pub theme: Theme,
    pub is_mobile: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            theme: Theme::Light,
            is_mobile: false,
        }
    }
}

impl From<&UiConfig> for UiState {
    fn from(config: &UiConfig) -> Self {
        Self {
            sidebar_open: config.sidebar_open,
            theme: config.theme,
            is_mobile: false,
        }
    }
}

/// Store of [`UiState`]
#[derive(Debug, Clone, Default)]
pub struct UiStore {
    state: Store<UiState>,
}

impl UiStore {
    /// Store starting from `initial`
    pub fn new(initial: UiState) -> Self {
        Self {
            state: Store::new(initial),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&UiState) + Send + Sync + 'static,
    {
        self.state.subscribe(listener)
    }

    pub fn get(&self) -> UiState {
        self.state.get()
    }

    pub fn toggle_sidebar(&self) {
        self.state.update(|s| UiState {
            sidebar_open: !s.sidebar_open,
            ..s
        });
    }

    pub fn set_sidebar_open(&self, open: bool) {
        self.state.update(|s| UiState {
            sidebar_open: open,
            ..s
        });
    }

    pub fn toggle_theme(&self) {
        self.state.update(|s| UiState {
            theme: s.theme.toggled(),
            ..s
        });
    }

    pub fn set_theme(&self, theme: Theme) {
        self.state.update(|s| UiState { theme, ..s });
    }

    pub fn set_mobile(&self, is_mobile: bool) {
        self.state.update(|s| UiState { is_mobile, ..s });
    }
}
