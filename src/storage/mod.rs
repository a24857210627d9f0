//! Bearer token persistence
//!
//! The auth store keeps exactly one persisted value: the bearer token under
//! a single key. [`TokenStorage`] is the port; backends:
//!
//! - [`KeyringTokenStorage`] -- OS native credential store.
//! - [`FileTokenStorage`] -- plain-text file, default in the platform data
//!   directory.
//! - [`MemoryTokenStorage`] -- process-local cell for tests and headless use.
//!
//! Storage is a single shared cell: last writer wins.

use std::sync::{Arc, Mutex, PoisonError};

use crate::config::{StorageBackend, StorageConfig};
use crate::error::Result;

pub mod file;
pub mod os_keyring;

pub use self::file::FileTokenStorage;
pub use self::os_keyring::KeyringTokenStorage;

/// Persistence port for the bearer token
#[cfg_attr(test, mockall::automock)]
pub trait TokenStorage: Send + Sync + std::fmt::Debug {
    /// Read the persisted token, `Ok(None)` when nothing is stored
    fn load(&self) -> Result<Option<String>>;

    /// Persist `token`, replacing any previous value
    fn save(&self, token: &str) -> Result<()>;

    /// Remove the persisted token. Removing an absent token is a no-op.
    fn clear(&self) -> Result<()>;
}

/// In-memory token cell
///
/// # Examples
///
/// ```
/// use research_sync::storage::{MemoryTokenStorage, TokenStorage};
///
/// let storage = MemoryTokenStorage::new();
/// storage.save("abc").unwrap();
/// assert_eq!(storage.load().unwrap().as_deref(), Some("abc"));
/// storage.clear().unwrap();
/// assert!(storage.load().unwrap().is_none());
/// ```
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    /// Empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with `token`
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Build the backend selected in `config`
///
/// # Errors
///
/// Returns an error if the file backend has no explicit path and the
/// platform data directory cannot be determined.
pub fn from_config(config: &StorageConfig) -> Result<Arc<dyn TokenStorage>> {
    let storage: Arc<dyn TokenStorage> = match config.backend {
        StorageBackend::Keyring => Arc::new(KeyringTokenStorage::new(
            config.service.clone(),
            config.token_key.clone(),
        )),
        StorageBackend::File => {
            let path = match &config.path {
                Some(path) => path.clone(),
                None => FileTokenStorage::default_path(&config.token_key)?,
            };
            Arc::new(FileTokenStorage::new(path))
        }
        StorageBackend::Memory => Arc::new(MemoryTokenStorage::new()),
    };
    tracing::debug!(backend = ?config.backend, "Token storage initialized");
    Ok(storage)
}
