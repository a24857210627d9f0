//! Token persistence via OS keyring
//!
//! Stores the bearer token using the operating system's native credential
//! store (Keychain on macOS, Secret Service on Linux, Windows Credential
//! Manager on Windows). The token is stored verbatim as the entry's secret.

use crate::error::{Result, SyncError};
use crate::storage::TokenStorage;

/// Keyring-backed [`TokenStorage`].
///
/// The entry is addressed by `(service, key)`; the service name is
/// namespaced so it cannot collide with other applications.
///
/// # Examples
///
/// ```no_run
/// use research_sync::storage::{KeyringTokenStorage, TokenStorage};
///
/// let storage = KeyringTokenStorage::new("research-sync", "auth_token");
/// storage.save("my_token").unwrap();
/// assert_eq!(storage.load().unwrap().as_deref(), Some("my_token"));
/// ```
#[derive(Debug, Clone)]
pub struct KeyringTokenStorage {
    service: String,
    key: String,
}

impl KeyringTokenStorage {
    /// Create an accessor for the entry `(service, key)`
    pub fn new(service: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            key: key.into(),
        }
    }

    /// Keyring service name, e.g. `research-sync`
    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self) -> Result<keyring::Entry> {
        Ok(keyring::Entry::new(&self.service, &self.key).map_err(SyncError::Keyring)?)
    }
}

impl TokenStorage for KeyringTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(SyncError::Keyring(e).into()),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        self.entry()?
            .set_password(token)
            .map_err(SyncError::Keyring)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_password() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(SyncError::Keyring(e).into()),
        }
    }
}
