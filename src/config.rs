//! Configuration management for research-sync
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};
use crate::ui::Theme;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Research API connection settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Bearer token persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Initial presentation flags
    #[serde(default)]
    pub ui: UiConfig,
}

/// Research API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the `/api/...` paths are joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound for a single API call (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl ApiConfig {
    /// Per-call timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Parsed base URL
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if `base_url` is not an absolute URL
    pub fn url(&self) -> Result<url::Url> {
        url::Url::parse(&self.base_url).map_err(|e| {
            SyncError::Config(format!("Invalid api.base_url {}: {}", self.base_url, e)).into()
        })
    }
}

/// Where the bearer token is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// OS native keyring
    Keyring,
    /// Plain-text file
    #[default]
    File,
    /// Process memory only; nothing survives a restart
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = SyncError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keyring" => Ok(Self::Keyring),
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(SyncError::Config(format!(
                "Invalid storage backend: {}. Must be one of: keyring, file, memory",
                other
            ))),
        }
    }
}

/// Bearer token persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend to use
    #[serde(default)]
    pub backend: StorageBackend,

    /// Key the token is stored under
    #[serde(default = "default_token_key")]
    pub token_key: String,

    /// Keyring service name
    #[serde(default = "default_service")]
    pub service: String,

    /// Token file location for the file backend; defaults to the platform
    /// data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_token_key() -> String {
    "auth_token".to_string()
}

fn default_service() -> String {
    "research-sync".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            token_key: default_token_key(),
            service: default_service(),
            path: None,
        }
    }
}

/// Initial presentation flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: Theme,

    #[serde(default = "default_sidebar_open")]
    pub sidebar_open: bool,
}

fn default_sidebar_open() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            sidebar_open: default_sidebar_open(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SyncError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| SyncError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("RESEARCH_SYNC_BASE_URL") {
            tracing::debug!(base_url = %base_url, "Env override: RESEARCH_SYNC_BASE_URL");
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("RESEARCH_SYNC_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid RESEARCH_SYNC_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(backend) = std::env::var("RESEARCH_SYNC_STORAGE") {
            match backend.parse() {
                Ok(value) => self.storage.backend = value,
                Err(_) => tracing::warn!("Invalid RESEARCH_SYNC_STORAGE: {}", backend),
            }
        }

        if let Ok(path) = std::env::var("RESEARCH_SYNC_TOKEN_PATH") {
            self.storage.path = Some(PathBuf::from(path));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.base_url {
            self.api.base_url = base_url.clone();
        }
        if let Some(backend) = cli.storage {
            self.storage.backend = backend;
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let url = self.api.url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SyncError::Config(format!(
                "api.base_url must use http or https, got {}",
                url.scheme()
            ))
            .into());
        }

        if self.api.timeout_seconds == 0 {
            return Err(SyncError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.api.timeout_seconds > 3600 {
            return Err(SyncError::Config(
                "api.timeout_seconds must be less than or equal to 3600".to_string(),
            )
            .into());
        }

        if self.storage.token_key.trim().is_empty() {
            return Err(
                SyncError::Config("storage.token_key cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;

    fn cli(args: &[&str]) -> crate::cli::Cli {
        let mut argv = vec!["research-sync"];
        argv.extend_from_slice(args);
        crate::cli::Cli::parse_from(argv)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_seconds, 120);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.token_key, "auth_token");
        assert_eq!(config.ui.theme, Theme::Light);
        assert!(config.ui.sidebar_open);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_bad_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_timeout_bounds() {
        let mut config = Config::default();
        config.api.timeout_seconds = 0;
        assert!(config.validate().is_err());

        config.api.timeout_seconds = 3601;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_token_key() {
        let mut config = Config::default();
        config.storage.token_key = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
api:
  base_url: https://research.example.com
  timeout_seconds: 30
storage:
  backend: keyring
  service: research-sync-dev
ui:
  theme: dark
  sidebar_open: false
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.api.base_url, "https://research.example.com");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.storage.backend, StorageBackend::Keyring);
        assert_eq!(config.storage.service, "research-sync-dev");
        assert_eq!(config.storage.token_key, "auth_token");
        assert_eq!(config.ui.theme, Theme::Dark);
        assert!(!config.ui.sidebar_open);
    }

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!(
            "KEYRING".parse::<StorageBackend>().unwrap(),
            StorageBackend::Keyring
        );
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides_applied() {
        std::env::set_var("RESEARCH_SYNC_BASE_URL", "http://env.example.com");
        std::env::set_var("RESEARCH_SYNC_TIMEOUT_SECONDS", "45");
        std::env::set_var("RESEARCH_SYNC_STORAGE", "memory");

        let mut config = Config::default();
        config.apply_env_vars();

        std::env::remove_var("RESEARCH_SYNC_BASE_URL");
        std::env::remove_var("RESEARCH_SYNC_TIMEOUT_SECONDS");
        std::env::remove_var("RESEARCH_SYNC_STORAGE");

        assert_eq!(config.api.base_url, "http://env.example.com");
        assert_eq!(config.api.timeout_seconds, 45);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    #[serial]
    fn test_invalid_env_timeout_ignored() {
        std::env::set_var("RESEARCH_SYNC_TIMEOUT_SECONDS", "soon");

        let mut config = Config::default();
        config.apply_env_vars();

        std::env::remove_var("RESEARCH_SYNC_TIMEOUT_SECONDS");

        assert_eq!(config.api.timeout_seconds, 120);
    }

    #[test]
    #[serial]
    fn test_load_missing_file_uses_defaults_with_cli_overrides() {
        let cli = cli(&["--base-url", "http://cli.example.com", "--storage", "memory", "status"]);
        let config = Config::load("/nonexistent/config.yaml", &cli).unwrap();
        assert_eq!(config.api.base_url, "http://cli.example.com");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    #[serial]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "api:\n  timeout_seconds: 15\n").unwrap();

        let config = Config::load(path.to_str().unwrap(), &cli(&["status"])).unwrap();

        assert_eq!(config.api.timeout_seconds, 15);
        assert_eq!(config.api.base_url, "http://localhost:8000");
    }
}
