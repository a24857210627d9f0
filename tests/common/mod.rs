use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tempfile::TempDir;

use research_sync::api::ReqwestTransport;
use research_sync::config::Config;
use research_sync::storage::TokenStorage;
use research_sync::AppState;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// App state talking to `base_url` over real HTTP
#[allow(dead_code)]
pub fn app_for(base_url: &str, storage: Arc<dyn TokenStorage>) -> AppState {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_seconds = 5;
    let transport = ReqwestTransport::new(
        config.api.url().expect("mock server uri is a valid url"),
        Duration::from_secs(5),
    )
    .expect("failed to build http client");
    AppState::new(config, Arc::new(transport), storage)
}

#[allow(dead_code)]
pub fn user_json() -> Value {
    json!({
        "id": 7,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com"
    })
}

#[allow(dead_code)]
pub fn sessions_json() -> Value {
    json!({
        "sessions": [
            {"session_id": "s-1", "session_name": "Fusion", "created_at": "2024-05-01T10:00:00"},
            {"session_id": "s-2", "session_name": "Tides", "created_at": "2024-05-02T09:30:00"}
        ]
    })
}
