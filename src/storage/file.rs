use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;

use crate::error::{Result, SyncError};
use crate::storage::TokenStorage;

/// Plain-text file holding the bearer token
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Store the token at `path`. Parent directories are created on first save.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// `<platform data dir>/research-sync/<key>`
    pub fn default_path(key: &str) -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "research-sync", "research-sync")
            .ok_or_else(|| SyncError::Storage("Could not determine data directory".into()))?;
        Ok(dirs.data_dir().join(key))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SyncError::Io(e)).with_context(|| {
                format!("Failed to read token file {}", self.path.display())
            }),
        }
    }

    /// Write `token`, readable by the owner only on unix
    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(SyncError::Io)
                .with_context(|| {
                    format!(
                        "Failed to create parent directory for token file {}",
                        self.path.display()
                    )
                })?;
        }
        write_private(&self.path, token)
            .map_err(SyncError::Io)
            .with_context(|| format!("Failed to write token file {}", self.path.display()))
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SyncError::Io(e)).with_context(|| {
                format!("Failed to remove token file {}", self.path.display())
            }),
        }
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    use std::fs::{OpenOptions, Permissions};
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; tighten a file left by an older run
    file.set_permissions(Permissions::from_mode(0o600))?;
    file.write_all(contents.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    std::fs::write(path, contents)
}
