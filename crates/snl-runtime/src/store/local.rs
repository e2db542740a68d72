//! Local file-based state storage.
//!
//! The whole snapshot lives in one pretty-printed JSON file:
//!
//! ```text
//! ~/.snl/
//! ├── config.toml
//! └── state.json
//! ```

use super::{GameState, StateStore, StorageError};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Local JSON file store.
///
/// # Features
///
/// - Atomic writes (write to temp, then rename)
/// - Automatic parent directory creation
/// - A missing file loads as an empty [`GameState`]
///
/// # Example
///
/// ```no_run
/// use snl_runtime::store::{LocalFileStore, StateStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = LocalFileStore::new("/var/lib/snl/state.json")?;
/// let state = store.load().await?;
/// println!("{} guild(s)", state.guilds.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    path: PathBuf,
}

impl LocalFileStore {
    /// Creates a store writing to `path`.
    ///
    /// `~/` is expanded and the parent directory is created if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DirectoryCreation` if the parent directory
    /// cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let expanded = expand_tilde(path.as_ref());

        if let Some(parent) = expanded.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::directory_creation(parent, e))?;
            }
        }

        Ok(Self { path: expanded })
    }

    /// Returns the snapshot file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("state.json");
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

impl StateStore for LocalFileStore {
    async fn load(&self) -> Result<GameState, StorageError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No state file yet, starting empty");
            return Ok(GameState::new());
        }

        let json = fs::read_to_string(&self.path).await?;
        GameState::from_json(&json)
    }

    async fn persist(&self, state: &GameState) -> Result<(), StorageError> {
        let json = state.to_json()?;
        let temp_path = self.temp_path();

        fs::write(&temp_path, &json).await?;
        fs::rename(&temp_path, &self.path).await?;

        Ok(())
    }
}

/// Expands `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(rest) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
    }
    path.to_path_buf()
}

/// Returns the default state file path (`~/.snl/state.json`).
#[must_use]
pub fn default_state_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".snl")
        .join("state.json")
}
