//! Session sidecar file.
//!
//! A long-running process keeps pending submissions and reset tokens in
//! memory. One-shot CLI invocations carry them across runs in a JSON file
//! next to the state snapshot:
//!
//! ```text
//! ~/.snl/
//! ├── state.json
//! └── state.session.json
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use snl_runtime::approval::PendingSubmission;
use snl_runtime::service::PendingReset;
use std::path::{Path, PathBuf};
use tracing::debug;

/// In-memory game data persisted between CLI runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionFile {
    /// Submissions awaiting approval.
    pub pending: Vec<PendingSubmission>,
    /// Reset tokens awaiting confirmation.
    pub resets: Vec<PendingReset>,
}

impl SessionFile {
    /// Reads the session file, or returns an empty session if there is none.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No session file yet");
            return Ok(Self::default());
        }
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("cannot read session file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("malformed session file {}", path.display()))
    }

    /// Writes the session file.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("cannot write session file {}", path.display()))
    }
}

/// Returns the session file path for a state file (`state.json` → `state.session.json`).
#[must_use]
pub fn session_path(state_file: &Path) -> PathBuf {
    state_file.with_extension("session.json")
}
