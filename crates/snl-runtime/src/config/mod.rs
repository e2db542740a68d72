//! Configuration with hierarchical layering.
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌─────────────────────────────────────────┐
//! │  1. Environment Variables (SNL_*)       │  Runtime override
//! ├─────────────────────────────────────────┤
//! │  2. Project Config (.snl/config.toml)   │  Deployment-specific
//! ├─────────────────────────────────────────┤
//! │  3. Global Config (~/.snl/config.toml)  │  User defaults
//! ├─────────────────────────────────────────┤
//! │  4. Default Values (compile-time)       │  Fallback
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `SNL_DEBUG` | `debug` | bool |
//! | `SNL_TIMEZONE` | `game.timezone` | IANA name |
//! | `SNL_LOOKUP_TIMEOUT_MS` | `game.lookup_timeout_ms` | u64 |
//! | `SNL_STATE_PATH` | `paths.state_file` | PathBuf |
//! | `SNL_BOARD_PATH` | `paths.board_file` | PathBuf |
//!
//! # Example Configuration
//!
//! ```toml
//! debug = false
//!
//! [game]
//! timezone = "Australia/Melbourne"
//! fallback_max_tile = 100
//! lookup_timeout_ms = 5000
//! reset_confirm_secs = 30
//! player_role = "Player"
//!
//! [paths]
//! state_file = "~/.snl/state.json"
//! board_file = ".snl/board.toml"
//!
//! [roles]
//! hosts = [123456789012345678]
//! ```

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::{GameConfig, PathsConfig, RolesConfig, SnlConfig};

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".snl")
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".snl";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";
