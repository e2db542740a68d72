//! Configuration types.
//!
//! Every section derives `Default` and uses `#[serde(default)]`, so a
//! config file only needs the keys it changes. [`SnlConfig::merge`]
//! overlays a higher layer onto a lower one field by field: a field
//! still at its default value in the higher layer does not override.

use super::ConfigError;
use crate::store::default_state_path;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use snl_types::PlayerId;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SnlConfig {
    /// Debug logging.
    pub debug: bool,

    /// Game rules and timing.
    pub game: GameConfig,

    /// File locations.
    pub paths: PathsConfig,

    /// Privileged members.
    pub roles: RolesConfig,
}

impl SnlConfig {
    /// Parses a config from TOML.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the text is malformed.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Overlays `other` onto `self`.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        self.game.merge(&other.game);
        self.paths.merge(&other.paths);
        self.roles.merge(&other.roles);
    }
}

/// Game rules and timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    /// IANA time zone the grant boundaries are computed in.
    pub timezone: String,

    /// Max tile used when the tile directory cannot answer.
    pub fallback_max_tile: u32,

    /// Bound on each tile directory call, in milliseconds.
    pub lookup_timeout_ms: u64,

    /// How long a reset confirmation token stays valid, in seconds.
    pub reset_confirm_secs: u64,

    /// Name of the guild role whose members receive scheduled rolls.
    pub player_role: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            timezone: "Australia/Melbourne".into(),
            fallback_max_tile: 100,
            lookup_timeout_ms: 5_000,
            reset_confirm_secs: 30,
            player_role: "Player".into(),
        }
    }
}

impl GameConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.timezone != default.timezone {
            self.timezone = other.timezone.clone();
        }
        if other.fallback_max_tile != default.fallback_max_tile {
            self.fallback_max_tile = other.fallback_max_tile;
        }
        if other.lookup_timeout_ms != default.lookup_timeout_ms {
            self.lookup_timeout_ms = other.lookup_timeout_ms;
        }
        if other.reset_confirm_secs != default.reset_confirm_secs {
            self.reset_confirm_secs = other.reset_confirm_secs;
        }
        if other.player_role != default.player_role {
            self.player_role = other.player_role.clone();
        }
    }

    /// Parses the configured time zone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimezone`] for unknown names.
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }

    /// Tile directory call bound.
    #[must_use]
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    /// Reset confirmation window.
    #[must_use]
    pub fn reset_window(&self) -> Duration {
        Duration::from_secs(self.reset_confirm_secs)
    }
}

/// File locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    /// Game state JSON file. Defaults to `~/.snl/state.json`.
    pub state_file: Option<PathBuf>,

    /// Board TOML file. Defaults to `~/.snl/board.toml`.
    pub board_file: Option<PathBuf>,
}

impl PathsConfig {
    fn merge(&mut self, other: &Self) {
        if other.state_file.is_some() {
            self.state_file.clone_from(&other.state_file);
        }
        if other.board_file.is_some() {
            self.board_file.clone_from(&other.board_file);
        }
    }

    /// Returns the state file path, or the default.
    #[must_use]
    pub fn state_file_or_default(&self) -> PathBuf {
        self.state_file.clone().unwrap_or_else(default_state_path)
    }

    /// Returns the board file path, or the default.
    #[must_use]
    pub fn board_file_or_default(&self) -> PathBuf {
        self.board_file
            .clone()
            .unwrap_or_else(|| super::default_config_dir().join("board.toml"))
    }
}

/// Member roles.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RolesConfig {
    /// Members allowed to run host commands.
    pub hosts: Vec<PlayerId>,

    /// Members holding the player role when no chat platform supplies one.
    pub players: Vec<PlayerId>,
}

impl RolesConfig {
    fn merge(&mut self, other: &Self) {
        if !other.hosts.is_empty() {
            self.hosts.clone_from(&other.hosts);
        }
        if !other.players.is_empty() {
            self.players.clone_from(&other.players);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = SnlConfig::default();
        assert!(!config.debug);
        assert_eq!(config.game.timezone, "Australia/Melbourne");
        assert_eq!(config.game.fallback_max_tile, 100);
        assert_eq!(config.game.reset_window(), Duration::from_secs(30));
        assert_eq!(config.game.player_role, "Player");
        assert!(config.roles.hosts.is_empty());
    }

    #[test]
    fn parse_partial_toml() {
        let config = SnlConfig::from_toml(
            r#"
[game]
fallback_max_tile = 64

[roles]
hosts = [42, 7]
players = [1]
"#,
        )
        .unwrap();

        assert_eq!(config.game.fallback_max_tile, 64);
        assert_eq!(config.game.timezone, "Australia/Melbourne");
        assert_eq!(config.roles.hosts, vec![PlayerId::new(42), PlayerId::new(7)]);
        assert_eq!(config.roles.players, vec![PlayerId::new(1)]);
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = SnlConfig::default();
        config.paths.board_file = Some(PathBuf::from("/srv/board.toml"));
        config.roles.hosts.push(PlayerId::new(9));

        let toml = config.to_toml().unwrap();
        assert_eq!(SnlConfig::from_toml(&toml).unwrap(), config);
    }

    #[test]
    fn merge_keeps_lower_layer_when_default() {
        let mut base = SnlConfig::default();
        base.debug = true;
        base.game.timezone = "Europe/London".into();

        let mut overlay = SnlConfig::default();
        overlay.game.lookup_timeout_ms = 250;

        base.merge(&overlay);

        assert!(base.debug);
        assert_eq!(base.game.timezone, "Europe/London");
        assert_eq!(base.game.lookup_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn timezone_parsing() {
        assert_eq!(GameConfig::default().tz().unwrap(), chrono_tz::Australia::Melbourne);

        let bad = GameConfig {
            timezone: "Nowhere/Special".into(),
            ..GameConfig::default()
        };
        assert!(matches!(bad.tz(), Err(ConfigError::InvalidTimezone(_))));
    }
}
