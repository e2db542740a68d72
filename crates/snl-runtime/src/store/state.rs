//! Game state snapshot types.

use super::StorageError;
use serde::{Deserialize, Serialize};
use snl_types::{GuildId, PlayerId};
use std::collections::{BTreeMap, HashSet};

/// Snapshot format version for compatibility checking.
pub const STATE_VERSION: u32 = 1;

/// Board state of one player.
///
/// `rolls` is unsigned, so a negative roll count cannot be represented;
/// a snapshot carrying one fails to load instead of being repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Current tile; 0 is the start tile after a reset.
    pub position: u32,
    /// Unused die rolls.
    pub rolls: u32,
    /// `false` while the last tile awaits moderator approval.
    pub approved: bool,
}

impl PlayerState {
    /// State of a player seen for the first time.
    #[must_use]
    pub const fn fresh() -> Self {
        Self {
            position: 1,
            rolls: 0,
            approved: true,
        }
    }

    /// State every participant gets on a guild reset.
    #[must_use]
    pub const fn after_reset() -> Self {
        Self {
            position: 0,
            rolls: 1,
            approved: true,
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::fresh()
    }
}

/// State of one guild's game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildState {
    /// Known players.
    #[serde(default)]
    pub players: BTreeMap<PlayerId, PlayerState>,
    /// Finishers in finish order.
    #[serde(default)]
    pub podium: Vec<PlayerId>,
}

impl GuildState {
    /// Returns the player's state, or the fresh default for unknown players.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> PlayerState {
        self.players.get(&player).copied().unwrap_or_default()
    }

    /// Returns the player's 1-based podium position.
    #[must_use]
    pub fn podium_rank(&self, player: PlayerId) -> Option<usize> {
        self.podium
            .iter()
            .position(|p| *p == player)
            .map(|index| index + 1)
    }

    /// Appends the player to the podium unless already present.
    ///
    /// Returns the player's 1-based rank either way.
    pub fn record_finish(&mut self, player: PlayerId) -> usize {
        if let Some(rank) = self.podium_rank(player) {
            return rank;
        }
        self.podium.push(player);
        self.podium.len()
    }
}

/// Snapshot of every guild's game.
///
/// # Example
///
/// ```
/// use snl_runtime::store::{GameState, PlayerState};
/// use snl_types::{GuildId, PlayerId};
///
/// let mut state = GameState::new();
/// let guild = GuildId::new(1);
/// let player = PlayerId::new(2);
///
/// assert_eq!(state.player(guild, player), PlayerState::fresh());
///
/// state.guild_mut(guild).players.insert(player, PlayerState::after_reset());
/// let json = state.to_json().unwrap();
/// let loaded = GameState::from_json(&json).unwrap();
/// assert_eq!(loaded, state);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Format version.
    pub version: u32,
    /// Per-guild state.
    #[serde(default)]
    pub guilds: BTreeMap<GuildId, GuildState>,
}

impl GameState {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: STATE_VERSION,
            guilds: BTreeMap::new(),
        }
    }

    /// Returns a guild's state if it has any.
    #[must_use]
    pub fn guild(&self, guild: GuildId) -> Option<&GuildState> {
        self.guilds.get(&guild)
    }

    /// Returns a guild's state, creating it on first use.
    pub fn guild_mut(&mut self, guild: GuildId) -> &mut GuildState {
        self.guilds.entry(guild).or_default()
    }

    /// Returns a player's state, or the fresh default.
    #[must_use]
    pub fn player(&self, guild: GuildId, player: PlayerId) -> PlayerState {
        self.guild(guild)
            .map(|g| g.player(player))
            .unwrap_or_default()
    }

    /// Returns the player's 1-based podium position.
    #[must_use]
    pub fn podium_rank(&self, guild: GuildId, player: PlayerId) -> Option<usize> {
        self.guild(guild).and_then(|g| g.podium_rank(player))
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes from JSON and validates invariants.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] for malformed JSON,
    /// [`StorageError::VersionIncompatible`] for snapshots from a newer
    /// format, and [`StorageError::Corrupted`] for a negative counter or a
    /// podium listing a player twice.
    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let raw: serde_json::Value = serde_json::from_str(json)?;
        check_counters(&raw)?;
        let state: Self = serde_json::from_value(raw)?;
        state.validate()?;
        Ok(state)
    }

    /// Checks snapshot invariants.
    ///
    /// # Errors
    ///
    /// See [`from_json`](Self::from_json).
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.version > STATE_VERSION {
            return Err(StorageError::VersionIncompatible {
                file_version: self.version,
                supported_version: STATE_VERSION,
            });
        }

        for (guild, state) in &self.guilds {
            let mut seen = HashSet::new();
            for player in &state.podium {
                if !seen.insert(*player) {
                    return Err(StorageError::corrupted(format!(
                        "player {player} appears twice on the podium of guild {guild}"
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Rejects negative positions or roll counts before typed decoding,
/// so they surface as corruption rather than as a parse error.
fn check_counters(raw: &serde_json::Value) -> Result<(), StorageError> {
    let Some(guilds) = raw.get("guilds").and_then(serde_json::Value::as_object) else {
        return Ok(());
    };
    for (guild, guild_state) in guilds {
        let Some(players) = guild_state
            .get("players")
            .and_then(serde_json::Value::as_object)
        else {
            continue;
        };
        for (player, player_state) in players {
            for field in ["position", "rolls"] {
                let negative = player_state
                    .get(field)
                    .and_then(serde_json::Value::as_i64)
                    .is_some_and(|n| n < 0);
                if negative {
                    return Err(StorageError::corrupted(format!(
                        "player {player} of guild {guild} has a negative {field}"
                    )));
                }
            }
        }
    }
    Ok(())
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
