//! Guild membership.

use crate::store::GameState;
use parking_lot::RwLock;
use snl_types::{GuildId, PlayerId};
use std::collections::BTreeMap;
use std::future::Future;

/// Guild membership as seen by the chat platform.
pub trait Roster: Send + Sync {
    /// Guilds the game runs in.
    fn guilds(&self) -> impl Future<Output = Vec<GuildId>> + Send;

    /// Members holding the player role; they receive scheduled rolls.
    fn players(&self, guild: GuildId) -> impl Future<Output = Vec<PlayerId>> + Send;

    /// Members placed on the board when the guild resets (every non-bot member).
    fn participants(&self, guild: GuildId) -> impl Future<Output = Vec<PlayerId>> + Send;
}

/// Roster kept in memory.
///
/// # Example
///
/// ```
/// use snl_runtime::service::StaticRoster;
/// use snl_types::{GuildId, PlayerId};
///
/// let roster = StaticRoster::new();
/// roster.add_player(GuildId::new(1), PlayerId::new(10));
/// roster.add_member(GuildId::new(1), PlayerId::new(11));
/// assert_eq!(roster.member_count(GuildId::new(1)), 2);
/// ```
#[derive(Debug, Default)]
pub struct StaticRoster {
    // guild → member → holds the player role
    members: RwLock<BTreeMap<GuildId, BTreeMap<PlayerId, bool>>>,
}

impl StaticRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a roster where every player known to `state` holds the player role.
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        let roster = Self::new();
        for (guild, guild_state) in &state.guilds {
            for player in guild_state.players.keys() {
                roster.add_player(*guild, *player);
            }
        }
        roster
    }

    /// Adds a member holding the player role.
    pub fn add_player(&self, guild: GuildId, member: PlayerId) {
        self.members
            .write()
            .entry(guild)
            .or_default()
            .insert(member, true);
    }

    /// Adds a member without the player role. An existing role is kept.
    pub fn add_member(&self, guild: GuildId, member: PlayerId) {
        self.members
            .write()
            .entry(guild)
            .or_default()
            .entry(member)
            .or_insert(false);
    }

    /// Returns the number of members of a guild.
    #[must_use]
    pub fn member_count(&self, guild: GuildId) -> usize {
        self.members.read().get(&guild).map_or(0, BTreeMap::len)
    }
}

impl Roster for StaticRoster {
    async fn guilds(&self) -> Vec<GuildId> {
        self.members.read().keys().copied().collect()
    }

    async fn players(&self, guild: GuildId) -> Vec<PlayerId> {
        self.members
            .read()
            .get(&guild)
            .map(|m| m.iter().filter(|(_, role)| **role).map(|(p, _)| *p).collect())
            .unwrap_or_default()
    }

    async fn participants(&self, guild: GuildId) -> Vec<PlayerId> {
        self.members
            .read()
            .get(&guild)
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default()
    }
}
