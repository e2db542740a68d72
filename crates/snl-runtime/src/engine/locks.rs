//! Guild and player lock table.
//!
//! ```text
//! guild RwLock   ── shared ──►  player Mutex  ──►  read-modify-write
//!                └─ exclusive (reset, grant)
//! ```
//!
//! Locks are always taken guild first, then player, so a reset waits
//! for in-flight player operations and blocks new ones.

use parking_lot::Mutex;
use snl_types::{GuildId, PlayerId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{
    Mutex as AsyncMutex, OwnedMutexGuard, OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock,
};

/// Held for the duration of a single-player operation.
pub(crate) struct PlayerGuard {
    // Field order is drop order: player first, then guild.
    _player: OwnedMutexGuard<()>,
    _guild: OwnedRwLockReadGuard<()>,
}

#[derive(Debug, Default)]
pub(crate) struct LockTable {
    guilds: Mutex<HashMap<GuildId, Arc<RwLock<()>>>>,
    players: Mutex<HashMap<(GuildId, PlayerId), Arc<AsyncMutex<()>>>>,
}

impl LockTable {
    fn guild_lock(&self, guild: GuildId) -> Arc<RwLock<()>> {
        Arc::clone(self.guilds.lock().entry(guild).or_default())
    }

    fn player_lock(&self, guild: GuildId, player: PlayerId) -> Arc<AsyncMutex<()>> {
        Arc::clone(self.players.lock().entry((guild, player)).or_default())
    }

    /// Takes the guild lock shared and the player lock exclusive.
    pub(crate) async fn player(&self, guild: GuildId, player: PlayerId) -> PlayerGuard {
        let guild_guard = self.guild_lock(guild).read_owned().await;
        let player_guard = self.player_lock(guild, player).lock_owned().await;
        PlayerGuard {
            _player: player_guard,
            _guild: guild_guard,
        }
    }

    /// Takes the guild lock exclusive.
    pub(crate) async fn guild_exclusive(&self, guild: GuildId) -> OwnedRwLockWriteGuard<()> {
        self.guild_lock(guild).write_owned().await
    }

    /// Drops the guild's player locks nobody holds or waits on.
    ///
    /// Call with the guild held exclusive; player locks are only fetched
    /// under the shared guild lock, so none can be handed out meanwhile.
    pub(crate) fn prune_players(&self, guild: GuildId) -> usize {
        let mut players = self.players.lock();
        let before = players.len();
        players.retain(|(g, _), lock| *g != guild || Arc::strong_count(lock) > 1);
        before - players.len()
    }

    #[cfg(test)]
    fn player_count(&self) -> usize {
        self.players.lock().len()
    }
}
