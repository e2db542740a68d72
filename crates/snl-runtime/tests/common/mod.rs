//! Shared fixtures for runtime integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use snl_runtime::engine::{FixedClock, FixedDice, GameEngine};
use snl_runtime::schedule::GrantClock;
use snl_runtime::store::MemoryStateStore;
use snl_runtime::tiles::MemoryTileDirectory;
use snl_types::{GuildId, PlayerId, TileKind, TileRecord};
use std::sync::Arc;
use std::time::Duration;

pub type TestEngine = GameEngine<MemoryStateStore, MemoryTileDirectory>;

pub const GUILD: GuildId = GuildId::new(100);
pub const OTHER_GUILD: GuildId = GuildId::new(200);
pub const ALICE: PlayerId = PlayerId::new(1);
pub const BOB: PlayerId = PlayerId::new(2);
pub const CAROL: PlayerId = PlayerId::new(3);
pub const HOST: PlayerId = PlayerId::new(900);

/// 2025-07-10 08:00 in Melbourne (AEST, UTC+10).
pub fn morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 9, 22, 0, 0).unwrap()
}

/// Time from [`morning`] to the midday grant.
pub const UNTIL_MIDDAY: Duration = Duration::from_secs(4 * 3600);

/// 100-tile board with a ladder 97 → 55 and a snake 30 → 3.
pub fn standard_board() -> MemoryTileDirectory {
    let board = MemoryTileDirectory::with_plain_tiles(100);
    board.insert(
        TileRecord::new(97, TileKind::Ladder)
            .with_end_tile(55)
            .with_task("Climb")
            .with_target("Ladder"),
    );
    board.insert(TileRecord::new(30, TileKind::Snake).with_end_tile(3));
    board
}

pub fn setup(board: MemoryTileDirectory, dice: FixedDice) -> (TestEngine, Arc<FixedClock>) {
    setup_with_store(MemoryStateStore::new(), board, dice)
}

pub fn setup_with_store(
    store: MemoryStateStore,
    board: MemoryTileDirectory,
    dice: FixedDice,
) -> (TestEngine, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(morning()));
    let engine = GameEngine::new(
        store,
        board,
        GrantClock::new(chrono_tz::Australia::Melbourne),
    )
    .with_dice(dice)
    .with_clock(clock.clone());
    (engine, clock)
}
