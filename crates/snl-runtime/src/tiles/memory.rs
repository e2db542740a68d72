//! In-memory tile directory.

use super::{TileDirectory, TileError};
use parking_lot::RwLock;
use snl_types::{TileKind, TileRecord};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Thread-safe in-memory [`TileDirectory`].
///
/// The board can be edited while in use, failures can be injected, and
/// an artificial delay can simulate a slow remote source.
///
/// # Example
///
/// ```
/// use snl_runtime::tiles::MemoryTileDirectory;
/// use snl_types::{TileKind, TileRecord};
///
/// let board = MemoryTileDirectory::with_plain_tiles(100);
/// board.insert(TileRecord::new(97, TileKind::Ladder).with_end_tile(55));
/// assert_eq!(board.tile_count(), 100);
/// ```
#[derive(Debug, Default)]
pub struct MemoryTileDirectory {
    tiles: RwLock<BTreeMap<u32, TileRecord>>,
    failing: AtomicBool,
    delay: RwLock<Option<Duration>>,
    lookups: AtomicUsize,
}

impl MemoryTileDirectory {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board of plain tiles numbered `1..=max_tile`.
    #[must_use]
    pub fn with_plain_tiles(max_tile: u32) -> Self {
        let board = Self::new();
        {
            let mut tiles = board.tiles.write();
            for n in 1..=max_tile {
                tiles.insert(
                    n,
                    TileRecord::new(n, TileKind::Normal)
                        .with_task(format!("Task {n}"))
                        .with_target(format!("Target {n}")),
                );
            }
        }
        board
    }

    /// Adds or replaces a tile.
    pub fn insert(&self, record: TileRecord) {
        self.tiles.write().insert(record.tile, record);
    }

    /// Removes a tile.
    pub fn remove(&self, tile: u32) {
        self.tiles.write().remove(&tile);
    }

    /// Makes every following call fail until turned off again.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Delays every following call.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write() = delay;
    }

    /// Returns the number of tiles.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.read().len()
    }

    /// Returns how many calls were made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> Result<(), TileError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(TileError::Unavailable("failure injected".into()));
        }
        Ok(())
    }
}

impl TileDirectory for MemoryTileDirectory {
    async fn lookup(&self, tile: u32) -> Result<Option<TileRecord>, TileError> {
        self.enter().await?;
        Ok(self.tiles.read().get(&tile).cloned())
    }

    async fn max_tile(&self) -> Result<u32, TileError> {
        self.enter().await?;
        self.tiles
            .read()
            .keys()
            .next_back()
            .copied()
            .ok_or(TileError::EmptyBoard)
    }
}
