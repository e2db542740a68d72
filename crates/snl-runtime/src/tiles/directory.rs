//! Tile directory abstraction.

use super::TileError;
use snl_types::TileRecord;
use std::future::Future;

/// Read-only access to the board's tiles.
///
/// Both calls may be slow and may fail transiently. The board can change
/// between calls (hosts edit it while a game runs), so callers must not
/// cache [`max_tile`](Self::max_tile).
pub trait TileDirectory: Send + Sync {
    /// Looks up one tile. `Ok(None)` means the board has no such tile.
    fn lookup(
        &self,
        tile: u32,
    ) -> impl Future<Output = Result<Option<TileRecord>, TileError>> + Send;

    /// Returns the highest tile number on the board (the finish tile).
    fn max_tile(&self) -> impl Future<Output = Result<u32, TileError>> + Send;
}
