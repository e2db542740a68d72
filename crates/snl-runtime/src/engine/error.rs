//! Engine errors.
//!
//! Players being unable to roll is not an error; see
//! [`RollOutcome`](super::RollOutcome). These are failures the caller
//! must report or retry.

use crate::store::StorageError;
use crate::tiles::TileError;
use snl_types::ErrorCode;
use thiserror::Error;

/// Engine operation failure.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Snapshot could not be loaded or persisted. In-memory state is unchanged.
    #[error("state store failed: {0}")]
    Storage(#[from] StorageError),

    /// Tile directory could not answer a call that has no fallback.
    #[error("tile directory failed: {0}")]
    Directory(#[from] TileError),

    /// Board is smaller than one die roll.
    #[error("board max tile {max_tile} is below the minimum of {minimum}")]
    DegenerateBoard { max_tile: u32, minimum: u32 },

    /// Requested tile is past the end of the board.
    #[error("tile {tile} is beyond the last tile {max_tile}")]
    PositionOutOfRange { tile: u32, max_tile: u32 },
}

impl ErrorCode for EngineError {
    fn code(&self) -> &'static str {
        match self {
            Self::Storage(_) => "ENGINE_STORAGE",
            Self::Directory(_) => "ENGINE_DIRECTORY",
            Self::DegenerateBoard { .. } => "ENGINE_DEGENERATE_BOARD",
            Self::PositionOutOfRange { .. } => "ENGINE_POSITION_OUT_OF_RANGE",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_recoverable(),
            Self::Directory(e) => e.is_recoverable(),
            Self::DegenerateBoard { .. } | Self::PositionOutOfRange { .. } => false,
        }
    }
}
