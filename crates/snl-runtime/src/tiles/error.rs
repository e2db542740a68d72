//! Tile directory errors.

use snl_types::ErrorCode;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors from a tile directory.
#[derive(Debug, Error)]
pub enum TileError {
    /// The tile source could not be reached.
    #[error("tile source unavailable: {0}")]
    Unavailable(String),

    /// The lookup did not finish within the configured bound.
    #[error("tile lookup timed out after {0:?}")]
    Timeout(Duration),

    /// Failed to read the board file.
    #[error("failed to read board file '{path}': {source}")]
    ReadBoard {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The board file is not valid TOML.
    #[error("failed to parse board file '{path}': {source}")]
    ParseBoard {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The board has no tiles.
    #[error("board has no tiles")]
    EmptyBoard,
}

impl TileError {
    /// Creates a read board error.
    pub fn read_board(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadBoard {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse board error.
    pub fn parse_board(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ParseBoard {
            path: path.into(),
            source,
        }
    }
}

impl ErrorCode for TileError {
    fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "TILE_UNAVAILABLE",
            Self::Timeout(_) => "TILE_TIMEOUT",
            Self::ReadBoard { .. } => "TILE_READ_BOARD",
            Self::ParseBoard { .. } => "TILE_PARSE_BOARD",
            Self::EmptyBoard => "TILE_EMPTY_BOARD",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::Timeout(_) | Self::ReadBoard { .. }
        )
    }
}
