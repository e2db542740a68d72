//! TOML board file directory.
//!
//! ```toml
//! [[tiles]]
//! tile = 1
//! task = "1x Dragon bones"
//! target = "Green dragons"
//! drop_rate = "Always"
//!
//! [[tiles]]
//! tile = 4
//! type = "Ladder"
//! end_tile = 14
//! ```

use super::{TileDirectory, TileError};
use serde::{Deserialize, Serialize};
use snl_types::{TileKind, TileRecord};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One `[[tiles]]` entry of a board file.
///
/// `type` is free text as typed by hosts ("Ladder", "snake", blank).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardTile {
    /// Tile number.
    pub tile: u32,
    /// Task text.
    pub task: String,
    /// Target text.
    pub target: String,
    /// Drop rate text.
    pub drop_rate: String,
    /// Tile type label.
    #[serde(rename = "type")]
    pub kind: String,
    /// Teleport destination.
    pub end_tile: Option<u32>,
    /// Image URL.
    pub image: Option<String>,
}

impl BoardTile {
    /// Converts to a [`TileRecord`].
    #[must_use]
    pub fn to_record(&self) -> TileRecord {
        TileRecord {
            tile: self.tile,
            task: self.task.clone(),
            target: self.target.clone(),
            drop_rate: self.drop_rate.clone(),
            kind: TileKind::from_label(&self.kind),
            end_tile: self.end_tile,
            image: self.image.clone().filter(|s| !s.is_empty()),
        }
    }
}

/// Parsed board file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardFile {
    /// Board tiles, in any order.
    pub tiles: Vec<BoardTile>,
}

impl BoardFile {
    /// Parses a board from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the text is malformed.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Finds a tile. The first entry wins when a number appears twice.
    #[must_use]
    pub fn find(&self, tile: u32) -> Option<TileRecord> {
        self.tiles
            .iter()
            .find(|t| t.tile == tile)
            .map(BoardTile::to_record)
    }

    /// Returns the highest tile number.
    #[must_use]
    pub fn max_tile(&self) -> Option<u32> {
        self.tiles.iter().map(|t| t.tile).max()
    }
}

/// [`TileDirectory`] backed by a TOML board file.
///
/// The file is re-read on every call, so hosts can edit the board while
/// a game is running, the way they edit a shared sheet.
///
/// # Example
///
/// ```no_run
/// use snl_runtime::tiles::{BoardFileDirectory, TileDirectory};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let board = BoardFileDirectory::new("board.toml");
/// let finish = board.max_tile().await?;
/// let tile = board.lookup(finish).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BoardFileDirectory {
    path: PathBuf,
}

impl BoardFileDirectory {
    /// Creates a directory reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the board file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<BoardFile, TileError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| TileError::read_board(&self.path, e))?;
        let board =
            BoardFile::from_toml(&text).map_err(|e| TileError::parse_board(&self.path, e))?;
        debug!(path = %self.path.display(), tiles = board.tiles.len(), "Read board file");
        Ok(board)
    }
}

impl TileDirectory for BoardFileDirectory {
    async fn lookup(&self, tile: u32) -> Result<Option<TileRecord>, TileError> {
        Ok(self.read().await?.find(tile))
    }

    async fn max_tile(&self) -> Result<u32, TileError> {
        self.read().await?.max_tile().ok_or(TileError::EmptyBoard)
    }
}
