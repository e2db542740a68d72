//! Board tile records.
//!
//! Tiles are owned by the external tile directory; the engine only
//! reads them. A tile is either a plain task tile or a teleport
//! (snake or ladder) that moves the player to `end_tile`.

use serde::{Deserialize, Serialize};

/// Type of a board tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    /// Plain task tile.
    #[default]
    Normal,
    /// Slides the player down to `end_tile`.
    Snake,
    /// Lifts the player up to `end_tile`.
    Ladder,
}

impl TileKind {
    /// Returns `true` for snakes and ladders.
    #[must_use]
    pub fn is_teleport(self) -> bool {
        matches!(self, Self::Snake | Self::Ladder)
    }

    /// Parses a kind from free text, case-insensitively.
    ///
    /// Anything that is not "snake" or "ladder" is a normal tile, which
    /// matches how hand-maintained board sheets are usually filled in.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "snake" => Self::Snake,
            "ladder" => Self::Ladder,
            _ => Self::Normal,
        }
    }
}

/// Metadata of one board tile.
///
/// # Example
///
/// ```
/// use snl_types::{TileKind, TileRecord};
///
/// let tile = TileRecord::new(12, TileKind::Normal)
///     .with_task("1x Dragon bones")
///     .with_target("Green dragons")
///     .with_drop_rate("Always");
/// assert_eq!(tile.teleport_target(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    /// Tile number on the board.
    pub tile: u32,
    /// Task the player must complete.
    #[serde(default)]
    pub task: String,
    /// Target (monster, activity) of the task.
    #[serde(default)]
    pub target: String,
    /// Human-readable drop rate.
    #[serde(default)]
    pub drop_rate: String,
    /// Tile type.
    #[serde(default)]
    pub kind: TileKind,
    /// Destination tile; only meaningful for snakes and ladders.
    #[serde(default)]
    pub end_tile: Option<u32>,
    /// Optional image URL.
    #[serde(default)]
    pub image: Option<String>,
}

impl TileRecord {
    /// Creates a record with empty task metadata.
    #[must_use]
    pub fn new(tile: u32, kind: TileKind) -> Self {
        Self {
            tile,
            task: String::new(),
            target: String::new(),
            drop_rate: String::new(),
            kind,
            end_tile: None,
            image: None,
        }
    }

    /// Sets the task.
    #[must_use]
    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = task.into();
        self
    }

    /// Sets the target.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Sets the drop rate.
    #[must_use]
    pub fn with_drop_rate(mut self, drop_rate: impl Into<String>) -> Self {
        self.drop_rate = drop_rate.into();
        self
    }

    /// Sets the teleport destination.
    #[must_use]
    pub fn with_end_tile(mut self, end_tile: u32) -> Self {
        self.end_tile = Some(end_tile);
        self
    }

    /// Sets the image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Returns the destination tile if this tile teleports the player.
    ///
    /// A snake or ladder without an end tile behaves like a normal tile.
    #[must_use]
    pub fn teleport_target(&self) -> Option<u32> {
        if self.kind.is_teleport() {
            self.end_tile
        } else {
            None
        }
    }

    /// Returns the image URL if it looks like a web link.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image
            .as_deref()
            .filter(|url| url.starts_with("http"))
    }
}
