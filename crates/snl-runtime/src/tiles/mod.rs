//! Tile directory access.
//!
//! The board's tiles live outside the engine (originally a shared
//! spreadsheet maintained by the event hosts). The engine reads them
//! through [`TileDirectory`] and treats every call as a slow remote
//! lookup that may fail.
//!
//! | Implementation | Source | Use |
//! |----------------|--------|-----|
//! | [`BoardFileDirectory`] | TOML board file, re-read per call | CLI / small deployments |
//! | [`MemoryTileDirectory`] | in-process map | tests |

mod board_file;
mod directory;
mod error;
mod memory;

pub use board_file::{BoardFile, BoardFileDirectory, BoardTile};
pub use directory::TileDirectory;
pub use error::TileError;
pub use memory::MemoryTileDirectory;
