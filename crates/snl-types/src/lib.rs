//! Core types for the snl game crates.
//!
//! This crate holds the vocabulary shared by every layer of the
//! workspace: identifiers, board tile records, and the [`ErrorCode`]
//! interface implemented by all error types.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  snl-types   : GuildId, PlayerId, TileRecord, ErrorCode ◄── │
//! │  snl-event   : Trigger (inbound), GameEvent (outbound)      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  snl-runtime : config, store, tiles, engine, schedule       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  snl-cli     : `snl` binary                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Identifier Design
//!
//! Guilds and players are identified by the chat platform's 64-bit
//! snowflake ids. They are wrapped in distinct newtypes so a player id
//! can never be passed where a guild id is expected.
//!
//! # Example
//!
//! ```
//! use snl_types::{GuildId, PlayerId, TileKind, TileRecord};
//!
//! let guild = GuildId::new(1);
//! let player = PlayerId::new(42);
//! assert_ne!(guild.get(), player.get());
//!
//! let ladder = TileRecord::new(4, TileKind::Ladder).with_end_tile(14);
//! assert_eq!(ladder.teleport_target(), Some(14));
//! ```

mod error;
mod id;
mod tile;

pub use error::{assert_error_code, ErrorCode};
pub use id::{EvidenceRef, GuildId, ParseIdError, PlayerId};
pub use tile::{TileKind, TileRecord};

/// Lowest face of the game die.
pub const DIE_MIN: u32 = 1;

/// Highest face of the game die.
///
/// Boards smaller than this are degenerate: a single roll can overshoot
/// the whole board.
pub const DIE_MAX: u32 = 6;
