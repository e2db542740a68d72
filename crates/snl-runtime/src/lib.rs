//! Snakes and Ladders runtime.
//!
//! Game-state engine, persistence, tile access and roll-grant scheduling
//! for a Snakes and Ladders event run in chat guilds.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  snl-types  : GuildId, PlayerId, TileRecord, ErrorCode      │
//! │  snl-event  : Trigger (inbound), GameEvent (outbound)       │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Runtime Layer (THIS CRATE)                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  service/  : GameService, Roster, ResetGate                 │
//! │  schedule/ : GrantClock, GrantScheduler                     │
//! │  engine/   : GameEngine, rules, Dice, Clock                 │
//! │  approval/ : SubmissionLedger                               │
//! │  auth/     : HostAuthority                                  │
//! │  tiles/    : TileDirectory, BoardFileDirectory              │
//! │  store/    : StateStore, LocalFileStore, GameState          │
//! │  config/   : SnlConfig, ConfigLoader                        │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  snl-cli   : `snl` binary                                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! ## [`engine`] - Game rules
//!
//! - [`GameEngine`](engine::GameEngine): rolls, approvals, host operations
//! - [`rules`](engine::rules): bounce-back and snake/ladder landing
//!
//! ## [`service`] - Trigger handling
//!
//! - [`GameService`](service::GameService): `Trigger` → engine → `GameEvent`
//!
//! ## [`schedule`] - Roll grants
//!
//! - [`GrantScheduler`](schedule::GrantScheduler): fires at local midnight and midday
//!
//! ## [`store`] - Persistence
//!
//! - [`LocalFileStore`](store::LocalFileStore): atomic JSON snapshot file

pub mod approval;
pub mod auth;
pub mod config;
pub mod engine;
pub mod schedule;
pub mod service;
pub mod store;
pub mod tiles;

pub use config::{ConfigError, ConfigLoader, SnlConfig};
pub use engine::{EngineError, GameEngine, RollOutcome, StatusView};
pub use service::{GameService, ServiceError};
pub use store::{LocalFileStore, StateStore, StorageError};
pub use tiles::{BoardFileDirectory, TileDirectory, TileError};
