//! Event layer for the snl game engine.
//!
//! The engine sits between a chat connector and its own state. Everything
//! that crosses that boundary is a plain structured value defined here:
//!
//! ```text
//! ┌──────────────┐  Trigger    ┌──────────────┐  GameEvent  ┌──────────────┐
//! │  Chat layer  │ ──────────► │  GameService │ ──────────► │  Chat layer  │
//! │ (commands,   │             │  (runtime)   │             │ (rendering)  │
//! │  reactions)  │             └──────────────┘             └──────────────┘
//! └──────────────┘                    ▲
//!                                     │ Trigger::GrantTick
//!                              ┌──────────────┐
//!                              │GrantScheduler│
//!                              └──────────────┘
//! ```
//!
//! Rendering (message text, embeds, mentions) is entirely the chat
//! layer's responsibility; events carry data only.
//!
//! # Example
//!
//! ```
//! use snl_event::{DenyReason, GameEvent};
//! use snl_types::{GuildId, PlayerId};
//!
//! let event = GameEvent::RollDenied {
//!     guild: GuildId::new(1),
//!     player: PlayerId::new(2),
//!     reason: DenyReason::LockedPendingApproval,
//! };
//! assert_eq!(event.guild(), GuildId::new(1));
//! assert_eq!(event.name(), "roll_denied");
//! ```

mod event;
mod trigger;

pub use event::{DenyReason, GameEvent, GrantBoundary, OutstandingApproval};
pub use trigger::Trigger;
