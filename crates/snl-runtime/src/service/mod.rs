//! Trigger handling for a chat connector.
//!
//! ```text
//!  chat connector ──Trigger──► GameService ──► HostAuthority (host triggers)
//!                                  │
//!                                  ├──► GameEngine ──► StateStore / TileDirectory
//!                                  ├──► ResetGate (two-step reset)
//!                                  ├──► Roster (grants, resets)
//!                                  ▼
//!                   Vec<GameEvent> + broadcast::Sender<GameEvent>
//! ```

mod error;
mod reset;
mod roster;
#[allow(clippy::module_inception)]
mod service;

pub use error::ServiceError;
pub use reset::{PendingReset, ResetGate};
pub use roster::{Roster, StaticRoster};
pub use service::GameService;
