//! Host privilege checks.
//!
//! Host commands (roll adjustments, moves, resets) and approval signals
//! are only honoured from members the [`HostAuthority`] accepts. The
//! policy is a trait so a chat connector can back it with guild roles
//! while tests and the CLI use a fixed list.

mod error;
mod hosts;

pub use error::AccessDenied;
pub use hosts::{ConfiguredHosts, HostAuthority, OpenAuthority};
