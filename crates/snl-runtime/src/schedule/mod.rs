//! Roll-grant scheduling.
//!
//! [`GrantClock`] knows where the boundaries are; [`GrantScheduler`]
//! sleeps until each one and fires the grant.

mod boundary;
mod scheduler;

pub use boundary::GrantClock;
pub use scheduler::GrantScheduler;
