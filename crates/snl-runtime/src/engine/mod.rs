//! Game-state engine.
//!
//! # Roll resolution
//!
//! ```text
//!  on podium? ──yes──► AlreadyFinished
//!      │no
//!  approved? ──no───► LockedPendingApproval
//!      │yes
//!  rolls > 0? ─no───► NoRollsLeft(wait)
//!      │yes
//!  roll 1..=6, max = live max tile
//!  candidate = bounce(position + roll, max)
//!  snake/ladder on candidate? ──► landing = end tile
//!      │
//!  landing == max? ──yes──► podium, rolls 0, approved ──► Finished
//!      │no
//!  rolls - 1, approved = false ──► Moved
//! ```
//!
//! # Concurrency
//!
//! Player operations run under a per-(guild, player) mutex while
//! holding the guild lock shared. Resets and grants hold the guild lock
//! exclusively. Every mutation is persisted before it becomes visible.

mod dice;
mod error;
mod game;
mod locks;
mod outcome;
pub mod rules;

pub use dice::{Clock, Dice, FixedClock, FixedDice, RandomDice, SystemClock};
pub use error::EngineError;
pub use game::{EngineSettings, GameEngine};
pub use outcome::{
    ApprovalOutcome, LeaderboardRow, Movement, PositionChange, ResetReport, RollOutcome,
    RollsChange, RollsView, StatusView, SubmissionReceipt,
};
