//! Submission approval tracking.
//!
//! When a player submits evidence for their tile, their roll is locked
//! and a [`PendingSubmission`] is recorded. A moderator's approval signal
//! (a reaction on the evidence message) is matched back to the player
//! through the evidence reference, never through message text.
//!
//! ```text
//! Player                SubmissionLedger               Moderator
//!   │ submit(evidence)         │                           │
//!   ├─────────────────────────►│ pending[(guild, player)]  │
//!   │                          │◄──────────────────────────┤ signal(evidence)
//!   │                          │ find_by_evidence → player │
//!   │      approved, unlocked  │ remove                    │
//!   │◄─────────────────────────┤                           │
//! ```
//!
//! The ledger lives in memory. Processes that restart between a submit
//! and its approval can carry it over with
//! [`SubmissionLedger::snapshot`] and [`SubmissionLedger::restore`].

mod ledger;

pub use ledger::{PendingSubmission, SubmissionLedger};
