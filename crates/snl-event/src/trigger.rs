//! Inbound triggers.

use crate::event::GrantBoundary;
use serde::{Deserialize, Serialize};
use snl_types::{EvidenceRef, GuildId, PlayerId};
use uuid::Uuid;

/// Something that happened outside the engine and needs handling.
///
/// Triggers arrive concurrently and in no particular order. Admin
/// triggers carry the acting member so the runtime can check host
/// privilege before touching state.
///
/// # Variants
///
/// | Trigger | Source | Privilege |
/// |---------|--------|-----------|
/// | `RollRequested` | player command | player |
/// | `SubmissionCreated` | player command | player |
/// | `ApprovalSignalReceived` | moderator reaction | host |
/// | `AdminAdjustRolls` | host command | host |
/// | `AdminSetPosition` | host command | host |
/// | `ResetRequested` | host command | host |
/// | `ResetConfirmed` | host button | host |
/// | `GrantTick` | scheduler | system |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    /// A player asked to roll the die.
    RollRequested {
        /// Guild the player rolled in.
        guild: GuildId,
        /// Rolling player.
        player: PlayerId,
    },

    /// A player posted evidence for their current tile.
    SubmissionCreated {
        /// Guild of the submission.
        guild: GuildId,
        /// Submitting player.
        player: PlayerId,
        /// Reference to the posted evidence message.
        evidence: EvidenceRef,
    },

    /// A moderator accepted posted evidence.
    ///
    /// The signal is keyed by the evidence reference, not by a mentioned
    /// member, so it works for evidence messages without mentions.
    ApprovalSignalReceived {
        /// Guild of the evidence.
        guild: GuildId,
        /// Member who gave the approval.
        moderator: PlayerId,
        /// Evidence that was approved.
        evidence: EvidenceRef,
    },

    /// A host added (positive) or removed (negative) rolls.
    AdminAdjustRolls {
        /// Guild of the player.
        guild: GuildId,
        /// Acting host.
        actor: PlayerId,
        /// Affected player.
        player: PlayerId,
        /// Rolls to add; negative removes.
        delta: i64,
    },

    /// A host moved a player to a tile.
    AdminSetPosition {
        /// Guild of the player.
        guild: GuildId,
        /// Acting host.
        actor: PlayerId,
        /// Affected player.
        player: PlayerId,
        /// New tile.
        tile: u32,
    },

    /// A host asked to reset the guild's game (first step).
    ResetRequested {
        /// Guild to reset.
        guild: GuildId,
        /// Acting host.
        actor: PlayerId,
    },

    /// A host confirmed a pending reset (second step).
    ResetConfirmed {
        /// Guild to reset.
        guild: GuildId,
        /// Acting host.
        actor: PlayerId,
        /// Token returned by the first step.
        token: Uuid,
    },

    /// The scheduler reached a grant boundary.
    GrantTick {
        /// Which boundary fired.
        boundary: GrantBoundary,
    },
}

impl Trigger {
    /// Returns the guild this trigger is scoped to, if any.
    ///
    /// Grant ticks apply to every guild and return `None`.
    #[must_use]
    pub fn guild(&self) -> Option<GuildId> {
        match self {
            Self::RollRequested { guild, .. }
            | Self::SubmissionCreated { guild, .. }
            | Self::ApprovalSignalReceived { guild, .. }
            | Self::AdminAdjustRolls { guild, .. }
            | Self::AdminSetPosition { guild, .. }
            | Self::ResetRequested { guild, .. }
            | Self::ResetConfirmed { guild, .. } => Some(*guild),
            Self::GrantTick { .. } => None,
        }
    }

    /// Returns `true` if handling requires host privilege.
    #[must_use]
    pub fn requires_host(&self) -> bool {
        matches!(
            self,
            Self::ApprovalSignalReceived { .. }
                | Self::AdminAdjustRolls { .. }
                | Self::AdminSetPosition { .. }
                | Self::ResetRequested { .. }
                | Self::ResetConfirmed { .. }
        )
    }

    /// Returns the member whose privilege a host trigger is checked against.
    #[must_use]
    pub fn actor(&self) -> Option<PlayerId> {
        match self {
            Self::ApprovalSignalReceived { moderator, .. } => Some(*moderator),
            Self::AdminAdjustRolls { actor, .. }
            | Self::AdminSetPosition { actor, .. }
            | Self::ResetRequested { actor, .. }
            | Self::ResetConfirmed { actor, .. } => Some(*actor),
            Self::RollRequested { .. } | Self::SubmissionCreated { .. } | Self::GrantTick { .. } => {
                None
            }
        }
    }

    /// Returns the trigger's snake_case name, as used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RollRequested { .. } => "roll_requested",
            Self::SubmissionCreated { .. } => "submission_created",
            Self::ApprovalSignalReceived { .. } => "approval_signal_received",
            Self::AdminAdjustRolls { .. } => "admin_adjust_rolls",
            Self::AdminSetPosition { .. } => "admin_set_position",
            Self::ResetRequested { .. } => "reset_requested",
            Self::ResetConfirmed { .. } => "reset_confirmed",
            Self::GrantTick { .. } => "grant_tick",
        }
    }
}
