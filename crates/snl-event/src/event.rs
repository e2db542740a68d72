//! Outbound game events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snl_types::{EvidenceRef, GuildId, PlayerId, TileRecord};
use std::time::Duration;
use uuid::Uuid;

/// One of the two daily roll-grant boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantBoundary {
    /// Local 00:00.
    Midnight,
    /// Local 12:00.
    Midday,
}

impl GrantBoundary {
    /// Local hour at which this boundary fires.
    #[must_use]
    pub fn hour(self) -> u32 {
        match self {
            Self::Midnight => 0,
            Self::Midday => 12,
        }
    }

    /// Returns the boundary that follows this one.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Midnight => Self::Midday,
            Self::Midday => Self::Midnight,
        }
    }
}

/// Why a roll request was refused.
///
/// Denials are ordinary outcomes, not errors: the player simply cannot
/// roll right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DenyReason {
    /// The player is already on the podium.
    AlreadyFinished {
        /// 1-based finishing position.
        rank: usize,
    },
    /// The player's last tile still awaits moderator approval.
    LockedPendingApproval,
    /// The player has no rolls left.
    NoRollsLeft {
        /// Time until the next scheduled grant.
        wait: Duration,
    },
}

/// One line of the outstanding-approvals summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingApproval {
    /// Player awaiting approval.
    pub player: PlayerId,
    /// Tile the submission was made for.
    pub tile: u32,
    /// Task of that tile.
    pub task: Option<String>,
    /// Target of that tile.
    pub target: Option<String>,
    /// Drop rate of that tile.
    pub drop_rate: Option<String>,
    /// Evidence message to jump to.
    pub evidence: EvidenceRef,
}

/// A structured notification for the chat layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A player moved to a new tile.
    PlayerMoved {
        /// Guild of the player.
        guild: GuildId,
        /// Player who rolled.
        player: PlayerId,
        /// Die value.
        roll: u32,
        /// Position before the roll.
        from_tile: u32,
        /// Snake or ladder tile passed through, if any.
        via_tile: Option<u32>,
        /// Final position.
        to_tile: u32,
        /// Slid down a snake.
        is_snake: bool,
        /// Climbed a ladder.
        is_ladder: bool,
        /// Metadata of the landing tile; absent when the tile source failed.
        tile: Option<TileRecord>,
    },

    /// A player reached the final tile.
    PlayerFinished {
        /// Guild of the player.
        guild: GuildId,
        /// Finishing player.
        player: PlayerId,
        /// Die value of the finishing roll.
        roll: u32,
        /// 1-based podium position.
        rank: usize,
    },

    /// A roll request was refused.
    RollDenied {
        /// Guild of the player.
        guild: GuildId,
        /// Player who asked.
        player: PlayerId,
        /// Why.
        reason: DenyReason,
    },

    /// A submission was recorded and awaits approval.
    SubmissionReceived {
        /// Guild of the submission.
        guild: GuildId,
        /// Submitting player.
        player: PlayerId,
        /// Tile the submission was made for.
        tile: u32,
        /// Posted evidence.
        evidence: EvidenceRef,
    },

    /// A submission was approved.
    ApprovalGranted {
        /// Guild of the player.
        guild: GuildId,
        /// Approved player.
        player: PlayerId,
        /// Approving moderator, if known.
        moderator: Option<PlayerId>,
        /// Whether the player has a roll available right now.
        can_roll_now: bool,
        /// Time until the next grant when no roll is available.
        wait: Option<Duration>,
    },

    /// Scheduled rolls were granted in a guild.
    DailyRollsGranted {
        /// Guild that received rolls.
        guild: GuildId,
        /// Boundary that fired.
        boundary: GrantBoundary,
        /// Number of players who received a roll.
        players: usize,
        /// When the following grant happens.
        next_grant_at: DateTime<Utc>,
    },

    /// A host changed a player's roll count.
    RollsAdjusted {
        /// Guild of the player.
        guild: GuildId,
        /// Acting host.
        actor: PlayerId,
        /// Affected player.
        player: PlayerId,
        /// Requested change.
        delta: i64,
        /// Roll count after the change.
        rolls: u32,
    },

    /// A host moved a player.
    PositionSet {
        /// Guild of the player.
        guild: GuildId,
        /// Acting host.
        actor: PlayerId,
        /// Affected player.
        player: PlayerId,
        /// Previous position.
        from_tile: u32,
        /// New position.
        to_tile: u32,
    },

    /// A reset awaits confirmation.
    ResetPending {
        /// Guild to reset.
        guild: GuildId,
        /// Token to confirm with.
        token: Uuid,
        /// When the token stops being accepted.
        expires_at: DateTime<Utc>,
    },

    /// The guild's game was reset.
    GameReset {
        /// Reset guild.
        guild: GuildId,
        /// Number of participants placed back on the start tile.
        participants: usize,
    },

    /// The set of unapproved submissions changed.
    OutstandingApprovalsChanged {
        /// Guild of the submissions.
        guild: GuildId,
        /// Current outstanding entries; empty when all are approved.
        entries: Vec<OutstandingApproval>,
    },
}

impl GameEvent {
    /// Returns the guild the event belongs to.
    #[must_use]
    pub fn guild(&self) -> GuildId {
        match self {
            Self::PlayerMoved { guild, .. }
            | Self::PlayerFinished { guild, .. }
            | Self::RollDenied { guild, .. }
            | Self::SubmissionReceived { guild, .. }
            | Self::ApprovalGranted { guild, .. }
            | Self::DailyRollsGranted { guild, .. }
            | Self::RollsAdjusted { guild, .. }
            | Self::PositionSet { guild, .. }
            | Self::ResetPending { guild, .. }
            | Self::GameReset { guild, .. }
            | Self::OutstandingApprovalsChanged { guild, .. } => *guild,
        }
    }

    /// Returns the snake_case event name used in logs and JSON.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlayerMoved { .. } => "player_moved",
            Self::PlayerFinished { .. } => "player_finished",
            Self::RollDenied { .. } => "roll_denied",
            Self::SubmissionReceived { .. } => "submission_received",
            Self::ApprovalGranted { .. } => "approval_granted",
            Self::DailyRollsGranted { .. } => "daily_rolls_granted",
            Self::RollsAdjusted { .. } => "rolls_adjusted",
            Self::PositionSet { .. } => "position_set",
            Self::ResetPending { .. } => "reset_pending",
            Self::GameReset { .. } => "game_reset",
            Self::OutstandingApprovalsChanged { .. } => "outstanding_approvals_changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_alternates() {
        assert_eq!(GrantBoundary::Midnight.next(), GrantBoundary::Midday);
        assert_eq!(GrantBoundary::Midday.next(), GrantBoundary::Midnight);
        assert_eq!(GrantBoundary::Midday.hour(), 12);
    }

    #[test]
    fn event_name_matches_serde_tag() {
        let event = GameEvent::GameReset {
            guild: GuildId::new(3),
            participants: 4,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.name());
    }

    #[test]
    fn deny_reason_serializes_wait() {
        let reason = DenyReason::NoRollsLeft {
            wait: Duration::from_secs(90),
        };
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["reason"], "no_rolls_left");
        assert_eq!(json["wait"]["secs"], 90);
    }
}
