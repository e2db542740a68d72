//! Engine operation results.

use crate::approval::PendingSubmission;
use serde::{Deserialize, Serialize};
use snl_event::{DenyReason, GameEvent, OutstandingApproval};
use snl_types::{GuildId, PlayerId, TileRecord};
use std::time::Duration;

/// A completed move that did not finish the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// Die value.
    pub roll: u32,
    /// Position before the roll.
    pub from_tile: u32,
    /// Snake or ladder tile passed through.
    pub via_tile: Option<u32>,
    /// Final position.
    pub to_tile: u32,
    /// Slid down a snake.
    pub is_snake: bool,
    /// Climbed a ladder.
    pub is_ladder: bool,
    /// Landing tile metadata; `None` when the tile source failed.
    pub tile: Option<TileRecord>,
}

/// Result of a roll request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RollOutcome {
    /// Player is already on the podium.
    AlreadyFinished { rank: usize },
    /// Last tile awaits approval.
    LockedPendingApproval,
    /// No rolls left.
    NoRollsLeft { wait: Duration },
    /// Player reached the final tile.
    Finished { roll: u32, rank: usize },
    /// Player moved.
    Moved(Movement),
}

impl RollOutcome {
    /// Returns the denial reason if the roll did not happen.
    #[must_use]
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::AlreadyFinished { rank } => Some(DenyReason::AlreadyFinished { rank: *rank }),
            Self::LockedPendingApproval => Some(DenyReason::LockedPendingApproval),
            Self::NoRollsLeft { wait } => Some(DenyReason::NoRollsLeft { wait: *wait }),
            Self::Finished { .. } | Self::Moved(_) => None,
        }
    }

    /// Converts to the outbound event for `player` in `guild`.
    #[must_use]
    pub fn to_event(&self, guild: GuildId, player: PlayerId) -> GameEvent {
        match self {
            Self::Finished { roll, rank } => GameEvent::PlayerFinished {
                guild,
                player,
                roll: *roll,
                rank: *rank,
            },
            Self::Moved(m) => GameEvent::PlayerMoved {
                guild,
                player,
                roll: m.roll,
                from_tile: m.from_tile,
                via_tile: m.via_tile,
                to_tile: m.to_tile,
                is_snake: m.is_snake,
                is_ladder: m.is_ladder,
                tile: m.tile.clone(),
            },
            Self::AlreadyFinished { rank } => GameEvent::RollDenied {
                guild,
                player,
                reason: DenyReason::AlreadyFinished { rank: *rank },
            },
            Self::LockedPendingApproval => GameEvent::RollDenied {
                guild,
                player,
                reason: DenyReason::LockedPendingApproval,
            },
            Self::NoRollsLeft { wait } => GameEvent::RollDenied {
                guild,
                player,
                reason: DenyReason::NoRollsLeft { wait: *wait },
            },
        }
    }
}

/// What a player sees when asking where they are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusView {
    /// Last tile approved; nothing to do until the next roll.
    NoActiveTile {
        rolls: u32,
        /// Set when `rolls` is zero.
        next_grant_in: Option<Duration>,
    },
    /// On the start tile after a reset.
    AtStart,
    /// Working on a tile that awaits approval.
    ActiveTile {
        tile: u32,
        record: Option<TileRecord>,
    },
    /// Finished this game.
    Finished { rank: usize },
}

/// Roll balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollsView {
    /// Rolls available.
    pub rolls: u32,
    /// Time until the next grant.
    pub next_grant_in: Duration,
}

/// Result of recording a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// The recorded submission.
    pub submission: PendingSubmission,
    /// Whether an earlier pending submission was replaced.
    pub replaced: bool,
    /// Every pending submission of the guild whose player is still locked.
    pub outstanding: Vec<OutstandingApproval>,
}

/// Result of an approval that changed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalOutcome {
    /// Approved player.
    pub player: PlayerId,
    /// Whether the player can roll right away.
    pub can_roll_now: bool,
    /// Time until the next grant boundary.
    pub wait: Duration,
    /// The submission that was approved.
    pub submission: PendingSubmission,
    /// Pending submissions left in the guild.
    pub outstanding: Vec<OutstandingApproval>,
}

/// Roll count change made by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollsChange {
    /// Rolls before.
    pub before: u32,
    /// Rolls after.
    pub after: u32,
}

/// Position change made by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionChange {
    /// Previous position.
    pub from_tile: u32,
    /// New position.
    pub to_tile: u32,
}

/// Result of a guild reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetReport {
    /// Participants placed on the start tile.
    pub participants: usize,
    /// Pending submissions discarded.
    pub discarded_submissions: usize,
}

/// One leaderboard line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    /// Player.
    pub player: PlayerId,
    /// Current tile.
    pub tile: u32,
    /// Target on that tile.
    pub target: String,
    /// Task on that tile.
    pub task: String,
    /// Rolls available.
    pub rolls: u32,
}
