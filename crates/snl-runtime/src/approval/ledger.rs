//! Pending submission ledger.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use snl_event::OutstandingApproval;
use snl_types::{EvidenceRef, GuildId, PlayerId, TileRecord};
use std::collections::HashMap;

/// A submission waiting for moderator approval.
///
/// Tile metadata is captured at submission time, so later board edits
/// don't change what the moderator is asked to approve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSubmission {
    /// Guild of the submission.
    pub guild: GuildId,
    /// Submitting player.
    pub player: PlayerId,
    /// Player's position when submitting.
    pub tile: u32,
    /// Task of that tile.
    pub task: Option<String>,
    /// Target of that tile.
    pub target: Option<String>,
    /// Drop rate of that tile.
    pub drop_rate: Option<String>,
    /// Evidence message.
    pub evidence: EvidenceRef,
    /// When the submission was made.
    pub submitted_at: DateTime<Utc>,
}

impl PendingSubmission {
    /// Creates a submission for `tile`, copying metadata from `record` if known.
    #[must_use]
    pub fn new(
        guild: GuildId,
        player: PlayerId,
        tile: u32,
        record: Option<&TileRecord>,
        evidence: EvidenceRef,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            guild,
            player,
            tile,
            task: record.map(|r| r.task.clone()),
            target: record.map(|r| r.target.clone()),
            drop_rate: record.map(|r| r.drop_rate.clone()),
            evidence,
            submitted_at,
        }
    }

    /// Converts to an outstanding-approvals summary line.
    #[must_use]
    pub fn to_outstanding(&self) -> OutstandingApproval {
        OutstandingApproval {
            player: self.player,
            tile: self.tile,
            task: self.task.clone(),
            target: self.target.clone(),
            drop_rate: self.drop_rate.clone(),
            evidence: self.evidence.clone(),
        }
    }
}

/// Thread-safe map of pending submissions keyed by (guild, player).
///
/// A player has at most one pending submission; submitting again
/// replaces the previous one.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use snl_runtime::approval::{PendingSubmission, SubmissionLedger};
/// use snl_types::{EvidenceRef, GuildId, PlayerId};
///
/// let ledger = SubmissionLedger::new();
/// let guild = GuildId::new(1);
/// let player = PlayerId::new(2);
/// let evidence = EvidenceRef::new("msg-77");
///
/// ledger.insert(PendingSubmission::new(guild, player, 12, None, evidence.clone(), Utc::now()));
/// assert_eq!(ledger.find_by_evidence(guild, &evidence), Some(player));
///
/// assert!(ledger.remove(guild, player).is_some());
/// assert!(ledger.remove(guild, player).is_none());
/// ```
#[derive(Debug, Default)]
pub struct SubmissionLedger {
    pending: Mutex<HashMap<(GuildId, PlayerId), PendingSubmission>>,
}

impl SubmissionLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a submission, returning the one it replaced.
    pub fn insert(&self, submission: PendingSubmission) -> Option<PendingSubmission> {
        let key = (submission.guild, submission.player);
        self.pending.lock().insert(key, submission)
    }

    /// Returns the player's pending submission.
    #[must_use]
    pub fn get(&self, guild: GuildId, player: PlayerId) -> Option<PendingSubmission> {
        self.pending.lock().get(&(guild, player)).cloned()
    }

    /// Returns `true` if the player has a pending submission.
    #[must_use]
    pub fn contains(&self, guild: GuildId, player: PlayerId) -> bool {
        self.pending.lock().contains_key(&(guild, player))
    }

    /// Removes and returns the player's pending submission.
    pub fn remove(&self, guild: GuildId, player: PlayerId) -> Option<PendingSubmission> {
        self.pending.lock().remove(&(guild, player))
    }

    /// Finds the player whose pending submission carries `evidence`.
    #[must_use]
    pub fn find_by_evidence(&self, guild: GuildId, evidence: &EvidenceRef) -> Option<PlayerId> {
        self.pending
            .lock()
            .values()
            .find(|s| s.guild == guild && &s.evidence == evidence)
            .map(|s| s.player)
    }

    /// Returns a guild's pending submissions, oldest first.
    #[must_use]
    pub fn for_guild(&self, guild: GuildId) -> Vec<PendingSubmission> {
        let mut entries: Vec<_> = self
            .pending
            .lock()
            .values()
            .filter(|s| s.guild == guild)
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then(a.player.cmp(&b.player))
        });
        entries
    }

    /// Drops every pending submission of a guild. Returns how many were dropped.
    pub fn clear_guild(&self, guild: GuildId) -> usize {
        let mut pending = self.pending.lock();
        let before = pending.len();
        pending.retain(|(g, _), _| *g != guild);
        before - pending.len()
    }

    /// Returns the number of pending submissions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Copies every pending submission out.
    #[must_use]
    pub fn snapshot(&self) -> Vec<PendingSubmission> {
        let mut entries: Vec<_> = self.pending.lock().values().cloned().collect();
        entries.sort_by(|a, b| (a.guild, a.player).cmp(&(b.guild, b.player)));
        entries
    }

    /// Replaces the ledger contents.
    pub fn restore(&self, entries: Vec<PendingSubmission>) {
        let mut pending = self.pending.lock();
        pending.clear();
        for entry in entries {
            pending.insert((entry.guild, entry.player), entry);
        }
    }
}
