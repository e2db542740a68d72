//! Two-step reset confirmation.

use super::ServiceError;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use snl_types::{GuildId, PlayerId};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// A reset waiting for confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReset {
    /// Confirmation token.
    pub token: Uuid,
    /// Guild to reset.
    pub guild: GuildId,
    /// Host who asked.
    pub actor: PlayerId,
    /// Last instant the token is accepted.
    pub expires_at: DateTime<Utc>,
}

/// Issues and redeems single-use reset tokens.
///
/// A reset only happens when a token issued for the same guild is
/// redeemed before it expires. Redeeming consumes the token whether or
/// not it was still valid.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use snl_runtime::service::ResetGate;
/// use snl_types::{GuildId, PlayerId};
/// use std::time::Duration;
///
/// let gate = ResetGate::new(Duration::from_secs(30));
/// let now = Utc::now();
/// let pending = gate.issue(GuildId::new(1), PlayerId::new(9), now);
///
/// assert!(gate.redeem(GuildId::new(1), pending.token, now).is_ok());
/// assert!(gate.redeem(GuildId::new(1), pending.token, now).is_err());
/// ```
#[derive(Debug)]
pub struct ResetGate {
    window: Duration,
    pending: Mutex<HashMap<Uuid, PendingReset>>,
}

impl ResetGate {
    /// Creates a gate whose tokens live for `window`.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the confirmation window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Issues a token for `guild`.
    pub fn issue(&self, guild: GuildId, actor: PlayerId, now: DateTime<Utc>) -> PendingReset {
        let window = chrono::Duration::from_std(self.window).unwrap_or(chrono::Duration::zero());
        let pending = PendingReset {
            token: Uuid::new_v4(),
            guild,
            actor,
            expires_at: now + window,
        };

        let mut map = self.pending.lock();
        map.retain(|_, p| p.expires_at >= now);
        map.insert(pending.token, pending.clone());
        debug!(%guild, %actor, token = %pending.token, "Reset token issued");
        pending
    }

    /// Consumes a token.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::UnknownResetToken`] if the token was never
    /// issued for `guild` or was already used, and
    /// [`ServiceError::ResetTokenExpired`] if it is past its window.
    pub fn redeem(
        &self,
        guild: GuildId,
        token: Uuid,
        now: DateTime<Utc>,
    ) -> Result<PendingReset, ServiceError> {
        let mut map = self.pending.lock();
        match map.get(&token) {
            Some(p) if p.guild == guild => {}
            _ => return Err(ServiceError::UnknownResetToken(token)),
        }
        let Some(pending) = map.remove(&token) else {
            return Err(ServiceError::UnknownResetToken(token));
        };
        if now > pending.expires_at {
            return Err(ServiceError::ResetTokenExpired {
                token,
                expired_at: pending.expires_at,
            });
        }
        Ok(pending)
    }

    /// Number of outstanding tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Returns `true` if no token is outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Copies outstanding tokens out.
    #[must_use]
    pub fn snapshot(&self) -> Vec<PendingReset> {
        let mut entries: Vec<_> = self.pending.lock().values().cloned().collect();
        entries.sort_by_key(|p| p.expires_at);
        entries
    }

    /// Replaces outstanding tokens.
    pub fn restore(&self, entries: Vec<PendingReset>) {
        let mut map = self.pending.lock();
        map.clear();
        map.extend(entries.into_iter().map(|p| (p.token, p)));
    }
}
