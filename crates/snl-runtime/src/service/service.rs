//! Trigger dispatch.

use super::{ResetGate, Roster, ServiceError};
use crate::auth::HostAuthority;
use crate::engine::GameEngine;
use crate::store::StateStore;
use crate::tiles::TileDirectory;
use snl_event::{GameEvent, GrantBoundary, Trigger};
use snl_types::{EvidenceRef, GuildId, PlayerId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Capacity of the outbound event channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Maps inbound [`Trigger`]s to engine operations and outbound [`GameEvent`]s.
///
/// Every handled trigger returns the events it produced and also
/// publishes them to subscribers, so a chat connector can listen on one
/// channel while a command handler answers from the return value.
///
/// Host triggers are checked against the [`HostAuthority`] first. An
/// approval signal from a non-host is dropped silently, like a stray
/// reaction; other host triggers from a non-host are refused with
/// [`ServiceError::Denied`].
pub struct GameService<S, D, R, A> {
    engine: Arc<GameEngine<S, D>>,
    roster: R,
    authority: A,
    resets: ResetGate,
    events: broadcast::Sender<GameEvent>,
}

impl<S, D, R, A> std::fmt::Debug for GameService<S, D, R, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameService")
            .field("engine", &self.engine)
            .field("resets", &self.resets)
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}

impl<S, D, R, A> GameService<S, D, R, A>
where
    S: StateStore,
    D: TileDirectory,
    R: Roster,
    A: HostAuthority,
{
    /// Creates a service. Reset tokens live for `reset_window`.
    #[must_use]
    pub fn new(
        engine: Arc<GameEngine<S, D>>,
        roster: R,
        authority: A,
        reset_window: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            engine,
            roster,
            authority,
            resets: ResetGate::new(reset_window),
            events,
        }
    }

    /// Returns the engine.
    pub fn engine(&self) -> &Arc<GameEngine<S, D>> {
        &self.engine
    }

    /// Returns the roster.
    pub fn roster(&self) -> &R {
        &self.roster
    }

    /// Returns the reset gate.
    pub fn resets(&self) -> &ResetGate {
        &self.resets
    }

    /// Subscribes to outbound events.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// Handles one trigger.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Denied`] for host triggers from non-hosts,
    /// reset token errors for bad confirmations, and engine errors when
    /// state could not be persisted.
    pub async fn handle(&self, trigger: Trigger) -> Result<Vec<GameEvent>, ServiceError> {
        debug!(trigger = trigger.name(), guild = ?trigger.guild(), "Handling trigger");

        if let (true, Some(guild), Some(actor)) =
            (trigger.requires_host(), trigger.guild(), trigger.actor())
        {
            if let Err(denied) = self.authority.check_host(guild, actor, trigger.name()) {
                if matches!(trigger, Trigger::ApprovalSignalReceived { .. }) {
                    debug!(%guild, %actor, "Ignoring approval signal from non-host");
                    return Ok(Vec::new());
                }
                warn!(%guild, %actor, trigger = trigger.name(), "Host trigger denied");
                return Err(denied.into());
            }
        }

        let events = match trigger {
            Trigger::RollRequested { guild, player } => self.roll(guild, player).await?,
            Trigger::SubmissionCreated {
                guild,
                player,
                evidence,
            } => self.submit(guild, player, evidence).await?,
            Trigger::ApprovalSignalReceived {
                guild,
                moderator,
                evidence,
            } => self.approve(guild, moderator, &evidence).await?,
            Trigger::AdminAdjustRolls {
                guild,
                actor,
                player,
                delta,
            } => {
                let change = self.engine.admin_adjust_rolls(guild, player, delta).await?;
                vec![GameEvent::RollsAdjusted {
                    guild,
                    actor,
                    player,
                    delta,
                    rolls: change.after,
                }]
            }
            Trigger::AdminSetPosition {
                guild,
                actor,
                player,
                tile,
            } => {
                let change = self.engine.admin_set_position(guild, player, tile).await?;
                vec![GameEvent::PositionSet {
                    guild,
                    actor,
                    player,
                    from_tile: change.from_tile,
                    to_tile: change.to_tile,
                }]
            }
            Trigger::ResetRequested { guild, actor } => {
                let pending = self.resets.issue(guild, actor, self.engine.clock().now());
                vec![GameEvent::ResetPending {
                    guild,
                    token: pending.token,
                    expires_at: pending.expires_at,
                }]
            }
            Trigger::ResetConfirmed {
                guild,
                actor,
                token,
            } => self.confirm_reset(guild, actor, token).await?,
            Trigger::GrantTick { boundary } => self.grant(boundary).await,
        };

        self.publish(&events);
        Ok(events)
    }

    async fn roll(&self, guild: GuildId, player: PlayerId) -> Result<Vec<GameEvent>, ServiceError> {
        let outcome = self.engine.resolve_roll(guild, player).await?;
        Ok(vec![outcome.to_event(guild, player)])
    }

    async fn submit(
        &self,
        guild: GuildId,
        player: PlayerId,
        evidence: EvidenceRef,
    ) -> Result<Vec<GameEvent>, ServiceError> {
        let receipt = self.engine.submit(guild, player, evidence).await?;
        Ok(vec![
            GameEvent::SubmissionReceived {
                guild,
                player,
                tile: receipt.submission.tile,
                evidence: receipt.submission.evidence,
            },
            GameEvent::OutstandingApprovalsChanged {
                guild,
                entries: receipt.outstanding,
            },
        ])
    }

    async fn approve(
        &self,
        guild: GuildId,
        moderator: PlayerId,
        evidence: &EvidenceRef,
    ) -> Result<Vec<GameEvent>, ServiceError> {
        let Some(outcome) = self.engine.approve_evidence(guild, evidence).await? else {
            return Ok(Vec::new());
        };
        Ok(vec![
            GameEvent::ApprovalGranted {
                guild,
                player: outcome.player,
                moderator: Some(moderator),
                can_roll_now: outcome.can_roll_now,
                wait: (!outcome.can_roll_now).then_some(outcome.wait),
            },
            GameEvent::OutstandingApprovalsChanged {
                guild,
                entries: outcome.outstanding,
            },
        ])
    }

    async fn confirm_reset(
        &self,
        guild: GuildId,
        actor: PlayerId,
        token: Uuid,
    ) -> Result<Vec<GameEvent>, ServiceError> {
        self.resets.redeem(guild, token, self.engine.clock().now())?;
        let participants = self.roster.participants(guild).await;
        let report = self.engine.reset_guild(guild, &participants).await?;
        info!(%guild, %actor, participants = report.participants, "Reset confirmed");
        Ok(vec![GameEvent::GameReset {
            guild,
            participants: report.participants,
        }])
    }

    /// Grants one roll per player-role member in every guild.
    ///
    /// A guild whose grant cannot be persisted is logged and skipped;
    /// the other guilds still get their rolls.
    async fn grant(&self, boundary: GrantBoundary) -> Vec<GameEvent> {
        let now = self.engine.clock().now();
        let (_, next_grant_at) = self.engine.grants().next_boundary(now);

        let mut events = Vec::new();
        for guild in self.roster.guilds().await {
            let members = self.roster.players(guild).await;
            if members.is_empty() {
                debug!(%guild, "No player-role members, skipping grant");
                continue;
            }
            match self.engine.grant_rolls(guild, &members).await {
                Ok(players) => events.push(GameEvent::DailyRollsGranted {
                    guild,
                    boundary,
                    players,
                    next_grant_at,
                }),
                Err(e) => error!(%guild, error = %e, "Roll grant failed"),
            }
        }
        events
    }

    fn publish(&self, events: &[GameEvent]) {
        for event in events {
            if self.events.send(event.clone()).is_err() {
                // No subscribers; the caller still gets the events back.
                break;
            }
        }
    }
}
