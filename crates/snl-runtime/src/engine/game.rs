//! The game-state engine.

use super::dice::{Clock, Dice, RandomDice, SystemClock};
use super::locks::LockTable;
use super::outcome::{
    ApprovalOutcome, LeaderboardRow, Movement, PositionChange, ResetReport, RollOutcome,
    RollsChange, RollsView, StatusView, SubmissionReceipt,
};
use super::rules;
use super::EngineError;
use crate::approval::{PendingSubmission, SubmissionLedger};
use crate::config::GameConfig;
use crate::schedule::GrantClock;
use crate::store::{GameState, GuildState, PlayerState, StateStore};
use crate::tiles::{TileDirectory, TileError};
use parking_lot::RwLock;
use snl_event::OutstandingApproval;
use snl_types::{EvidenceRef, GuildId, PlayerId, TileRecord, DIE_MAX};
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Tunables of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Max tile used when the tile directory cannot answer.
    pub fallback_max_tile: u32,
    /// Bound on each tile directory call.
    pub lookup_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

impl EngineSettings {
    /// Builds settings from the `[game]` config section.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            fallback_max_tile: config.fallback_max_tile,
            lookup_timeout: config.lookup_timeout(),
        }
    }
}

/// Snapshot a commit starts from.
#[derive(Debug, Clone, Copy)]
enum Base {
    Memory,
    Store,
}

/// Guild-scoped Snakes and Ladders engine.
///
/// Holds the working [`GameState`] in memory and writes every change
/// through the [`StateStore`] before publishing it. Collaborator
/// failures degrade (no tile metadata, fallback max tile) rather than
/// fail the operation; only a failed persist is reported as an error,
/// and then nothing changed.
///
/// # Example
///
/// ```
/// use snl_runtime::engine::{FixedDice, GameEngine, RollOutcome};
/// use snl_runtime::schedule::GrantClock;
/// use snl_runtime::store::MemoryStateStore;
/// use snl_runtime::tiles::MemoryTileDirectory;
/// use snl_types::{GuildId, PlayerId};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let engine = GameEngine::new(
///     MemoryStateStore::new(),
///     MemoryTileDirectory::with_plain_tiles(100),
///     GrantClock::new(chrono_tz::Australia::Melbourne),
/// )
/// .with_dice(FixedDice::always(4));
///
/// let (guild, player) = (GuildId::new(1), PlayerId::new(2));
/// engine.admin_adjust_rolls(guild, player, 1).await.unwrap();
///
/// match engine.resolve_roll(guild, player).await.unwrap() {
///     RollOutcome::Moved(m) => assert_eq!((m.from_tile, m.to_tile), (1, 5)),
///     other => panic!("{other:?}"),
/// }
/// # });
/// ```
pub struct GameEngine<S, D> {
    store: S,
    directory: D,
    dice: Arc<dyn Dice>,
    clock: Arc<dyn Clock>,
    grants: GrantClock,
    settings: EngineSettings,
    state: RwLock<GameState>,
    persist: tokio::sync::Mutex<()>,
    locks: LockTable,
    ledger: SubmissionLedger,
}

impl<S, D> std::fmt::Debug for GameEngine<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("grants", &self.grants)
            .field("settings", &self.settings)
            .field("pending_submissions", &self.ledger.len())
            .finish_non_exhaustive()
    }
}

impl<S: StateStore, D: TileDirectory> GameEngine<S, D> {
    /// Creates an engine with an empty state, a fair die and the system clock.
    ///
    /// Call [`load`](Self::load) to pick up the persisted snapshot.
    #[must_use]
    pub fn new(store: S, directory: D, grants: GrantClock) -> Self {
        Self {
            store,
            directory,
            dice: Arc::new(RandomDice),
            clock: Arc::new(SystemClock),
            grants,
            settings: EngineSettings::default(),
            state: RwLock::new(GameState::new()),
            persist: tokio::sync::Mutex::new(()),
            locks: LockTable::default(),
            ledger: SubmissionLedger::new(),
        }
    }

    /// Replaces the die.
    #[must_use]
    pub fn with_dice(mut self, dice: impl Dice + 'static) -> Self {
        self.dice = Arc::new(dice);
        self
    }

    /// Replaces the die with a shared one.
    #[must_use]
    pub fn with_shared_dice(mut self, dice: Arc<dyn Dice>) -> Self {
        self.dice = dice;
        self
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the settings.
    #[must_use]
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the state store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the tile directory.
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Returns the grant clock.
    pub fn grants(&self) -> &GrantClock {
        &self.grants
    }

    /// Returns the clock.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Returns the pending submission ledger.
    pub fn ledger(&self) -> &SubmissionLedger {
        &self.ledger
    }

    /// Returns a copy of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        self.state.read().clone()
    }

    /// Returns one player's state (the fresh default for unknown players).
    #[must_use]
    pub fn player_state(&self, guild: GuildId, player: PlayerId) -> PlayerState {
        self.state.read().player(guild, player)
    }

    /// Loads the persisted snapshot, replacing the in-memory state.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] if the snapshot cannot be read or
    /// violates an invariant. The in-memory state is left unchanged.
    pub async fn load(&self) -> Result<(), EngineError> {
        let _persist = self.persist.lock().await;
        let loaded = self.store.load().await?;
        info!(guilds = loaded.guilds.len(), "Loaded game state");
        *self.state.write() = loaded;
        Ok(())
    }

    /// Checks that the board is playable and returns its max tile.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Directory`] if the board cannot be read and
    /// [`EngineError::DegenerateBoard`] if it is smaller than one roll.
    pub async fn validate_board(&self) -> Result<u32, EngineError> {
        let max_tile = self.try_max_tile().await?;
        if max_tile < DIE_MAX {
            error!(max_tile, minimum = DIE_MAX, "Board is degenerate");
            return Err(EngineError::DegenerateBoard {
                max_tile,
                minimum: DIE_MAX,
            });
        }
        debug!(max_tile, "Board validated");
        Ok(max_tile)
    }

    /// Time left until the next roll grant.
    #[must_use]
    pub fn until_next_grant(&self) -> Duration {
        self.grants.until_next(self.clock.now())
    }

    // === Player operations ===

    /// Rolls the die for a player and moves them.
    ///
    /// Preconditions are checked in order: already on the podium,
    /// awaiting approval, no rolls left. A failed precondition is an
    /// outcome, not an error, and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] if the move could not be
    /// persisted; the player keeps their roll and position.
    pub async fn resolve_roll(
        &self,
        guild: GuildId,
        player: PlayerId,
    ) -> Result<RollOutcome, EngineError> {
        let _guard = self.locks.player(guild, player).await;

        let (current, rank) = {
            let state = self.state.read();
            (state.player(guild, player), state.podium_rank(guild, player))
        };

        if let Some(rank) = rank {
            debug!(%guild, %player, rank, "Roll denied: already finished");
            return Ok(RollOutcome::AlreadyFinished { rank });
        }
        if !current.approved {
            debug!(%guild, %player, tile = current.position, "Roll denied: awaiting approval");
            return Ok(RollOutcome::LockedPendingApproval);
        }
        if current.rolls == 0 {
            let wait = self.until_next_grant();
            debug!(%guild, %player, ?wait, "Roll denied: no rolls left");
            return Ok(RollOutcome::NoRollsLeft { wait });
        }

        let roll = self.dice.roll();
        let max_tile = self.max_tile_or_fallback().await;

        let bounced = rules::bounce(current.position.saturating_add(roll), max_tile);
        if bounced.clamped {
            error!(
                %guild, %player, max_tile, roll,
                "Board is smaller than one roll, clamping to tile 0"
            );
        }

        let candidate_record = self.lookup_or_none(bounced.tile).await;
        let landing = rules::land(bounced.tile, candidate_record.as_ref(), max_tile);
        let record = if landing.via_tile.is_some() {
            self.lookup_or_none(landing.to_tile).await
        } else {
            candidate_record
        };
        let finished = landing.to_tile == max_tile;

        let rank = self
            .commit(|state| {
                let guild_state = state.guild_mut(guild);
                let entry = guild_state.players.entry(player).or_default();
                entry.position = landing.to_tile;
                if finished {
                    entry.rolls = 0;
                    entry.approved = true;
                    Some(guild_state.record_finish(player))
                } else {
                    entry.rolls = entry.rolls.saturating_sub(1);
                    entry.approved = false;
                    None
                }
            })
            .await?;

        if let Some(rank) = rank {
            info!(%guild, %player, roll, rank, "Player finished");
            return Ok(RollOutcome::Finished { roll, rank });
        }

        info!(
            %guild, %player, roll,
            from = current.position,
            to = landing.to_tile,
            via = ?landing.via_tile,
            "Player moved"
        );
        Ok(RollOutcome::Moved(Movement {
            roll,
            from_tile: current.position,
            via_tile: landing.via_tile,
            to_tile: landing.to_tile,
            is_snake: landing.is_snake,
            is_ladder: landing.is_ladder,
            tile: record,
        }))
    }

    /// Describes where a player stands. Read-only.
    pub async fn current_status(&self, guild: GuildId, player: PlayerId) -> StatusView {
        let (current, rank) = {
            let state = self.state.read();
            (state.player(guild, player), state.podium_rank(guild, player))
        };

        if current.approved {
            let next_grant_in = (current.rolls == 0).then(|| self.until_next_grant());
            return StatusView::NoActiveTile {
                rolls: current.rolls,
                next_grant_in,
            };
        }

        if current.position == 0 {
            return StatusView::AtStart;
        }

        if let Some(rank) = rank {
            if current.position == self.max_tile_or_fallback().await {
                return StatusView::Finished { rank };
            }
        }

        StatusView::ActiveTile {
            tile: current.position,
            record: self.lookup_or_none(current.position).await,
        }
    }

    /// Returns a player's roll balance and the wait until the next grant.
    #[must_use]
    pub fn check_rolls(&self, guild: GuildId, player: PlayerId) -> RollsView {
        RollsView {
            rolls: self.player_state(guild, player).rolls,
            next_grant_in: self.until_next_grant(),
        }
    }

    // === Submission / approval ===

    /// Records a submission for the player's current tile and locks their rolls.
    ///
    /// A previous pending submission of the same player is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] if the lock could not be persisted;
    /// nothing is recorded then.
    pub async fn submit(
        &self,
        guild: GuildId,
        player: PlayerId,
        evidence: EvidenceRef,
    ) -> Result<SubmissionReceipt, EngineError> {
        let _guard = self.locks.player(guild, player).await;

        let position = self.player_state(guild, player).position;
        let record = self.lookup_or_none(position).await;

        self.commit(|state| {
            state
                .guild_mut(guild)
                .players
                .entry(player)
                .or_default()
                .approved = false;
        })
        .await?;

        let submission = PendingSubmission::new(
            guild,
            player,
            position,
            record.as_ref(),
            evidence,
            self.clock.now(),
        );
        let replaced = self.ledger.insert(submission.clone()).is_some();
        info!(%guild, %player, tile = position, replaced, "Submission recorded");

        Ok(SubmissionReceipt {
            submission,
            replaced,
            outstanding: self.outstanding_approvals(guild),
        })
    }

    /// Approves a player's pending submission.
    ///
    /// Returns `Ok(None)` without touching anything when the player has
    /// no pending submission or is not locked, so repeated approval
    /// signals for the same submission act once.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] if the unlock could not be
    /// persisted; the submission stays pending.
    pub async fn apply_approval(
        &self,
        guild: GuildId,
        player: PlayerId,
    ) -> Result<Option<ApprovalOutcome>, EngineError> {
        self.approve(guild, player, None).await
    }

    /// Approves whichever pending submission carries `evidence`.
    ///
    /// The evidence is checked again once the player is locked: if the
    /// player resubmitted in the meantime, the signal is stale and
    /// nothing is approved.
    ///
    /// # Errors
    ///
    /// See [`apply_approval`](Self::apply_approval).
    pub async fn approve_evidence(
        &self,
        guild: GuildId,
        evidence: &EvidenceRef,
    ) -> Result<Option<ApprovalOutcome>, EngineError> {
        match self.ledger.find_by_evidence(guild, evidence) {
            Some(player) => self.approve(guild, player, Some(evidence)).await,
            None => {
                debug!(%guild, %evidence, "Approval signal matches no pending submission");
                Ok(None)
            }
        }
    }

    async fn approve(
        &self,
        guild: GuildId,
        player: PlayerId,
        evidence: Option<&EvidenceRef>,
    ) -> Result<Option<ApprovalOutcome>, EngineError> {
        let _guard = self.locks.player(guild, player).await;

        let current = self.player_state(guild, player);
        let Some(pending) = self.ledger.get(guild, player) else {
            debug!(%guild, %player, "Approval ignored: nothing pending");
            return Ok(None);
        };
        if current.approved {
            debug!(%guild, %player, "Approval ignored: player not locked");
            return Ok(None);
        }
        if evidence.is_some_and(|e| *e != pending.evidence) {
            debug!(%guild, %player, pending = %pending.evidence, "Approval ignored: evidence was replaced");
            return Ok(None);
        }

        self.commit(|state| {
            state
                .guild_mut(guild)
                .players
                .entry(player)
                .or_default()
                .approved = true;
        })
        .await?;

        let Some(submission) = self.ledger.remove(guild, player) else {
            return Ok(None);
        };

        let can_roll_now = current.rolls > 0;
        let wait = self.until_next_grant();
        info!(%guild, %player, can_roll_now, "Submission approved");

        Ok(Some(ApprovalOutcome {
            player,
            can_roll_now,
            wait,
            submission,
            outstanding: self.outstanding_approvals(guild),
        }))
    }

    /// Lists pending submissions of players who are still locked.
    #[must_use]
    pub fn outstanding_approvals(&self, guild: GuildId) -> Vec<OutstandingApproval> {
        let state = self.state.read();
        self.ledger
            .for_guild(guild)
            .into_iter()
            .filter(|s| !state.player(guild, s.player).approved)
            .map(|s| s.to_outstanding())
            .collect()
    }

    // === Host operations ===

    /// Adds `delta` rolls (negative removes), never going below zero.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] if the change could not be persisted.
    pub async fn admin_adjust_rolls(
        &self,
        guild: GuildId,
        player: PlayerId,
        delta: i64,
    ) -> Result<RollsChange, EngineError> {
        let _guard = self.locks.player(guild, player).await;

        let change = self
            .commit(|state| {
                let entry = state.guild_mut(guild).players.entry(player).or_default();
                let before = entry.rolls;
                let after = i64::from(before)
                    .saturating_add(delta)
                    .clamp(0, i64::from(u32::MAX));
                entry.rolls = u32::try_from(after).unwrap_or(u32::MAX);
                RollsChange {
                    before,
                    after: entry.rolls,
                }
            })
            .await?;

        info!(%guild, %player, delta, before = change.before, after = change.after, "Rolls adjusted");
        Ok(change)
    }

    /// Moves a player to `tile`.
    ///
    /// Rolls, approval and the podium are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PositionOutOfRange`] if `tile` is past the
    /// live max tile. When the directory cannot answer, the move is
    /// accepted with a warning.
    pub async fn admin_set_position(
        &self,
        guild: GuildId,
        player: PlayerId,
        tile: u32,
    ) -> Result<PositionChange, EngineError> {
        let _guard = self.locks.player(guild, player).await;

        match self.try_max_tile().await {
            Ok(max_tile) if tile > max_tile => {
                return Err(EngineError::PositionOutOfRange { tile, max_tile });
            }
            Ok(_) => {}
            Err(e) => {
                warn!(%guild, %player, tile, error = %e, "Cannot verify tile against board, accepting");
            }
        }

        let change = self
            .commit(|state| {
                let entry = state.guild_mut(guild).players.entry(player).or_default();
                let from_tile = entry.position;
                entry.position = tile;
                PositionChange {
                    from_tile,
                    to_tile: tile,
                }
            })
            .await?;

        info!(%guild, %player, from = change.from_tile, to = tile, "Position set");
        Ok(change)
    }

    // === Guild-wide operations ===

    /// Starts a new game in a guild.
    ///
    /// Every participant is placed on tile 0 with one roll; other player
    /// records of the guild, the podium and all pending submissions are
    /// dropped. Other guilds are taken from the stored snapshot. Waits for
    /// in-flight player operations of the guild.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] if the reset could not be persisted;
    /// the old game is kept.
    pub async fn reset_guild(
        &self,
        guild: GuildId,
        participants: &[PlayerId],
    ) -> Result<ResetReport, EngineError> {
        let _exclusive = self.locks.guild_exclusive(guild).await;

        let count = self
            .commit_from_store(|state| {
                let fresh = GuildState {
                    players: participants
                        .iter()
                        .map(|p| (*p, PlayerState::after_reset()))
                        .collect(),
                    podium: Vec::new(),
                };
                let count = fresh.players.len();
                state.guilds.insert(guild, fresh);
                count
            })
            .await?;

        let discarded = self.ledger.clear_guild(guild);
        let pruned = self.locks.prune_players(guild);
        info!(%guild, participants = count, discarded, pruned, "Guild reset");

        Ok(ResetReport {
            participants: count,
            discarded_submissions: discarded,
        })
    }

    /// Gives every member one roll. Unknown members start with fresh state.
    ///
    /// Starts from the stored snapshot, so a long-running engine never
    /// reverts changes other processes persisted since it loaded.
    /// Returns how many members received a roll.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] if the grant could not be persisted.
    pub async fn grant_rolls(
        &self,
        guild: GuildId,
        members: &[PlayerId],
    ) -> Result<usize, EngineError> {
        let _exclusive = self.locks.guild_exclusive(guild).await;

        let granted = self
            .commit_from_store(|state| {
                let guild_state = state.guild_mut(guild);
                let unique: BTreeSet<PlayerId> = members.iter().copied().collect();
                for member in &unique {
                    let entry = guild_state.players.entry(*member).or_default();
                    entry.rolls = entry.rolls.saturating_add(1);
                }
                unique.len()
            })
            .await?;

        info!(%guild, granted, "Rolls granted");
        Ok(granted)
    }

    /// Ranks players on the board by tile, highest first.
    ///
    /// Players on tile 0 are not listed, nor are players whose tile has
    /// no metadata.
    pub async fn leaderboard(&self, guild: GuildId) -> Vec<LeaderboardRow> {
        let players: Vec<(PlayerId, PlayerState)> = self
            .state
            .read()
            .guild(guild)
            .map(|g| g.players.iter().map(|(p, s)| (*p, *s)).collect())
            .unwrap_or_default();

        let mut rows = Vec::new();
        for (player, state) in players {
            if state.position == 0 {
                continue;
            }
            let Some(record) = self.lookup_or_none(state.position).await else {
                debug!(%guild, %player, tile = state.position, "Leaderboard skips player without tile data");
                continue;
            };
            rows.push(LeaderboardRow {
                player,
                tile: state.position,
                target: record.target,
                task: record.task,
                rolls: state.rolls,
            });
        }

        rows.sort_by(|a, b| b.tile.cmp(&a.tile).then(a.player.cmp(&b.player)));
        rows
    }

    /// Returns the guild's finishers in finish order.
    #[must_use]
    pub fn podium(&self, guild: GuildId) -> Vec<PlayerId> {
        self.state
            .read()
            .guild(guild)
            .map(|g| g.podium.clone())
            .unwrap_or_default()
    }

    // === Internals ===

    /// Persists the mutated snapshot, then publishes it.
    ///
    /// Commits are serialized so a slower persist can never overwrite a
    /// newer snapshot.
    async fn commit<T>(&self, mutate: impl FnOnce(&mut GameState) -> T) -> Result<T, EngineError> {
        self.commit_on(Base::Memory, mutate).await
    }

    /// Like [`commit`](Self::commit), but mutates the stored snapshot.
    ///
    /// Other processes may have written the store since this engine
    /// loaded it; their changes are kept and published with this one.
    async fn commit_from_store<T>(
        &self,
        mutate: impl FnOnce(&mut GameState) -> T,
    ) -> Result<T, EngineError> {
        self.commit_on(Base::Store, mutate).await
    }

    async fn commit_on<T>(
        &self,
        base: Base,
        mutate: impl FnOnce(&mut GameState) -> T,
    ) -> Result<T, EngineError> {
        let _persist = self.persist.lock().await;

        let mut next = match base {
            Base::Memory => self.snapshot(),
            Base::Store => self.store.load().await.map_err(|e| {
                error!(error = %e, "Failed to re-read game state, change discarded");
                EngineError::from(e)
            })?,
        };
        let out = mutate(&mut next);

        if let Err(e) = self.store.persist(&next).await {
            error!(error = %e, "Failed to persist game state, change discarded");
            return Err(e.into());
        }

        *self.state.write() = next;
        Ok(out)
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, TileError>>,
    ) -> Result<T, TileError> {
        let limit = self.settings.lookup_timeout;
        tokio::time::timeout(limit, call)
            .await
            .unwrap_or(Err(TileError::Timeout(limit)))
    }

    async fn try_max_tile(&self) -> Result<u32, TileError> {
        self.bounded(self.directory.max_tile()).await
    }

    async fn max_tile_or_fallback(&self) -> u32 {
        match self.try_max_tile().await {
            Ok(max_tile) => max_tile,
            Err(e) => {
                let fallback = self.settings.fallback_max_tile;
                warn!(error = %e, fallback, "Max tile unavailable, using fallback");
                fallback
            }
        }
    }

    async fn lookup_or_none(&self, tile: u32) -> Option<TileRecord> {
        match self.bounded(self.directory.lookup(tile)).await {
            Ok(record) => record,
            Err(e) => {
                warn!(tile, error = %e, "Tile lookup failed, continuing without metadata");
                None
            }
        }
    }
}
