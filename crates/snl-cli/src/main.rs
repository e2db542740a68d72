//! `snl` - guild Snakes and Ladders from the command line.
//!
//! Every subcommand runs one trigger (or one read-only query) against the
//! saved game and exits; `serve` keeps running and fires the twice-daily
//! roll grants.
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`SNL_*`)
//! 3. Project config (`.snl/config.toml` in the project root)
//! 4. Global config (`~/.snl/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `SNL_DEBUG`: Enable debug mode (`true`/`false`)
//! - `SNL_TIMEZONE`: Timezone of the grant boundaries
//! - `SNL_LOOKUP_TIMEOUT_MS`: Board lookup timeout
//! - `SNL_STATE_PATH`: Game state file
//! - `SNL_BOARD_PATH`: Board file
//! - `SNL_GUILD`: Guild to act in
//! - `SNL_MEMBER`: Member running the command

mod render;
mod session;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use session::{session_path, SessionFile};
use snl_event::Trigger;
use snl_runtime::auth::ConfiguredHosts;
use snl_runtime::config::RolesConfig;
use snl_runtime::engine::EngineSettings;
use snl_runtime::schedule::{GrantClock, GrantScheduler};
use snl_runtime::service::StaticRoster;
use snl_runtime::store::GameState;
use snl_runtime::{
    BoardFileDirectory, ConfigError, ConfigLoader, GameEngine, GameService, LocalFileStore,
    SnlConfig,
};
use snl_types::{EvidenceRef, GuildId, PlayerId};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use uuid::Uuid;

type Service = GameService<LocalFileStore, BoardFileDirectory, StaticRoster, ConfiguredHosts>;

/// Guild Snakes and Ladders
#[derive(Parser, Debug)]
#[command(name = "snl")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    project: Option<PathBuf>,

    /// Game state file
    #[arg(long, global = true, value_name = "PATH")]
    state: Option<PathBuf>,

    /// Board file
    #[arg(long, global = true, value_name = "PATH")]
    board: Option<PathBuf>,

    /// Ignore the global config file
    #[arg(long, global = true)]
    skip_global_config: bool,

    /// Guild to act in
    #[arg(short, long, global = true, env = "SNL_GUILD")]
    guild: Option<GuildId>,

    /// Member running the command
    #[arg(long = "as", global = true, env = "SNL_MEMBER", value_name = "MEMBER")]
    actor: Option<PlayerId>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Roll the die
    Roll,
    /// Show where a player stands
    Status {
        /// Player to show (defaults to --as)
        player: Option<PlayerId>,
    },
    /// Show a player's rolls and the time to the next grant
    Rolls {
        /// Player to show (defaults to --as)
        player: Option<PlayerId>,
    },
    /// Submit evidence for the current tile
    Submit {
        /// Reference to the evidence message
        evidence: String,
    },
    /// Approve submitted evidence (hosts only)
    Approve {
        /// Reference to the evidence message
        evidence: String,
    },
    /// Give a player rolls (hosts only)
    AddRolls {
        player: PlayerId,
        #[arg(default_value_t = 1)]
        count: u32,
    },
    /// Take rolls from a player (hosts only)
    RemoveRolls {
        player: PlayerId,
        #[arg(default_value_t = 1)]
        count: u32,
    },
    /// Move a player to a tile (hosts only)
    SetPos { player: PlayerId, tile: u32 },
    /// Start a new game (hosts only, two steps)
    Reset {
        /// Token printed by the first step
        #[arg(long, value_name = "TOKEN")]
        confirm: Option<Uuid>,
    },
    /// Rank players by tile
    Leaderboard,
    /// List finishers
    Podium,
    /// List submissions awaiting approval
    Pending,
    /// Fire the current roll grant now
    Grant,
    /// Check the board file
    Board,
    /// Fire roll grants on schedule until Ctrl-C
    Serve,
}

impl Command {
    /// Whether the command reads and writes the session sidecar.
    ///
    /// `serve` runs alongside one-shot commands that record submissions
    /// and reset tokens; writing back its startup copy would drop them.
    fn uses_session(&self) -> bool {
        !matches!(self, Self::Serve)
    }
}

impl Args {
    /// Merges file/env config via [`ConfigLoader`] and applies CLI overrides.
    fn resolve_config(&self) -> Result<SnlConfig, ConfigError> {
        let project_root = self.project.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to get current directory, using '.'");
                PathBuf::from(".")
            })
        });

        let mut loader = ConfigLoader::new().with_project_root(project_root);
        if self.skip_global_config {
            loader = loader.skip_global_config();
        }
        let mut config = loader.load()?;

        if self.debug {
            config.debug = true;
        }
        if let Some(ref p) = self.state {
            config.paths.state_file = Some(p.clone());
        }
        if let Some(ref p) = self.board {
            config.paths.board_file = Some(p.clone());
        }
        Ok(config)
    }

    fn guild(&self) -> Result<GuildId> {
        self.guild
            .context("no guild given (use --guild or SNL_GUILD)")
    }

    fn member(&self) -> Result<PlayerId> {
        self.actor
            .context("no member given (use --as or SNL_MEMBER)")
    }

    fn player_or_member(&self, player: Option<PlayerId>) -> Result<PlayerId> {
        player.map_or_else(|| self.member(), Ok)
    }
}

/// Builds the member roster for this run.
///
/// Players already in the saved game hold the player role. With a guild
/// selected, configured players join it with the role, and hosts and the
/// acting member join as plain members.
fn build_roster(
    state: &GameState,
    roles: &RolesConfig,
    guild: Option<GuildId>,
    actor: Option<PlayerId>,
) -> StaticRoster {
    let roster = StaticRoster::from_state(state);
    if let Some(guild) = guild {
        for player in &roles.players {
            roster.add_player(guild, *player);
        }
        for host in &roles.hosts {
            roster.add_member(guild, *host);
        }
        if let Some(actor) = actor {
            roster.add_member(guild, actor);
        }
    }
    roster
}

fn init_tracing(args: &Args) {
    // --debug > --verbose > RUST_LOG env > default "warn"
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // stdout carries command output; logs go to stderr.
    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let config = args
        .resolve_config()
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    let store = LocalFileStore::new(config.paths.state_file_or_default())?;
    let board = BoardFileDirectory::new(config.paths.board_file_or_default());
    info!(
        state = %store.path().display(),
        board = %board.path().display(),
        "Game files"
    );

    let engine = GameEngine::new(store, board, GrantClock::new(config.game.tz()?))
        .with_settings(EngineSettings::from_config(&config.game));
    engine.load().await?;

    let session_file = session_path(engine.store().path());
    let uses_session = args.command.uses_session();
    let session = if uses_session {
        SessionFile::load(&session_file).await?
    } else {
        SessionFile::default()
    };
    engine.ledger().restore(session.pending);

    let roster = build_roster(&engine.snapshot(), &config.roles, args.guild, args.actor);
    let service = Arc::new(GameService::new(
        Arc::new(engine),
        roster,
        ConfiguredHosts::from_config(&config.roles),
        config.game.reset_window(),
    ));
    service.resets().restore(session.resets);

    let result = run(&args, &service).await;
    if !uses_session {
        return result;
    }

    let session = SessionFile {
        pending: service.engine().ledger().snapshot(),
        resets: service.resets().snapshot(),
    };
    session.save(&session_file).await?;
    debug!(
        pending = session.pending.len(),
        resets = session.resets.len(),
        "Session saved"
    );

    result
}

async fn run(args: &Args, service: &Arc<Service>) -> Result<()> {
    let engine = service.engine();

    match &args.command {
        Command::Roll => {
            let trigger = Trigger::RollRequested {
                guild: args.guild()?,
                player: args.member()?,
            };
            dispatch(args, service, trigger).await
        }
        Command::Submit { evidence } => {
            let trigger = Trigger::SubmissionCreated {
                guild: args.guild()?,
                player: args.member()?,
                evidence: EvidenceRef::new(evidence.clone()),
            };
            dispatch(args, service, trigger).await
        }
        Command::Approve { evidence } => {
            let trigger = Trigger::ApprovalSignalReceived {
                guild: args.guild()?,
                moderator: args.member()?,
                evidence: EvidenceRef::new(evidence.clone()),
            };
            dispatch(args, service, trigger).await
        }
        Command::AddRolls { player, count } => {
            let trigger = Trigger::AdminAdjustRolls {
                guild: args.guild()?,
                actor: args.member()?,
                player: *player,
                delta: i64::from(*count),
            };
            dispatch(args, service, trigger).await
        }
        Command::RemoveRolls { player, count } => {
            let trigger = Trigger::AdminAdjustRolls {
                guild: args.guild()?,
                actor: args.member()?,
                player: *player,
                delta: -i64::from(*count),
            };
            dispatch(args, service, trigger).await
        }
        Command::SetPos { player, tile } => {
            let trigger = Trigger::AdminSetPosition {
                guild: args.guild()?,
                actor: args.member()?,
                player: *player,
                tile: *tile,
            };
            dispatch(args, service, trigger).await
        }
        Command::Reset { confirm } => {
            let guild = args.guild()?;
            let actor = args.member()?;
            let trigger = match confirm {
                None => Trigger::ResetRequested { guild, actor },
                Some(token) => Trigger::ResetConfirmed {
                    guild,
                    actor,
                    token: *token,
                },
            };
            dispatch(args, service, trigger).await
        }
        Command::Grant => {
            let boundary = engine.grants().current_boundary(engine.clock().now());
            dispatch(args, service, Trigger::GrantTick { boundary }).await
        }
        Command::Status { player } => {
            let guild = args.guild()?;
            let player = args.player_or_member(*player)?;
            let view = engine.current_status(guild, player).await;
            output(args, &view, || render::status(player, &view))
        }
        Command::Rolls { player } => {
            let guild = args.guild()?;
            let player = args.player_or_member(*player)?;
            let view = engine.check_rolls(guild, player);
            output(args, &view, || render::rolls(player, &view))
        }
        Command::Leaderboard => {
            let rows = engine.leaderboard(args.guild()?).await;
            output(args, &rows, || render::leaderboard(&rows))
        }
        Command::Podium => {
            let finishers = engine.podium(args.guild()?);
            output(args, &finishers, || render::podium(&finishers))
        }
        Command::Pending => {
            let entries = engine.outstanding_approvals(args.guild()?);
            output(args, &entries, || render::pending(&entries))
        }
        Command::Board => {
            let max_tile = engine.validate_board().await?;
            output(args, &max_tile, || format!("Board is playable: {max_tile} tiles."))
        }
        Command::Serve => serve(service).await,
    }
}

/// Runs a trigger through the service and prints the resulting events.
async fn dispatch(args: &Args, service: &Service, trigger: Trigger) -> Result<()> {
    let events = service.handle(trigger).await?;
    output(args, &events, || {
        if events.is_empty() {
            "Nothing to do.".to_string()
        } else {
            events
                .iter()
                .map(render::event)
                .collect::<Vec<_>>()
                .join("\n")
        }
    })
}

fn output<T: Serialize>(args: &Args, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

async fn serve(service: &Arc<Service>) -> Result<()> {
    let max_tile = service.engine().validate_board().await?;
    println!("Board has {max_tile} tiles. Granting rolls until Ctrl-C.");

    let (stop, stopped) = watch::channel(false);
    let scheduler = GrantScheduler::new(Arc::clone(service));
    let run = scheduler.run(stopped);
    tokio::pin!(run);

    let fired = tokio::select! {
        fired = &mut run => fired,
        signal = tokio::signal::ctrl_c() => {
            signal.context("cannot listen for Ctrl-C")?;
            info!("Shutdown requested");
            let _ = stop.send(true);
            run.await
        }
    };

    println!("Stopped after {fired} grant(s).");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use snl_runtime::service::Roster;
    use snl_runtime::store::PlayerState;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("snl").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn parses_host_command() {
        let args = parse(&["--guild", "10", "--as", "9", "add-rolls", "3", "2"]);
        assert_eq!(args.guild, Some(GuildId::new(10)));
        assert_eq!(args.actor, Some(PlayerId::new(9)));
        assert_eq!(
            args.command,
            Command::AddRolls {
                player: PlayerId::new(3),
                count: 2
            }
        );
    }

    #[test]
    fn serve_leaves_session_to_one_shot_commands() {
        assert!(!parse(&["serve"]).command.uses_session());
        assert!(parse(&["grant"]).command.uses_session());
        assert!(parse(&["--guild", "10", "submit", "m1"]).command.uses_session());
    }

    #[test]
    fn count_defaults_to_one() {
        let args = parse(&["remove-rolls", "3"]);
        assert_eq!(
            args.command,
            Command::RemoveRolls {
                player: PlayerId::new(3),
                count: 1
            }
        );
    }

    #[test]
    fn reset_confirm_takes_token() {
        let token = Uuid::new_v4();
        let args = parse(&["reset", "--confirm", &token.to_string()]);
        assert_eq!(
            args.command,
            Command::Reset {
                confirm: Some(token)
            }
        );
    }

    #[test]
    fn rejects_bad_ids() {
        assert!(Args::try_parse_from(["snl", "--guild", "abc", "roll"]).is_err());
        assert!(Args::try_parse_from(["snl", "set-pos", "3", "-1"]).is_err());
    }

    #[test]
    fn missing_member_is_reported() {
        let args = parse(&["roll"]);
        let err = args.member().unwrap_err();
        assert!(err.to_string().contains("--as"));
    }

    #[test]
    fn cli_paths_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(".snl");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            "[paths]\nstate_file = \"/from/config.json\"\nboard_file = \"/from/board.toml\"\n",
        )
        .unwrap();

        let project = dir.path().to_str().unwrap();
        let args = parse(&[
            "-C",
            project,
            "--skip-global-config",
            "--state",
            "/cli/state.json",
            "podium",
        ]);
        let config = args.resolve_config().unwrap();
        assert_eq!(
            config.paths.state_file,
            Some(PathBuf::from("/cli/state.json"))
        );
        assert_eq!(
            config.paths.board_file,
            Some(PathBuf::from("/from/board.toml"))
        );
    }

    #[tokio::test]
    async fn roster_combines_state_and_roles() {
        let guild = GuildId::new(1);
        let mut state = GameState::new();
        state
            .guild_mut(guild)
            .players
            .insert(PlayerId::new(5), PlayerState::fresh());
        let roles = RolesConfig {
            hosts: vec![PlayerId::new(9)],
            players: vec![PlayerId::new(6)],
        };

        let roster = build_roster(&state, &roles, Some(guild), Some(PlayerId::new(7)));

        assert_eq!(
            roster.players(guild).await,
            vec![PlayerId::new(5), PlayerId::new(6)]
        );
        assert_eq!(roster.participants(guild).await.len(), 4);
    }
}
