//! Plain-text rendering of events and views.

use snl_event::{DenyReason, GameEvent, GrantBoundary, OutstandingApproval};
use snl_runtime::engine::{LeaderboardRow, RollsView, StatusView};
use snl_types::{PlayerId, TileRecord};
use std::fmt::Write as _;
use std::time::Duration;

/// Formats a wait as `Xh Ym`.
#[must_use]
pub fn wait(duration: Duration) -> String {
    let minutes = duration.as_secs() / 60;
    format!("{}h {}m", minutes / 60, minutes % 60)
}

fn boundary(boundary: GrantBoundary) -> &'static str {
    match boundary {
        GrantBoundary::Midnight => "Midnight",
        GrantBoundary::Midday => "Midday",
    }
}

fn tile_details(out: &mut String, record: &TileRecord) {
    let _ = write!(out, "\n  Task: {}", record.task);
    if !record.target.is_empty() {
        let _ = write!(out, "\n  Target: {}", record.target);
    }
    if !record.drop_rate.is_empty() {
        let _ = write!(out, "\n  Drop rate: {}", record.drop_rate);
    }
    if let Some(url) = record.image_url() {
        let _ = write!(out, "\n  Image: {url}");
    }
}

/// Renders one outbound event.
#[must_use]
pub fn event(event: &GameEvent) -> String {
    match event {
        GameEvent::PlayerMoved {
            player,
            roll,
            from_tile,
            via_tile,
            to_tile,
            is_snake,
            is_ladder,
            tile,
            ..
        } => {
            let mut out = format!("Player {player} rolled a {roll}");
            match via_tile {
                Some(via) if *is_ladder => {
                    let _ = write!(out, ", climbed the ladder on tile {via} and is now on tile {to_tile}");
                }
                Some(via) if *is_snake => {
                    let _ = write!(out, ", slid down the snake on tile {via} and is now on tile {to_tile}");
                }
                _ => {
                    let _ = write!(out, " and moved from tile {from_tile} to tile {to_tile}");
                }
            }
            match tile {
                Some(record) => tile_details(&mut out, record),
                None => out.push_str("\n  Tile details are unavailable right now."),
            }
            out
        }
        GameEvent::PlayerFinished {
            player, roll, rank, ..
        } => format!("Player {player} rolled a {roll} and finished in place {rank}!"),
        GameEvent::RollDenied { player, reason, .. } => match reason {
            DenyReason::AlreadyFinished { rank } => {
                format!("Player {player} already finished in place {rank}.")
            }
            DenyReason::LockedPendingApproval => format!(
                "Player {player} must get the current tile approved before rolling again."
            ),
            DenyReason::NoRollsLeft { wait: w } => format!(
                "Player {player} has no rolls left. Next roll in {}.",
                wait(*w)
            ),
        },
        GameEvent::SubmissionReceived {
            player,
            tile,
            evidence,
            ..
        } => format!("Submission from player {player} for tile {tile} recorded ({evidence})."),
        GameEvent::ApprovalGranted {
            player,
            can_roll_now,
            wait: w,
            ..
        } => {
            if *can_roll_now {
                format!("Tile approved for player {player}. Roll when ready!")
            } else {
                let next = w.map_or_else(|| "the next grant".to_string(), wait);
                format!("Tile approved for player {player}. Next roll in {next}.")
            }
        }
        GameEvent::DailyRollsGranted {
            guild,
            boundary: b,
            players,
            next_grant_at,
        } => format!(
            "{} grant: {players} player(s) in guild {guild} received a roll. Next grant at {next_grant_at}.",
            boundary(*b)
        ),
        GameEvent::RollsAdjusted {
            player, delta, rolls, ..
        } => format!("Rolls for player {player} adjusted by {delta:+}; now {rolls}."),
        GameEvent::PositionSet {
            player,
            from_tile,
            to_tile,
            ..
        } => format!("Player {player} moved from tile {from_tile} to tile {to_tile}."),
        GameEvent::ResetPending {
            guild,
            token,
            expires_at,
        } => format!(
            "Reset requested for guild {guild}. Confirm before {expires_at} with:\n  snl reset --confirm {token}"
        ),
        GameEvent::GameReset {
            guild,
            participants,
        } => format!(
            "Game reset in guild {guild}: {participants} participant(s) start on tile 0 with 1 roll."
        ),
        GameEvent::OutstandingApprovalsChanged { entries, .. } => pending(entries),
    }
}

/// Renders the outstanding approvals list.
#[must_use]
pub fn pending(entries: &[OutstandingApproval]) -> String {
    if entries.is_empty() {
        return "No submissions awaiting approval.".to_string();
    }
    let mut out = String::from("Awaiting approval:");
    for entry in entries {
        let _ = write!(out, "\n  Player {}", entry.player);
        let _ = write!(out, " - tile {}", entry.tile);
        if let Some(task) = entry.task.as_deref().filter(|t| !t.is_empty()) {
            let _ = write!(out, " - {task}");
        }
        let _ = write!(out, " ({})", entry.evidence);
    }
    out
}

/// Renders a status view.
#[must_use]
pub fn status(player: PlayerId, view: &StatusView) -> String {
    match view {
        StatusView::NoActiveTile {
            rolls,
            next_grant_in,
        } => match next_grant_in {
            Some(w) => format!(
                "Player {player} has no active tile and no rolls. Next roll in {}.",
                wait(*w)
            ),
            None => format!("Player {player} has no active tile and {rolls} roll(s) to use."),
        },
        StatusView::AtStart => format!("Player {player} is on the start tile."),
        StatusView::ActiveTile { tile, record } => {
            let mut out = format!("Player {player} is on tile {tile}.");
            if let Some(record) = record {
                tile_details(&mut out, record);
            }
            out
        }
        StatusView::Finished { rank } => {
            format!("Player {player} finished in place {rank}.")
        }
    }
}

/// Renders a roll balance.
#[must_use]
pub fn rolls(player: PlayerId, view: &RollsView) -> String {
    format!(
        "Player {player} has {} roll(s). Next roll in {}.",
        view.rolls,
        wait(view.next_grant_in)
    )
}

/// Renders the leaderboard.
#[must_use]
pub fn leaderboard(rows: &[LeaderboardRow]) -> String {
    if rows.is_empty() {
        return "Nobody is on the board yet.".to_string();
    }
    let mut out = String::from("Leaderboard:");
    for (i, row) in rows.iter().enumerate() {
        let _ = write!(
            out,
            "\n  {}. Player {} - tile {} - {} ({}) - {} roll(s)",
            i + 1,
            row.player,
            row.tile,
            row.task,
            row.target,
            row.rolls
        );
    }
    out
}

/// Renders the podium.
#[must_use]
pub fn podium(finishers: &[PlayerId]) -> String {
    if finishers.is_empty() {
        return "Nobody has finished yet.".to_string();
    }
    let mut out = String::from("Podium:");
    for (i, player) in finishers.iter().enumerate() {
        let _ = write!(out, "\n  {}. Player {player}", i + 1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use snl_types::{EvidenceRef, GuildId, TileKind};

    #[test]
    fn wait_format() {
        assert_eq!(wait(Duration::from_secs(4 * 3600 + 5 * 60 + 59)), "4h 5m");
        assert_eq!(wait(Duration::ZERO), "0h 0m");
    }

    #[test]
    fn ladder_move_mentions_ladder_and_task() {
        let text = event(&GameEvent::PlayerMoved {
            guild: GuildId::new(1),
            player: PlayerId::new(2),
            roll: 5,
            from_tile: 98,
            via_tile: Some(97),
            to_tile: 55,
            is_snake: false,
            is_ladder: true,
            tile: Some(
                TileRecord::new(55, TileKind::Normal)
                    .with_task("Kill 5 imps")
                    .with_target("Imps"),
            ),
        });
        assert!(text.contains("climbed the ladder on tile 97"));
        assert!(text.contains("tile 55"));
        assert!(text.contains("Task: Kill 5 imps"));
        assert!(text.contains("Target: Imps"));
    }

    #[test]
    fn move_without_metadata_says_so() {
        let text = event(&GameEvent::PlayerMoved {
            guild: GuildId::new(1),
            player: PlayerId::new(2),
            roll: 3,
            from_tile: 1,
            via_tile: None,
            to_tile: 4,
            is_snake: false,
            is_ladder: false,
            tile: None,
        });
        assert!(text.contains("moved from tile 1 to tile 4"));
        assert!(text.contains("unavailable"));
    }

    #[test]
    fn no_rolls_denial_shows_wait() {
        let text = event(&GameEvent::RollDenied {
            guild: GuildId::new(1),
            player: PlayerId::new(2),
            reason: DenyReason::NoRollsLeft {
                wait: Duration::from_secs(90 * 60),
            },
        });
        assert_eq!(text, "Player 2 has no rolls left. Next roll in 1h 30m.");
    }

    #[test]
    fn pending_lists_entries() {
        let text = pending(&[OutstandingApproval {
            player: PlayerId::new(3),
            tile: 12,
            task: Some("Fish 10 sharks".into()),
            target: None,
            drop_rate: None,
            evidence: EvidenceRef::new("m1"),
        }]);
        assert!(text.contains("Player 3 - tile 12 - Fish 10 sharks (m1)"));
        assert_eq!(pending(&[]), "No submissions awaiting approval.");
    }

    #[test]
    fn adjusted_rolls_show_sign() {
        let text = event(&GameEvent::RollsAdjusted {
            guild: GuildId::new(1),
            actor: PlayerId::new(9),
            player: PlayerId::new(2),
            delta: -2,
            rolls: 0,
        });
        assert_eq!(text, "Rolls for player 2 adjusted by -2; now 0.");
    }

    #[test]
    fn podium_numbers_finishers() {
        assert_eq!(
            podium(&[PlayerId::new(5), PlayerId::new(4)]),
            "Podium:\n  1. Player 5\n  2. Player 4"
        );
    }
}
