//! End-to-end engine behavior against in-memory collaborators.

mod common;

use common::*;
use snl_runtime::engine::{
    EngineError, EngineSettings, FixedDice, Movement, RollOutcome, StatusView,
};
use snl_runtime::store::{GameState, MemoryStateStore, PlayerState, StateStore};
use snl_runtime::tiles::MemoryTileDirectory;
use snl_types::{EvidenceRef, TileKind, TileRecord};
use std::time::Duration;

// =============================================================================
// Roll preconditions
// =============================================================================

#[tokio::test]
async fn fresh_player_has_no_rolls() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(3));

    let outcome = engine.resolve_roll(GUILD, ALICE).await.unwrap();
    assert_eq!(outcome, RollOutcome::NoRollsLeft { wait: UNTIL_MIDDAY });
    assert_eq!(engine.store().persist_count(), 0);
}

#[tokio::test]
async fn locked_player_cannot_roll_and_nothing_changes() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(3));
    engine.admin_adjust_rolls(GUILD, ALICE, 2).await.unwrap();
    engine.resolve_roll(GUILD, ALICE).await.unwrap();

    let before = engine.snapshot();
    let persists = engine.store().persist_count();

    let outcome = engine.resolve_roll(GUILD, ALICE).await.unwrap();
    assert_eq!(outcome, RollOutcome::LockedPendingApproval);
    assert_eq!(engine.snapshot(), before);
    assert_eq!(engine.store().persist_count(), persists);
}

// =============================================================================
// Movement
// =============================================================================

#[tokio::test]
async fn roll_moves_and_locks() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(4));
    engine.admin_adjust_rolls(GUILD, ALICE, 1).await.unwrap();

    let outcome = engine.resolve_roll(GUILD, ALICE).await.unwrap();
    let RollOutcome::Moved(movement) = outcome else {
        panic!("expected move, got {outcome:?}");
    };
    assert_eq!(movement.roll, 4);
    assert_eq!(movement.from_tile, 1);
    assert_eq!(movement.to_tile, 5);
    assert_eq!(movement.via_tile, None);
    assert_eq!(movement.tile.as_ref().map(|t| t.task.as_str()), Some("Task 5"));

    assert_eq!(
        engine.player_state(GUILD, ALICE),
        PlayerState {
            position: 5,
            rolls: 0,
            approved: false
        }
    );
    // Write-through: the store holds what memory holds.
    assert_eq!(engine.store().snapshot(), engine.snapshot());
}

#[tokio::test]
async fn bounce_then_ladder() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(5));
    engine.admin_set_position(GUILD, ALICE, 98).await.unwrap();
    engine.admin_adjust_rolls(GUILD, ALICE, 1).await.unwrap();

    let outcome = engine.resolve_roll(GUILD, ALICE).await.unwrap();
    let RollOutcome::Moved(movement) = outcome else {
        panic!("expected move, got {outcome:?}");
    };
    assert_eq!(
        (movement.from_tile, movement.via_tile, movement.to_tile),
        (98, Some(97), 55)
    );
    assert!(movement.is_ladder);
    assert!(!movement.is_snake);
    // Metadata is the landing tile's.
    assert_eq!(movement.tile.map(|t| t.tile), Some(55));
    assert_eq!(engine.player_state(GUILD, ALICE).position, 55);
}

#[tokio::test]
async fn snake_slides_down() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(2));
    engine.admin_set_position(GUILD, ALICE, 28).await.unwrap();
    engine.admin_adjust_rolls(GUILD, ALICE, 1).await.unwrap();

    match engine.resolve_roll(GUILD, ALICE).await.unwrap() {
        RollOutcome::Moved(Movement {
            from_tile,
            via_tile,
            to_tile,
            is_snake,
            ..
        }) => {
            assert_eq!((from_tile, via_tile, to_tile, is_snake), (28, Some(30), 3, true));
        }
        other => panic!("expected move, got {other:?}"),
    }
}

#[tokio::test]
async fn board_size_is_read_live() {
    let board = MemoryTileDirectory::with_plain_tiles(12);
    let (engine, _clock) = setup(board, FixedDice::always(5));
    engine.admin_set_position(GUILD, ALICE, 10).await.unwrap();
    engine.admin_adjust_rolls(GUILD, ALICE, 1).await.unwrap();

    // 10 + 5 = 15 on a 12-tile board bounces to 9.
    match engine.resolve_roll(GUILD, ALICE).await.unwrap() {
        RollOutcome::Moved(m) => assert_eq!(m.to_tile, 9),
        other => panic!("expected move, got {other:?}"),
    }

    // Hosts extend the board; the next roll sees it.
    for n in 13..=20 {
        engine
            .directory()
            .insert(TileRecord::new(n, TileKind::Normal).with_task(format!("Task {n}")));
    }
    let submission = engine
        .submit(GUILD, ALICE, EvidenceRef::new("e1"))
        .await
        .unwrap();
    engine.apply_approval(GUILD, submission.submission.player).await.unwrap();
    engine.admin_adjust_rolls(GUILD, ALICE, 1).await.unwrap();

    match engine.resolve_roll(GUILD, ALICE).await.unwrap() {
        RollOutcome::Moved(m) => assert_eq!(m.to_tile, 14),
        other => panic!("expected move, got {other:?}"),
    }
}

// =============================================================================
// Finishing
// =============================================================================

#[tokio::test]
async fn exact_finish_goes_on_podium_once() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(1));
    engine.admin_set_position(GUILD, ALICE, 99).await.unwrap();
    engine.admin_adjust_rolls(GUILD, ALICE, 3).await.unwrap();

    let outcome = engine.resolve_roll(GUILD, ALICE).await.unwrap();
    assert_eq!(outcome, RollOutcome::Finished { roll: 1, rank: 1 });
    assert_eq!(
        engine.player_state(GUILD, ALICE),
        PlayerState {
            position: 100,
            rolls: 0,
            approved: true
        }
    );

    engine.admin_adjust_rolls(GUILD, ALICE, 1).await.unwrap();
    let again = engine.resolve_roll(GUILD, ALICE).await.unwrap();
    assert_eq!(again, RollOutcome::AlreadyFinished { rank: 1 });
    assert_eq!(engine.podium(GUILD), vec![ALICE]);
}

#[tokio::test]
async fn finishers_are_ranked_in_order() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(1));
    for player in [BOB, ALICE] {
        engine.admin_set_position(GUILD, player, 99).await.unwrap();
        engine.admin_adjust_rolls(GUILD, player, 1).await.unwrap();
    }

    assert_eq!(
        engine.resolve_roll(GUILD, BOB).await.unwrap(),
        RollOutcome::Finished { roll: 1, rank: 1 }
    );
    assert_eq!(
        engine.resolve_roll(GUILD, ALICE).await.unwrap(),
        RollOutcome::Finished { roll: 1, rank: 2 }
    );
    assert_eq!(engine.podium(GUILD), vec![BOB, ALICE]);
}

#[tokio::test]
async fn ladder_onto_last_tile_finishes() {
    let board = standard_board();
    board.insert(TileRecord::new(94, TileKind::Ladder).with_end_tile(100));
    let (engine, _clock) = setup(board, FixedDice::always(4));
    engine.admin_set_position(GUILD, ALICE, 90).await.unwrap();
    engine.admin_adjust_rolls(GUILD, ALICE, 1).await.unwrap();

    assert_eq!(
        engine.resolve_roll(GUILD, ALICE).await.unwrap(),
        RollOutcome::Finished { roll: 4, rank: 1 }
    );
}

// =============================================================================
// Degraded collaborators
// =============================================================================

#[tokio::test]
async fn failing_directory_degrades_to_plain_move() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(3));
    engine.admin_adjust_rolls(GUILD, ALICE, 1).await.unwrap();
    engine.directory().set_failing(true);

    match engine.resolve_roll(GUILD, ALICE).await.unwrap() {
        RollOutcome::Moved(m) => {
            assert_eq!(m.to_tile, 4);
            assert!(m.tile.is_none());
        }
        other => panic!("expected move, got {other:?}"),
    }
}

#[tokio::test]
async fn failing_directory_uses_fallback_max() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(6));
    let engine = engine.with_settings(EngineSettings {
        fallback_max_tile: 50,
        lookup_timeout: Duration::from_secs(5),
    });
    engine.admin_set_position(GUILD, ALICE, 48).await.unwrap();
    engine.admin_adjust_rolls(GUILD, ALICE, 1).await.unwrap();
    engine.directory().set_failing(true);

    // 48 + 6 = 54 bounces off the fallback 50 to 46.
    match engine.resolve_roll(GUILD, ALICE).await.unwrap() {
        RollOutcome::Moved(m) => assert_eq!(m.to_tile, 46),
        other => panic!("expected move, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn slow_directory_times_out() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(2));
    engine.admin_adjust_rolls(GUILD, ALICE, 1).await.unwrap();
    engine.directory().set_delay(Some(Duration::from_secs(60)));

    match engine.resolve_roll(GUILD, ALICE).await.unwrap() {
        RollOutcome::Moved(m) => {
            assert_eq!(m.to_tile, 3);
            assert!(m.tile.is_none());
        }
        other => panic!("expected move, got {other:?}"),
    }
}

#[tokio::test]
async fn degenerate_board_rejected_and_clamped() {
    let board = MemoryTileDirectory::with_plain_tiles(3);
    let (engine, _clock) = setup(board, FixedDice::always(6));

    let err = engine.validate_board().await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::DegenerateBoard {
            max_tile: 3,
            minimum: 6
        }
    ));

    engine.admin_adjust_rolls(GUILD, ALICE, 1).await.unwrap();
    // 1 + 6 = 7 overshoots a 3-tile board by more than its size.
    match engine.resolve_roll(GUILD, ALICE).await.unwrap() {
        RollOutcome::Moved(m) => assert_eq!(m.to_tile, 0),
        other => panic!("expected move, got {other:?}"),
    }
}

#[tokio::test]
async fn validate_board_accepts_full_board() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(1));
    assert_eq!(engine.validate_board().await.unwrap(), 100);
}

#[tokio::test]
async fn failed_persist_changes_nothing() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(4));
    engine.admin_adjust_rolls(GUILD, ALICE, 1).await.unwrap();
    let before = engine.snapshot();

    engine.store().fail_persists(true);
    let err = engine.resolve_roll(GUILD, ALICE).await.unwrap_err();
    assert!(matches!(err, EngineError::Storage(_)));
    assert_eq!(engine.snapshot(), before);

    let err = engine
        .submit(GUILD, ALICE, EvidenceRef::new("e"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Storage(_)));
    assert!(engine.ledger().is_empty());

    engine.store().fail_persists(false);
    assert!(matches!(
        engine.resolve_roll(GUILD, ALICE).await.unwrap(),
        RollOutcome::Moved(_)
    ));
}

// =============================================================================
// Submissions and approval
// =============================================================================

#[tokio::test]
async fn submit_then_approve_once() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(4));
    engine.admin_adjust_rolls(GUILD, ALICE, 2).await.unwrap();
    engine.resolve_roll(GUILD, ALICE).await.unwrap();

    let evidence = EvidenceRef::new("chan/msg-1");
    let receipt = engine.submit(GUILD, ALICE, evidence.clone()).await.unwrap();
    assert!(!receipt.replaced);
    assert_eq!(receipt.submission.tile, 5);
    assert_eq!(receipt.outstanding.len(), 1);
    assert_eq!(receipt.outstanding[0].task.as_deref(), Some("Task 5"));

    let approval = engine
        .approve_evidence(GUILD, &evidence)
        .await
        .unwrap()
        .expect("first approval applies");
    assert_eq!(approval.player, ALICE);
    assert!(approval.can_roll_now);
    assert!(approval.outstanding.is_empty());
    assert!(engine.player_state(GUILD, ALICE).approved);

    let persists = engine.store().persist_count();
    assert!(engine.approve_evidence(GUILD, &evidence).await.unwrap().is_none());
    assert!(engine.apply_approval(GUILD, ALICE).await.unwrap().is_none());
    assert_eq!(engine.store().persist_count(), persists);
}

#[tokio::test]
async fn approval_without_rolls_reports_wait() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(4));
    engine.admin_adjust_rolls(GUILD, ALICE, 1).await.unwrap();
    engine.resolve_roll(GUILD, ALICE).await.unwrap();
    engine.submit(GUILD, ALICE, EvidenceRef::new("m")).await.unwrap();

    let approval = engine.apply_approval(GUILD, ALICE).await.unwrap().unwrap();
    assert!(!approval.can_roll_now);
    assert_eq!(approval.wait, UNTIL_MIDDAY);
}

#[tokio::test]
async fn approval_without_submission_is_noop() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(4));
    engine.admin_adjust_rolls(GUILD, ALICE, 1).await.unwrap();
    engine.resolve_roll(GUILD, ALICE).await.unwrap();

    assert!(engine.apply_approval(GUILD, ALICE).await.unwrap().is_none());
    assert!(!engine.player_state(GUILD, ALICE).approved);
}

#[tokio::test]
async fn resubmission_replaces_pending() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(4));
    engine.submit(GUILD, ALICE, EvidenceRef::new("old")).await.unwrap();
    let receipt = engine.submit(GUILD, ALICE, EvidenceRef::new("new")).await.unwrap();
    assert!(receipt.replaced);
    assert_eq!(receipt.outstanding.len(), 1);

    assert!(engine
        .approve_evidence(GUILD, &EvidenceRef::new("old"))
        .await
        .unwrap()
        .is_none());
    assert!(engine
        .approve_evidence(GUILD, &EvidenceRef::new("new"))
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn submission_keeps_tile_when_directory_fails() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(4));
    engine.directory().set_failing(true);

    let receipt = engine.submit(GUILD, ALICE, EvidenceRef::new("m")).await.unwrap();
    assert_eq!(receipt.submission.tile, 1);
    assert!(receipt.submission.task.is_none());
}

#[tokio::test]
async fn outstanding_lists_only_locked_players() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(4));
    engine.submit(GUILD, ALICE, EvidenceRef::new("a")).await.unwrap();
    engine.submit(GUILD, BOB, EvidenceRef::new("b")).await.unwrap();
    engine.submit(OTHER_GUILD, CAROL, EvidenceRef::new("c")).await.unwrap();

    engine.apply_approval(GUILD, BOB).await.unwrap();

    let outstanding = engine.outstanding_approvals(GUILD);
    assert_eq!(outstanding.len(), 1);
    assert_eq!(outstanding[0].player, ALICE);
}

// =============================================================================
// Host operations
// =============================================================================

#[tokio::test]
async fn remove_rolls_floors_at_zero() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(1));
    engine.admin_adjust_rolls(GUILD, ALICE, 2).await.unwrap();

    let change = engine.admin_adjust_rolls(GUILD, ALICE, -5).await.unwrap();
    assert_eq!((change.before, change.after), (2, 0));
    assert_eq!(engine.player_state(GUILD, ALICE).rolls, 0);
}

#[tokio::test]
async fn set_position_checks_board() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(1));

    let err = engine.admin_set_position(GUILD, ALICE, 101).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::PositionOutOfRange {
            tile: 101,
            max_tile: 100
        }
    ));

    let change = engine.admin_set_position(GUILD, ALICE, 40).await.unwrap();
    assert_eq!((change.from_tile, change.to_tile), (1, 40));

    // Unverifiable moves are accepted.
    engine.directory().set_failing(true);
    let change = engine.admin_set_position(GUILD, ALICE, 150).await.unwrap();
    assert_eq!(change.to_tile, 150);
}

#[tokio::test]
async fn reset_starts_new_game() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(1));
    engine.admin_set_position(GUILD, ALICE, 99).await.unwrap();
    engine.admin_adjust_rolls(GUILD, ALICE, 1).await.unwrap();
    engine.resolve_roll(GUILD, ALICE).await.unwrap();
    engine.submit(GUILD, BOB, EvidenceRef::new("b")).await.unwrap();
    engine.admin_set_position(GUILD, CAROL, 40).await.unwrap();
    engine.admin_adjust_rolls(OTHER_GUILD, ALICE, 4).await.unwrap();

    let report = engine.reset_guild(GUILD, &[ALICE, BOB]).await.unwrap();
    assert_eq!(report.participants, 2);
    assert_eq!(report.discarded_submissions, 1);

    assert!(engine.podium(GUILD).is_empty());
    for player in [ALICE, BOB] {
        assert_eq!(engine.player_state(GUILD, player), PlayerState::after_reset());
    }
    // Non-participants are dropped and come back fresh.
    let snapshot = engine.snapshot();
    assert!(!snapshot.guild(GUILD).unwrap().players.contains_key(&CAROL));
    assert!(engine.outstanding_approvals(GUILD).is_empty());

    // Other guilds are untouched.
    assert_eq!(engine.player_state(OTHER_GUILD, ALICE).rolls, 4);
}

#[tokio::test]
async fn grant_adds_one_roll_each() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(1));
    engine.admin_adjust_rolls(GUILD, ALICE, 2).await.unwrap();

    let granted = engine.grant_rolls(GUILD, &[ALICE, BOB, BOB]).await.unwrap();
    assert_eq!(granted, 2);
    assert_eq!(engine.player_state(GUILD, ALICE).rolls, 3);
    assert_eq!(
        engine.player_state(GUILD, BOB),
        PlayerState {
            position: 1,
            rolls: 1,
            approved: true
        }
    );
    assert_eq!(engine.player_state(OTHER_GUILD, BOB).rolls, 0);
}

// =============================================================================
// Read-only views
// =============================================================================

#[tokio::test]
async fn status_views() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(4));

    assert_eq!(
        engine.current_status(GUILD, ALICE).await,
        StatusView::NoActiveTile {
            rolls: 0,
            next_grant_in: Some(UNTIL_MIDDAY)
        }
    );

    engine.admin_adjust_rolls(GUILD, ALICE, 2).await.unwrap();
    assert_eq!(
        engine.current_status(GUILD, ALICE).await,
        StatusView::NoActiveTile {
            rolls: 2,
            next_grant_in: None
        }
    );

    engine.resolve_roll(GUILD, ALICE).await.unwrap();
    match engine.current_status(GUILD, ALICE).await {
        StatusView::ActiveTile { tile, record } => {
            assert_eq!(tile, 5);
            assert_eq!(record.map(|r| r.tile), Some(5));
        }
        other => panic!("unexpected status {other:?}"),
    }

    engine.admin_set_position(GUILD, BOB, 0).await.unwrap();
    engine.submit(GUILD, BOB, EvidenceRef::new("b")).await.unwrap();
    assert_eq!(engine.current_status(GUILD, BOB).await, StatusView::AtStart);
}

#[tokio::test]
async fn status_of_finished_player_awaiting_approval() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(1));
    engine.admin_set_position(GUILD, ALICE, 99).await.unwrap();
    engine.admin_adjust_rolls(GUILD, ALICE, 1).await.unwrap();
    engine.resolve_roll(GUILD, ALICE).await.unwrap();
    engine.submit(GUILD, ALICE, EvidenceRef::new("final")).await.unwrap();

    assert_eq!(
        engine.current_status(GUILD, ALICE).await,
        StatusView::Finished { rank: 1 }
    );
}

#[tokio::test]
async fn check_rolls_reports_wait() {
    let (engine, clock) = setup(standard_board(), FixedDice::always(1));
    engine.admin_adjust_rolls(GUILD, ALICE, 3).await.unwrap();

    let view = engine.check_rolls(GUILD, ALICE);
    assert_eq!(view.rolls, 3);
    assert_eq!(view.next_grant_in, UNTIL_MIDDAY);

    clock.advance(Duration::from_secs(3600));
    assert_eq!(
        engine.check_rolls(GUILD, ALICE).next_grant_in,
        UNTIL_MIDDAY - Duration::from_secs(3600)
    );
}

#[tokio::test]
async fn leaderboard_orders_and_filters() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(1));
    engine.admin_set_position(GUILD, ALICE, 12).await.unwrap();
    engine.admin_set_position(GUILD, BOB, 40).await.unwrap();
    engine.admin_set_position(GUILD, CAROL, 0).await.unwrap();
    engine.admin_set_position(GUILD, HOST, 60).await.unwrap();
    engine.admin_adjust_rolls(GUILD, BOB, 2).await.unwrap();
    engine.directory().remove(60);

    let rows = engine.leaderboard(GUILD).await;
    let tiles: Vec<_> = rows.iter().map(|r| (r.player, r.tile)).collect();
    assert_eq!(tiles, vec![(BOB, 40), (ALICE, 12)]);
    assert_eq!(rows[0].rolls, 2);
    assert_eq!(rows[0].task, "Task 40");
    assert_eq!(rows[0].target, "Target 40");
}

// =============================================================================
// Persistence and isolation
// =============================================================================

#[tokio::test]
async fn load_picks_up_persisted_state() {
    let mut state = GameState::new();
    state.guild_mut(GUILD).players.insert(
        ALICE,
        PlayerState {
            position: 33,
            rolls: 2,
            approved: true,
        },
    );
    state.guild_mut(GUILD).podium.push(BOB);

    let (engine, _clock) = setup_with_store(
        MemoryStateStore::with_state(state),
        standard_board(),
        FixedDice::always(1),
    );
    assert_eq!(engine.player_state(GUILD, ALICE), PlayerState::fresh());

    engine.load().await.unwrap();
    assert_eq!(engine.player_state(GUILD, ALICE).position, 33);
    assert_eq!(engine.podium(GUILD), vec![BOB]);
}

#[tokio::test]
async fn guilds_are_isolated() {
    let (engine, _clock) = setup(standard_board(), FixedDice::always(1));
    engine.admin_set_position(GUILD, ALICE, 99).await.unwrap();
    engine.admin_adjust_rolls(GUILD, ALICE, 1).await.unwrap();
    engine.resolve_roll(GUILD, ALICE).await.unwrap();

    assert_eq!(engine.podium(GUILD), vec![ALICE]);
    assert!(engine.podium(OTHER_GUILD).is_empty());
    assert_eq!(engine.player_state(OTHER_GUILD, ALICE), PlayerState::fresh());
    assert_eq!(
        engine.resolve_roll(OTHER_GUILD, ALICE).await.unwrap(),
        RollOutcome::NoRollsLeft { wait: UNTIL_MIDDAY }
    );

    let persisted = engine.store().load().await.unwrap();
    assert!(persisted.guild(OTHER_GUILD).is_none());
}
