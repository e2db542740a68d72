//! Pure movement rules.
//!
//! Nothing here touches state or collaborators, so every rule can be
//! checked exhaustively.

use snl_types::TileRecord;

/// Result of moving past the end of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounce {
    /// Tile after bouncing back.
    pub tile: u32,
    /// `true` when the reflected tile fell below 0 and was clamped.
    ///
    /// Only possible on a board smaller than one die roll.
    pub clamped: bool,
}

/// Reflects a candidate tile off the final tile.
///
/// `candidate <= max_tile` is returned unchanged; otherwise the overshoot
/// is walked back from `max_tile`.
///
/// # Example
///
/// ```
/// use snl_runtime::engine::rules::bounce;
///
/// assert_eq!(bounce(97, 100).tile, 97);
/// assert_eq!(bounce(103, 100).tile, 97);
/// ```
#[must_use]
pub fn bounce(candidate: u32, max_tile: u32) -> Bounce {
    if candidate <= max_tile {
        return Bounce {
            tile: candidate,
            clamped: false,
        };
    }

    let overshoot = candidate - max_tile;
    match max_tile.checked_sub(overshoot) {
        Some(tile) => Bounce {
            tile,
            clamped: false,
        },
        None => Bounce {
            tile: 0,
            clamped: true,
        },
    }
}

/// Where a roll finally ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    /// Final tile.
    pub to_tile: u32,
    /// Snake or ladder tile the player slid through.
    pub via_tile: Option<u32>,
    /// Slid down a snake.
    pub is_snake: bool,
    /// Climbed a ladder.
    pub is_ladder: bool,
}

/// Applies a snake or ladder on `candidate`, if the tile has one.
///
/// A teleport destination beyond `max_tile` is held at `max_tile`.
#[must_use]
pub fn land(candidate: u32, record: Option<&TileRecord>, max_tile: u32) -> Landing {
    let Some((record, target)) = record.and_then(|r| r.teleport_target().map(|t| (r, t))) else {
        return Landing {
            to_tile: candidate,
            via_tile: None,
            is_snake: false,
            is_ladder: false,
        };
    };

    Landing {
        to_tile: target.min(max_tile),
        via_tile: Some(candidate),
        is_snake: record.kind == snl_types::TileKind::Snake,
        is_ladder: record.kind == snl_types::TileKind::Ladder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snl_types::{TileKind, DIE_MAX, DIE_MIN};

    #[test]
    fn within_board_is_plain_sum() {
        for max in DIE_MAX..=120 {
            for position in 0..=max {
                for roll in DIE_MIN..=DIE_MAX {
                    if position + roll <= max {
                        assert_eq!(bounce(position + roll, max).tile, position + roll);
                    }
                }
            }
        }
    }

    #[test]
    fn overshoot_lands_just_below_max() {
        for max in DIE_MAX..=120 {
            for position in max.saturating_sub(DIE_MAX)..=max {
                for roll in DIE_MIN..=DIE_MAX {
                    let candidate = position + roll;
                    if candidate > max {
                        let b = bounce(candidate, max);
                        assert!(!b.clamped);
                        assert_eq!(b.tile, max - (candidate - max));
                        assert!(b.tile >= max - DIE_MAX && b.tile < max, "max={max} got {}", b.tile);
                    }
                }
            }
        }
    }

    #[test]
    fn degenerate_board_clamps_to_zero() {
        let b = bounce(9, 3);
        assert_eq!(b, Bounce { tile: 0, clamped: true });

        let b = bounce(6, 3);
        assert_eq!(b, Bounce { tile: 0, clamped: false });
    }

    #[test]
    fn exact_landing_is_max() {
        assert_eq!(bounce(100, 100).tile, 100);
    }

    #[test]
    fn plain_tile_keeps_candidate() {
        let record = TileRecord::new(40, TileKind::Normal);
        let landing = land(40, Some(&record), 100);
        assert_eq!(landing.to_tile, 40);
        assert_eq!(landing.via_tile, None);
        assert!(!landing.is_snake && !landing.is_ladder);

        assert_eq!(land(41, None, 100).to_tile, 41);
    }

    #[test]
    fn ladder_and_snake_teleport() {
        let ladder = TileRecord::new(97, TileKind::Ladder).with_end_tile(55);
        let landing = land(97, Some(&ladder), 100);
        assert_eq!(landing.to_tile, 55);
        assert_eq!(landing.via_tile, Some(97));
        assert!(landing.is_ladder);

        let snake = TileRecord::new(30, TileKind::Snake).with_end_tile(3);
        let landing = land(30, Some(&snake), 100);
        assert_eq!(landing.to_tile, 3);
        assert!(landing.is_snake);
    }

    #[test]
    fn teleport_without_end_tile_is_plain() {
        let broken = TileRecord::new(12, TileKind::Ladder);
        assert_eq!(land(12, Some(&broken), 100).via_tile, None);
    }

    #[test]
    fn teleport_past_board_held_at_max() {
        let ladder = TileRecord::new(90, TileKind::Ladder).with_end_tile(150);
        assert_eq!(land(90, Some(&ladder), 100).to_tile, 100);
    }
}
