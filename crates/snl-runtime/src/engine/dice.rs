//! Randomness and time sources.
//!
//! Both are injected into the engine so tests can pin every roll and
//! every "time until next grant".

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::Rng;
use snl_types::{DIE_MAX, DIE_MIN};
use std::collections::VecDeque;
use std::time::Duration;

/// Source of die rolls.
pub trait Dice: Send + Sync {
    /// Rolls once, returning a face in `DIE_MIN..=DIE_MAX`.
    fn roll(&self) -> u32;
}

/// Fair die backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDice;

impl Dice for RandomDice {
    fn roll(&self) -> u32 {
        rand::thread_rng().gen_range(DIE_MIN..=DIE_MAX)
    }
}

/// Die that returns a scripted sequence, repeating the last face once
/// the sequence runs out.
///
/// # Example
///
/// ```
/// use snl_runtime::engine::{Dice, FixedDice};
///
/// let dice = FixedDice::new([3, 5]);
/// assert_eq!(dice.roll(), 3);
/// assert_eq!(dice.roll(), 5);
/// assert_eq!(dice.roll(), 5);
/// ```
#[derive(Debug)]
pub struct FixedDice {
    faces: Mutex<(VecDeque<u32>, u32)>,
}

impl FixedDice {
    /// Creates a die returning `faces` in order.
    #[must_use]
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        let faces: VecDeque<u32> = faces.into_iter().collect();
        let first = faces.front().copied().unwrap_or(DIE_MIN);
        Self {
            faces: Mutex::new((faces, first)),
        }
    }

    /// Creates a die that always shows `face`.
    #[must_use]
    pub fn always(face: u32) -> Self {
        Self::new([face])
    }

    /// Appends faces to the script.
    pub fn push(&self, face: u32) {
        self.faces.lock().0.push_back(face);
    }
}

impl Dice for FixedDice {
    fn roll(&self) -> u32 {
        let mut guard = self.faces.lock();
        let (queue, last) = &mut *guard;
        if let Some(face) = queue.pop_front() {
            *last = face;
        }
        *last
    }
}

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Creates a clock stopped at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        if let Ok(delta) = chrono::Duration::from_std(by) {
            *now += delta;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn random_dice_stays_on_die() {
        let dice = RandomDice;
        for _ in 0..500 {
            let face = dice.roll();
            assert!((DIE_MIN..=DIE_MAX).contains(&face));
        }
    }

    #[test]
    fn fixed_dice_push_extends_script() {
        let dice = FixedDice::always(2);
        assert_eq!(dice.roll(), 2);
        dice.push(6);
        assert_eq!(dice.roll(), 6);
        assert_eq!(dice.roll(), 6);
    }

    #[test]
    fn fixed_clock_advances() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        clock.advance(Duration::from_secs(90));
        assert_eq!(clock.now(), Utc.with_ymd_and_hms(2025, 1, 1, 0, 1, 30).unwrap());
    }
}
