//! Grant boundary arithmetic.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use snl_event::GrantBoundary;
use std::time::Duration;

/// Computes roll-grant boundaries (local midnight and midday) in one time zone.
///
/// Every computation starts from a wall-clock instant, so a daylight
/// saving change between two grants shifts nothing: the next boundary
/// is always the next local 00:00 or 12:00.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use snl_event::GrantBoundary;
/// use snl_runtime::schedule::GrantClock;
///
/// let clock = GrantClock::new(chrono_tz::Australia::Melbourne);
/// // 2025-06-01 09:30 in Melbourne (UTC+10)
/// let now = Utc.with_ymd_and_hms(2025, 5, 31, 23, 30, 0).unwrap();
/// let (boundary, at) = clock.next_boundary(now);
///
/// assert_eq!(boundary, GrantBoundary::Midday);
/// assert_eq!(at, Utc.with_ymd_and_hms(2025, 6, 1, 2, 0, 0).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantClock {
    tz: Tz,
}

impl GrantClock {
    /// Creates a clock for `tz`.
    #[must_use]
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Returns the time zone.
    #[must_use]
    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Returns the first boundary strictly after `now`.
    #[must_use]
    pub fn next_boundary(&self, now: DateTime<Utc>) -> (GrantBoundary, DateTime<Utc>) {
        let today = now.with_timezone(&self.tz).date_naive();

        [0u64, 1]
            .into_iter()
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .flat_map(|day| {
                [GrantBoundary::Midnight, GrantBoundary::Midday]
                    .into_iter()
                    .map(move |boundary| (day, boundary))
            })
            .filter_map(|(day, boundary)| {
                self.resolve(day, boundary.hour())
                    .map(|at| (boundary, at))
            })
            .find(|(_, at)| *at > now)
            // Only reachable at the far end of chrono's date range.
            .unwrap_or((GrantBoundary::Midnight, now + chrono::Duration::hours(12)))
    }

    /// Returns the boundary that fired most recently at `now`.
    ///
    /// Used to label a grant that runs slightly after its boundary.
    #[must_use]
    pub fn current_boundary(&self, now: DateTime<Utc>) -> GrantBoundary {
        self.next_boundary(now).0.next()
    }

    /// Returns the time left until the next boundary.
    #[must_use]
    pub fn until_next(&self, now: DateTime<Utc>) -> Duration {
        let (_, at) = self.next_boundary(now);
        (at - now).to_std().unwrap_or(Duration::ZERO)
    }

    /// Maps a local date and hour to UTC.
    ///
    /// An hour repeated by a DST fall-back resolves to its first
    /// occurrence; an hour skipped by a spring-forward resolves to the
    /// first valid local time after it.
    fn resolve(&self, day: NaiveDate, hour: u32) -> Option<DateTime<Utc>> {
        let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
        let local = day.and_time(time);

        (0..=4)
            .map(|step| local + chrono::Duration::minutes(30 * step))
            .find_map(|candidate| self.tz.from_local_datetime(&candidate).earliest())
            .map(|dt| dt.with_timezone(&Utc))
    }
}
