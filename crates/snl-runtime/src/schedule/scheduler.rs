//! Twice-daily roll grant loop.

use crate::auth::HostAuthority;
use crate::service::{GameService, Roster};
use crate::store::StateStore;
use crate::tiles::TileDirectory;
use chrono::{DateTime, Utc};
use snl_event::Trigger;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};

/// Fires a [`Trigger::GrantTick`] at every local midnight and midday.
///
/// Each cycle recomputes the next boundary from the wall clock instead
/// of sleeping a fixed twelve hours, so drift and daylight saving
/// changes never accumulate. The first fire is the next boundary after
/// start-up. Only the shutdown signal interrupts the wait.
///
/// # Example
///
/// ```no_run
/// # use std::sync::Arc;
/// # use snl_runtime::schedule::GrantScheduler;
/// # async fn example<S, D, R, A>(service: Arc<snl_runtime::service::GameService<S, D, R, A>>)
/// # where
/// #     S: snl_runtime::store::StateStore,
/// #     D: snl_runtime::tiles::TileDirectory,
/// #     R: snl_runtime::service::Roster,
/// #     A: snl_runtime::auth::HostAuthority,
/// # {
/// let (stop, stopped) = tokio::sync::watch::channel(false);
/// let scheduler = GrantScheduler::new(service);
/// // Normally sent from a Ctrl-C handler.
/// let _ = stop.send(true);
/// assert_eq!(scheduler.run(stopped).await, 0);
/// # }
/// ```
pub struct GrantScheduler<S, D, R, A> {
    service: Arc<GameService<S, D, R, A>>,
}

impl<S, D, R, A> GrantScheduler<S, D, R, A>
where
    S: StateStore,
    D: TileDirectory,
    R: Roster,
    A: HostAuthority,
{
    /// Creates a scheduler driving `service`.
    #[must_use]
    pub fn new(service: Arc<GameService<S, D, R, A>>) -> Self {
        Self { service }
    }

    /// Runs until `shutdown` turns `true` or its sender is dropped.
    ///
    /// Returns the number of grants fired.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> usize {
        let engine = self.service.engine();
        let mut fired = 0;
        let mut last_fired: Option<DateTime<Utc>> = None;

        loop {
            if *shutdown.borrow() {
                break;
            }

            let now = engine.clock().now();
            // Never fire the same boundary twice if the timer wakes early.
            let anchor = last_fired.map_or(now, |last| last.max(now));
            let (boundary, at) = engine.grants().next_boundary(anchor);
            let wait = (at - now).to_std().unwrap_or(Duration::ZERO);
            info!(?boundary, %at, ?wait, "Next roll grant scheduled");

            tokio::select! {
                () = tokio::time::sleep(wait) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }

            last_fired = Some(at);
            match self.service.handle(Trigger::GrantTick { boundary }).await {
                Ok(events) => {
                    fired += 1;
                    info!(?boundary, guilds = events.len(), "Roll grant fired");
                }
                Err(e) => error!(?boundary, error = %e, "Roll grant failed"),
            }
        }

        info!(fired, "Grant scheduler stopped");
        fired
    }
}
