//! State storage abstraction.

use super::{GameState, StorageError};
use std::future::Future;

/// Whole-snapshot state storage.
///
/// Implementations must be thread-safe (`Send + Sync`) for use across
/// async tasks.
///
/// # Contract
///
/// - `load` returns the last persisted snapshot, or an empty
///   [`GameState`] when nothing was persisted yet.
/// - `persist` replaces the stored snapshot as a whole. Callers
///   serialize their persists; implementations need not guard against
///   interleaved writes.
/// - There is no write-ahead log. A crash between an in-memory change
///   and its persist loses that change.
pub trait StateStore: Send + Sync {
    /// Loads the stored snapshot.
    fn load(&self) -> impl Future<Output = Result<GameState, StorageError>> + Send;

    /// Replaces the stored snapshot.
    fn persist(&self, state: &GameState) -> impl Future<Output = Result<(), StorageError>> + Send;
}
