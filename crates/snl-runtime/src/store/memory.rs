//! In-memory state store.

use super::{GameState, StateStore, StorageError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Thread-safe in-memory [`StateStore`].
///
/// Used by tests and by deployments that do not need durability. Persist
/// failures can be injected to exercise the engine's all-or-nothing
/// commits.
///
/// # Example
///
/// ```
/// use snl_runtime::store::{GameState, MemoryStateStore, StateStore};
///
/// # tokio_test_block(async {
/// let store = MemoryStateStore::new();
/// store.persist(&GameState::new()).await.unwrap();
/// assert_eq!(store.persist_count(), 1);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<GameState>,
    fail_persist: AtomicBool,
    persists: AtomicUsize,
}

impl MemoryStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with `state`.
    #[must_use]
    pub fn with_state(state: GameState) -> Self {
        Self {
            state: Mutex::new(state),
            ..Self::default()
        }
    }

    /// Makes every following persist fail until turned off again.
    pub fn fail_persists(&self, fail: bool) {
        self.fail_persist.store(fail, Ordering::SeqCst);
    }

    /// Returns a copy of the last persisted snapshot.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        self.state.lock().clone()
    }

    /// Returns how many persists succeeded.
    #[must_use]
    pub fn persist_count(&self) -> usize {
        self.persists.load(Ordering::SeqCst)
    }
}

impl StateStore for MemoryStateStore {
    async fn load(&self) -> Result<GameState, StorageError> {
        Ok(self.state.lock().clone())
    }

    async fn persist(&self, state: &GameState) -> Result<(), StorageError> {
        if self.fail_persist.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("persist failure injected".into()));
        }
        *self.state.lock() = state.clone();
        self.persists.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
