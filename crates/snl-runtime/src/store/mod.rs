//! Game state persistence.
//!
//! The engine keeps its working copy of [`GameState`] in memory and
//! writes the whole snapshot through a [`StateStore`] after every
//! mutation. Stores never see partial updates.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       GameEngine                            │
//! │   GameState (guild → players, podium)                       │
//! └─────────────────────────────────────────────────────────────┘
//!                            │ load / persist (whole snapshot)
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    StateStore trait                         │
//! └─────────────────────────────────────────────────────────────┘
//!           ┌────────────────┴────────────────┐
//!           ▼                                 ▼
//!     ┌──────────┐                     ┌──────────┐
//!     │  Local   │                     │  Memory  │
//!     │  JSON    │                     │  (tests) │
//!     └──────────┘                     └──────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use snl_runtime::store::{LocalFileStore, StateStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = LocalFileStore::new("~/.snl/state.json")?;
//! let state = store.load().await?;
//! store.persist(&state).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod local;
mod memory;
mod state;
#[allow(clippy::module_inception)]
mod store;

pub use error::StorageError;
pub use local::{default_state_path, LocalFileStore};
pub use memory::MemoryStateStore;
pub use state::{GameState, GuildState, PlayerState, STATE_VERSION};
pub use store::StateStore;
