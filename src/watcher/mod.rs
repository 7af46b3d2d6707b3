//! Page watching and debounced regeneration.
//!
//! # Architecture
//!
//! ```text
//! PageWatcher
//!   - notify::RecommendedWatcher on the page directory
//!   - maps create/remove/rename to PageEvent { add | unlink }
//!         |
//!    bounded mpsc queue
//!         |
//! WatchCoordinator (one task)
//!   - Debouncer: Idle -> Pending(first event) -> Idle
//!   - Regenerate::regenerate, never concurrently
//! ```

mod coordinator;
mod debouncer;
mod error;
mod handler;
mod page_watcher;

pub use coordinator::{CoordinatorHandle, WatchCoordinator};
pub use debouncer::{Batch, Debouncer};
pub use error::WatchError;
pub use handler::{PageAction, PageEvent, Regenerate};
pub use page_watcher::{PageWatcher, PageWatcherBuilder, page_events};
