//! Generated artifacts on disk: the hand-editable route tree and the
//! route manifest.

pub mod error;
pub mod manifest;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use manifest::{ImportTables, RouteManifest};
pub use persistence::RouteStore;
