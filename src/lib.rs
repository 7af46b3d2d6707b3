pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod notifications;
pub mod routes;
pub mod storage;
pub mod watcher;

pub use config::Settings;
pub use error::{ConfigError, GenerateError, GenerateResult, ScanError, SynthesisWarning};
pub use generator::{GenerateReport, RouteContext, RouteGenerator};
pub use notifications::{RouteBroadcaster, RouteEvent};
pub use routes::{PageFile, PersistedRoute, RouteTransforms, RouteTree, Synthesizer};
pub use storage::{RouteManifest, RouteStore, StorageError};
pub use watcher::{PageAction, PageEvent, PageWatcher, Regenerate, WatchCoordinator, WatchError};
