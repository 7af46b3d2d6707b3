//! Filesystem observer feeding the coordinator queue.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind, RecursiveMode, Watcher};

use super::coordinator::{CoordinatorHandle, WatchCoordinator};
use super::error::WatchError;
use super::handler::{PageAction, PageEvent, Regenerate};
use crate::config::Settings;
use crate::routes::{PagePatterns, is_hidden, relative_glob, walk_pages};

/// Watches the page directory and regenerates routes on add/unlink.
pub struct PageWatcher {
    watcher: Option<notify::RecommendedWatcher>,
    coordinator: CoordinatorHandle,
    page_root: PathBuf,
}

impl PageWatcher {
    /// Create a builder for configuring the watcher.
    pub fn builder() -> PageWatcherBuilder {
        PageWatcherBuilder::new()
    }

    pub fn page_root(&self) -> &Path {
        &self.page_root
    }

    /// Resolves when the watcher is stopped from elsewhere.
    pub async fn stopped(&self) {
        let token = self.coordinator.shutdown_token();
        token.cancelled().await;
    }

    /// Close the observer, then stop the coordinator.
    ///
    /// A regeneration already running is allowed to finish.
    pub async fn stop(mut self) {
        drop(self.watcher.take());
        self.coordinator.shutdown().await;
        crate::log_event!("watcher", "stopped");
    }
}

/// Map one notify event to page events, relative to `page_root`.
///
/// A directory that appears is walked and yields an `Add` per page file
/// below it. A directory that disappears yields a single `Unlink` for the
/// directory itself, since its contents can no longer be listed. Content
/// modifications are ignored: only the set of page files shapes the route
/// tree.
pub fn page_events(event: &Event, page_root: &Path, patterns: &PagePatterns) -> Vec<PageEvent> {
    let folder = matches!(
        event.kind,
        EventKind::Create(CreateKind::Folder) | EventKind::Remove(RemoveKind::Folder)
    );

    let actions: Vec<(PageAction, &PathBuf)> = match event.kind {
        EventKind::Create(_) => event.paths.iter().map(|p| (PageAction::Add, p)).collect(),
        EventKind::Remove(_) => event.paths.iter().map(|p| (PageAction::Unlink, p)).collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            event.paths.iter().map(|p| (PageAction::Unlink, p)).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            event.paths.iter().map(|p| (PageAction::Add, p)).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => event
            .paths
            .iter()
            .zip([PageAction::Unlink, PageAction::Add])
            .map(|(p, action)| (action, p))
            .collect(),
        // Platforms that cannot tell the rename side apart
        EventKind::Modify(ModifyKind::Name(_)) => event
            .paths
            .iter()
            .map(|p| {
                let action = if p.exists() {
                    PageAction::Add
                } else {
                    PageAction::Unlink
                };
                (action, p)
            })
            .collect(),
        _ => Vec::new(),
    };

    actions
        .into_iter()
        .flat_map(|(action, path)| match action {
            PageAction::Add => added_pages(path, page_root, patterns),
            PageAction::Unlink => removed_page(path, page_root, patterns, folder)
                .into_iter()
                .collect(),
        })
        .collect()
}

fn added_pages(path: &Path, page_root: &Path, patterns: &PagePatterns) -> Vec<PageEvent> {
    if path.is_dir() {
        return match walk_pages(page_root, path, patterns) {
            Ok(globs) => globs.into_iter().map(PageEvent::add).collect(),
            Err(e) => {
                tracing::warn!("[watcher] {e}");
                Vec::new()
            }
        };
    }

    match relative_glob(page_root, path) {
        Some(glob) if patterns.is_page(&glob) => vec![PageEvent::add(glob)],
        _ => Vec::new(),
    }
}

/// A path without an extension is taken for a directory that may have held
/// pages.
fn removed_page(
    path: &Path,
    page_root: &Path,
    patterns: &PagePatterns,
    folder: bool,
) -> Option<PageEvent> {
    let glob = relative_glob(page_root, path)?;
    if patterns.is_page(&glob) {
        return Some(PageEvent::unlink(glob));
    }

    let directory = folder || path.extension().is_none();
    (directory && !is_hidden(&glob) && !patterns.is_excluded(&glob))
        .then(|| PageEvent::unlink(glob))
}

/// Builder for constructing a [`PageWatcher`].
pub struct PageWatcherBuilder {
    page_root: Option<PathBuf>,
    patterns: Option<PagePatterns>,
    regenerator: Option<Arc<dyn Regenerate>>,
    debounce_ms: u64,
    queue_capacity: usize,
}

impl PageWatcherBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            page_root: None,
            patterns: None,
            regenerator: None,
            debounce_ms: 500,
            queue_capacity: 100,
        }
    }

    /// Take the page directory, patterns and watch settings from `settings`.
    pub fn settings(self, settings: &Settings) -> Self {
        self.page_root(settings.page_root())
            .patterns(PagePatterns::from_settings(settings))
            .debounce_ms(settings.watch.debounce_ms)
            .queue_capacity(settings.watch.queue_capacity)
    }

    pub fn page_root(mut self, path: PathBuf) -> Self {
        self.page_root = Some(path);
        self
    }

    pub fn patterns(mut self, patterns: PagePatterns) -> Self {
        self.patterns = Some(patterns);
        self
    }

    /// Set the pipeline run after each quiet window.
    pub fn regenerator(mut self, regenerator: Arc<dyn Regenerate>) -> Self {
        self.regenerator = Some(regenerator);
        self
    }

    /// Set the debounce duration in milliseconds.
    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Start observing and spawn the coordinator. Needs a tokio runtime.
    pub fn start(self) -> Result<PageWatcher, WatchError> {
        let regenerator = self.regenerator.ok_or_else(|| WatchError::InitFailed {
            reason: "Regenerator is required".to_string(),
        })?;
        let page_root = self.page_root.ok_or_else(|| WatchError::InitFailed {
            reason: "Page directory is required".to_string(),
        })?;
        let patterns = self.patterns.ok_or_else(|| WatchError::InitFailed {
            reason: "Page patterns are required".to_string(),
        })?;

        if !page_root.is_dir() {
            return Err(WatchError::PathWatchFailed {
                path: page_root,
                reason: "not a directory".to_string(),
            });
        }

        let coordinator =
            WatchCoordinator::spawn(regenerator, self.debounce_ms, self.queue_capacity);
        let tx = coordinator.sender();

        let root = page_root.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    for page_event in page_events(&event, &root, &patterns) {
                        // Queue closed means the coordinator is gone
                        if tx.blocking_send(page_event).is_err() {
                            return;
                        }
                    }
                }
                Err(e) => tracing::error!("[watcher] file watch error: {e}"),
            }
        })?;

        watcher
            .watch(&page_root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::PathWatchFailed {
                path: page_root.clone(),
                reason: e.to_string(),
            })?;

        crate::log_event!("watcher", "watching", "{}", page_root.display());

        Ok(PageWatcher {
            watcher: Some(watcher),
            coordinator,
            page_root,
        })
    }
}

impl Default for PageWatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
