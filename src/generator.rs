//! The regeneration pipeline.
//!
//! scan -> synthesize -> build trees -> merge with the persisted tree ->
//! write routes and manifest -> notify.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{CustomRoutesConfig, Settings};
use crate::error::{GenerateError, GenerateResult, SynthesisWarning};
use crate::notifications::{RouteBroadcaster, RouteEvent};
use crate::routes::{
    GlobProvider, PageFile, PageScanner, RouteEntry, RouteMaps, RouteTransforms, RouteTree,
    Synthesizer, build_route_maps, build_route_trees, check_sorted, merge_route_trees,
    route_maps_to_entries, to_persisted,
};
use crate::storage::manifest::custom_route_entries;
use crate::storage::{RouteManifest, RouteStore};
use crate::watcher::{PageEvent, Regenerate};

/// Everything derived from one scan of the page directory.
#[derive(Debug, Clone, Default)]
pub struct RouteContext {
    /// Valid page files, sorted by glob
    pub files: Vec<PageFile>,
    pub maps: RouteMaps,
    /// Synthesized entries in locale order
    pub entries: Vec<RouteEntry>,
    /// Entries from `custom_routes`, not backed by page files
    pub custom_entries: Vec<RouteEntry>,
    pub trees: Vec<RouteTree>,
    /// Globs skipped for breaking the naming convention
    pub warnings: Vec<SynthesisWarning>,
}

impl RouteContext {
    /// Synthesize names, paths and trees from a glob list.
    pub fn synthesize(
        globs: &[String],
        synthesizer: &Synthesizer,
        custom: &CustomRoutesConfig,
    ) -> Self {
        let mut files = Vec::with_capacity(globs.len());
        let mut warnings = Vec::new();

        for glob in globs {
            match synthesizer.page_file(glob) {
                Ok(file) => files.push(file),
                Err(warning) => {
                    tracing::warn!("[synthesis] {warning}");
                    warnings.push(warning);
                }
            }
        }

        if let Err(violation) = check_sorted(&files) {
            crate::debug_event!("synthesis", "resorting", "{violation}");
            files.sort_by(|a, b| a.glob.cmp(&b.glob));
        }

        let maps = build_route_maps(&files, synthesizer);
        let entries = route_maps_to_entries(&maps);
        let custom_entries = custom_route_entries(custom, &maps, synthesizer);
        let trees = build_route_trees(&entries, &maps, &files);

        Self {
            files,
            maps,
            entries,
            custom_entries,
            trees,
            warnings,
        }
    }

    pub fn manifest(&self) -> RouteManifest {
        RouteManifest::build(&self.files, &self.entries, &self.custom_entries)
    }
}

/// Outcome of one successful regeneration.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub files: usize,
    pub routes: usize,
    pub warnings: Vec<SynthesisWarning>,
    pub routes_path: PathBuf,
    pub manifest_path: PathBuf,
}

/// Drives the pipeline for one project.
///
/// Clones share the glob provider and the broadcaster.
#[derive(Clone)]
pub struct RouteGenerator {
    settings: Settings,
    synthesizer: Synthesizer,
    provider: Arc<dyn GlobProvider>,
    store: RouteStore,
    broadcaster: Option<Arc<RouteBroadcaster>>,
}

impl RouteGenerator {
    /// Generator scanning the configured page directory with default transforms.
    pub fn new(settings: Settings) -> Self {
        let synthesizer = Synthesizer::from_settings(&settings, RouteTransforms::default());
        let provider = Arc::new(PageScanner::from_settings(&settings));
        let store = RouteStore::new(settings.routes_path());

        Self {
            settings,
            synthesizer,
            provider,
            store,
            broadcaster: None,
        }
    }

    pub fn with_transforms(mut self, transforms: RouteTransforms) -> Self {
        self.synthesizer = Synthesizer::from_settings(&self.settings, transforms);
        self
    }

    pub fn with_provider(mut self, provider: Box<dyn GlobProvider>) -> Self {
        self.provider = Arc::from(provider);
        self
    }

    pub fn with_broadcaster(mut self, broadcaster: Arc<RouteBroadcaster>) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &RouteStore {
        &self.store
    }

    /// List page globs and synthesize a fresh context.
    pub fn scan(&self) -> GenerateResult<RouteContext> {
        let globs = self.provider.globs()?;
        let context =
            RouteContext::synthesize(&globs, &self.synthesizer, &self.settings.custom_routes);

        crate::debug_event!(
            "generate",
            "scanned",
            "{} files, {} routes, {} skipped",
            context.files.len(),
            context.maps.len(),
            context.warnings.len()
        );
        self.notify(RouteEvent::Synthesized {
            routes: context.maps.len(),
        });

        Ok(context)
    }

    /// Run the whole pipeline once. `trigger` is the watch event that caused
    /// it, if any.
    ///
    /// On failure nothing downstream of the failing step is written.
    pub fn generate(&self, trigger: Option<&PageEvent>) -> GenerateResult<GenerateReport> {
        match self.run_pipeline(trigger) {
            Ok(report) => {
                self.notify(RouteEvent::Regenerated {
                    action: trigger.map(|t| t.action),
                    path: trigger.map(|t| t.path.clone()),
                });
                Ok(report)
            }
            Err(e) => {
                self.notify(RouteEvent::Failed {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn run_pipeline(&self, trigger: Option<&PageEvent>) -> GenerateResult<GenerateReport> {
        let context = self.scan()?;

        let fresh = to_persisted(&context.trees, &self.synthesizer.transforms().meta);
        let previous = self.store.load()?;
        let merged = merge_route_trees(&previous, &fresh);
        self.store.save(&merged)?;

        let manifest_path = self.settings.manifest_path();
        context.manifest().save(&manifest_path)?;

        match trigger {
            Some(event) => crate::log_event!(
                "generate",
                "regenerated",
                "{} routes after {} {}",
                context.maps.len(),
                event.action,
                event.path
            ),
            None => crate::log_event!(
                "generate",
                "generated",
                "{} routes from {} files",
                context.maps.len(),
                context.files.len()
            ),
        }

        Ok(GenerateReport {
            files: context.files.len(),
            routes: context.maps.len(),
            warnings: context.warnings,
            routes_path: self.store.path().to_path_buf(),
            manifest_path,
        })
    }

    fn notify(&self, event: RouteEvent) {
        if let Some(broadcaster) = &self.broadcaster {
            broadcaster.send(event);
        }
    }
}

/// The pipeline walks the page directory and writes files, so it runs on
/// the blocking pool rather than on a runtime worker.
#[async_trait]
impl Regenerate for RouteGenerator {
    async fn regenerate(&self, trigger: &PageEvent) -> Result<(), GenerateError> {
        let generator = self.clone();
        let trigger = trigger.clone();

        tokio::task::spawn_blocking(move || generator.generate(Some(&trigger)).map(|_| ()))
            .await
            .map_err(|e| GenerateError::Task(e.to_string()))?
    }
}
