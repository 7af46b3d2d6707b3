//! Page file descriptors and route name/path synthesis.
//!
//! A page glob such as `user/[id].tsx` becomes a [`PageFile`] carrying the
//! route name (`user_[id]`), the route path (`/user/:id`) and import paths.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::constants::{
    CATCH_ALL_SEGMENT_PATTERN, DYNAMIC_SEGMENT_PATTERN, PAGE_DEGREE_SPLITTER,
    PAGE_FILE_NAME_WITH_SQUARE_BRACKETS_PATTERN, PATH_SPLITTER, ROOT_ROUTE_NAME,
    ROUTE_GROUP_SEGMENT_PATTERN,
};
use super::validate::validate_page_glob;
use crate::config::Settings;
use crate::error::SynthesisWarning;

/// Rewrites a synthesized route name.
pub type NameTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Rewrites a route path given the (transformed) route name.
pub type PathTransform = Arc<dyn Fn(&str, Option<String>) -> Option<String> + Send + Sync>;

/// Produces the user metadata (`handle`) of a persisted route.
pub type MetaGenerator = Arc<dyn Fn(&str) -> serde_json::Value + Send + Sync>;

/// Caller-supplied hooks applied during synthesis and persistence.
#[derive(Clone)]
pub struct RouteTransforms {
    pub name: NameTransform,
    pub path: PathTransform,
    pub meta: MetaGenerator,
}

impl Default for RouteTransforms {
    fn default() -> Self {
        Self {
            name: Arc::new(|name: &str| name.to_string()),
            path: Arc::new(|_name: &str, path: Option<String>| path),
            meta: Arc::new(|name: &str| serde_json::json!({ "title": name })),
        }
    }
}

impl fmt::Debug for RouteTransforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTransforms").finish_non_exhaustive()
    }
}

/// One page file and the route it defines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFile {
    /// Path relative to the page directory, `/`-separated
    pub glob: String,
    /// Absolute filesystem location
    pub full_path: PathBuf,
    /// Page directory joined with the glob (`src/pages/user/index.tsx`)
    pub import_path: String,
    /// Import path with the first matching alias applied (`@/pages/user/index.tsx`)
    pub import_alias_path: String,
    pub route_name: String,
    pub route_path: Option<String>,
}

/// Maps page globs to [`PageFile`] descriptors.
///
/// Synthesis is a pure function of its inputs: the same glob always yields
/// the same descriptor.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    project_root: PathBuf,
    page_dir: String,
    alias: IndexMap<String, String>,
    transforms: RouteTransforms,
}

impl Synthesizer {
    pub fn new(
        project_root: impl Into<PathBuf>,
        page_dir: impl Into<String>,
        alias: IndexMap<String, String>,
        transforms: RouteTransforms,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            page_dir: page_dir.into(),
            alias,
            transforms,
        }
    }

    pub fn from_settings(settings: &Settings, transforms: RouteTransforms) -> Self {
        Self::new(
            settings.project_root(),
            settings.pages.dir.clone(),
            settings.alias.clone(),
            transforms,
        )
    }

    pub fn transforms(&self) -> &RouteTransforms {
        &self.transforms
    }

    /// Build the descriptor for one page glob.
    pub fn page_file(&self, glob: &str) -> Result<PageFile, SynthesisWarning> {
        validate_page_glob(glob)?;

        let full_path = self.page_root().join(glob);
        let import_path = join_posix(&self.page_dir, glob);
        let import_alias_path = self.apply_alias(&import_path);

        let mut segments: Vec<&str> = glob.split(PATH_SPLITTER).collect();
        let file = segments.pop().unwrap_or_default();

        let mut name_segments: Vec<&str> = segments
            .into_iter()
            .filter(|dir| !dir.starts_with(PAGE_DEGREE_SPLITTER))
            .collect();

        if PAGE_FILE_NAME_WITH_SQUARE_BRACKETS_PATTERN.is_match(file) {
            let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
            name_segments.push(stem);
        }

        let route_name = if name_segments.is_empty() {
            ROOT_ROUTE_NAME.to_string()
        } else {
            let separator = PAGE_DEGREE_SPLITTER.to_string();
            let joined = name_segments.join(separator.as_str()).to_lowercase();
            (self.transforms.name)(&joined)
        };

        let route_path = self.transformed_path(&route_name, route_name_to_path(&route_name));

        Ok(PageFile {
            glob: glob.to_string(),
            full_path,
            import_path,
            import_alias_path,
            route_name,
            route_path,
        })
    }

    /// Apply the name transform to a name that has no backing file.
    pub fn transform_name(&self, name: &str) -> String {
        (self.transforms.name)(name)
    }

    /// Derive the route path of `name` and run it through the path transform.
    pub fn route_path(&self, transformed_name: &str, name: &str) -> Option<String> {
        self.transformed_path(transformed_name, route_name_to_path(name))
    }

    fn transformed_path(&self, name: &str, path: Option<String>) -> Option<String> {
        let transformed = (self.transforms.path)(name, path.clone());
        if transformed.is_none() && !is_route_group(name) {
            tracing::warn!("[synthesis] path transform dropped the path of '{name}', keeping it");
            return path;
        }
        transformed
    }

    fn apply_alias(&self, import_path: &str) -> String {
        self.alias
            .iter()
            .find(|(_, dir)| import_path.starts_with(dir.as_str()))
            .map(|(alias, dir)| import_path.replacen(dir.as_str(), alias, 1))
            .unwrap_or_else(|| import_path.to_string())
    }

    pub fn page_root(&self) -> PathBuf {
        self.project_root.join(&self.page_dir)
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

/// Whether the last segment of a route name is a route group `(name)`.
pub fn is_route_group(name: &str) -> bool {
    name.rsplit(PAGE_DEGREE_SPLITTER)
        .next()
        .is_some_and(|last| last.starts_with('(') && last.ends_with(')'))
}

/// Split a route name into its cumulative ancestor chain.
///
/// `a_b_c` becomes `["a", "a_b", "a_b_c"]`.
pub fn split_route_name(name: &str) -> Vec<String> {
    let mut chain: Vec<String> = Vec::new();
    for segment in name.split(PAGE_DEGREE_SPLITTER) {
        let next = match chain.last() {
            Some(last) => format!("{last}{PAGE_DEGREE_SPLITTER}{segment}"),
            None => segment.to_string(),
        };
        chain.push(next);
    }
    chain
}

/// Derive a route path from a route name.
///
/// Group segments are dropped, `[...x]` becomes `*`, `[x]` becomes `:x` and
/// degree separators become path separators. Pure group names have no path.
pub fn route_name_to_path(name: &str) -> Option<String> {
    if name == ROOT_ROUTE_NAME {
        return Some(PATH_SPLITTER.to_string());
    }

    if is_route_group(name) {
        return None;
    }

    let without_groups = ROUTE_GROUP_SEGMENT_PATTERN.replace_all(name, "");
    let with_catch_all = CATCH_ALL_SEGMENT_PATTERN.replace_all(&without_groups, "*");
    let with_params = DYNAMIC_SEGMENT_PATTERN.replace_all(&with_catch_all, ":$1");
    let path = with_params.replace(PAGE_DEGREE_SPLITTER, &PATH_SPLITTER.to_string());

    Some(format!("{PATH_SPLITTER}{path}"))
}

fn join_posix(base: &str, glob: &str) -> String {
    let base = base.trim_start_matches("./").trim_end_matches(PATH_SPLITTER);
    if base.is_empty() || base == "." {
        glob.to_string()
    } else {
        format!("{base}{PATH_SPLITTER}{glob}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthesizer() -> Synthesizer {
        Synthesizer::new(
            "/project",
            "src/pages",
            IndexMap::from([("@".to_string(), "src".to_string())]),
            RouteTransforms::default(),
        )
    }

    #[test]
    fn test_root_index() {
        let file = synthesizer().page_file("index.tsx").unwrap();
        assert_eq!(file.route_name, "root");
        assert_eq!(file.route_path.as_deref(), Some("/"));
        assert_eq!(file.import_path, "src/pages/index.tsx");
        assert_eq!(file.import_alias_path, "@/pages/index.tsx");
        assert_eq!(file.full_path, PathBuf::from("/project/src/pages/index.tsx"));
    }

    #[test]
    fn test_nested_and_dynamic() {
        let synth = synthesizer();

        let file = synth.page_file("about/index.tsx").unwrap();
        assert_eq!(file.route_name, "about");
        assert_eq!(file.route_path.as_deref(), Some("/about"));

        let file = synth.page_file("user/[id].tsx").unwrap();
        assert_eq!(file.route_name, "user_[id]");
        assert_eq!(file.route_path.as_deref(), Some("/user/:id"));

        let file = synth.page_file("docs/[...all].tsx").unwrap();
        assert_eq!(file.route_name, "docs_[...all]");
        assert_eq!(file.route_path.as_deref(), Some("/docs/*"));
    }

    #[test]
    fn test_virtual_directories_are_skipped() {
        let file = synthesizer()
            .page_file("manage/_components-free/role/index.tsx")
            .unwrap();
        assert_eq!(file.route_name, "manage_role");
        assert_eq!(file.route_path.as_deref(), Some("/manage/role"));
    }

    #[test]
    fn test_route_groups() {
        let synth = synthesizer();

        let file = synth.page_file("(auth)/layout.tsx").unwrap();
        assert_eq!(file.route_name, "(auth)");
        assert_eq!(file.route_path, None);

        let file = synth.page_file("(auth)/login/index.tsx").unwrap();
        assert_eq!(file.route_name, "(auth)_login");
        assert_eq!(file.route_path.as_deref(), Some("/login"));
    }

    #[test]
    fn test_names_are_lowercased() {
        let file = synthesizer().page_file("Manage/userInfo/index.tsx").unwrap();
        assert_eq!(file.route_name, "manage_userinfo");
        assert_eq!(file.route_path.as_deref(), Some("/manage/userinfo"));
    }

    #[test]
    fn test_transforms_apply() {
        let transforms = RouteTransforms {
            name: Arc::new(|name: &str| format!("app-{name}")),
            path: Arc::new(|_name: &str, path: Option<String>| path.map(|p| format!("/v2{p}"))),
            ..RouteTransforms::default()
        };
        let synth = Synthesizer::new("/project", "src/pages", IndexMap::new(), transforms);

        let file = synth.page_file("about/index.tsx").unwrap();
        assert_eq!(file.route_name, "app-about");
        assert_eq!(file.route_path.as_deref(), Some("/v2/app-about"));
        assert_eq!(file.import_alias_path, "src/pages/about/index.tsx");

        // The root name is fixed regardless of the name transform
        let file = synth.page_file("index.tsx").unwrap();
        assert_eq!(file.route_name, "root");
    }

    #[test]
    fn test_invalid_glob_is_a_warning() {
        let warning = synthesizer().page_file("bad dir/index.tsx").unwrap_err();
        assert_eq!(warning.glob, "bad dir/index.tsx");
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let synth = synthesizer();
        assert_eq!(
            synth.page_file("a/b/[id].tsx").unwrap(),
            synth.page_file("a/b/[id].tsx").unwrap()
        );
    }

    #[test]
    fn test_split_route_name() {
        assert_eq!(split_route_name("a_b_c"), vec!["a", "a_b", "a_b_c"]);
        assert_eq!(split_route_name("root"), vec!["root"]);
    }

    #[test]
    fn test_route_name_to_path() {
        assert_eq!(route_name_to_path("root").as_deref(), Some("/"));
        assert_eq!(route_name_to_path("a_b_c").as_deref(), Some("/a/b/c"));
        assert_eq!(route_name_to_path("a_(g)").as_deref(), None);
        assert_eq!(route_name_to_path("a_(g)_b").as_deref(), Some("/a/b"));
        assert_eq!(
            route_name_to_path("blog_[slug]_[...rest]").as_deref(),
            Some("/blog/:slug/*")
        );
    }

    #[test]
    fn test_is_route_group() {
        assert!(is_route_group("(auth)"));
        assert!(is_route_group("a_(auth)"));
        assert!(!is_route_group("(auth)_login"));
    }
}
