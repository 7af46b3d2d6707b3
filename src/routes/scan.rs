//! Page discovery: which files under the page directory are pages.

use glob::{MatchOptions, Pattern};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use super::constants::PATH_SPLITTER;
use crate::config::Settings;
use crate::error::ScanError;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Source of page globs, relative to the page directory.
///
/// Implementations must return files only, sorted by byte order.
pub trait GlobProvider: Send + Sync {
    fn globs(&self) -> Result<Vec<String>, ScanError>;
}

/// Compiled include and exclude patterns.
#[derive(Debug, Clone)]
pub struct PagePatterns {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl PagePatterns {
    /// Compile patterns, silently skipping any that do not parse.
    ///
    /// `Settings::validate` reports bad patterns before this is reached.
    pub fn new(include: &[String], exclude: &[String]) -> Self {
        let compile = |patterns: &[String]| {
            patterns
                .iter()
                .filter_map(|p| Pattern::new(p).ok())
                .collect::<Vec<_>>()
        };
        Self {
            include: compile(include),
            exclude: compile(exclude),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.pages.patterns, &settings.pages.exclude_patterns)
    }

    pub fn is_excluded(&self, glob: &str) -> bool {
        self.exclude
            .iter()
            .any(|p| p.matches_with(glob, MATCH_OPTIONS))
    }

    /// Whether a relative `/`-separated path is a page file.
    pub fn is_page(&self, glob: &str) -> bool {
        !is_hidden(glob)
            && !self.is_excluded(glob)
            && self
                .include
                .iter()
                .any(|p| p.matches_with(glob, MATCH_OPTIONS))
    }
}

/// Walks the page directory on disk.
#[derive(Debug, Clone)]
pub struct PageScanner {
    page_root: PathBuf,
    patterns: PagePatterns,
}

impl PageScanner {
    pub fn new(page_root: impl Into<PathBuf>, patterns: PagePatterns) -> Self {
        Self {
            page_root: page_root.into(),
            patterns,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.page_root(), PagePatterns::from_settings(settings))
    }

    pub fn page_root(&self) -> &Path {
        &self.page_root
    }

    pub fn patterns(&self) -> &PagePatterns {
        &self.patterns
    }
}

impl GlobProvider for PageScanner {
    fn globs(&self) -> Result<Vec<String>, ScanError> {
        if !self.page_root.is_dir() {
            tracing::debug!(
                "[scan] page directory {} does not exist",
                self.page_root.display()
            );
            return Ok(Vec::new());
        }

        walk_pages(&self.page_root, &self.page_root, &self.patterns)
    }
}

/// Page globs (relative to `page_root`) of every page file below `dir`, sorted.
///
/// Hidden files and directories are skipped; ignore files are not consulted,
/// so only the patterns decide what is a page.
pub fn walk_pages(
    page_root: &Path,
    dir: &Path,
    patterns: &PagePatterns,
) -> Result<Vec<String>, ScanError> {
    let walker = WalkBuilder::new(dir)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .follow_links(false)
        .build();

    let mut globs = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| ScanError::Walk {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let Some(glob) = relative_glob(page_root, entry.path()) else {
            continue;
        };

        if patterns.is_page(&glob) {
            globs.push(glob);
        }
    }

    globs.sort();
    Ok(globs)
}

/// Whether any segment of a relative glob starts with a dot.
pub fn is_hidden(glob: &str) -> bool {
    glob.split(PATH_SPLITTER).any(|segment| segment.starts_with('.'))
}

/// `path` relative to `root`, `/`-separated. `None` outside the root or
/// for non-UTF-8 names.
pub fn relative_glob(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;

    if parts.is_empty() {
        return None;
    }

    let separator = PATH_SPLITTER.to_string();
    Some(parts.join(separator.as_str()))
}

/// A fixed glob list, sorted on construction.
#[derive(Debug, Clone, Default)]
pub struct StaticGlobs(Vec<String>);

impl StaticGlobs {
    pub fn new<I, S>(globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut globs: Vec<String> = globs.into_iter().map(Into::into).collect();
        globs.sort();
        Self(globs)
    }
}

impl GlobProvider for StaticGlobs {
    fn globs(&self) -> Result<Vec<String>, ScanError> {
        Ok(self.0.clone())
    }
}
