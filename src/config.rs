//! Configuration module for the route generator.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file (`.routegen/settings.toml`)
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `ROUTEGEN_` and use double
//! underscores to separate nested levels:
//! - `ROUTEGEN_PAGES__DIR=app/pages` sets `pages.dir`
//! - `ROUTEGEN_WATCH__DEBOUNCE_MS=250` sets `watch.debounce_ms`
//! - `ROUTEGEN_LOG=false` silences progress logging

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const CONFIG_DIR: &str = ".routegen";
const CONFIG_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "ROUTEGEN_";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Project root; page and output paths are resolved against it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,

    /// Emit progress logs for scans and regenerations
    #[serde(default = "default_true")]
    pub log: bool,

    /// Page discovery settings
    #[serde(default)]
    pub pages: PagesConfig,

    /// Import path aliases: alias -> path prefix (e.g. `@` -> `src`)
    #[serde(default = "default_alias")]
    pub alias: IndexMap<String, String>,

    /// Generated artifact locations
    #[serde(default)]
    pub output: OutputConfig,

    /// Routes declared by hand rather than by page files
    #[serde(default)]
    pub custom_routes: CustomRoutesConfig,

    /// File watcher settings
    #[serde(default)]
    pub watch: WatchConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PagesConfig {
    /// Page directory relative to the project root
    #[serde(default = "default_page_dir")]
    pub dir: String,

    /// Glob patterns selecting page files
    #[serde(default = "default_page_patterns")]
    pub patterns: Vec<String>,

    /// Glob patterns excluded from page discovery and watching
    #[serde(default = "default_page_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Hand-editable route tree, merged on every regeneration
    #[serde(default = "default_routes_output")]
    pub routes: PathBuf,

    /// Route map, route names and import tables
    #[serde(default = "default_manifest_output")]
    pub manifest: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CustomRoutesConfig {
    /// Explicit name -> path entries
    #[serde(default = "default_custom_route_map")]
    pub map: IndexMap<String, String>,

    /// Names whose paths are derived by the naming convention
    #[serde(default)]
    pub names: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WatchConfig {
    /// Quiet window after the first change before regenerating
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Capacity of the filesystem event queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Default level for all targets
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module overrides (target -> level)
    #[serde(default = "default_log_modules")]
    pub modules: HashMap<String, String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_page_dir() -> String {
    "src/pages".to_string()
}
fn default_page_patterns() -> Vec<String> {
    [
        "**/index.tsx",
        "**/[[]*[]].tsx",
        "**/layout.tsx",
        "**/loading.tsx",
        "**/error.tsx",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}
fn default_page_exclude_patterns() -> Vec<String> {
    vec!["**/components/**".to_string(), "**/modules/**".to_string()]
}
fn default_alias() -> IndexMap<String, String> {
    IndexMap::from([("@".to_string(), "src".to_string())])
}
fn default_routes_output() -> PathBuf {
    PathBuf::from("src/router/elegant/routes.json")
}
fn default_manifest_output() -> PathBuf {
    PathBuf::from("src/router/elegant/manifest.json")
}
fn default_custom_route_map() -> IndexMap<String, String> {
    IndexMap::from([
        ("not-found".to_string(), "*".to_string()),
        ("root".to_string(), "/".to_string()),
    ])
}
fn default_debounce_ms() -> u64 {
    500
}
fn default_queue_capacity() -> usize {
    100
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_log_modules() -> HashMap<String, String> {
    HashMap::from([("routegen".to_string(), "info".to_string())])
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            cwd: None,
            log: true,
            pages: PagesConfig::default(),
            alias: default_alias(),
            output: OutputConfig::default(),
            custom_routes: CustomRoutesConfig::default(),
            watch: WatchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            dir: default_page_dir(),
            patterns: default_page_patterns(),
            exclude_patterns: default_page_exclude_patterns(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            routes: default_routes_output(),
            manifest: default_manifest_output(),
        }
    }
}

impl Default for CustomRoutesConfig {
    fn default() -> Self {
        Self {
            map: default_custom_route_map(),
            names: Vec::new(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: default_log_modules(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, ConfigError> {
        // Try to find the workspace root by looking for .routegen directory
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));

        Self::figment(&config_path)
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
            .map(|mut settings: Settings| {
                // If cwd is not set in config, use the detected workspace root
                if settings.cwd.is_none() {
                    settings.cwd = Self::workspace_root();
                }
                settings
            })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::figment(path.as_ref())
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    fn figment(config_path: &Path) -> Figment {
        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(config_path))
            // Double underscore separates nested levels
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }

    /// Find the settings file by looking for a .routegen directory
    /// from the current directory up to the filesystem root
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Get the workspace root directory (where .routegen is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Reject settings that cannot drive a scan.
    ///
    /// Called once at startup; any error here is fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (alias, target) in &self.alias {
            if alias.trim().is_empty() {
                return Err(ConfigError::InvalidAlias {
                    alias: alias.clone(),
                    target: target.clone(),
                    reason: "alias must not be empty".to_string(),
                });
            }
            if target.trim().is_empty() {
                return Err(ConfigError::InvalidAlias {
                    alias: alias.clone(),
                    target: target.clone(),
                    reason: "alias target must not be empty".to_string(),
                });
            }
        }

        for pattern in self
            .pages
            .patterns
            .iter()
            .chain(&self.pages.exclude_patterns)
        {
            glob::Pattern::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
        }

        if self.pages.patterns.is_empty() {
            return Err(ConfigError::InvalidPattern {
                pattern: String::new(),
                reason: "at least one page pattern is required".to_string(),
            });
        }

        Ok(())
    }

    /// Project root all relative paths are resolved against
    pub fn project_root(&self) -> PathBuf {
        self.cwd
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Absolute page directory
    pub fn page_root(&self) -> PathBuf {
        self.project_root().join(&self.pages.dir)
    }

    /// Absolute path of the persisted route tree
    pub fn routes_path(&self) -> PathBuf {
        self.project_root().join(&self.output.routes)
    }

    /// Absolute path of the route manifest
    pub fn manifest_path(&self) -> PathBuf {
        self.project_root().join(&self.output.manifest)
    }

    /// Logging configuration with progress output removed when `log` is off
    pub fn effective_logging(&self) -> LoggingConfig {
        let mut logging = self.logging.clone();
        if !self.log {
            logging.modules.remove("routegen");
        }
        logging
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let write_err = |reason: String| ConfigError::Write {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self).map_err(|e| write_err(e.to_string()))?;
        std::fs::write(path, toml_string).map_err(|e| write_err(e.to_string()))?;

        Ok(())
    }

    /// Create a default settings file under `.routegen/` in the current directory
    pub fn init_config_file(force: bool) -> Result<PathBuf, ConfigError> {
        let config_path = PathBuf::from(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err(ConfigError::AlreadyExists(config_path));
        }

        Settings::default().save(&config_path)?;

        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.pages.dir, "src/pages");
        assert_eq!(settings.pages.patterns.len(), 5);
        assert_eq!(settings.alias.get("@").map(String::as_str), Some("src"));
        assert_eq!(settings.watch.debounce_ms, 500);
        assert_eq!(settings.custom_routes.map["root"], "/");
        assert_eq!(settings.custom_routes.map["not-found"], "*");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");

        let toml_content = r#"
log = false

[pages]
dir = "app/views"
exclude_patterns = ["**/widgets/**"]

[watch]
debounce_ms = 250

[custom_routes]
names = ["custom_multi_first"]
"#;

        fs::write(&config_path, toml_content).unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert!(!settings.log);
        assert_eq!(settings.pages.dir, "app/views");
        assert_eq!(settings.pages.exclude_patterns, vec!["**/widgets/**"]);
        // Patterns not given keep their defaults
        assert_eq!(settings.pages.patterns.len(), 5);
        assert_eq!(settings.watch.debounce_ms, 250);
        assert_eq!(settings.watch.queue_capacity, 100);
        assert_eq!(settings.custom_routes.names, vec!["custom_multi_first"]);
        assert_eq!(settings.custom_routes.map["root"], "/");
    }

    #[test]
    fn test_save_settings() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        let mut settings = Settings::default();
        settings.pages.dir = "pages".to_string();
        settings.watch.debounce_ms = 42;

        settings.save(&config_path).unwrap();

        let loaded = Settings::load_from(&config_path).unwrap();
        assert_eq!(loaded.pages.dir, "pages");
        assert_eq!(loaded.watch.debounce_ms, 42);
    }

    #[test]
    fn test_validate_rejects_bad_pattern() {
        let mut settings = Settings::default();
        settings.pages.patterns.push("**/[unclosed.tsx".to_string());

        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_validate_rejects_empty_alias_target() {
        let mut settings = Settings::default();
        settings.alias.insert("~".to_string(), "  ".to_string());

        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAlias { .. }));
    }

    #[test]
    fn test_effective_logging_respects_log_flag() {
        let mut settings = Settings::default();
        assert!(settings.effective_logging().modules.contains_key("routegen"));

        settings.log = false;
        assert!(!settings.effective_logging().modules.contains_key("routegen"));
    }

    #[test]
    fn test_resolved_paths() {
        let settings = Settings {
            cwd: Some(PathBuf::from("/project")),
            ..Settings::default()
        };

        assert_eq!(settings.page_root(), PathBuf::from("/project/src/pages"));
        assert_eq!(
            settings.routes_path(),
            PathBuf::from("/project/src/router/elegant/routes.json")
        );
    }
}
