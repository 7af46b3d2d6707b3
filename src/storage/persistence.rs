//! Load and save the persisted route tree.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::{StorageError, StorageResult};
use crate::routes::PersistedRoute;

/// The routes artifact. Only the regeneration pipeline writes it.
#[derive(Debug, Clone)]
pub struct RouteStore {
    path: PathBuf,
}

impl RouteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the previously persisted tree.
    ///
    /// A missing file, a blank file and `[]` all mean "no routes yet".
    pub fn load(&self) -> StorageResult<Vec<PersistedRoute>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| StorageError::Malformed {
            path: self.path.clone(),
            details: e.to_string(),
        })
    }

    pub fn save(&self, routes: &[PersistedRoute]) -> StorageResult<()> {
        write_json(&self.path, &routes)
    }
}

/// Write pretty JSON, creating parent directories as needed.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');

    fs::write(path, json).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })
}
