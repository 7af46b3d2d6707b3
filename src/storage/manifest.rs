//! Route manifest: the route map, the route names and the import tables
//! that downstream emitters render.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::persistence::write_json;
use super::{StorageError, StorageResult};
use crate::config::CustomRoutesConfig;
use crate::routes::{
    PageFile, RouteEntry, RouteMaps, SpecialFile, Synthesizer, expand_route_names, locale_compare,
};

/// Import paths keyed by route name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportTables {
    pub layouts: IndexMap<String, String>,
    pub pages: IndexMap<String, String>,
    pub errors: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteManifest {
    /// Route name -> route path; routes without a path are left out
    pub routes: IndexMap<String, String>,
    /// Every route name, route groups included
    pub names: Vec<String>,
    pub imports: ImportTables,
}

impl RouteManifest {
    /// Assemble the manifest from one synthesis pass.
    ///
    /// Custom entries come first, followed by the synthesized ones.
    pub fn build(files: &[PageFile], entries: &[RouteEntry], custom: &[RouteEntry]) -> Self {
        let all = || custom.iter().chain(entries);

        let routes = all()
            .filter_map(|(name, path)| path.as_ref().map(|path| (name.clone(), path.clone())))
            .collect();
        let names = all().map(|(name, _)| name.clone()).collect();

        let mut imports = ImportTables::default();
        for file in files {
            let table = match SpecialFile::classify(&file.glob) {
                SpecialFile::Layout => &mut imports.layouts,
                SpecialFile::Error => &mut imports.errors,
                SpecialFile::Loading => continue,
                SpecialFile::Index | SpecialFile::Other => &mut imports.pages,
            };
            table.insert(file.route_name.clone(), file.import_alias_path.clone());
        }

        Self {
            routes,
            names,
            imports,
        }
    }

    pub fn route_path(&self, name: &str) -> Option<&str> {
        self.routes.get(name).map(String::as_str)
    }

    /// First route name whose path equals `path`.
    pub fn route_name(&self, path: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|(_, route_path)| route_path.as_str() == path)
            .map(|(name, _)| name.as_str())
    }

    pub fn save(&self, path: &Path) -> StorageResult<()> {
        write_json(path, self)
    }

    pub fn load(path: &Path) -> StorageResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| StorageError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| StorageError::Malformed {
            path: path.to_path_buf(),
            details: e.to_string(),
        })
    }
}

/// Entries for routes declared in settings rather than by page files.
///
/// Explicit map entries keep their configured paths. Listed names are
/// ancestor-expanded with convention-derived paths. Names the page files
/// already define are skipped.
pub fn custom_route_entries(
    custom: &CustomRoutesConfig,
    synthesized: &RouteMaps,
    synthesizer: &Synthesizer,
) -> Vec<RouteEntry> {
    let mut known = synthesized.clone();
    let first_custom = known.len();

    for (name, path) in &custom.map {
        if !known.contains_key(name) {
            known.insert(name.clone(), Some(path.clone()));
        }
    }

    expand_route_names(&mut known, custom.names.iter().map(String::as_str), synthesizer);

    let mut entries: Vec<RouteEntry> = known
        .into_iter()
        .skip(first_custom)
        .collect();
    entries.sort_by(|a, b| locale_compare(&a.0, &b.0));
    entries
}
