//! Route forest assembly.
//!
//! Names are grouped by their first segment and bucketed by depth, then
//! linked through a name-indexed arena (each node records its parent) and
//! materialized bottom-up, so deeply nested conventions never recurse.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

use super::constants::{
    MATCHED_FILE_SLOTS, NOT_FOUND_PAGE_NAME, NOT_FOUND_ROUTE_NAME, NOT_FOUND_ROUTE_PATH,
    PAGE_DEGREE_SPLITTER, ROOT_ROUTE_NAME,
};
use super::file::{PageFile, is_route_group};
use super::map::{RouteEntry, RouteMaps};
use super::special::SpecialFile;

/// Special files of one route: `[layout, index, loading, error]`.
///
/// Layout and error slots hold the route name (a lookup key); index and
/// loading slots hold `/` + the import path.
pub type MatchedFiles = [Option<String>; MATCHED_FILE_SLOTS];

/// A node of the synthesized route forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTree {
    pub route_name: String,
    pub route_path: Option<String>,
    pub matched_files: MatchedFiles,
    /// Filesystem location of the first page file backing this route
    pub full_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RouteTree>>,
}

impl RouteTree {
    /// A fresh catch-all node. Built per call, never shared.
    pub fn not_found() -> Self {
        Self {
            route_name: NOT_FOUND_ROUTE_NAME.to_string(),
            route_path: Some(NOT_FOUND_ROUTE_PATH.to_string()),
            matched_files: [None, Some(NOT_FOUND_PAGE_NAME.to_string()), None, None],
            full_path: Some(PathBuf::from(NOT_FOUND_ROUTE_PATH)),
            children: None,
        }
    }

    pub fn children(&self) -> &[RouteTree] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Pre-order walk over this node and all descendants.
    pub fn walk(&self) -> Vec<&RouteTree> {
        let mut visited = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            visited.push(node);
            stack.extend(node.children().iter().rev());
        }
        visited
    }
}

/// Page files were not sorted by glob, so files sharing a route name may
/// not be adjacent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Page files are not sorted: '{previous}' precedes '{next}'")]
pub struct SortViolation {
    pub previous: String,
    pub next: String,
}

/// Check the ordering precondition of matched-file resolution.
pub fn check_sorted(files: &[PageFile]) -> Result<(), SortViolation> {
    match files.windows(2).find(|pair| pair[0].glob > pair[1].glob) {
        Some(pair) => Err(SortViolation {
            previous: pair[0].glob.clone(),
            next: pair[1].glob.clone(),
        }),
        None => Ok(()),
    }
}

/// Resolve the special files of `route_name` from sorted page files.
///
/// Scans from the first file with that name while the name keeps matching,
/// looking at no more than one file per slot.
pub fn find_matched_files(files: &[PageFile], route_name: &str) -> (Option<PathBuf>, MatchedFiles) {
    let mut matched: MatchedFiles = Default::default();

    let Some(start) = files.iter().position(|f| f.route_name == route_name) else {
        return (None, matched);
    };

    let group = is_route_group(route_name);

    for file in files[start..]
        .iter()
        .take(MATCHED_FILE_SLOTS)
        .take_while(|f| f.route_name == route_name)
    {
        let kind = SpecialFile::classify(&file.glob);
        let value = match kind {
            SpecialFile::Layout | SpecialFile::Error => file.route_name.clone(),
            SpecialFile::Index if group => continue,
            SpecialFile::Index | SpecialFile::Loading => format!("/{}", file.import_path),
            SpecialFile::Other => continue,
        };
        if let Some(slot) = kind.slot() {
            matched[slot] = Some(value);
        }
    }

    (Some(files[start].full_path.clone()), matched)
}

struct ArenaNode<'a> {
    name: &'a str,
    parent: Option<usize>,
}

/// Build the route forest from sorted entries, the name map and sorted files.
///
/// A `root` route with a layout becomes the single top-level node and adopts
/// every other first-level route. A fresh `notFound` node is always appended
/// at the top level, or below a promoted root.
pub fn build_route_trees(
    entries: &[RouteEntry],
    maps: &RouteMaps,
    files: &[PageFile],
) -> Vec<RouteTree> {
    // first-level name -> names bucketed by depth (segments - 2)
    let mut classified: IndexMap<&str, Vec<Vec<&str>>> = IndexMap::new();

    for (route_name, _) in entries {
        match route_name.split_once(PAGE_DEGREE_SPLITTER) {
            None => {
                classified.entry(route_name.as_str()).or_default();
            }
            Some((first_level, _)) => {
                let depth = route_name.split(PAGE_DEGREE_SPLITTER).count() - 2;
                let buckets = classified.entry(first_level).or_default();
                if buckets.len() <= depth {
                    buckets.resize_with(depth + 1, Vec::new);
                }
                buckets[depth].push(route_name.as_str());
            }
        }
    }

    let make_node = |name: &str| {
        let (full_path, matched_files) = find_matched_files(files, name);
        RouteTree {
            route_name: name.to_string(),
            route_path: maps.get(name).cloned().flatten(),
            matched_files,
            full_path,
            children: None,
        }
    };

    let mut trees: Vec<RouteTree> = classified
        .iter()
        .map(|(first_level, buckets)| assemble(first_level, buckets, &make_node))
        .collect();

    let root_index = trees
        .iter()
        .position(|tree| tree.route_name == ROOT_ROUTE_NAME && tree.matched_files[0].is_some());

    if let Some(root_index) = root_index {
        let mut root = trees.remove(root_index);
        inject_not_found(&mut trees);
        root.children = Some(trees);
        return vec![root];
    }

    inject_not_found(&mut trees);
    trees
}

/// Link one first-level route and its descendants, then materialize them.
fn assemble<'a>(
    first_level: &'a str,
    buckets: &[Vec<&'a str>],
    make_node: &impl Fn(&str) -> RouteTree,
) -> RouteTree {
    let mut arena = vec![ArenaNode {
        name: first_level,
        parent: None,
    }];
    let mut index: HashMap<&str, usize> = HashMap::from([(first_level, 0)]);

    for bucket in buckets {
        for &name in bucket {
            let Some((parent_name, _)) = name.rsplit_once(PAGE_DEGREE_SPLITTER) else {
                continue;
            };
            // Orphans (no parent one degree up) are not attached
            let Some(&parent) = index.get(parent_name) else {
                continue;
            };
            index.insert(name, arena.len());
            arena.push(ArenaNode {
                name,
                parent: Some(parent),
            });
        }
    }

    // Ids grow with depth, so walking backwards finishes every child before
    // its parent. Siblings arrive in reverse and are flipped once complete.
    let mut pending: Vec<Vec<RouteTree>> = vec![Vec::new(); arena.len()];
    let mut root = None;
    for (id, arena_node) in arena.iter().enumerate().rev() {
        let mut node = make_node(arena_node.name);
        let mut children = std::mem::take(&mut pending[id]);
        if !children.is_empty() {
            children.reverse();
            node.children = Some(children);
        }
        match arena_node.parent {
            Some(parent) => pending[parent].push(node),
            None => root = Some(node),
        }
    }

    root.unwrap_or_else(|| make_node(first_level))
}

/// Append a fresh not-found node, adopting the special files of a `404` route.
fn inject_not_found(routes: &mut Vec<RouteTree>) {
    let mut not_found = RouteTree::not_found();
    if let Some(page) = routes.iter().find(|r| r.route_name == NOT_FOUND_PAGE_NAME) {
        not_found.matched_files = page.matched_files.clone();
    }
    routes.push(not_found);
}
