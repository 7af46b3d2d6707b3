//! Regeneration merge of a hand-edited route tree with a fresh one.
//!
//! Structural facts (`path`) always come from the fresh tree. Everything
//! else the user already set on the persisted tree is kept; fresh values
//! only fill in fields that are unset there.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::file::{MetaGenerator, is_route_group};
use super::tree::RouteTree;

/// A route as stored in the hand-editable routes artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRoute {
    #[serde(default)]
    pub matched_files: Option<Vec<Option<String>>>,
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    /// User metadata. Always `null` for route groups.
    #[serde(default)]
    pub handle: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<PersistedRoute>>,
    /// Fields added by hand that synthesis never produces
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PersistedRoute {
    /// Convert a synthesized tree, tagging each node with generated metadata.
    pub fn from_tree(tree: &RouteTree, meta: &MetaGenerator) -> Self {
        let handle = if is_route_group(&tree.route_name) {
            Value::Null
        } else {
            meta(&tree.route_name)
        };

        let children = tree
            .children
            .as_ref()
            .filter(|children| !children.is_empty())
            .map(|children| {
                children
                    .iter()
                    .map(|child| Self::from_tree(child, meta))
                    .collect()
            });

        Self {
            matched_files: Some(tree.matched_files.to_vec()),
            name: tree.route_name.clone(),
            path: tree.route_path.clone(),
            handle,
            children,
            extra: Map::new(),
        }
    }

    fn children(&self) -> &[PersistedRoute] {
        self.children.as_deref().unwrap_or_default()
    }
}

/// Convert a synthesized forest with [`PersistedRoute::from_tree`].
pub fn to_persisted(trees: &[RouteTree], meta: &MetaGenerator) -> Vec<PersistedRoute> {
    trees
        .iter()
        .map(|tree| PersistedRoute::from_tree(tree, meta))
        .collect()
}

/// Truthiness of a stored value: `null`, `false`, `0`, `""` and missing
/// count as unset. Arrays and objects are always set, even when empty.
pub fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64().is_none_or(|f| f == 0.0 || f.is_nan()),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// Merge a fresh forest into the previously persisted one.
///
/// The fresh forest decides which routes exist and in what order. Each
/// fresh route found by name in the old forest starts from the old node.
/// Never fails.
pub fn merge_route_trees(old: &[PersistedRoute], new: &[PersistedRoute]) -> Vec<PersistedRoute> {
    let index = index_by_name(old);
    merge_level(&index, new)
}

/// Name index over a forest in pre-order; a later duplicate replaces an earlier one.
fn index_by_name(routes: &[PersistedRoute]) -> HashMap<&str, &PersistedRoute> {
    let mut index = HashMap::new();
    let mut stack: Vec<&PersistedRoute> = routes.iter().rev().collect();

    while let Some(route) = stack.pop() {
        index.insert(route.name.as_str(), route);
        stack.extend(route.children().iter().rev());
    }

    index
}

fn merge_level(
    index: &HashMap<&str, &PersistedRoute>,
    new: &[PersistedRoute],
) -> Vec<PersistedRoute> {
    new.iter()
        .map(|route| match index.get(route.name.as_str()) {
            Some(old) => merge_route(old, route, index),
            None => route.clone(),
        })
        .collect()
}

fn merge_route(
    old: &PersistedRoute,
    new: &PersistedRoute,
    index: &HashMap<&str, &PersistedRoute>,
) -> PersistedRoute {
    let mut merged = old.clone();
    merged.path = new.path.clone();

    if merged.name.is_empty() {
        merged.name = new.name.clone();
    }
    if merged.matched_files.is_none() {
        merged.matched_files = new.matched_files.clone();
    }
    fill_unset(&mut merged.extra, &new.extra);

    if !new.children().is_empty() {
        merged.children = Some(merge_level(index, new.children()));
    }

    if is_falsy(Some(&merged.handle)) && !is_falsy(Some(&new.handle)) {
        merged.handle = new.handle.clone();
    } else if let (Value::Object(target), Value::Object(source)) = (&mut merged.handle, &new.handle)
    {
        fill_unset(target, source);
    }

    merged
}

/// Copy every key of `source` whose value in `target` is unset.
fn fill_unset(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        if is_falsy(target.get(key)) {
            target.insert(key.clone(), value.clone());
        }
    }
}
