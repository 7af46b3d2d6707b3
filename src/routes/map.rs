//! Ancestor expansion: the complete name -> path map.
//!
//! Every page file contributes its own route plus every ancestor implied by
//! its name, so `a_b_c` also yields `a` and `a_b` even when no file backs them.

use indexmap::IndexMap;
use std::cmp::Ordering;

use super::file::{PageFile, Synthesizer, split_route_name};

/// Route name -> route path, in insertion order.
pub type RouteMaps = IndexMap<String, Option<String>>;

/// One `(name, path)` pair of the sorted entry list.
pub type RouteEntry = (String, Option<String>);

/// Build the name -> path map from sorted page files.
///
/// Insertion is first-wins: once a name is present, later files never
/// replace its path.
pub fn build_route_maps(files: &[PageFile], synthesizer: &Synthesizer) -> RouteMaps {
    let mut maps = RouteMaps::new();

    for file in files {
        for name in split_route_name(&file.route_name) {
            let is_same_name = name == file.route_name;

            let route_name = if is_same_name {
                name.clone()
            } else {
                synthesizer.transform_name(&name)
            };

            if maps.contains_key(&route_name) {
                continue;
            }

            let route_path = if is_same_name {
                file.route_path.clone()
            } else {
                synthesizer.route_path(&route_name, &name)
            };

            maps.insert(route_name, route_path);
        }
    }

    maps
}

/// Extend a map with names that have no page file (custom routes).
///
/// Names already present keep their paths.
pub fn expand_route_names<'a>(
    maps: &mut RouteMaps,
    names: impl IntoIterator<Item = &'a str>,
    synthesizer: &Synthesizer,
) {
    for full_name in names {
        for name in split_route_name(full_name) {
            let route_name = synthesizer.transform_name(&name);
            if !maps.contains_key(&route_name) {
                let route_path = synthesizer.route_path(&route_name, &name);
                maps.insert(route_name, route_path);
            }
        }
    }
}

/// Flatten the map into entries sorted by [`locale_compare`] on the name.
pub fn route_maps_to_entries(maps: &RouteMaps) -> Vec<RouteEntry> {
    let mut entries: Vec<RouteEntry> = maps
        .iter()
        .map(|(name, path)| (name.clone(), path.clone()))
        .collect();

    entries.sort_by(|a, b| locale_compare(&a.0, &b.0));
    entries
}

/// Collation order of ASCII punctuation, lowest first.
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Locale-aware string comparison in the style of root-locale collation.
///
/// Primary level: punctuation sorts before digits, digits before letters,
/// letters compare case-insensitively. A proper prefix sorts first. Ties are
/// broken with lowercase before uppercase, then by code point.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .map(primary_weight)
        .cmp(b.chars().map(primary_weight));

    primary
        .then_with(|| {
            a.chars()
                .map(|c| c.is_uppercase())
                .cmp(b.chars().map(|c| c.is_uppercase()))
        })
        .then_with(|| a.cmp(b))
}

fn primary_weight(c: char) -> (u8, u32) {
    if let Some(position) = PUNCTUATION_ORDER.find(c) {
        return (1, position as u32);
    }
    if c.is_whitespace() {
        return (0, c as u32);
    }
    if c.is_ascii_digit() {
        return (2, c as u32);
    }
    if c.is_alphabetic() {
        let lower = c.to_lowercase().next().unwrap_or(c);
        return (3, lower as u32);
    }
    (4, c as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::file::RouteTransforms;

    fn synthesizer() -> Synthesizer {
        Synthesizer::new(
            "/project",
            "src/pages",
            IndexMap::new(),
            RouteTransforms::default(),
        )
    }

    fn files(globs: &[&str]) -> Vec<PageFile> {
        let synth = synthesizer();
        globs.iter().map(|g| synth.page_file(g).unwrap()).collect()
    }

    #[test]
    fn test_ancestors_are_inserted() {
        let maps = build_route_maps(&files(&["a/b/c/index.tsx"]), &synthesizer());

        assert_eq!(maps.len(), 3);
        assert_eq!(maps["a"].as_deref(), Some("/a"));
        assert_eq!(maps["a_b"].as_deref(), Some("/a/b"));
        assert_eq!(maps["a_b_c"].as_deref(), Some("/a/b/c"));
    }

    #[test]
    fn test_ancestor_closure_holds() {
        let maps = build_route_maps(
            &files(&[
                "(auth)/login/index.tsx",
                "blog/[slug]/comments/index.tsx",
                "docs/[...all].tsx",
                "index.tsx",
            ]),
            &synthesizer(),
        );

        for name in maps.keys() {
            for prefix in split_route_name(name) {
                assert!(maps.contains_key(&prefix), "missing ancestor {prefix} of {name}");
            }
        }
    }

    #[test]
    fn test_first_insertion_wins() {
        let maps = build_route_maps(
            &files(&["user/[id].tsx", "user/index.tsx"]),
            &synthesizer(),
        );

        // `user` was inserted as an ancestor of `user_[id]` and kept its slot
        let keys: Vec<_> = maps.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["user", "user_[id]"]);
        assert_eq!(maps["user"].as_deref(), Some("/user"));
    }

    #[test]
    fn test_group_ancestor_has_no_path() {
        let maps = build_route_maps(&files(&["(auth)/login/index.tsx"]), &synthesizer());
        assert_eq!(maps["(auth)"], None);
        assert_eq!(maps["(auth)_login"].as_deref(), Some("/login"));
    }

    #[test]
    fn test_expand_route_names_keeps_existing() {
        let synth = synthesizer();
        let mut maps = build_route_maps(&files(&["custom/index.tsx"]), &synth);
        maps["custom"] = Some("/kept".to_string());

        expand_route_names(&mut maps, ["custom_multi_first"], &synth);

        assert_eq!(maps["custom"].as_deref(), Some("/kept"));
        assert_eq!(maps["custom_multi"].as_deref(), Some("/custom/multi"));
        assert_eq!(
            maps["custom_multi_first"].as_deref(),
            Some("/custom/multi/first")
        );
    }

    #[test]
    fn test_entries_sorted() {
        let maps = build_route_maps(
            &files(&["user/index.tsx", "about/index.tsx", "index.tsx", "about/team/index.tsx"]),
            &synthesizer(),
        );
        let names: Vec<_> = route_maps_to_entries(&maps)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["about", "about_team", "root", "user"]);
    }

    #[test]
    fn test_locale_compare() {
        assert_eq!(locale_compare("a", "a_b"), Ordering::Less);
        assert_eq!(locale_compare("a_b", "ab"), Ordering::Less);
        assert_eq!(locale_compare("(auth)", "about"), Ordering::Less);
        assert_eq!(locale_compare("404", "about"), Ordering::Less);
        assert_eq!(locale_compare("About", "about"), Ordering::Greater);
        assert_eq!(locale_compare("b", "About"), Ordering::Greater);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }
}
