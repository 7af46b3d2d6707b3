//! Route synthesis core.
//!
//! Page globs flow through [`Synthesizer`] (names and paths), [`build_route_maps`]
//! (ancestor expansion) and [`build_route_trees`] (the route forest). The
//! forest is then reconciled with the persisted one by [`merge_route_trees`].

pub mod constants;
pub mod file;
pub mod map;
pub mod merge;
pub mod scan;
pub mod special;
pub mod tree;
pub mod validate;

pub use file::{
    MetaGenerator, NameTransform, PageFile, PathTransform, RouteTransforms, Synthesizer,
    is_route_group, route_name_to_path, split_route_name,
};
pub use map::{
    RouteEntry, RouteMaps, build_route_maps, expand_route_names, locale_compare,
    route_maps_to_entries,
};
pub use merge::{PersistedRoute, is_falsy, merge_route_trees, to_persisted};
pub use scan::{
    GlobProvider, PagePatterns, PageScanner, StaticGlobs, is_hidden, relative_glob, walk_pages,
};
pub use special::SpecialFile;
pub use tree::{
    MatchedFiles, RouteTree, SortViolation, build_route_trees, check_sorted, find_matched_files,
};
pub use validate::validate_page_glob;
