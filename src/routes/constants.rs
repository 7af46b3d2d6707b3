//! Naming-convention constants shared by synthesis and tree building.

use regex::Regex;
use std::sync::LazyLock;

/// Separator between path segments (`/a/b/c`).
pub const PATH_SPLITTER: char = '/';

/// Separator between ancestor segments of a route name (`a_b_c`).
pub const PAGE_DEGREE_SPLITTER: char = '_';

/// Route name given to files that sit directly in the page directory.
pub const ROOT_ROUTE_NAME: &str = "root";

/// Name of the synthetic catch-all route appended to every tree.
pub const NOT_FOUND_ROUTE_NAME: &str = "notFound";

/// Path and location of the synthetic catch-all route.
pub const NOT_FOUND_ROUTE_PATH: &str = "*";

/// Route name of a user-provided not-found page.
pub const NOT_FOUND_PAGE_NAME: &str = "404";

/// Number of special-file slots per route: layout, index, loading, error.
pub const MATCHED_FILE_SLOTS: usize = 4;

/// Leaf file whose stem becomes an extra name segment: `[id].tsx`, `[...all].tsx`.
pub static PAGE_FILE_NAME_WITH_SQUARE_BRACKETS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(?:\.{3})?\w+\]\.[a-z]+$").expect("valid regex"));

/// Glob ending in a bracketed leaf below some directory: `user/[id].tsx`.
pub static ROUTE_NAME_WITH_PARAMS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\[([^\]]+)\]\.[a-z]+$").expect("valid regex"));

/// Route group segment, optionally followed by the degree splitter.
pub static ROUTE_GROUP_SEGMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]+\)_?").expect("valid regex"));

/// Catch-all name segment: `[...slug]`.
pub static CATCH_ALL_SEGMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\.{3}[^\]]+\]").expect("valid regex"));

/// Dynamic name segment: `[id]`.
pub static DYNAMIC_SEGMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("valid regex"));

/// Body of a plain, virtual or group directory segment.
pub static SEGMENT_BODY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z][0-9A-Za-z-]*$").expect("valid regex"));

/// Body of a bracketed segment or stem.
pub static PARAM_BODY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z]+$").expect("valid regex"));

/// File extension.
pub static EXTENSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+$").expect("valid regex"));
