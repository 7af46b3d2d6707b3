//! Classification of per-route special files.

use super::constants::{PATH_SPLITTER, ROUTE_NAME_WITH_PARAMS_PATTERN};

/// The role a page file plays for its route.
///
/// Each role except `Other` owns one slot of a route's matched files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialFile {
    Layout,
    Index,
    Loading,
    Error,
    Other,
}

impl SpecialFile {
    /// Classify a glob-relative page path by its file name.
    ///
    /// `layout.*`, `index.*`, `loading.*` and `error.*` map to their roles.
    /// A bracketed leaf inside a directory (`user/[id].tsx`) is the route's index.
    pub fn classify(glob: &str) -> Self {
        let file = glob.rsplit(PATH_SPLITTER).next().unwrap_or(glob);
        let stem = file.split('.').next().unwrap_or(file);

        match stem {
            "layout" => SpecialFile::Layout,
            "index" => SpecialFile::Index,
            _ if ROUTE_NAME_WITH_PARAMS_PATTERN.is_match(glob) => SpecialFile::Index,
            "loading" => SpecialFile::Loading,
            "error" => SpecialFile::Error,
            _ => SpecialFile::Other,
        }
    }

    /// Slot in the matched-files array, if this role has one.
    pub fn slot(self) -> Option<usize> {
        match self {
            SpecialFile::Layout => Some(0),
            SpecialFile::Index => Some(1),
            SpecialFile::Loading => Some(2),
            SpecialFile::Error => Some(3),
            SpecialFile::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_stem() {
        assert_eq!(SpecialFile::classify("user/layout.tsx"), SpecialFile::Layout);
        assert_eq!(SpecialFile::classify("index.tsx"), SpecialFile::Index);
        assert_eq!(SpecialFile::classify("a/b/loading.tsx"), SpecialFile::Loading);
        assert_eq!(SpecialFile::classify("a/error.jsx"), SpecialFile::Error);
        assert_eq!(SpecialFile::classify("a/mylayout.tsx"), SpecialFile::Other);
    }

    #[test]
    fn test_bracket_leaf_is_index_only_below_a_directory() {
        assert_eq!(SpecialFile::classify("user/[id].tsx"), SpecialFile::Index);
        assert_eq!(SpecialFile::classify("docs/[...all].tsx"), SpecialFile::Index);
        assert_eq!(SpecialFile::classify("[id].tsx"), SpecialFile::Other);
    }

    #[test]
    fn test_slots() {
        assert_eq!(SpecialFile::Layout.slot(), Some(0));
        assert_eq!(SpecialFile::Error.slot(), Some(3));
        assert_eq!(SpecialFile::Other.slot(), None);
    }
}
