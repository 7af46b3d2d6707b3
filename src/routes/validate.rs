//! Naming-convention checks for page globs.
//!
//! A glob that fails here is skipped with a [`SynthesisWarning`]; it never
//! aborts a scan.

use super::constants::{
    EXTENSION_PATTERN, PAGE_DEGREE_SPLITTER, PARAM_BODY_PATTERN, PATH_SPLITTER,
    SEGMENT_BODY_PATTERN,
};
use crate::error::SynthesisWarning;

/// Check a glob-relative page path against the naming convention.
pub fn validate_page_glob(glob: &str) -> Result<(), SynthesisWarning> {
    let warn = |reason: String| SynthesisWarning::new(glob, reason);

    if glob.is_empty() {
        return Err(warn("empty path".to_string()));
    }

    let mut segments: Vec<&str> = glob.split(PATH_SPLITTER).collect();
    let file = segments.pop().unwrap_or_default();

    for dir in segments {
        validate_dir_segment(dir).map_err(|reason| warn(format!("directory '{dir}' {reason}")))?;
    }

    validate_file_name(file).map_err(|reason| warn(format!("file '{file}' {reason}")))
}

fn validate_dir_segment(dir: &str) -> Result<(), String> {
    if dir.is_empty() {
        return Err("is empty".to_string());
    }

    if let Some(body) = dir.strip_prefix(PAGE_DEGREE_SPLITTER) {
        return check_body(body);
    }

    if let Some(body) = dir.strip_prefix('(').and_then(|d| d.strip_suffix(')')) {
        return check_body(body);
    }

    if dir.starts_with('[') {
        return check_bracketed(dir);
    }

    check_body(dir)
}

fn validate_file_name(file: &str) -> Result<(), String> {
    let Some((stem, extension)) = file.rsplit_once('.') else {
        return Err("has no extension".to_string());
    };

    if !EXTENSION_PATTERN.is_match(extension) {
        return Err(format!("has an invalid extension '{extension}'"));
    }

    if stem.starts_with('[') {
        check_bracketed(stem)
    } else {
        check_body(stem)
    }
}

fn check_body(body: &str) -> Result<(), String> {
    if SEGMENT_BODY_PATTERN.is_match(body) {
        Ok(())
    } else {
        Err("may only contain letters, digits and '-'".to_string())
    }
}

fn check_bracketed(segment: &str) -> Result<(), String> {
    let inner = segment
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| "has unbalanced brackets".to_string())?;
    let param = inner.strip_prefix("...").unwrap_or(inner);

    if PARAM_BODY_PATTERN.is_match(param) {
        Ok(())
    } else {
        Err("has an invalid parameter name".to_string())
    }
}
