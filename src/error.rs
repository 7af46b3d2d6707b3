//! Error types for route synthesis, persistence and regeneration.
//!
//! Each stage has its own error enum so callers can decide what is fatal:
//! configuration errors stop startup, synthesis warnings skip a single file,
//! and storage errors abort only the current regeneration cycle.

use std::path::PathBuf;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised while loading or validating settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid alias entry '{alias}' -> '{target}': {reason}")]
    InvalidAlias {
        alias: String,
        target: String,
        reason: String,
    },

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to load settings: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Failed to write settings to {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Configuration file already exists at {0}. Use --force to overwrite")]
    AlreadyExists(PathBuf),
}

/// A page file that does not follow the naming convention.
///
/// Not fatal: the file is skipped and synthesis continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Skipping page '{glob}': {reason}")]
pub struct SynthesisWarning {
    pub glob: String,
    pub reason: String,
}

impl SynthesisWarning {
    pub fn new(glob: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            glob: glob.into(),
            reason: reason.into(),
        }
    }
}

/// Errors from the page scanner.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to walk {path}: {reason}")]
    Walk { path: PathBuf, reason: String },
}

/// Everything that can abort one regeneration cycle.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Regeneration task failed: {0}")]
    Task(String),
}

pub type GenerateResult<T> = Result<T, GenerateError>;
