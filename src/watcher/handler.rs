//! Page events and the regeneration seam driven by the coordinator.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::error::GenerateError;

/// Kind of filesystem change that triggered a regeneration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageAction {
    Add,
    Unlink,
}

impl fmt::Display for PageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageAction::Add => write!(f, "add"),
            PageAction::Unlink => write!(f, "unlink"),
        }
    }
}

/// One queued change: the action and the path relative to the page directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEvent {
    pub action: PageAction,
    pub path: String,
}

impl PageEvent {
    pub fn add(path: impl Into<String>) -> Self {
        Self {
            action: PageAction::Add,
            path: path.into(),
        }
    }

    pub fn unlink(path: impl Into<String>) -> Self {
        Self {
            action: PageAction::Unlink,
            path: path.into(),
        }
    }
}

/// Runs the full synthesis and merge pipeline for one debounced batch.
///
/// The coordinator never calls this concurrently with itself.
#[async_trait]
pub trait Regenerate: Send + Sync {
    /// Regenerate for the first event of a batch.
    async fn regenerate(&self, trigger: &PageEvent) -> Result<(), GenerateError>;
}
