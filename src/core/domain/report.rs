//! Workflow results.

use std::path::PathBuf;

use crate::core::domain::Stage;
use crate::error::Error;

/// Outcome of a successful enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    /// Registered plaintext path, relative to the repository root.
    pub plaintext: String,
    /// Envelope path, relative to the repository root.
    pub ciphertext: String,
    /// Whether the plaintext had already been committed to version control.
    pub exposed: bool,
    /// Paths included in the commit.
    pub committed: Vec<PathBuf>,
    /// Stages completed, always ending in `Committed`.
    pub stages: Vec<Stage>,
}

/// Whether a decrypt changed the plaintext on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Updated,
    Unchanged,
}

/// Result of a workflow applied to every managed file.
///
/// Failures are collected per file; one bad entry never stops the batch.
#[derive(Debug, Default)]
pub struct BulkReport {
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub failed: Vec<(String, Error)>,
}

impl BulkReport {
    /// Number of files that were processed without error.
    pub fn succeeded(&self) -> usize {
        self.updated.len() + self.unchanged.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of files visited.
    pub fn total(&self) -> usize {
        self.succeeded() + self.failed.len()
    }
}
