//! Result types returned by the batch entry points.
//!
//! A batch never fails because one icon failed. Each icon gets a
//! [`FileResult`] whose [`FileOutcome`] records success or the
//! [`FileError`] that stopped it; [`BatchReport`] is the tally.

use crate::error::{FileError, IconPrepError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How one icon fared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileOutcome {
    /// The PNG was written.
    Converted,
    /// The icon was skipped; the batch continued.
    Failed(FileError),
}

/// The result of converting one SVG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    /// The SVG that was read.
    pub input: PathBuf,
    /// Where the PNG goes. `None` if no name could be derived.
    pub output: Option<PathBuf>,
    pub outcome: FileOutcome,
    /// Wall-clock time spent on this file.
    pub duration_ms: u64,
}

impl FileResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, FileOutcome::Converted)
    }

    pub fn error(&self) -> Option<&FileError> {
        match &self.outcome {
            FileOutcome::Converted => None,
            FileOutcome::Failed(e) => Some(e),
        }
    }
}

/// Aggregate outcome of a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Directory the PNGs were written to.
    pub output_dir: PathBuf,
    /// Number of SVGs found by discovery.
    pub discovered: usize,
    /// Icons written successfully.
    pub succeeded: usize,
    /// Icons that failed.
    pub failed: usize,
    /// Per-file results, in discovery order.
    pub files: Vec<FileResult>,
    pub total_duration_ms: u64,
}

impl BatchReport {
    /// An empty report for a run whose discovery found nothing.
    pub fn empty(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Tally one file.
    pub fn record(&mut self, result: FileResult) {
        if result.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.files.push(result);
    }

    /// Iterate over the failed files only.
    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.files.iter().filter(|f| !f.is_success())
    }

    /// Treat any per-file failure as an error.
    pub fn into_result(self) -> Result<Self, IconPrepError> {
        if self.failed > 0 {
            return Err(IconPrepError::PartialFailure {
                success: self.succeeded,
                failed: self.failed,
                total: self.files.len(),
            });
        }
        Ok(self)
    }
}
