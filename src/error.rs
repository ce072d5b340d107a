//! Error types for the iconprep library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`IconPrepError`] — **Fatal**: the batch cannot proceed at all
//!   (input root missing, output directory cannot be created, invalid
//!   configuration). Returned as `Err(IconPrepError)` from the top-level
//!   `convert_dir*` functions.
//!
//! * [`FileError`] — **Non-fatal**: a single icon failed (malformed markup,
//!   unreadable file, write error, panic in the renderer) but every other
//!   icon is fine. Stored inside
//!   [`crate::output::FileOutcome::Failed`] so callers can inspect partial
//!   success rather than losing the whole batch to one bad file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the iconprep library.
///
/// Per-file failures use [`FileError`] and are stored in
/// [`crate::output::FileResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum IconPrepError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input root does not exist or is not a directory.
    #[error("Input directory not found: '{path}'\nCheck the path exists and is a directory.")]
    InputRootNotFound { path: PathBuf },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create the output directory.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Some files converted but at least one failed.
    ///
    /// Returned by [`crate::output::BatchReport::into_result`] when
    /// the caller wants to treat any file failure as an error.
    #[error("{failed}/{total} icons failed during conversion")]
    PartialFailure {
        success: usize,
        failed: usize,
        total: usize,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single icon.
///
/// The batch always continues past a `FileError`.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileError {
    /// The file is not inside the input root, so no output name can be derived.
    #[error("'{path}' is not under the input root")]
    NotUnderRoot { path: PathBuf },

    /// The SVG source could not be read.
    #[error("failed to read '{path}': {detail}")]
    ReadFailed { path: PathBuf, detail: String },

    /// The SVG markup could not be parsed.
    #[error("invalid SVG '{path}': {detail}")]
    InvalidSvg { path: PathBuf, detail: String },

    /// The target pixmap could not be allocated.
    #[error("cannot allocate a {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },

    /// The PNG could not be encoded or written.
    #[error("failed to write '{path}': {detail}")]
    SaveFailed { path: PathBuf, detail: String },

    /// The conversion panicked.
    #[error("conversion of '{path}' panicked: {detail}")]
    Panicked { path: PathBuf, detail: String },
}
