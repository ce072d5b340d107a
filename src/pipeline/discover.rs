//! Input discovery and output naming.
//!
//! Discovery walks the input root with `walkdir`, sorted by file name so two
//! runs over the same tree visit icons in the same order. Output naming
//! flattens each icon's path relative to the root into a single file name:
//! `outline/arrows/left.svg` becomes `outline_arrows_left.png`.
//!
//! Flattening is lossy: `a/b_c.svg` and `a_b/c.svg` both map to `a_b_c.png`
//! and the later file in discovery order overwrites the earlier one.

use crate::error::{FileError, IconPrepError};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extension of the vector sources picked up by discovery.
pub const SVG_EXTENSION: &str = "svg";

/// Extension of the written rasters.
pub const PNG_EXTENSION: &str = "png";

/// Joins flattened path components.
const SEPARATOR_REPLACEMENT: &str = "_";

/// Check whether `path` names an SVG source (exact, case-sensitive extension).
pub fn is_svg(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SVG_EXTENSION)
}

/// Recursively list every SVG file under `root`, in sorted order.
///
/// An empty result is not an error; the caller decides what an empty batch
/// means. Entries that cannot be read (permission errors, symlink loops) are
/// logged and skipped. Only a missing root is fatal.
pub fn discover_svgs(root: &Path) -> Result<Vec<PathBuf>, IconPrepError> {
    if !root.is_dir() {
        return Err(IconPrepError::InputRootNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    "Skipping unreadable entry {}: {}",
                    e.path().unwrap_or(root).display(),
                    e
                );
                continue;
            }
        };

        if entry.file_type().is_file() && is_svg(entry.path()) {
            files.push(entry.into_path());
        }
    }

    debug!("Discovered {} SVG files under {}", files.len(), root.display());
    Ok(files)
}

/// Derive the flat output file name for `input`.
///
/// Pure function of the path relative to `root`: the extension is replaced
/// with `png` and every path separator becomes `_`.
pub fn output_file_name(root: &Path, input: &Path) -> Result<String, FileError> {
    let relative = input
        .strip_prefix(root)
        .map_err(|_| FileError::NotUnderRoot {
            path: input.to_path_buf(),
        })?;

    let stem = relative.with_extension("");
    let flat = stem
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join(SEPARATOR_REPLACEMENT);

    if flat.is_empty() {
        return Err(FileError::NotUnderRoot {
            path: input.to_path_buf(),
        });
    }

    Ok(format!("{flat}.{PNG_EXTENSION}"))
}

/// Full output path for `input`: `output_dir` joined with [`output_file_name`].
pub fn output_path(root: &Path, output_dir: &Path, input: &Path) -> Result<PathBuf, FileError> {
    Ok(output_dir.join(output_file_name(root, input)?))
}
