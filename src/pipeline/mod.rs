//! Pipeline stages for SVG-to-PNG icon conversion.
//!
//! Each submodule implements exactly one step and is independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! discover ──▶ render ──▶ transform ──▶ save
//! (walkdir)   (resvg)    (luma/threshold) (PNG)
//! ```
//!
//! 1. [`discover`]  — list SVGs under the input root and derive flat output names
//! 2. [`render`]    — rasterise onto a white pixmap at the exact target size
//! 3. [`transform`] — RGBA → 8-bit luma, then binarize in `binary` mode
//! 4. [`save`]      — encode as single-channel PNG and overwrite the target

pub mod discover;
pub mod render;
pub mod save;
pub mod transform;
