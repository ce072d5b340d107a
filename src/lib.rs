//! # iconprep
//!
//! Turn a directory tree of SVG icons into fixed-size grayscale or binary PNGs
//! ready to be used as training data for an image model.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input_dir/**/*.svg
//!  │
//!  ├─ 1. Discover   walk the tree, derive a flat output name per icon
//!  ├─ 2. Render     rasterise onto white at exactly width × height (resvg)
//!  ├─ 3. Grayscale  RGBA → 8-bit luma
//!  ├─ 4. Threshold  binary mode only: >= threshold → 255, else 0
//!  └─ 5. Save       single-channel PNG in output_dir
//! ```
//!
//! A file that fails to convert is logged and counted; the batch goes on.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use iconprep::{convert_dir, ConversionConfig, OutputMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .input_dir("heroicons/optimized/24")
//!         .output_dir("processed_icons")
//!         .size(64, 64)
//!         .mode(OutputMode::Binary)
//!         .threshold(128)
//!         .build()?;
//!     let report = convert_dir(&config).await?;
//!     eprintln!("{} converted, {} failed", report.succeeded, report.failed);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `iconprep` binary (clap + anyhow + indicatif + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, OutputMode, MAX_DIMENSION};
pub use convert::{convert_dir, convert_dir_sync, convert_file, ensure_output_dir, ConversionJob};
pub use error::{FileError, IconPrepError};
pub use output::{BatchReport, FileOutcome, FileResult};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
