//! Configuration types for icon conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Every knob lives in one value that is
//! passed into the batch entry point; nothing is read from global state.

use crate::error::IconPrepError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Largest accepted output width or height, in pixels.
pub const MAX_DIMENSION: u32 = 8192;

/// Configuration for a batch icon conversion.
///
/// Built via [`ConversionConfig::builder()`].
///
/// # Example
/// ```rust
/// use iconprep::{ConversionConfig, OutputMode};
///
/// let config = ConversionConfig::builder()
///     .input_dir("heroicons/optimized/24")
///     .output_dir("processed_icons")
///     .size(64, 64)
///     .mode(OutputMode::Binary)
///     .threshold(128)
///     .build()
///     .unwrap();
/// assert_eq!(config.width, 64);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Root directory searched recursively for `.svg` files.
    pub input_dir: PathBuf,

    /// Directory that receives one PNG per converted icon. Default: `processed_icons`.
    pub output_dir: PathBuf,

    /// Output width in pixels. Default: 64.
    pub width: u32,

    /// Output height in pixels. Default: 64.
    pub height: u32,

    /// Whether to keep the gray levels or binarize them. Default: [`OutputMode::Binary`].
    pub mode: OutputMode,

    /// Binarization threshold. Default: 128.
    ///
    /// Only read in [`OutputMode::Binary`]. Gray values at or above the
    /// threshold become 255, values below become 0.
    pub threshold: u8,

    /// Per-file progress events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::new(),
            output_dir: PathBuf::from("processed_icons"),
            width: 64,
            height: 64,
            mode: OutputMode::default(),
            threshold: 128,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("mode", &self.mode)
            .field("threshold", &self.threshold)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The threshold that applies to this run, if any.
    pub fn effective_threshold(&self) -> Option<u8> {
        match self.mode {
            OutputMode::Binary => Some(self.threshold),
            OutputMode::Grayscale => None,
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn input_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.input_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set both output dimensions at once.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.config.width = width;
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.config.height = height;
        self
    }

    pub fn mode(mut self, mode: OutputMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn threshold(mut self, threshold: u8) -> Self {
        self.config.threshold = threshold;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, IconPrepError> {
        let c = &self.config;
        if c.input_dir.as_os_str().is_empty() {
            return Err(IconPrepError::InvalidConfig(
                "input directory must be set".into(),
            ));
        }
        if c.output_dir.as_os_str().is_empty() {
            return Err(IconPrepError::InvalidConfig(
                "output directory must be set".into(),
            ));
        }
        for (axis, value) in [("width", c.width), ("height", c.height)] {
            if value == 0 || value > MAX_DIMENSION {
                return Err(IconPrepError::InvalidConfig(format!(
                    "{axis} must be 1–{MAX_DIMENSION}, got {value}"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// What happens to the gray levels after rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Keep the full 0–255 luma range.
    Grayscale,
    /// Map every pixel to 0 or 255 using [`ConversionConfig::threshold`]. (default)
    #[default]
    Binary,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Grayscale => "grayscale",
            OutputMode::Binary => "binary",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
