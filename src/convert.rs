//! Batch conversion entry points.
//!
//! [`convert_dir`] runs the whole batch: ensure the output directory, discover
//! SVGs, convert each one in discovery order, and tally the results into a
//! [`BatchReport`]. Only setup failures are fatal; a file that fails is logged,
//! recorded as [`FileOutcome::Failed`] and skipped.
//!
//! Files are converted one at a time. Each conversion runs on the blocking
//! pool via `spawn_blocking` and is awaited before the next one starts.

use crate::config::{ConversionConfig, OutputMode};
use crate::error::{FileError, IconPrepError};
use crate::output::{BatchReport, FileOutcome, FileResult};
use crate::pipeline::{discover, render, save, transform};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// One input file mapped to one output file, with everything needed to
/// convert it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub mode: OutputMode,
    /// Only read in [`OutputMode::Binary`].
    pub threshold: u8,
}

impl ConversionJob {
    /// Build the job for `input`, deriving its output path from the config.
    pub fn for_input(input: &Path, config: &ConversionConfig) -> Result<Self, FileError> {
        Ok(Self {
            input: input.to_path_buf(),
            output: discover::output_path(&config.input_dir, &config.output_dir, input)?,
            width: config.width,
            height: config.height,
            mode: config.mode,
            threshold: config.threshold,
        })
    }

    /// Rasterise, transform and save. Blocking.
    pub fn run(&self) -> Result<(), FileError> {
        let rgba = render::rasterize(&self.input, self.width, self.height)?;
        let gray = transform::apply_mode(&rgba, self.mode, self.threshold);
        save::save_png(&gray, &self.output)?;
        debug!("{} → {}", self.input.display(), self.output.display());
        Ok(())
    }
}

/// Convert a single SVG under `config.input_dir`. Blocking.
///
/// Never fails: any error is captured in the returned [`FileResult`].
pub fn convert_file(input: &Path, config: &ConversionConfig) -> FileResult {
    let start = Instant::now();

    let (output, outcome) = match ConversionJob::for_input(input, config) {
        Ok(job) => {
            let outcome = match job.run() {
                Ok(()) => FileOutcome::Converted,
                Err(e) => FileOutcome::Failed(e),
            };
            (Some(job.output), outcome)
        }
        Err(e) => (None, FileOutcome::Failed(e)),
    };

    FileResult {
        input: input.to_path_buf(),
        output,
        outcome,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

/// Create the output directory and any missing parents.
///
/// Idempotent: an existing directory is fine.
pub async fn ensure_output_dir(path: &Path) -> Result<(), IconPrepError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| IconPrepError::OutputDirFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    info!("Ensured output directory exists: {}", path.display());
    Ok(())
}

/// Convert every SVG under `config.input_dir` into `config.output_dir`.
///
/// # Returns
/// `Ok(BatchReport)` once every discovered file has been attempted, even if
/// some of them failed (check `report.failed`). When discovery finds nothing
/// the report is empty and nothing is converted.
///
/// # Errors
/// Returns `Err(IconPrepError)` only for fatal setup errors:
/// - the output directory cannot be created
/// - the input root does not exist
pub async fn convert_dir(config: &ConversionConfig) -> Result<BatchReport, IconPrepError> {
    let total_start = Instant::now();
    log_config(config);

    // ── Step 1: Output directory ─────────────────────────────────────────
    ensure_output_dir(&config.output_dir).await?;

    // ── Step 2: Discover ─────────────────────────────────────────────────
    let root = config.input_dir.clone();
    let files = tokio::task::spawn_blocking(move || discover::discover_svgs(&root))
        .await
        .map_err(|e| IconPrepError::Internal(format!("Discovery task panicked: {}", e)))??;

    if files.is_empty() {
        error!(
            "No SVG files found in {}. Please check the path.",
            config.input_dir.display()
        );
        return Ok(BatchReport::empty(&config.output_dir));
    }

    let total = files.len();
    info!("Found {} SVG files to process.", total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    // ── Step 3: Convert, one file at a time ──────────────────────────────
    let mut report = BatchReport::empty(&config.output_dir);
    report.discovered = total;

    for (i, input) in files.into_iter().enumerate() {
        let index = i + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_start(index, total, &input);
        }

        let job_config = config.clone();
        let job_input = input.clone();
        let result =
            run_isolated(input, move || convert_file(&job_input, &job_config)).await;

        match &result.outcome {
            FileOutcome::Converted => {
                if let (Some(cb), Some(output)) = (&config.progress_callback, &result.output) {
                    cb.on_file_complete(index, total, output);
                }
            }
            FileOutcome::Failed(e) => {
                warn!("Failed to process {}: {}", result.input.display(), e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_file_error(index, total, &result.input, &e.to_string());
                }
            }
        }

        report.record(result);
    }

    report.total_duration_ms = total_start.elapsed().as_millis() as u64;

    // ── Step 4: Report ───────────────────────────────────────────────────
    info!("--- Processing Complete ---");
    info!("Successfully processed: {} icons", report.succeeded);
    info!("Failed to process: {} icons", report.failed);
    info!("Processed icons saved in: {}", config.output_dir.display());

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, report.succeeded);
    }

    Ok(report)
}

/// Synchronous wrapper around [`convert_dir`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_dir_sync(config: &ConversionConfig) -> Result<BatchReport, IconPrepError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| IconPrepError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_dir(config))
}

/// Run one file's conversion on the blocking pool.
///
/// A panic inside `job` is turned into a failed [`FileResult`] for `input`
/// so the batch can carry on with the next file.
async fn run_isolated<F>(input: PathBuf, job: F) -> FileResult
where
    F: FnOnce() -> FileResult + Send + 'static,
{
    let start = Instant::now();
    match tokio::task::spawn_blocking(job).await {
        Ok(result) => result,
        Err(e) => FileResult {
            outcome: FileOutcome::Failed(FileError::Panicked {
                path: input.clone(),
                detail: panic_detail(e),
            }),
            input,
            output: None,
            duration_ms: start.elapsed().as_millis() as u64,
        },
    }
}

fn panic_detail(e: tokio::task::JoinError) -> String {
    if !e.is_panic() {
        return e.to_string();
    }
    let payload = e.into_panic();
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn log_config(config: &ConversionConfig) {
    info!("Starting icon processing...");
    info!("Source SVG directory: {}", config.input_dir.display());
    info!("Output directory: {}", config.output_dir.display());
    info!("Target image size: {}x{}", config.width, config.height);
    info!("Output mode: {}", config.mode);
    if let Some(threshold) = config.effective_threshold() {
        info!("Binary threshold: {}", threshold);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24">
        <rect width="24" height="24" fill="black"/>
    </svg>"#;

    fn config_for(input: &Path, output: &Path) -> ConversionConfig {
        ConversionConfig::builder()
            .input_dir(input)
            .output_dir(output)
            .size(8, 8)
            .build()
            .unwrap()
    }

    #[test]
    fn job_derives_flat_output_path() {
        let config = config_for(Path::new("in"), Path::new("out"));
        let job = ConversionJob::for_input(Path::new("in/solid/bell.svg"), &config).unwrap();
        assert_eq!(job.output, PathBuf::from("out/solid_bell.png"));
        assert_eq!((job.width, job.height), (8, 8));
        assert_eq!(job.mode, OutputMode::Binary);
    }

    #[test]
    fn convert_file_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let input_dir = dir.path().join("in");
        let output_dir = dir.path().join("out");
        fs::create_dir_all(&input_dir).unwrap();
        fs::create_dir_all(&output_dir).unwrap();
        fs::write(input_dir.join("square.svg"), SQUARE).unwrap();

        let config = config_for(&input_dir, &output_dir);
        let result = convert_file(&input_dir.join("square.svg"), &config);

        assert!(result.is_success(), "got: {:?}", result.outcome);
        let out = image::open(output_dir.join("square.png")).unwrap().to_luma8();
        assert_eq!(out.dimensions(), (8, 8));
        assert!(out.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn convert_file_captures_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.svg"), "<svg><path d=").unwrap();

        let config = config_for(dir.path(), dir.path());
        let result = convert_file(&dir.path().join("bad.svg"), &config);

        assert!(matches!(
            result.outcome,
            FileOutcome::Failed(FileError::InvalidSvg { .. })
        ));
        assert!(result.output.is_some());
    }

    #[test]
    fn convert_file_outside_root_has_no_output() {
        let config = config_for(Path::new("/icons"), Path::new("/out"));
        let result = convert_file(Path::new("/elsewhere/x.svg"), &config);
        assert!(result.output.is_none());
        assert!(matches!(
            result.error(),
            Some(FileError::NotUnderRoot { .. })
        ));
    }

    #[test]
    fn ensure_output_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a/b/c");
        tokio_test::block_on(ensure_output_dir(&out)).unwrap();
        tokio_test::block_on(ensure_output_dir(&out)).unwrap();
        assert!(out.is_dir());
    }

    #[tokio::test]
    async fn panicking_job_becomes_file_failure() {
        let input = PathBuf::from("icons/boom.svg");
        let result = run_isolated(input.clone(), || panic!("renderer blew up")).await;

        assert!(!result.is_success());
        assert_eq!(result.input, input);
        assert!(result.output.is_none());
        match result.error() {
            Some(FileError::Panicked { path, detail }) => {
                assert_eq!(path, &input);
                assert_eq!(detail, "renderer blew up");
            }
            other => panic!("expected Panicked, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn panic_with_formatted_message_keeps_text() {
        let result = run_isolated(PathBuf::from("x.svg"), || {
            panic!("bad node {}", 7)
        })
        .await;
        assert!(matches!(
            result.error(),
            Some(FileError::Panicked { detail, .. }) if detail == "bad node 7"
        ));
    }

    #[tokio::test]
    async fn isolated_job_passes_result_through() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sq.svg"), SQUARE).unwrap();
        let config = config_for(dir.path(), dir.path());
        let input = dir.path().join("sq.svg");
        let job_input = input.clone();
        let result = run_isolated(input, move || convert_file(&job_input, &config)).await;
        assert!(result.is_success(), "got: {:?}", result.outcome);
    }

    #[tokio::test]
    async fn ensure_output_dir_fails_over_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("taken");
        fs::write(&file, b"x").unwrap();
        let err = ensure_output_dir(&file.join("sub")).await.unwrap_err();
        assert!(matches!(err, IconPrepError::OutputDirFailed { .. }));
    }
}
