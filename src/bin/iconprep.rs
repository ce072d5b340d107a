//! CLI binary for iconprep.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use iconprep::{
    convert_dir, BatchReport, ConversionConfig, ConversionProgressCallback, OutputMode,
    ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar advancing per icon, with a red line
/// printed above it for every icon that fails.
struct CliProgressCallback {
    bar: ProgressBar,
    /// One-line description of the run, printed when the batch starts.
    summary: String,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new(summary: String) -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.set_message("Looking for SVG files…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            summary,
            errors: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>5}/{len} icons  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Processing Icons");
        self.bar.reset_eta();
    }

    /// Stop the spinner when the batch ends without starting (nothing found).
    fn abandon(&self) {
        self.bar.finish_and_clear();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.activate_bar(total_files);
        self.bar.println(format!(
            "{} {}  {}",
            cyan("◆"),
            bold(&format!("Converting {total_files} icons…")),
            dim(&self.summary)
        ));
    }

    fn on_file_start(&self, _index: usize, _total: usize, input: &Path) {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.bar.set_message(name);
    }

    fn on_file_complete(&self, _index: usize, _total: usize, _output: &Path) {
        self.bar.inc(1);
    }

    fn on_file_error(&self, index: usize, total: usize, input: &Path, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "  {} {:>5}/{:<5}  {}  {}",
            red("✗"),
            index,
            total,
            input.display(),
            red(error),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        self.bar.finish_and_clear();
        let failed = self.errors.load(Ordering::SeqCst);
        if failed == 0 {
            eprintln!(
                "{} {} icons converted successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} icons converted  ({} failed)",
                if failed == total_files {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Heroicons → 64×64 black/white masks (default settings)
  iconprep heroicons/optimized/24 -o processed_icons

  # Keep gray levels at 32×32
  iconprep --mode grayscale --size 32 icons/ -o gray_32

  # Lighter strokes: count anything below 200 as ink
  iconprep --threshold 200 icons/ -o binary_t200

  # Non-square output
  iconprep --width 96 --height 64 icons/ -o wide

  # Machine-readable report on stdout
  iconprep --json icons/ -o out > report.json

OUTPUT NAMING:
  Each icon's path relative to INPUT_DIR is flattened with '_' and given a
  .png extension:  outline/arrow-left.svg  →  outline_arrow-left.png
  Paths that differ only by separators (a/b_c.svg, a_b/c.svg) collide; the
  later one wins.

BINARY MODE:
  Gray values >= threshold become 255 (background), values below become 0
  (stroke). Transparent areas are composited onto white before conversion.

ENVIRONMENT VARIABLES:
  RUST_LOG                Override log filter (e.g. iconprep=debug)
  ICONPREP_*              Every flag can be set via its ICONPREP_ variable
"#;

/// Rasterise a tree of SVG icons into fixed-size grayscale or binary PNGs.
#[derive(Parser, Debug)]
#[command(
    name = "iconprep",
    version,
    about = "Rasterise a tree of SVG icons into fixed-size grayscale or binary PNGs",
    long_about = "Recursively converts every .svg file under INPUT_DIR into a single-channel PNG \
of a fixed size, optionally thresholded to pure black and white. Output files are written flat \
into the output directory, named after each icon's relative path.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory searched recursively for .svg files.
    input: PathBuf,

    /// Directory that receives the PNGs (created if missing).
    #[arg(short, long, env = "ICONPREP_OUTPUT", default_value = "processed_icons")]
    output: PathBuf,

    /// Square output size in pixels; --width/--height override one axis.
    #[arg(long, env = "ICONPREP_SIZE", default_value_t = 64,
          value_parser = clap::value_parser!(u32).range(1..=iconprep::MAX_DIMENSION as i64))]
    size: u32,

    /// Output width in pixels.
    #[arg(long, env = "ICONPREP_WIDTH",
          value_parser = clap::value_parser!(u32).range(1..=iconprep::MAX_DIMENSION as i64))]
    width: Option<u32>,

    /// Output height in pixels.
    #[arg(long, env = "ICONPREP_HEIGHT",
          value_parser = clap::value_parser!(u32).range(1..=iconprep::MAX_DIMENSION as i64))]
    height: Option<u32>,

    /// Output mode: grayscale or binary.
    #[arg(long, env = "ICONPREP_MODE", value_enum, default_value = "binary")]
    mode: ModeArg,

    /// Binary threshold (0–255): values >= threshold become white.
    #[arg(long, env = "ICONPREP_THRESHOLD", default_value_t = 128)]
    threshold: u8,

    /// Print the batch report as JSON on stdout.
    #[arg(long, env = "ICONPREP_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "ICONPREP_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "ICONPREP_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "ICONPREP_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum ModeArg {
    Grayscale,
    Binary,
}

impl From<ModeArg> for OutputMode {
    fn from(v: ModeArg) -> Self {
        match v {
            ModeArg::Grayscale => OutputMode::Grayscale,
            ModeArg::Binary => OutputMode::Binary,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library INFO logs duplicate what the progress bar shows, so only
    // errors get through while it is active.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress = if show_progress {
        Some(CliProgressCallback::new(describe(&cli)))
    } else {
        None
    };

    let config = build_config(
        &cli,
        progress
            .clone()
            .map(|cb| cb as Arc<dyn ConversionProgressCallback>),
    )?;

    // ── Run conversion ───────────────────────────────────────────────────
    let report = run_batch(&config, progress.as_deref()).await?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    }

    if !cli.quiet && !show_progress {
        print_summary(&report);
    }

    // Individual failures are reported above; they do not change the exit code.
    Ok(())
}

/// Run the batch, clearing the spinner whenever the bar never took over.
async fn run_batch(
    config: &ConversionConfig,
    progress: Option<&CliProgressCallback>,
) -> Result<BatchReport> {
    let result = convert_dir(config).await;

    let started = matches!(&result, Ok(report) if report.discovered > 0);
    if !started {
        if let Some(cb) = progress {
            cb.abandon();
        }
    }

    result.context("Conversion failed")
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .input_dir(&cli.input)
        .output_dir(&cli.output)
        .size(
            cli.width.unwrap_or(cli.size),
            cli.height.unwrap_or(cli.size),
        )
        .mode(cli.mode.clone().into())
        .threshold(cli.threshold);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// One-line description of the run for the progress header.
fn describe(cli: &Cli) -> String {
    let width = cli.width.unwrap_or(cli.size);
    let height = cli.height.unwrap_or(cli.size);
    let mode: OutputMode = cli.mode.clone().into();
    let mode = match mode {
        OutputMode::Binary => format!("binary @ {}", cli.threshold),
        OutputMode::Grayscale => mode.to_string(),
    };
    format!(
        "{} → {}  ({width}x{height}, {mode})",
        cli.input.display(),
        cli.output.display()
    )
}

fn print_summary(report: &BatchReport) {
    if report.discovered == 0 {
        return;
    }
    eprintln!(
        "{}  {}/{} icons  {}ms  →  {}",
        if report.failed == 0 {
            green("✔")
        } else {
            cyan("⚠")
        },
        report.succeeded,
        report.discovered,
        report.total_duration_ms,
        bold(&report.output_dir.display().to_string()),
    );
    if report.failed > 0 {
        eprintln!("  {} icons failed", red(&report.failed.to_string()));
    }
}
