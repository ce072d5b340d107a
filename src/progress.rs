//! Progress-callback trait for per-file conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the batch processes each icon. The CLI uses this to drive its
//! progress bar; library callers can forward events anywhere they like.
//!
//! # Example
//!
//! ```rust
//! use iconprep::{ConversionProgressCallback, ConversionConfig};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_file_complete(&self, index: usize, total: usize, output: &Path) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} → {}", index, total, output.display());
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .input_dir("icons")
//!     .progress_callback(Arc::new(CountingCallback { completed: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the batch loop as it processes each icon.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Files are processed one at a time, so calls never
/// overlap, but the trait is `Send + Sync` because the config travels across
/// the blocking-task boundary.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after discovery, before any file is converted.
    ///
    /// Not called when discovery finds nothing.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a file is rasterized.
    ///
    /// # Arguments
    /// * `index` — 1-indexed position in discovery order
    /// * `total` — number of discovered files
    /// * `input` — the SVG being converted
    fn on_file_start(&self, index: usize, total: usize, input: &Path) {
        let _ = (index, total, input);
    }

    /// Called when a file was written successfully.
    fn on_file_complete(&self, index: usize, total: usize, output: &Path) {
        let _ = (index, total, output);
    }

    /// Called when a file failed; the batch continues.
    ///
    /// # Arguments
    /// * `error` — human-readable cause
    fn on_file_error(&self, index: usize, total: usize, input: &Path, error: &str) {
        let _ = (index, total, input, error);
    }

    /// Called once after every discovered file has been attempted.
    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let _ = (total_files, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        started_total: AtomicUsize,
        completed_total: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_batch_start(&self, total_files: usize) {
            self.started_total.store(total_files, Ordering::SeqCst);
        }

        fn on_file_start(&self, _index: usize, _total: usize, _input: &Path) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_complete(&self, _index: usize, _total: usize, _output: &Path) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_error(&self, _index: usize, _total: usize, _input: &Path, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_batch_complete(&self, _total_files: usize, success_count: usize) {
            self.completed_total.store(success_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(5);
        cb.on_file_start(1, 5, Path::new("a.svg"));
        cb.on_file_complete(1, 5, Path::new("a.png"));
        cb.on_file_error(2, 5, Path::new("b.svg"), "some error");
        cb.on_batch_complete(5, 4);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_batch_start(3);
        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 3);

        tracker.on_file_start(1, 3, Path::new("a.svg"));
        tracker.on_file_complete(1, 3, Path::new("a.png"));
        tracker.on_file_start(2, 3, Path::new("b.svg"));
        tracker.on_file_complete(2, 3, Path::new("b.png"));
        tracker.on_file_start(3, 3, Path::new("c.svg"));
        tracker.on_file_error(3, 3, Path::new("c.svg"), "invalid SVG");

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);

        tracker.on_batch_complete(3, 2);
        assert_eq!(tracker.completed_total.load(Ordering::SeqCst), 2);
    }
}
