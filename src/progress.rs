//! Progress-callback trait for per-code acquisition events.
//!
//! Inject an [`Arc<dyn AcquisitionProgressCallback>`] via
//! [`crate::config::SheetConfigBuilder::progress_callback`] to receive an
//! event for every artwork code the acquirer processes. The CLI uses this to
//! print one success/failure line per code above its progress bar.
//!
//! # Example
//!
//! ```rust
//! use artwork_stickers::{AcquisitionProgressCallback, SheetConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     failed: AtomicUsize,
//! }
//!
//! impl AcquisitionProgressCallback for CountingCallback {
//!     fn on_asset_error(&self, code: &str, _index: usize, _total: usize, error: &str) {
//!         self.failed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{code} failed: {error}");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { failed: AtomicUsize::new(0) });
//!
//! let config = SheetConfig::builder()
//!     .progress_callback(counter as Arc<dyn AcquisitionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::AssetStatus;
use std::sync::Arc;

/// Called by the asset acquirer as it processes each code.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `index` is 1-based.
pub trait AcquisitionProgressCallback: Send + Sync {
    /// Called once before the first code, with the number of unique codes.
    fn on_acquisition_start(&self, total: usize) {
        let _ = total;
    }

    /// Called before a code is checked against the cache.
    fn on_asset_start(&self, code: &str, index: usize, total: usize) {
        let _ = (code, index, total);
    }

    /// Called when both assets for a code are on disk.
    fn on_asset_complete(&self, code: &str, index: usize, total: usize, status: AssetStatus) {
        let _ = (code, index, total, status);
    }

    /// Called when a code could not be acquired.
    fn on_asset_error(&self, code: &str, index: usize, total: usize, error: &str) {
        let _ = (code, index, total, error);
    }

    /// Called once after every code has been attempted.
    fn on_acquisition_complete(&self, total: usize, success_count: usize) {
        let _ = (total, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl AcquisitionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SheetConfig`].
pub type ProgressCallback = Arc<dyn AcquisitionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: Mutex<Vec<String>>,
        success_total: AtomicUsize,
    }

    impl AcquisitionProgressCallback for TrackingCallback {
        fn on_asset_start(&self, _code: &str, _index: usize, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_asset_complete(&self, _code: &str, _index: usize, _total: usize, _s: AssetStatus) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_asset_error(&self, code: &str, _index: usize, _total: usize, _error: &str) {
            self.errors.lock().unwrap().push(code.to_string());
        }

        fn on_acquisition_complete(&self, _total: usize, success_count: usize) {
            self.success_total.store(success_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_acquisition_start(2);
        cb.on_asset_start("A1", 1, 2);
        cb.on_asset_complete("A1", 1, 2, AssetStatus::Cached);
        cb.on_asset_error("A2", 2, 2, "image element not found");
        cb.on_acquisition_complete(2, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_asset_start("A1", 1, 2);
        tracker.on_asset_complete("A1", 1, 2, AssetStatus::Fetched);
        tracker.on_asset_start("A2", 2, 2);
        tracker.on_asset_error("A2", 2, 2, "download failed");
        tracker.on_acquisition_complete(2, 1);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(*tracker.errors.lock().unwrap(), vec!["A2".to_string()]);
        assert_eq!(tracker.success_total.load(Ordering::SeqCst), 1);
    }
}
