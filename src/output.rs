//! Result types returned by sheet generation.

use crate::error::AssetError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// How a code's assets came to be on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetStatus {
    /// Both files already existed; nothing was fetched or generated.
    Cached,
    /// The image was downloaded (and the QR code generated if missing).
    Fetched,
    /// The image was already present; only the QR code was generated.
    QrGenerated,
}

/// Outcome of acquiring one code's assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetResult {
    pub code: String,
    pub outcome: Result<AssetStatus, AssetError>,
    pub duration_ms: u64,
}

impl AssetResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Per-code outcomes of a batch, in first-seen code order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcquisitionReport {
    pub results: Vec<AssetResult>,
}

impl AcquisitionReport {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// Count of successful results with the given status.
    pub fn count(&self, status: AssetStatus) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, Ok(s) if s == status))
            .count()
    }

    /// Every failed code with its error.
    pub fn failures(&self) -> impl Iterator<Item = &AssetError> {
        self.results.iter().filter_map(|r| r.outcome.as_ref().err())
    }

    /// Codes whose acquisition failed.
    pub fn failed_codes(&self) -> HashSet<&str> {
        self.failures().map(AssetError::code).collect()
    }
}

/// Counters for a completed run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetStats {
    pub total_records: usize,
    pub stickers_rendered: usize,
    pub assets_cached: usize,
    /// Image downloaded (and QR generated) by this run.
    pub assets_fetched: usize,
    /// Image already cached; only the QR code was generated.
    pub qr_regenerated: usize,
    pub assets_failed: usize,
    pub acquisition_duration_ms: u64,
    pub compile_duration_ms: Option<u64>,
    pub total_duration_ms: u64,
}

/// Everything a sheet-generation run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetOutput {
    /// The written `.tex` document.
    pub document_path: PathBuf,
    /// The compiled artifact, when the compiler ran and produced one.
    pub artifact_path: Option<PathBuf>,
    pub report: AcquisitionReport,
    pub stats: SheetStats,
}

/// Cache state of one code, as seen by [`crate::generate::inspect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheStatus {
    /// Image and QR code both present.
    Complete,
    /// Exactly one of the two files present.
    Partial,
    /// Neither file present.
    Missing,
}

/// Offline summary of a base directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetInspection {
    pub total_records: usize,
    /// `(code, status)` for each unique code, in first-seen order.
    pub codes: Vec<(String, CacheStatus)>,
}

impl SheetInspection {
    pub fn count(&self, status: CacheStatus) -> usize {
        self.codes.iter().filter(|(_, s)| *s == status).count()
    }
}
