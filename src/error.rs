//! Error types for the artwork-stickers library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`StickerError`] — **Fatal**: the sheet cannot be produced at all
//!   (missing data file, malformed row, compiler missing). Returned as
//!   `Err(StickerError)` from the top-level `generate*` functions.
//!
//! * [`AssetError`] — **Non-fatal**: one artwork code could not get its
//!   image or QR code, but every other code is fine. Stored inside
//!   [`crate::output::AssetResult`] so the run can still render and compile
//!   the sheet, with a per-code report for the operator.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the artwork-stickers library.
///
/// Per-code asset failures use [`AssetError`] and are stored in
/// [`crate::output::AssetResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum StickerError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Data file was not found at the given path.
    #[error("Data file not found: '{path}'\nCheck the base directory contains the works table.")]
    FileNotFound { path: PathBuf },

    /// A row of the works table could not be read or is too short.
    #[error("Malformed works table at line {line}: {detail}")]
    DataFormat { line: u64, detail: String },

    /// The alias table file could not be read or parsed.
    #[error("Invalid alias table '{path}': {detail}")]
    AliasTable { path: PathBuf, detail: String },

    // ── Network setup ─────────────────────────────────────────────────────
    /// The shared HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file or directory.
    #[error("Failed to write '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Compiler errors ───────────────────────────────────────────────────
    /// The typesetting program could not be started.
    #[error("Document compiler '{program}' could not be started: {detail}\nIs it installed and on PATH? Use --no-compile to only write the .tex file.")]
    CompilerNotFound { program: String, detail: String },

    /// The typesetting program exited with a failure status.
    #[error("Document compiler '{program}' failed ({status})\n{log_tail}")]
    CompilationFailed {
        program: String,
        status: String,
        log_tail: String,
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

/// A non-fatal error for a single artwork code.
///
/// Stored alongside [`crate::output::AssetResult`] when acquisition fails.
/// The batch continues with the remaining codes.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum AssetError {
    /// The detail page has no `og:image` metadata to follow.
    #[error("{code}: image element not found")]
    ImageElementNotFound { code: String },

    /// The detail page itself could not be fetched.
    #[error("{code}: failed to fetch '{url}': {reason}")]
    PageFetchFailed {
        code: String,
        url: String,
        reason: String,
    },

    /// The preview image download did not succeed.
    #[error("{code}: download failed: {reason}")]
    DownloadFailed { code: String, reason: String },

    /// An asset file could not be written to the content directory.
    #[error("{code}: failed to write '{path}': {reason}")]
    WriteFailed {
        code: String,
        path: PathBuf,
        reason: String,
    },

    /// The QR code image could not be generated or encoded.
    #[error("{code}: QR code generation failed: {reason}")]
    QrGenerationFailed { code: String, reason: String },
}

impl AssetError {
    /// The artwork code this failure belongs to.
    pub fn code(&self) -> &str {
        match self {
            AssetError::ImageElementNotFound { code }
            | AssetError::PageFetchFailed { code, .. }
            | AssetError::DownloadFailed { code, .. }
            | AssetError::WriteFailed { code, .. }
            | AssetError::QrGenerationFailed { code, .. } => code,
        }
    }

    /// The failure without its code prefix, for per-code log lines.
    pub fn reason(&self) -> String {
        match self {
            AssetError::ImageElementNotFound { .. } => "image element not found".to_string(),
            AssetError::PageFetchFailed { url, reason, .. } => {
                format!("failed to fetch '{url}': {reason}")
            }
            AssetError::DownloadFailed { reason, .. } => format!("download failed: {reason}"),
            AssetError::WriteFailed { path, reason, .. } => {
                format!("failed to write '{}': {reason}", path.display())
            }
            AssetError::QrGenerationFailed { reason, .. } => {
                format!("QR code generation failed: {reason}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_format_display() {
        let e = StickerError::DataFormat {
            line: 4,
            detail: "expected 7 fields, found 3".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("line 4"), "got: {msg}");
        assert!(msg.contains("found 3"), "got: {msg}");
    }

    #[test]
    fn compilation_failed_display() {
        let e = StickerError::CompilationFailed {
            program: "xelatex".into(),
            status: "exit status: 1".into(),
            log_tail: "! Undefined control sequence.".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("xelatex"));
        assert!(msg.contains("Undefined control sequence"));
    }

    #[test]
    fn image_element_not_found_names_code() {
        let e = AssetError::ImageElementNotFound { code: "A7".into() };
        assert_eq!(e.to_string(), "A7: image element not found");
        assert_eq!(e.code(), "A7");
    }

    #[test]
    fn download_failed_display() {
        let e = AssetError::DownloadFailed {
            code: "B2".into(),
            reason: "HTTP 404 Not Found".into(),
        };
        assert!(e.to_string().contains("download failed"));
        assert!(e.to_string().contains("404"));
        assert_eq!(e.code(), "B2");
    }

    #[test]
    fn reason_is_display_without_code() {
        let errors = [
            AssetError::ImageElementNotFound { code: "A1".into() },
            AssetError::PageFetchFailed {
                code: "A2".into(),
                url: "https://example.com/work@A2".into(),
                reason: "connection refused".into(),
            },
            AssetError::DownloadFailed {
                code: "A3".into(),
                reason: "HTTP 404 Not Found".into(),
            },
            AssetError::WriteFailed {
                code: "A4".into(),
                path: PathBuf::from("content/A4_img.jpg"),
                reason: "disk full".into(),
            },
            AssetError::QrGenerationFailed {
                code: "A5".into(),
                reason: "data too long".into(),
            },
        ];
        for e in &errors {
            assert_eq!(format!("{}: {}", e.code(), e.reason()), e.to_string());
        }
    }
}
