//! # artwork-stickers
//!
//! Generate printable price-tag sticker sheets for an art exhibition.
//!
//! ## Why this crate?
//!
//! Each exhibited work needs a sticker with its picture, title, artist,
//! medium, dimensions, price, and a QR code pointing at the work's page on
//! the sales platform. Doing that by hand for a few hundred works is slow
//! and error-prone. This crate reads the works table, pulls the pictures
//! from the platform once (later runs reuse the on-disk cache), and typesets
//! the whole sheet as a single LaTeX document.
//!
//! ## Pipeline Overview
//!
//! ```text
//! works.csv
//!  │
//!  ├─ 1. Records    parse rows into WorkRecord (fatal on short rows)
//!  ├─ 2. Assets     og:image download + QR code per code, cached on disk
//!  ├─ 3. Normalise  artist aliases, \mbox-wrapped media, escaped titles
//!  ├─ 4. Render     one \sticker fragment per row, spliced into the template
//!  └─ 5. Compile    write GENERATED.tex and run xelatex in the base dir
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use artwork_stickers::{generate, SheetConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SheetConfig::default();
//!     let output = generate("exhibition/", &config).await?;
//!     println!("{}", output.document_path.display());
//!     eprintln!("{} stickers, {} assets failed",
//!         output.stats.stickers_rendered,
//!         output.stats.assets_failed);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `stickers` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! artwork-stickers = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod aliases;
pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod template;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use aliases::AliasTable;
pub use config::{
    CompilerConfig, MissingAssetPolicy, QrErrorCorrection, QrSettings, SheetConfig,
    SheetConfigBuilder, SheetLayout,
};
pub use error::{AssetError, StickerError};
pub use generate::{generate, generate_sync, inspect};
pub use output::{
    AcquisitionReport, AssetResult, AssetStatus, CacheStatus, SheetInspection, SheetOutput,
    SheetStats,
};
pub use pipeline::records::WorkRecord;
pub use pipeline::render::RenderedDocument;
pub use progress::{AcquisitionProgressCallback, NoopProgressCallback, ProgressCallback};
