//! Sheet generation entry points.
//!
//! [`generate`] runs the whole pipeline against a base directory: load the
//! works table, acquire assets, normalise, render, write, and compile.
//! Per-code asset failures end up in the returned report; only structural
//! problems (bad table, unwritable output, compiler failure) are `Err`.

use crate::config::SheetConfig;
use crate::error::StickerError;
use crate::output::{AssetStatus, SheetInspection, SheetOutput, SheetStats};
use crate::pipeline::assets::{AssetAcquirer, AssetPaths};
use crate::pipeline::{compile, normalize, records, render};
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Generate the sticker sheet for the works table in `base_dir`.
///
/// # Arguments
/// * `base_dir` — directory holding the works table; assets, the `.tex`
///   file and the compiled output are all placed relative to it
/// * `config` — generation configuration
///
/// # Returns
/// `Ok(SheetOutput)` even if some codes failed to acquire (check
/// `output.report` / `output.stats.assets_failed`).
///
/// # Errors
/// Returns `Err(StickerError)` only for fatal errors:
/// - works table missing or malformed (nothing is written)
/// - content directory or document cannot be written
/// - compiler missing, or failing without producing output
pub async fn generate(
    base_dir: impl AsRef<Path>,
    config: &SheetConfig,
) -> Result<SheetOutput, StickerError> {
    let total_start = Instant::now();
    let base_dir = base_dir.as_ref();
    info!("Generating sticker sheet in {}", base_dir.display());

    // ── Step 1: Load records ─────────────────────────────────────────────
    let mut works = records::load_records(&base_dir.join(&config.data_file))?;
    info!("Loaded {} works", works.len());

    // ── Step 2: Acquire assets ───────────────────────────────────────────
    let content_dir = base_dir.join(&config.content_dir);
    tokio::fs::create_dir_all(&content_dir)
        .await
        .map_err(|e| StickerError::OutputWriteFailed {
            path: content_dir.clone(),
            source: e,
        })?;

    let acquirer = AssetAcquirer::new(&content_dir, config)?;
    let codes: Vec<&str> = works.iter().map(|w| w.code.as_str()).collect();
    let acquisition_start = Instant::now();
    let report = acquirer
        .acquire_all(&codes, config.progress_callback.as_ref())
        .await;
    let acquisition_duration_ms = acquisition_start.elapsed().as_millis() as u64;
    info!(
        "Assets: {}/{} codes ready, {} failed",
        report.succeeded(),
        report.len(),
        report.failed()
    );

    // ── Step 3: Normalise ────────────────────────────────────────────────
    normalize::normalize_records(&mut works, &config.aliases);

    // ── Step 4: Render ───────────────────────────────────────────────────
    let unavailable: HashSet<&str> = report.failed_codes();
    let document = render::render_sheet(
        &works,
        &config.layout,
        &config.content_dir,
        config.missing_assets,
        &unavailable,
    );
    debug!("Rendered {} stickers", document.sticker_count);

    // ── Step 5: Write and compile ────────────────────────────────────────
    let document_path = compile::write_document(base_dir, &config.output_stem, &document.text)?;

    let (artifact_path, compile_duration_ms) = if config.compiler.enabled {
        let outcome = compile::compile(base_dir, &document_path, &config.compiler).await?;
        (outcome.artifact, Some(outcome.duration_ms))
    } else {
        debug!("Compiler disabled; leaving {}", document_path.display());
        (None, None)
    };

    let stats = SheetStats {
        total_records: works.len(),
        stickers_rendered: document.sticker_count,
        assets_cached: report.count(AssetStatus::Cached),
        assets_fetched: report.count(AssetStatus::Fetched),
        qr_regenerated: report.count(AssetStatus::QrGenerated),
        assets_failed: report.failed(),
        acquisition_duration_ms,
        compile_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Sheet complete: {} stickers, {}ms total",
        stats.stickers_rendered, stats.total_duration_ms
    );

    Ok(SheetOutput {
        document_path,
        artifact_path,
        report,
        stats,
    })
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    base_dir: impl AsRef<Path>,
    config: &SheetConfig,
) -> Result<SheetOutput, StickerError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| StickerError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate(base_dir, config))
}

/// Load the works table and report each code's cache state.
///
/// No network access and nothing is written.
pub fn inspect(
    base_dir: impl AsRef<Path>,
    config: &SheetConfig,
) -> Result<SheetInspection, StickerError> {
    let base_dir = base_dir.as_ref();
    let works = records::load_records(&base_dir.join(&config.data_file))?;
    let content_dir = base_dir.join(&config.content_dir);

    let mut seen = HashSet::new();
    let codes = works
        .iter()
        .map(|w| w.code.as_str())
        .filter(|code| seen.insert(*code))
        .map(|code| (code.to_string(), AssetPaths::new(&content_dir, code).cache_status()))
        .collect();

    Ok(SheetInspection {
        total_records: works.len(),
        codes,
    })
}
