//! CLI binary for artwork-stickers.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `SheetConfig` and prints results.

use anyhow::{Context, Result};
use artwork_stickers::{
    generate, inspect, AcquisitionProgressCallback, AliasTable, AssetStatus, CacheStatus,
    MissingAssetPolicy, ProgressCallback, SheetConfig,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
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

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar for the whole acquisition plus a log
/// line per code printed above it.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Per-code wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<String, Instant>>,
}

impl CliProgressCallback {
    /// Start as a spinner; `on_acquisition_start` switches to a counted bar.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading works table…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>4}/{len} codes  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Fetching");
        self.bar.reset_eta();
    }

    fn elapsed(&self, code: &str) -> String {
        let elapsed_ms = self
            .start_times
            .lock()
            .ok()
            .and_then(|mut times| times.remove(code))
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);
        dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0))
    }
}

impl AcquisitionProgressCallback for CliProgressCallback {
    fn on_acquisition_start(&self, total: usize) {
        self.activate_bar(total);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Acquiring assets for {total} codes…"))
        ));
    }

    fn on_asset_start(&self, code: &str, _index: usize, _total: usize) {
        if let Ok(mut times) = self.start_times.lock() {
            times.insert(code.to_string(), Instant::now());
        }
        self.bar.set_message(code.to_string());
    }

    fn on_asset_complete(&self, code: &str, index: usize, total: usize, status: AssetStatus) {
        let label = match status {
            AssetStatus::Cached => "cached",
            AssetStatus::Fetched => "fetched",
            AssetStatus::QrGenerated => "qr only",
        };
        self.bar.println(format!(
            "  {} {:>4}/{:<4} {:<12} {:<8}  {}",
            green("✓"),
            index,
            total,
            code,
            dim(label),
            self.elapsed(code),
        ));
        self.bar.inc(1);
    }

    fn on_asset_error(&self, code: &str, index: usize, total: usize, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg: String = if error.chars().count() > 80 {
            let mut cut: String = error.chars().take(79).collect();
            cut.push('\u{2026}');
            cut
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} {:>4}/{:<4} {}  {}",
            red("✗"),
            index,
            total,
            red(&msg),
            self.elapsed(code),
        ));
        self.bar.inc(1);
    }

    fn on_acquisition_complete(&self, total: usize, success_count: usize) {
        let failed = total.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} codes ready",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} codes ready  ({} failed)",
                if failed == total { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Generate GENERATED.tex and GENERATED.pdf from ./works.csv
  stickers

  # Another exhibition directory, 6 stickers per row
  stickers --columns 6 exhibitions/spring

  # Write the .tex only (no xelatex installed)
  stickers --no-compile

  # Leave stickers with missing pictures off the sheet
  stickers --missing-assets skip

  # Show which codes still need downloading (no network)
  stickers --inspect-only

  # Machine-readable report
  stickers --json > report.json

FILES (relative to BASE_DIR):
  works.csv              title, artist, code, medium, height, width, price
  content/<code>_img.jpg artwork picture (og:image of the work page)
  content/<code>_qr.jpg  QR code of the work page URL
  GENERATED.tex          rendered sheet
  GENERATED.pdf          compiled sheet

ALIAS FILE (TOML):
  [aliases]
  "Real Name" = "Display Alias"

ENVIRONMENT VARIABLES:
  STICKERS_*             Every flag has a STICKERS_<FLAG> fallback
  RUST_LOG               Override the log filter (e.g. artwork_stickers=debug)
"#;

/// Generate printable artwork price-tag sticker sheets.
#[derive(Parser, Debug)]
#[command(
    name = "stickers",
    version,
    about = "Generate printable artwork price-tag sticker sheets",
    long_about = "Read a works table, download each work's picture from the sales platform, \
generate a QR code to its page, and typeset every work as a sticker on an A4 landscape sheet \
with xelatex. Downloaded assets are cached, so reruns only fetch what is missing.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory holding the works table; all outputs are written here.
    #[arg(env = "STICKERS_BASE_DIR", default_value = ".")]
    base_dir: PathBuf,

    /// Works table, relative to BASE_DIR.
    #[arg(long, env = "STICKERS_DATA", default_value = "works.csv")]
    data: PathBuf,

    /// Asset cache directory, relative to BASE_DIR.
    #[arg(long, env = "STICKERS_CONTENT_DIR", default_value = "content")]
    content_dir: PathBuf,

    /// File stem of the generated .tex / .pdf.
    #[arg(long, env = "STICKERS_OUTPUT_STEM", default_value = "GENERATED")]
    output_stem: String,

    /// TOML file of artist aliases. Defaults to the built-in table.
    #[arg(long, env = "STICKERS_ALIASES")]
    aliases: Option<PathBuf>,

    /// Work page URL prefix; the code is appended.
    #[arg(long, env = "STICKERS_URL_BASE")]
    url_base: Option<String>,

    /// Stickers per row (1–20).
    #[arg(long, env = "STICKERS_COLUMNS", default_value_t = 7,
          value_parser = clap::value_parser!(u32).range(1..=20))]
    columns: u32,

    /// What to draw for works whose assets could not be acquired.
    #[arg(long, env = "STICKERS_MISSING_ASSETS", value_enum, default_value = "keep")]
    missing_assets: MissingAssetsArg,

    /// Typesetter program.
    #[arg(long, env = "STICKERS_COMPILER", default_value = "xelatex")]
    compiler: String,

    /// Write the .tex file only; do not run the typesetter.
    #[arg(long, env = "STICKERS_NO_COMPILE")]
    no_compile: bool,

    /// HTTP timeout per request in seconds.
    #[arg(long, env = "STICKERS_TIMEOUT", default_value_t = 60)]
    timeout: u64,

    /// Output structured JSON (SheetOutput) instead of a summary.
    #[arg(long, env = "STICKERS_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "STICKERS_NO_PROGRESS")]
    no_progress: bool,

    /// Report the cache state of every code, no downloads.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "STICKERS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "STICKERS_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum MissingAssetsArg {
    Keep,
    Skip,
    Placeholder,
}

impl From<MissingAssetsArg> for MissingAssetPolicy {
    fn from(v: MissingAssetsArg) -> Self {
        match v {
            MissingAssetsArg::Keep => MissingAssetPolicy::Keep,
            MissingAssetsArg::Skip => MissingAssetPolicy::Skip,
            MissingAssetsArg::Placeholder => MissingAssetPolicy::Placeholder,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
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
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn AcquisitionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let inspection =
            inspect(&cli.base_dir, &config).context("Failed to inspect works table")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&inspection)
                    .context("Failed to serialise inspection")?
            );
        } else {
            for (code, status) in &inspection.codes {
                let mark = match status {
                    CacheStatus::Complete => green("●"),
                    CacheStatus::Partial => cyan("◐"),
                    CacheStatus::Missing => red("○"),
                };
                println!("{mark} {code}");
            }
            println!();
            println!("Records:   {}", inspection.total_records);
            println!("Codes:     {}", inspection.codes.len());
            println!("Complete:  {}", inspection.count(CacheStatus::Complete));
            println!("Partial:   {}", inspection.count(CacheStatus::Partial));
            println!("Missing:   {}", inspection.count(CacheStatus::Missing));
        }
        return Ok(());
    }

    // ── Run generation ───────────────────────────────────────────────────
    let output = generate(&cli.base_dir, &config)
        .await
        .context("Sheet generation failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    if !cli.quiet {
        if !show_progress {
            for err in output.report.failures() {
                eprintln!("  {} {}", red("✗"), err);
            }
        }
        let stats = &output.stats;
        eprintln!(
            "{}  {} stickers  {}ms  →  {}",
            if stats.assets_failed == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.stickers_rendered,
            stats.total_duration_ms,
            bold(
                &output
                    .artifact_path
                    .as_ref()
                    .unwrap_or(&output.document_path)
                    .display()
                    .to_string()
            ),
        );
        eprintln!(
            "   {} cached  /  {} fetched  /  {} qr only  /  {} failed",
            dim(&stats.assets_cached.to_string()),
            dim(&stats.assets_fetched.to_string()),
            dim(&stats.qr_regenerated.to_string()),
            dim(&stats.assets_failed.to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `SheetConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<SheetConfig> {
    let aliases = match cli.aliases {
        Some(ref path) => AliasTable::load(path)
            .with_context(|| format!("Failed to load aliases from {:?}", path))?,
        None => AliasTable::builtin(),
    };

    let mut builder = SheetConfig::builder()
        .data_file(&cli.data)
        .content_dir(&cli.content_dir)
        .output_stem(&cli.output_stem)
        .columns(cli.columns as usize)
        .aliases(aliases)
        .missing_assets(cli.missing_assets.clone().into())
        .compiler_program(&cli.compiler)
        .compile(!cli.no_compile)
        .request_timeout_secs(cli.timeout);

    if let Some(ref base) = cli.url_base {
        builder = builder.work_url_base(base);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
