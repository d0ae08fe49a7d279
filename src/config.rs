//! Configuration types for sticker-sheet generation.
//!
//! All generation behaviour is controlled through [`SheetConfig`], built via
//! its [`SheetConfigBuilder`]. Paths in the config are relative to the base
//! directory handed to [`crate::generate::generate`]; nothing here depends on
//! the process working directory.

use crate::aliases::AliasTable;
use crate::error::StickerError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for a sticker-sheet run.
///
/// Built via [`SheetConfig::builder()`] or using [`SheetConfig::default()`].
///
/// # Example
/// ```rust
/// use artwork_stickers::{MissingAssetPolicy, SheetConfig};
///
/// let config = SheetConfig::builder()
///     .columns(6)
///     .missing_assets(MissingAssetPolicy::Placeholder)
///     .compile(false)
///     .build()
///     .unwrap();
/// assert_eq!(config.layout.columns, 6);
/// ```
#[derive(Clone)]
pub struct SheetConfig {
    /// Works table, relative to the base directory. Default: `works.csv`.
    pub data_file: PathBuf,

    /// Asset cache directory, relative to the base directory. Default: `content`.
    ///
    /// The document references assets through this same relative path, so
    /// the compiler must run in the base directory.
    pub content_dir: PathBuf,

    /// File stem of the generated document. Default: `GENERATED`.
    pub output_stem: String,

    /// Prefix of an artwork's detail page; the code is appended verbatim.
    /// Default: `https://www.platform-a.art/work@`.
    pub work_url_base: String,

    /// HTTP request timeout in seconds. Default: 60.
    pub request_timeout_secs: u64,

    /// QR code rendering parameters.
    pub qr: QrSettings,

    /// Page and sticker geometry.
    pub layout: SheetLayout,

    /// Artist display aliases. Default: [`AliasTable::builtin`].
    pub aliases: AliasTable,

    /// What to render for records whose assets could not be acquired.
    pub missing_assets: MissingAssetPolicy,

    /// External typesetter invocation.
    pub compiler: CompilerConfig,

    /// Optional per-code progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("works.csv"),
            content_dir: PathBuf::from("content"),
            output_stem: "GENERATED".to_string(),
            work_url_base: "https://www.platform-a.art/work@".to_string(),
            request_timeout_secs: 60,
            qr: QrSettings::default(),
            layout: SheetLayout::default(),
            aliases: AliasTable::builtin(),
            missing_assets: MissingAssetPolicy::default(),
            compiler: CompilerConfig::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SheetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetConfig")
            .field("data_file", &self.data_file)
            .field("content_dir", &self.content_dir)
            .field("output_stem", &self.output_stem)
            .field("work_url_base", &self.work_url_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("qr", &self.qr)
            .field("layout", &self.layout)
            .field("aliases", &self.aliases.len())
            .field("missing_assets", &self.missing_assets)
            .field("compiler", &self.compiler)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn AcquisitionProgressCallback>"),
            )
            .finish()
    }
}

impl SheetConfig {
    /// Create a new builder for `SheetConfig`.
    pub fn builder() -> SheetConfigBuilder {
        SheetConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SheetConfig`].
#[derive(Debug)]
pub struct SheetConfigBuilder {
    config: SheetConfig,
}

impl SheetConfigBuilder {
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    pub fn content_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.content_dir = path.into();
        self
    }

    pub fn output_stem(mut self, stem: impl Into<String>) -> Self {
        self.config.output_stem = stem.into();
        self
    }

    pub fn work_url_base(mut self, base: impl Into<String>) -> Self {
        self.config.work_url_base = base.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs.max(1);
        self
    }

    pub fn qr(mut self, qr: QrSettings) -> Self {
        self.config.qr = qr;
        self
    }

    pub fn layout(mut self, layout: SheetLayout) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn columns(mut self, n: usize) -> Self {
        self.config.layout.columns = n.clamp(1, 20);
        self
    }

    pub fn aliases(mut self, aliases: AliasTable) -> Self {
        self.config.aliases = aliases;
        self
    }

    pub fn missing_assets(mut self, policy: MissingAssetPolicy) -> Self {
        self.config.missing_assets = policy;
        self
    }

    pub fn compiler(mut self, compiler: CompilerConfig) -> Self {
        self.config.compiler = compiler;
        self
    }

    pub fn compiler_program(mut self, program: impl Into<String>) -> Self {
        self.config.compiler.program = program.into();
        self
    }

    /// Enable or disable the typesetter run. The `.tex` file is always written.
    pub fn compile(mut self, enabled: bool) -> Self {
        self.config.compiler.enabled = enabled;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SheetConfig, StickerError> {
        let c = &self.config;
        if !(c.work_url_base.starts_with("http://") || c.work_url_base.starts_with("https://")) {
            return Err(StickerError::InvalidConfig(format!(
                "Work URL base must be an HTTP/HTTPS URL, got '{}'",
                c.work_url_base
            )));
        }
        if c.output_stem.is_empty() || c.output_stem.contains(['/', '\\']) {
            return Err(StickerError::InvalidConfig(format!(
                "Output stem must be a bare file name, got '{}'",
                c.output_stem
            )));
        }
        if c.layout.columns == 0 {
            return Err(StickerError::InvalidConfig("Columns must be ≥ 1".into()));
        }
        if c.qr.box_size == 0 {
            return Err(StickerError::InvalidConfig(
                "QR module size must be ≥ 1 px".into(),
            ));
        }
        if c.compiler.enabled && c.compiler.program.trim().is_empty() {
            return Err(StickerError::InvalidConfig(
                "Compiler program must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Sub-configs ──────────────────────────────────────────────────────────

/// QR code rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrSettings {
    /// Error-correction level. Default: low (~7 % recovery).
    pub error_correction: QrErrorCorrection,
    /// Pixels per QR module. Default: 10.
    pub box_size: u32,
    /// Quiet-zone width in modules. Default: 4.
    pub border: u32,
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            error_correction: QrErrorCorrection::Low,
            box_size: 10,
            border: 4,
        }
    }
}

/// QR error-correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QrErrorCorrection {
    #[default]
    Low,
    Medium,
    Quartile,
    High,
}

impl From<QrErrorCorrection> for qrcode::EcLevel {
    fn from(level: QrErrorCorrection) -> Self {
        match level {
            QrErrorCorrection::Low => qrcode::EcLevel::L,
            QrErrorCorrection::Medium => qrcode::EcLevel::M,
            QrErrorCorrection::Quartile => qrcode::EcLevel::Q,
            QrErrorCorrection::High => qrcode::EcLevel::H,
        }
    }
}

/// Page and sticker geometry plus font resources.
///
/// Defaults fit seven 42.3 mm stickers across an A4 landscape page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Stickers per row. Default: 7.
    pub columns: usize,
    pub sticker_width_mm: f32,
    pub sticker_height_mm: f32,
    pub image_size_mm: f32,
    pub qr_size_mm: f32,
    /// Directory holding the font file, with trailing slash (fontspec `Path`).
    pub font_dir: String,
    /// Font used for both Latin and CJK text.
    pub font_file: String,
    /// Text printed after the price.
    pub price_suffix: String,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            columns: 7,
            sticker_width_mm: 42.3,
            sticker_height_mm: 105.0,
            image_size_mm: 32.0,
            qr_size_mm: 20.0,
            font_dir: "/platform-a/".to_string(),
            font_file: "NotoSansCJK-Regular.ttc".to_string(),
            price_suffix: "NTD".to_string(),
        }
    }
}

/// What to render for a record whose image or QR code is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingAssetPolicy {
    /// Render the sticker anyway; the document references the missing files
    /// and the compiler shows a broken image. (default)
    #[default]
    Keep,
    /// Leave the record off the sheet.
    Skip,
    /// Render the sticker with framed boxes in place of the images.
    Placeholder,
}

/// External typesetter invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Run the compiler after writing the document. Default: true.
    pub enabled: bool,
    /// Program name or path. Default: `xelatex`.
    pub program: String,
    /// Arguments placed before the document file name.
    pub args: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "xelatex".to_string(),
            args: vec![
                "-synctex=1".to_string(),
                "-interaction=nonstopmode".to_string(),
            ],
        }
    }
}
