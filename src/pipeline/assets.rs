//! Asset acquisition: make sure each code has an image and a QR code on disk.
//!
//! The content directory doubles as a cache. For a code `C` the acquirer
//! owns exactly two files, `C_img.jpg` and `C_qr.jpg`:
//!
//! - both present → nothing to do, no network I/O;
//! - image missing → read the detail page's `og:image`, download it;
//! - QR missing → encode the detail URL and write the JPEG.
//!
//! Existing files are never rewritten, and every write goes through a temp
//! file so an interrupted run cannot leave a half-written "cache hit".
//!
//! One attempt per request; there is no retry policy. A failure is returned
//! as an [`AssetError`] for that code only; [`AssetAcquirer::acquire_all`]
//! records it and moves on to the next code.

use super::persist;
use crate::config::{QrSettings, SheetConfig};
use crate::error::{AssetError, StickerError};
use crate::output::{AcquisitionReport, AssetResult, AssetStatus, CacheStatus};
use crate::progress::ProgressCallback;
use image::{DynamicImage, ImageFormat, Luma, Rgb, RgbImage};
use once_cell::sync::Lazy;
use qrcode::types::QrError;
use qrcode::QrCode;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

static OG_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[property="og:image"]"#).unwrap());

/// The two cache files belonging to one code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub image: PathBuf,
    pub qr: PathBuf,
}

impl AssetPaths {
    pub fn new(content_dir: &Path, code: &str) -> Self {
        Self {
            image: content_dir.join(format!("{code}_img.jpg")),
            qr: content_dir.join(format!("{code}_qr.jpg")),
        }
    }

    /// Which of the two files exist right now.
    pub fn cache_status(&self) -> CacheStatus {
        match (self.image.exists(), self.qr.exists()) {
            (true, true) => CacheStatus::Complete,
            (false, false) => CacheStatus::Missing,
            _ => CacheStatus::Partial,
        }
    }
}

/// Fetches and generates per-code assets into a content directory.
#[derive(Debug, Clone)]
pub struct AssetAcquirer {
    client: reqwest::Client,
    content_dir: PathBuf,
    work_url_base: String,
    qr: QrSettings,
    timeout_secs: u64,
}

impl AssetAcquirer {
    /// Build an acquirer with its own HTTP client.
    ///
    /// `content_dir` is the resolved directory (base dir already applied).
    pub fn new(
        content_dir: impl Into<PathBuf>,
        config: &SheetConfig,
    ) -> Result<Self, StickerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("artwork-stickers/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StickerError::HttpClient(e.to_string()))?;
        Ok(Self::with_client(client, content_dir, config))
    }

    /// Build an acquirer around an existing client.
    pub fn with_client(
        client: reqwest::Client,
        content_dir: impl Into<PathBuf>,
        config: &SheetConfig,
    ) -> Self {
        Self {
            client,
            content_dir: content_dir.into(),
            work_url_base: config.work_url_base.clone(),
            qr: config.qr,
            timeout_secs: config.request_timeout_secs,
        }
    }

    pub fn paths(&self, code: &str) -> AssetPaths {
        AssetPaths::new(&self.content_dir, code)
    }

    /// Detail page URL; also the payload of the QR code.
    pub fn work_url(&self, code: &str) -> String {
        format!("{}{}", self.work_url_base, code)
    }

    /// Ensure both assets for `code` exist.
    pub async fn acquire(&self, code: &str) -> Result<AssetStatus, AssetError> {
        let paths = self.paths(code);
        let has_image = paths.image.exists();
        let has_qr = paths.qr.exists();

        if has_image && has_qr {
            info!("{}: already downloaded", code);
            return Ok(AssetStatus::Cached);
        }

        let url = self.work_url(code);

        if !has_image {
            let image_url = self.fetch_image_url(code, &url).await?;
            self.download_image(code, &image_url, &paths.image).await?;
        }

        if !has_qr {
            generate_qr(code, &url, self.qr, &paths.qr).await?;
        }

        Ok(if has_image {
            AssetStatus::QrGenerated
        } else {
            AssetStatus::Fetched
        })
    }

    /// Acquire assets for every unique code, one at a time.
    ///
    /// Codes are de-duplicated keeping first occurrence. A failing code is
    /// logged and reported; it never stops the rest of the batch.
    pub async fn acquire_all<S: AsRef<str>>(
        &self,
        codes: &[S],
        progress: Option<&ProgressCallback>,
    ) -> AcquisitionReport {
        let mut seen = HashSet::new();
        let unique: Vec<&str> = codes
            .iter()
            .map(AsRef::as_ref)
            .filter(|code| seen.insert(*code))
            .collect();
        let total = unique.len();

        if let Some(cb) = progress {
            cb.on_acquisition_start(total);
        }

        let mut results = Vec::with_capacity(total);
        for (i, code) in unique.into_iter().enumerate() {
            let index = i + 1;
            if let Some(cb) = progress {
                cb.on_asset_start(code, index, total);
            }

            let start = Instant::now();
            let outcome = self.acquire(code).await;

            match &outcome {
                Ok(status) => {
                    info!("{} done", code);
                    debug!("{}: {:?}", code, status);
                    if let Some(cb) = progress {
                        cb.on_asset_complete(code, index, total, *status);
                    }
                }
                Err(e) => {
                    warn!("{} failed: {}", code, e.reason());
                    if let Some(cb) = progress {
                        cb.on_asset_error(code, index, total, &e.to_string());
                    }
                }
            }

            results.push(AssetResult {
                code: code.to_string(),
                outcome,
                duration_ms: start.elapsed().as_millis() as u64,
            });
        }

        let report = AcquisitionReport { results };
        if let Some(cb) = progress {
            cb.on_acquisition_complete(total, report.succeeded());
        }
        report
    }

    /// Fetch the detail page and read its `og:image` address.
    async fn fetch_image_url(&self, code: &str, page_url: &str) -> Result<String, AssetError> {
        let fetch_failed = |reason: String| AssetError::PageFetchFailed {
            code: code.to_string(),
            url: page_url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(page_url)
            .send()
            .await
            .map_err(|e| fetch_failed(self.describe(&e)))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| fetch_failed(self.describe(&e)))?;
        debug!("{}: detail page HTTP {} ({} bytes)", code, status, body.len());

        extract_image_url(&body, page_url).ok_or_else(|| AssetError::ImageElementNotFound {
            code: code.to_string(),
        })
    }

    /// Download the preview image and store it verbatim.
    async fn download_image(
        &self,
        code: &str,
        image_url: &str,
        dest: &Path,
    ) -> Result<(), AssetError> {
        let download_failed = |reason: String| AssetError::DownloadFailed {
            code: code.to_string(),
            reason,
        };

        debug!("{}: downloading {}", code, image_url);
        let response = self
            .client
            .get(image_url)
            .send()
            .await
            .map_err(|e| download_failed(self.describe(&e)))?;

        if !response.status().is_success() {
            return Err(download_failed(format!("HTTP {}", response.status())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| download_failed(self.describe(&e)))?;

        persist::write_atomic_async(dest, bytes.to_vec())
            .await
            .map_err(|e| AssetError::WriteFailed {
                code: code.to_string(),
                path: dest.to_path_buf(),
                reason: e.to_string(),
            })?;

        debug!("{}: wrote {} bytes to {}", code, bytes.len(), dest.display());
        Ok(())
    }

    fn describe(&self, e: &reqwest::Error) -> String {
        if e.is_timeout() {
            format!("timed out after {}s", self.timeout_secs)
        } else {
            e.to_string()
        }
    }
}

/// Read the `content` of the first `property="og:image"` element.
///
/// Relative addresses are resolved against `page_url`.
pub fn extract_image_url(html: &str, page_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let content = document.select(&OG_IMAGE).next()?.value().attr("content")?.trim();
    if content.is_empty() {
        return None;
    }

    match reqwest::Url::parse(page_url).and_then(|base| base.join(content)) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(_) => Some(content.to_string()),
    }
}

/// Render `data` as a black-on-white RGB QR code with a white border.
pub fn render_qr(data: &str, settings: &QrSettings) -> Result<RgbImage, QrError> {
    let code =
        QrCode::with_error_correction_level(data.as_bytes(), settings.error_correction.into())?;
    let modules = code
        .render::<Luma<u8>>()
        .quiet_zone(false)
        .module_dimensions(settings.box_size, settings.box_size)
        .build();

    let pad = settings.border * settings.box_size;
    let mut canvas = RgbImage::from_pixel(
        modules.width() + 2 * pad,
        modules.height() + 2 * pad,
        Rgb([255, 255, 255]),
    );
    let modules = DynamicImage::ImageLuma8(modules).to_rgb8();
    image::imageops::replace(&mut canvas, &modules, i64::from(pad), i64::from(pad));
    Ok(canvas)
}

/// JPEG-encode an RGB image in memory.
pub fn encode_jpeg(img: RgbImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)?;
    Ok(buf)
}

/// Render, encode and write the QR code on the blocking pool.
async fn generate_qr(
    code: &str,
    url: &str,
    settings: QrSettings,
    dest: &Path,
) -> Result<(), AssetError> {
    let code_owned = code.to_string();
    let data = url.to_string();
    let path = dest.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let qr_failed = |reason: String| AssetError::QrGenerationFailed {
            code: code_owned.clone(),
            reason,
        };

        let img = render_qr(&data, &settings).map_err(|e| qr_failed(e.to_string()))?;
        let (w, h) = img.dimensions();
        let jpeg = encode_jpeg(img).map_err(|e| qr_failed(format!("JPEG encoding: {e}")))?;
        persist::write_atomic(&path, &jpeg).map_err(|e| AssetError::WriteFailed {
            code: code_owned.clone(),
            path: path.clone(),
            reason: e.to_string(),
        })?;

        debug!("{}: QR code {}x{} px → {}", code_owned, w, h, path.display());
        Ok(())
    })
    .await
    .map_err(|e| AssetError::QrGenerationFailed {
        code: code.to_string(),
        reason: format!("task panicked: {e}"),
    })?
}
