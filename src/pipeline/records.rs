//! Works table loading: CSV rows → ordered [`WorkRecord`]s.
//!
//! Columns are positional: title, artist, code, medium, height, width,
//! price. The first row is a header and is discarded. Row order is the
//! print order on the sheet, so it is preserved exactly.

use crate::error::StickerError;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Number of positional columns every row must have.
pub const REQUIRED_COLUMNS: usize = 7;

/// One artwork entry from the works table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRecord {
    pub title: String,
    pub artist: String,
    /// Unique per sheet; used in the detail URL and the asset file names.
    pub code: String,
    /// May list several materials separated by `、`.
    pub medium: String,
    pub height: String,
    pub width: String,
    pub price: String,
}

impl WorkRecord {
    fn from_row(row: &csv::StringRecord) -> Result<Self, StickerError> {
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        if row.len() < REQUIRED_COLUMNS {
            return Err(StickerError::DataFormat {
                line,
                detail: format!(
                    "expected at least {} fields, found {}",
                    REQUIRED_COLUMNS,
                    row.len()
                ),
            });
        }
        let field = |i: usize| row.get(i).unwrap_or_default().to_string();
        Ok(Self {
            title: field(0),
            artist: field(1),
            code: field(2),
            medium: field(3),
            height: field(4),
            width: field(5),
            price: field(6),
        })
    }
}

/// Load the works table at `path`.
///
/// Any short or unreadable row fails the whole load; nothing downstream
/// runs on a partial table.
pub fn load_records(path: &Path) -> Result<Vec<WorkRecord>, StickerError> {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StickerError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(StickerError::DataFormat {
                line: 0,
                detail: format!("cannot open '{}': {}", path.display(), e),
            });
        }
    };

    let records = parse_records(file)?;
    debug!("Loaded {} works from {}", records.len(), path.display());
    Ok(records)
}

/// Parse a works table from any reader. The header row is skipped.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<WorkRecord>, StickerError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    csv_reader
        .records()
        .map(|row| {
            let row = row.map_err(|e| StickerError::DataFormat {
                line: e.position().map(|p| p.line()).unwrap_or(0),
                detail: e.to_string(),
            })?;
            WorkRecord::from_row(&row)
        })
        .collect()
}
