//! Sheet rendering: normalised records → one LaTeX document.
//!
//! Each record becomes one `\tcbitem \sticker{…}` line; the lines are joined
//! in input order and spliced into the template's works placeholder. With
//! [`MissingAssetPolicy::Keep`] there is no filtering or deduplication: the
//! sheet has exactly one sticker per input row.

use super::records::WorkRecord;
use crate::config::{MissingAssetPolicy, SheetLayout};
use crate::template::{document_template, WORKS_PLACEHOLDER};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// The full document text, ready to write and compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub text: String,
    pub sticker_count: usize,
}

/// Render one record as a raster item.
pub fn render_fragment(record: &WorkRecord) -> String {
    format!(
        "\\tcbitem \\sticker{{{}}}{{{}}}{{{}}}{{{}}}{{{}}}{{{}}}{{{}}}",
        record.title,
        record.artist,
        record.code,
        record.medium,
        record.height,
        record.width,
        record.price
    )
}

/// Render a record whose assets are unavailable with framed placeholders.
pub fn render_placeholder_fragment(record: &WorkRecord) -> String {
    let inner = render_fragment(record);
    let sticker = inner.trim_start_matches("\\tcbitem ");
    format!("\\tcbitem {{\\missingassets{sticker}}}")
}

/// Render the whole sheet.
///
/// `unavailable` holds the codes whose assets could not be acquired; how
/// they are drawn depends on `policy`.
pub fn render_sheet(
    records: &[WorkRecord],
    layout: &SheetLayout,
    content_dir: &Path,
    policy: MissingAssetPolicy,
    unavailable: &HashSet<&str>,
) -> RenderedDocument {
    let fragments: Vec<String> = records
        .iter()
        .filter_map(|record| {
            let missing = unavailable.contains(record.code.as_str());
            match (missing, policy) {
                (false, _) | (true, MissingAssetPolicy::Keep) => Some(render_fragment(record)),
                (true, MissingAssetPolicy::Placeholder) => {
                    Some(render_placeholder_fragment(record))
                }
                (true, MissingAssetPolicy::Skip) => {
                    debug!("Skipping sticker for {}: assets unavailable", record.code);
                    None
                }
            }
        })
        .collect();

    let sticker_count = fragments.len();
    let text =
        document_template(layout, content_dir).replace(WORKS_PLACEHOLDER, &fragments.join("\n"));

    RenderedDocument {
        text,
        sticker_count,
    }
}
