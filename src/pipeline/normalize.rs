//! Record normalisation before rendering.
//!
//! Three fields change, nothing else:
//!
//! - `artist` is swapped for its display alias when the table has one.
//! - `medium` is split on `、` and each material is wrapped in `\mbox{…}` so
//!   LaTeX never breaks a line inside a short label. The delimiter is kept
//!   between the boxes: outside CJK context xeCJK would typeset a bare `、`
//!   with Latin spacing.
//! - `title` has `#` escaped, which would otherwise be read as a macro
//!   parameter inside `\sticker{…}`.

use super::records::WorkRecord;
use crate::aliases::AliasTable;

/// Separator between materials in the medium column.
pub const MEDIUM_DELIMITER: char = '、';

/// Normalise one record in place.
pub fn normalize_record(record: &mut WorkRecord, aliases: &AliasTable) {
    record.artist = aliases.resolve(&record.artist).to_string();
    record.medium = wrap_medium(&record.medium);
    record.title = escape_title(&record.title);
}

/// Normalise every record in place, keeping order.
pub fn normalize_records(records: &mut [WorkRecord], aliases: &AliasTable) {
    for record in records {
        normalize_record(record, aliases);
    }
}

/// `"彩、木"` → `"\mbox{彩}、\mbox{木}"`.
pub fn wrap_medium(medium: &str) -> String {
    medium
        .split(MEDIUM_DELIMITER)
        .map(|token| format!("\\mbox{{{token}}}"))
        .collect::<Vec<_>>()
        .join(&MEDIUM_DELIMITER.to_string())
}

/// Escape the LaTeX macro-parameter character in a title.
pub fn escape_title(title: &str) -> String {
    title.replace('#', "\\#")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(artist: &str, medium: &str, title: &str) -> WorkRecord {
        WorkRecord {
            title: title.into(),
            artist: artist.into(),
            code: "A1".into(),
            medium: medium.into(),
            height: "30".into(),
            width: "20".into(),
            price: "1200".into(),
        }
    }

    #[test]
    fn wraps_each_medium_token() {
        assert_eq!(wrap_medium("彩、木"), "\\mbox{彩}、\\mbox{木}");
        assert_eq!(wrap_medium("油彩"), "\\mbox{油彩}");
    }

    #[test]
    fn medium_keeps_delimiter_count() {
        let wrapped = wrap_medium("壓克力、畫布、木框");
        assert_eq!(wrapped.matches(MEDIUM_DELIMITER).count(), 2);
        assert_eq!(wrapped.matches("\\mbox{").count(), 3);
    }

    #[test]
    fn empty_medium_yields_one_empty_box() {
        assert_eq!(wrap_medium(""), "\\mbox{}");
    }

    #[test]
    fn escapes_hash_in_title() {
        assert_eq!(escape_title("Study #3"), "Study \\#3");
        assert_eq!(escape_title("No. 1"), "No. 1");
        assert_eq!(escape_title("#a#b"), "\\#a\\#b");
    }

    #[test]
    fn applies_alias_by_exact_match() {
        let aliases: AliasTable = [("童于洋", "魚羊")].into_iter().collect();
        let mut hit = record("童于洋", "墨", "t");
        let mut miss = record("童于洋 ", "墨", "t");
        normalize_record(&mut hit, &aliases);
        normalize_record(&mut miss, &aliases);
        assert_eq!(hit.artist, "魚羊");
        assert_eq!(miss.artist, "童于洋 ");
    }

    #[test]
    fn alias_substitution_is_idempotent() {
        let aliases = AliasTable::builtin();
        assert!(aliases.chained_entries().is_empty());

        let mut once = record("王淑靜", "墨", "t");
        normalize_record(&mut once, &aliases);
        let after_once = once.artist.clone();
        normalize_record(&mut once, &aliases);
        assert_eq!(once.artist, after_once);
        assert_eq!(after_once, "MEI");
    }

    #[test]
    fn leaves_other_fields_alone() {
        let mut r = record("Alice", "紙", "Title #1");
        normalize_records(std::slice::from_mut(&mut r), &AliasTable::empty());
        assert_eq!(r.code, "A1");
        assert_eq!(r.height, "30");
        assert_eq!(r.width, "20");
        assert_eq!(r.price, "1200");
        assert_eq!(r.artist, "Alice");
        assert_eq!(r.title, "Title \\#1");
        assert_eq!(r.medium, "\\mbox{紙}");
    }
}
