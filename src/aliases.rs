//! Artist alias table: real name → name printed on the sticker.
//!
//! Some artists exhibit under a pen name. The table is looked up by exact
//! match only; a name that is not a key passes through untouched. It is
//! injected into the normaliser through [`crate::config::SheetConfig`] so
//! tests can supply their own mapping.
//!
//! Tables load from TOML:
//!
//! ```toml
//! [aliases]
//! "Real Name" = "Display Alias"
//! ```

use crate::error::StickerError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Aliases registered for the current event.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("賈瑞云", "慕蘭"),
    ("簡翊晉", "版畫職男"),
    ("何珞瑜", "雷"),
    ("謝佳淇", "Hannah Shieh"),
    ("林宜蓁", "YI CHEN LIN"),
    ("童于洋", "魚羊"),
    ("王貽宣", "王蟻宣"),
    ("張育華", "鴨寶"),
    ("王淑靜", "MEI"),
    ("楊舒涵", "楊舒涵 內向陌生人"),
    ("羅昱翰", "四維羅"),
    ("涂恩華", "tuenhua"),
];

/// Read-only mapping from an artist's real name to their display alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTable {
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

impl AliasTable {
    /// An empty table: every artist keeps their name.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The table shipped with the crate.
    pub fn builtin() -> Self {
        BUILTIN_ALIASES.iter().copied().collect()
    }

    /// Parse a table from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Load a table from a TOML file.
    ///
    /// Entries whose alias is itself a key are accepted but logged, since
    /// normalising a record twice would then change it again.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StickerError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| StickerError::AliasTable {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        let table = Self::from_toml_str(&text).map_err(|e| StickerError::AliasTable {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

        for (name, alias) in table.chained_entries() {
            warn!(
                "Alias for '{}' is '{}', which is itself aliased; lookups are not transitive",
                name, alias
            );
        }
        debug!("Loaded {} aliases from {}", table.len(), path.display());
        Ok(table)
    }

    /// Look up the display alias for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    /// Resolve `name` to its alias, or return it unchanged.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name).unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Entries whose alias value also appears as a key.
    pub fn chained_entries(&self) -> Vec<(&str, &str)> {
        self.aliases
            .iter()
            .filter(|(_, alias)| self.aliases.contains_key(alias.as_str()))
            .map(|(name, alias)| (name.as_str(), alias.as_str()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            aliases: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_no_chains() {
        let table = AliasTable::builtin();
        assert_eq!(table.len(), BUILTIN_ALIASES.len());
        assert!(table.chained_entries().is_empty());
        assert_eq!(table.get("何珞瑜"), Some("雷"));
    }

    #[test]
    fn resolve_falls_back_to_name() {
        let table: AliasTable = [("Real", "Alias")].into_iter().collect();
        assert_eq!(table.resolve("Real"), "Alias");
        assert_eq!(table.resolve("Other"), "Other");
    }

    #[test]
    fn parses_toml_table() {
        let table = AliasTable::from_toml_str(
            r#"
            [aliases]
            "童于洋" = "魚羊"
            "Jane Doe" = "JD"
            "#,
        )
        .expect("valid toml");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Jane Doe"), Some("JD"));
    }

    #[test]
    fn empty_toml_is_empty_table() {
        let table = AliasTable::from_toml_str("").expect("valid toml");
        assert!(table.is_empty());
    }

    #[test]
    fn detects_chained_entries() {
        let table: AliasTable = [("a", "b"), ("b", "c")].into_iter().collect();
        assert_eq!(table.chained_entries(), vec![("a", "b")]);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = AliasTable::load("/definitely/not/here/aliases.toml").unwrap_err();
        assert!(matches!(err, StickerError::AliasTable { .. }));
    }
}
