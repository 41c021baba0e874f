//! Alias table: informal food term -> canonical keyword fragments.
//!
//! Fragments are stored pre-split on whitespace (including the full-width
//! space U+3000 used by the composition table), so expansion is a lookup plus
//! a slice copy.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

// =============================================================================
// Data loading
// =============================================================================

/// Embedded curated alias document.
static ALIASES_JSON: &str = include_str!("data/aliases.json");

static BUILTIN: LazyLock<AliasTable> = LazyLock::new(|| {
    AliasTable::from_json(ALIASES_JSON).expect("aliases.json should be valid JSON")
});

/// On-disk format: `{"aliases": {"納豆": "糸引き納豆", ...}}`.
#[derive(Deserialize)]
struct AliasFile {
    aliases: HashMap<String, String>,
}

#[derive(Debug, Error)]
pub enum AliasError {
    #[error("Invalid alias document: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

// =============================================================================
// Public API
// =============================================================================

/// Read-only mapping from an informal term to keyword fragments.
///
/// Lookups are exact and case-sensitive. Terms without a mapping pass through
/// [`AliasTable::expand`] unchanged.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, Vec<String>>,
}

impl AliasTable {
    /// The curated table shipped with this crate.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// An empty table; every term expands to itself.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a table from the JSON document format.
    pub fn from_json(json: &str) -> Result<Self, AliasError> {
        let file: AliasFile = serde_json::from_str(json)?;
        Ok(Self::from_pairs(file.aliases))
    }

    /// Build a table from `(term, fragment)` pairs.
    ///
    /// The fragment is split on whitespace; empty pieces are dropped.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .map(|(term, fragment)| {
                let tokens = fragment
                    .as_ref()
                    .split_whitespace()
                    .map(str::to_string)
                    .collect();
                (term.into(), tokens)
            })
            .collect();

        Self { entries }
    }

    /// Expand a single term: the term itself, followed by the tokens of its
    /// mapped fragment when one exists.
    pub fn expand<'a>(&'a self, term: &'a str) -> Vec<&'a str> {
        let mut expanded = vec![term];
        if let Some(tokens) = self.entries.get(term) {
            expanded.extend(tokens.iter().map(String::as_str));
        }
        expanded
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_loads() {
        let table = AliasTable::builtin();
        assert!(table.len() >= 40);
        assert!(table.entries.contains_key("納豆"));
    }

    #[test]
    fn test_expand_single_fragment() {
        let table = AliasTable::builtin();
        assert_eq!(table.expand("納豆"), vec!["納豆", "糸引き納豆"]);
    }

    #[test]
    fn test_expand_splits_full_width_spaces() {
        let table = AliasTable::builtin();
        assert_eq!(
            table.expand("生卵"),
            vec!["生卵", "鶏卵", "全卵", "生"]
        );
        assert_eq!(
            table.expand("レタス"),
            vec!["レタス", "レタス", "土耕栽培", "結球葉"]
        );
    }

    #[test]
    fn test_unmapped_term_passes_through() {
        let table = AliasTable::builtin();
        assert_eq!(table.expand("ドラゴンフルーツ"), vec!["ドラゴンフルーツ"]);
        assert!(!table.entries.contains_key("ドラゴンフルーツ"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = AliasTable::from_pairs([("Egg", "鶏卵")]);
        assert_eq!(table.expand("Egg"), vec!["Egg", "鶏卵"]);
        assert_eq!(table.expand("egg"), vec!["egg"]);
    }

    #[test]
    fn test_empty_table() {
        let table = AliasTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.expand("納豆"), vec!["納豆"]);
    }

    #[test]
    fn test_from_json() {
        let table = AliasTable::from_json(r#"{"aliases": {"ご飯": "めし　精白米"}}"#).unwrap();
        assert_eq!(table.expand("ご飯"), vec!["ご飯", "めし", "精白米"]);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(AliasTable::from_json("not json").is_err());
        assert!(AliasTable::from_json(r#"{"other": {}}"#).is_err());
    }

    #[test]
    fn test_builtin_fragments_are_never_empty() {
        let table = AliasTable::builtin();
        for (term, tokens) in &table.entries {
            assert!(!tokens.is_empty(), "alias {term} has no fragment tokens");
            assert!(
                tokens.iter().all(|t| !t.trim().is_empty()),
                "alias {term} has a blank token"
            );
        }
    }
}
