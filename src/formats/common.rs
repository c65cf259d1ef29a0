//! Shared types for localized resource formats

use indexmap::IndexMap;

/// Prefix marking a key whose source text began with a leading tab.
///
/// Two menu titles can differ only by that tab (e.g. the indented
/// `Revert` items), so the marker keeps their keys distinguishable after
/// the tab is stripped for comparison.
pub const TAB_MARKER: &str = "$t";

/// An identifier/source-text pair extracted from a UI archive or a
/// translation document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XibKey {
    /// Stable identifier, possibly carrying the [`TAB_MARKER`] prefix.
    pub key: String,
    /// Source text, with any leading tab already stripped.
    pub source: String,
}

impl XibKey {
    pub fn new(key: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            source: source.into(),
        }
    }

    /// The tab-marked form of an identifier.
    pub fn tab_marked(id: &str) -> String {
        format!("{TAB_MARKER}{id}")
    }
}

/// One source/translation pair harvested from a localized resource.
///
/// Uniqueness during merging is judged on `(source, target)` alone; `keys`
/// stays empty until the matcher narrows the entry to the identifiers it
/// applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    /// Source-language text.
    pub source: String,
    /// Translated text.
    pub target: String,
    /// Identifiers in the target document this translation applies to.
    pub keys: Vec<String>,
}

impl DictionaryEntry {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            keys: Vec::new(),
        }
    }

    /// Same `(source, target)` text pair, keys disregarded.
    pub fn same_pair(&self, other: &Self) -> bool {
        self.source == other.source && self.target == other.target
    }
}

/// Per-locale translation entries, keyed by locale code (`fr`, `zh_Hans`).
///
/// Insertion order is preserved so "first locale" diagnostics are
/// deterministic.
pub type LanguageDictionary = IndexMap<String, Vec<DictionaryEntry>>;
