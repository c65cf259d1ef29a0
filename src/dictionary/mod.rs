//! System translation dictionary
//!
//! Harvests source/translation pairs from system-shipped localized
//! resources, merges them into one per-locale aggregate, and narrows that
//! aggregate to the identifiers a target document actually uses.

mod builder;
mod locator;
mod matcher;

pub use builder::{NibSpec, SYSTEM_SOURCES, SourceSpec, SystemDictionary};
pub use locator::localized_dictionary;
pub use matcher::narrow_to_keys;

pub use crate::formats::common::{DictionaryEntry, LanguageDictionary};

/// Merge `from` into `into`: union by locale, union of entries per locale.
///
/// Duplicate `(source, target)` pairs collapse, so merging is commutative
/// and idempotent on entry content. A locale absent from `into` is
/// inserted whole.
pub fn merge(into: &mut LanguageDictionary, from: LanguageDictionary) {
    for (lang, entries) in from {
        let slot = into.entry(lang).or_default();
        for entry in entries {
            if !slot.iter().any(|existing| existing.same_pair(&entry)) {
                slot.push(entry);
            }
        }
    }
}
