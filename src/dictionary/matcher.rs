//! Dictionary narrowing against a document's keys

use super::{DictionaryEntry, LanguageDictionary};
use crate::formats::common::XibKey;

/// Narrow every locale's entries to the identifiers they match.
///
/// An entry matches a key when the key's source text equals the entry's
/// source with a single `%@` placeholder replaced by the application name
/// (a no-op when there is no placeholder). Matching is exact and
/// case-sensitive. Entries carrying two or more placeholders are
/// ambiguous substitution targets and never match. Entries left without
/// keys and locales left without entries are dropped; `None` when nothing
/// at all matched.
pub fn narrow_to_keys(
    dict: &LanguageDictionary,
    keys: &[XibKey],
    app_name: &str,
) -> Option<LanguageDictionary> {
    let narrowed: LanguageDictionary = dict
        .iter()
        .filter_map(|(lang, entries)| {
            let matched: Vec<DictionaryEntry> = entries
                .iter()
                .filter_map(|entry| narrow_entry(entry, keys, app_name))
                .collect();
            (!matched.is_empty()).then(|| (lang.clone(), matched))
        })
        .collect();

    (!narrowed.is_empty()).then_some(narrowed)
}

fn narrow_entry(
    entry: &DictionaryEntry,
    keys: &[XibKey],
    app_name: &str,
) -> Option<DictionaryEntry> {
    if entry.source.matches("%@").count() >= 2 {
        return None;
    }

    let candidate = entry.source.replacen("%@", app_name, 1);
    let matched: Vec<String> = keys
        .iter()
        .filter(|key| key.source == candidate)
        .map(|key| key.key.clone())
        .collect();
    if matched.is_empty() {
        return None;
    }

    let mut narrowed = entry.clone();
    narrowed.keys = matched;
    Some(narrowed)
}
