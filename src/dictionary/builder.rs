//! Aggregate dictionary construction
//!
//! Walks a fixed catalog of system resource locations and merges whatever
//! decodes into one per-locale aggregate. A source that fails to decode is
//! logged and skipped; one broken framework never empties the dictionary.

use super::{DictionaryEntry, LanguageDictionary, locator, merge};
use crate::error::Result;
use crate::formats::common::XibKey;
use crate::formats::nib;

/// NIB companion for a catalog source.
///
/// Some `.strings` tables key their entries by archive-internal
/// identifiers rather than source text; mining the companion NIB recovers
/// the true source text for the wanted titles.
#[derive(Debug, Clone, Copy)]
pub struct NibSpec<'a> {
    /// Path of the compiled NIB.
    pub path: &'a str,
    /// Source texts worth keeping from this archive.
    pub wanted: &'a [&'a str],
}

/// One catalog entry: a bundle and the localized table to harvest from it.
#[derive(Debug, Clone, Copy)]
pub struct SourceSpec<'a> {
    pub bundle: &'a str,
    pub strings_file: &'a str,
    pub nib: Option<NibSpec<'a>>,
}

/// The system resource catalog.
pub const SYSTEM_SOURCES: &[SourceSpec<'static>] = &[
    // Most of the menu strings.
    SourceSpec {
        bundle: "/System/Library/Frameworks/SwiftUI.framework",
        strings_file: "MainMenu.strings",
        nib: None,
    },
    // Most of the font menu.
    SourceSpec {
        bundle: "/System/Library/Frameworks/AppKit.framework",
        strings_file: "FontManager.strings",
        nib: None,
    },
    // "Show Toolbar" and "Show Sidebar".
    SourceSpec {
        bundle: "/System/Library/Frameworks/AppKit.framework",
        strings_file: "Toolbar.strings",
        nib: None,
    },
    // "Paste and Match Style".
    SourceSpec {
        bundle: "/System/Library/PrivateFrameworks/UIKitServices.framework",
        strings_file: "Localizable.strings",
        nib: None,
    },
    // "Ligature" and friends for Spanish.
    SourceSpec {
        bundle: "/System/Library/Frameworks/CoreText.framework",
        strings_file: "FeatureTypeNames.strings",
        nib: None,
    },
    // "Bigger".
    SourceSpec {
        bundle: "/System/Library/PrivateFrameworks/UIKitMacHelper.framework",
        strings_file: "MainMenu.strings",
        nib: Some(NibSpec {
            path: "/System/Library/PrivateFrameworks/UIKitMacHelper.framework/Resources/Base.lproj/MainMenu.nib",
            wanted: &["Bigger"],
        }),
    },
    // "Print…" and "Page Setup…".
    SourceSpec {
        bundle: "/System/Applications/Utilities/Script Editor.app",
        strings_file: "SEMainMenu.strings",
        nib: Some(NibSpec {
            path: "/System/Applications/Utilities/Script Editor.app/Contents/Resources/Base.lproj/SEMainMenu.nib",
            wanted: &["Print…", "Page Setup…"],
        }),
    },
    // "Revert to Saved".
    SourceSpec {
        bundle: "/System/Applications/Utilities/Terminal.app",
        strings_file: "MainMenu.strings",
        nib: Some(NibSpec {
            path: "/System/Applications/Utilities/Terminal.app/Contents/Resources/Base.lproj/MainMenu.nib",
            wanted: &["Revert to Saved"],
        }),
    },
];

/// The aggregate translation dictionary harvested from system resources.
///
/// Built once, read-only afterwards; sessions share it by reference.
#[derive(Debug, Clone, Default)]
pub struct SystemDictionary {
    languages: LanguageDictionary,
}

impl SystemDictionary {
    /// Build from the default system catalog.
    pub fn load() -> Self {
        Self::from_catalog(SYSTEM_SOURCES)
    }

    /// Build from an explicit catalog. Sources that fail to decode are
    /// skipped with a notice.
    pub fn from_catalog(sources: &[SourceSpec<'_>]) -> Self {
        let mut languages = LanguageDictionary::new();
        for spec in sources {
            match load_source(spec) {
                Ok(dict) => merge(&mut languages, dict),
                Err(e) => {
                    tracing::warn!("no result for {} - {}: {e}", spec.bundle, spec.strings_file);
                }
            }
        }
        tracing::info!(
            "system dictionary built: {} locales, {} entries in first",
            languages.len(),
            languages.first().map_or(0, |(_, entries)| entries.len())
        );
        Self { languages }
    }

    /// Wrap an already-built per-language map (rebuilds, tests).
    pub fn from_languages(languages: LanguageDictionary) -> Self {
        Self { languages }
    }

    /// The per-locale aggregate.
    pub fn languages(&self) -> &LanguageDictionary {
        &self.languages
    }

    /// Entry count of the first locale, as a build diagnostic.
    pub fn entry_count(&self) -> usize {
        self.languages
            .first()
            .map_or(0, |(_, entries)| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

fn load_source(spec: &SourceSpec<'_>) -> Result<LanguageDictionary> {
    let dict = locator::localized_dictionary(spec.bundle, spec.strings_file)?;
    let Some(nib_spec) = spec.nib else {
        return Ok(dict);
    };

    let mined = nib::mine_nib(nib_spec.path)?;
    let wanted: Vec<XibKey> = mined
        .into_iter()
        .filter(|key| nib_spec.wanted.contains(&key.source.as_str()))
        .collect();
    Ok(rekey_from_nib(&wanted, dict))
}

/// Replace archive-internal identifiers with the true source text mined
/// from the NIB. Entries with no mined counterpart are dropped, as are
/// locales left without entries.
fn rekey_from_nib(keys: &[XibKey], dict: LanguageDictionary) -> LanguageDictionary {
    dict.into_iter()
        .map(|(lang, entries)| {
            let rekeyed: Vec<DictionaryEntry> = entries
                .into_iter()
                .filter_map(|entry| {
                    keys.iter()
                        .find(|key| key.key == entry.source)
                        .map(|key| DictionaryEntry::new(key.source.clone(), entry.target))
                })
                .collect();
            (lang, rekeyed)
        })
        .filter(|(_, entries)| !entries.is_empty())
        .collect()
}
