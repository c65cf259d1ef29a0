//! Localized bundle resource lookup
//!
//! Frameworks keep their localizations under `Resources/<locale>.lproj`,
//! full applications under `Contents/Resources/<locale>.lproj`; both
//! layouts are tried for every locale the bundle declares.

use std::fs;
use std::path::Path;

use super::{DictionaryEntry, LanguageDictionary};
use crate::error::{Error, Result};
use crate::formats::plist;

/// Candidate localized-resource layouts inside a bundle.
const RESOURCE_DIRS: [&str; 2] = ["Resources", "Contents/Resources"];

/// Decode one localized `.strings` table from every locale of a bundle.
///
/// Keys carrying a `$`-delimited suffix (framework-internal formatting
/// variants) are truncated at the first `$` before use as source text.
///
/// # Errors
///
/// Returns [`Error::BundleNotFound`] if the bundle directory is absent,
/// [`Error::NoLocalizations`] if it declares no `.lproj` locales, and
/// [`Error::ResourceNotFound`] if the file decodes in no locale.
///
/// [`Error::BundleNotFound`]: crate::Error::BundleNotFound
/// [`Error::NoLocalizations`]: crate::Error::NoLocalizations
/// [`Error::ResourceNotFound`]: crate::Error::ResourceNotFound
pub fn localized_dictionary<P: AsRef<Path>>(
    bundle: P,
    file_name: &str,
) -> Result<LanguageDictionary> {
    let bundle = bundle.as_ref();
    if !bundle.is_dir() {
        return Err(Error::BundleNotFound {
            path: bundle.to_path_buf(),
        });
    }

    let mut dict = LanguageDictionary::new();
    let mut saw_locale = false;

    for dir in RESOURCE_DIRS {
        let resources = bundle.join(dir);
        let Ok(entries) = fs::read_dir(&resources) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(locale) = locale_code(&path) else {
                continue;
            };
            saw_locale = true;
            if dict.contains_key(&locale) {
                continue;
            }

            let file = path.join(file_name);
            match plist::read_string_dictionary(&file) {
                Ok(table) if !table.is_empty() => {
                    dict.insert(locale, entries_from_table(table));
                }
                Ok(_) => {}
                Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::debug!("undecodable {}: {e}", file.display());
                }
            }
        }
    }

    if !saw_locale {
        return Err(Error::NoLocalizations {
            path: bundle.to_path_buf(),
        });
    }
    if dict.is_empty() {
        return Err(Error::ResourceNotFound {
            bundle: bundle.to_path_buf(),
            file: file_name.to_string(),
        });
    }
    // Directory enumeration order is arbitrary; keep locales sorted so the
    // aggregate's first locale is stable.
    dict.sort_keys();
    Ok(dict)
}

/// Locale code of an `.lproj` directory, `None` for anything else.
fn locale_code(path: &Path) -> Option<String> {
    if !path.is_dir() {
        return None;
    }
    let name = path.file_name()?.to_str()?;
    name.strip_suffix(".lproj")
        .filter(|code| !code.is_empty())
        .map(str::to_string)
}

fn entries_from_table(table: indexmap::IndexMap<String, String>) -> Vec<DictionaryEntry> {
    table
        .into_iter()
        .map(|(key, target)| {
            let source = key.split('$').next().unwrap_or_default().to_string();
            DictionaryEntry {
                source,
                target,
                keys: Vec::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TABLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
	<key>Quit %@</key>
	<string>Quitter %@</string>
	<key>Hide %@$FORMAT</key>
	<string>Masquer %@</string>
</dict>
</plist>
"#;

    fn write_table(bundle: &Path, layout: &str, locale: &str, file_name: &str, content: &str) {
        let lproj = bundle.join(layout).join(format!("{locale}.lproj"));
        fs::create_dir_all(&lproj).unwrap();
        fs::write(lproj.join(file_name), content).unwrap();
    }

    #[test]
    fn test_framework_layout() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("Demo.framework");
        write_table(&bundle, "Resources", "fr", "MainMenu.strings", TABLE_XML);

        let dict = localized_dictionary(&bundle, "MainMenu.strings").unwrap();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict["fr"].len(), 2);
    }

    #[test]
    fn test_application_layout() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("Demo.app");
        write_table(&bundle, "Contents/Resources", "de", "Menu.strings", TABLE_XML);

        let dict = localized_dictionary(&bundle, "Menu.strings").unwrap();
        assert!(dict.contains_key("de"));
    }

    #[test]
    fn test_dollar_suffix_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("Demo.framework");
        write_table(&bundle, "Resources", "fr", "MainMenu.strings", TABLE_XML);

        let dict = localized_dictionary(&bundle, "MainMenu.strings").unwrap();
        assert!(dict["fr"].iter().any(|e| e.source == "Hide %@"));
        assert!(dict["fr"].iter().all(|e| !e.source.contains('$')));
    }

    #[test]
    fn test_locale_without_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("Demo.framework");
        write_table(&bundle, "Resources", "fr", "MainMenu.strings", TABLE_XML);
        fs::create_dir_all(bundle.join("Resources/de.lproj")).unwrap();

        let dict = localized_dictionary(&bundle, "MainMenu.strings").unwrap();
        assert_eq!(dict.len(), 1);
        assert!(!dict.contains_key("de"));
    }

    #[test]
    fn test_missing_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let err = localized_dictionary(dir.path().join("Gone.framework"), "X.strings").unwrap_err();
        assert!(matches!(err, Error::BundleNotFound { .. }));
    }

    #[test]
    fn test_bundle_without_localizations() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("Demo.framework");
        fs::create_dir_all(bundle.join("Resources")).unwrap();

        let err = localized_dictionary(&bundle, "X.strings").unwrap_err();
        assert!(matches!(err, Error::NoLocalizations { .. }));
    }

    #[test]
    fn test_file_absent_everywhere() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("Demo.framework");
        fs::create_dir_all(bundle.join("Resources/fr.lproj")).unwrap();

        let err = localized_dictionary(&bundle, "X.strings").unwrap_err();
        assert!(matches!(err, Error::ResourceNotFound { .. }));
    }
}
