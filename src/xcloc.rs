//! Xcloc export folder discovery

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// The reference/source locale. Never itself a translation target.
pub const REFERENCE_LANG: &str = "en";

/// One exported locale's translation document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XliffFile {
    /// Path of the `.xliff` document inside the xcloc bundle.
    pub path: PathBuf,
    /// Locale code taken from the bundle name (e.g. `fr`, `zh-Hans`).
    pub lang: String,
}

/// Find every `<locale>.xcloc` bundle in an export folder.
///
/// # Errors
///
/// Returns [`Error::NoExportsFound`] when the directory cannot be read or
/// holds no xcloc bundles.
///
/// [`Error::NoExportsFound`]: crate::Error::NoExportsFound
pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Vec<XliffFile>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| {
        tracing::debug!("cannot read export folder {}: {e}", dir.display());
        Error::NoExportsFound {
            path: dir.to_path_buf(),
        }
    })?;

    let mut files: Vec<XliffFile> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            if !name.ends_with(".xcloc") {
                return None;
            }
            let lang = name.split('.').next()?.to_string();
            let path = dir
                .join(&name)
                .join("Localized Contents")
                .join(format!("{lang}.xliff"));
            Some(XliffFile { path, lang })
        })
        .collect();
    files.sort_by(|a, b| a.lang.cmp(&b.lang));

    if files.is_empty() {
        return Err(Error::NoExportsFound {
            path: dir.to_path_buf(),
        });
    }
    Ok(files)
}

/// The privileged reference-language file of an export.
///
/// # Errors
///
/// Returns [`Error::NoReferenceLanguage`] when no `en` bundle exists.
///
/// [`Error::NoReferenceLanguage`]: crate::Error::NoReferenceLanguage
pub fn reference(files: &[XliffFile]) -> Result<&XliffFile> {
    files
        .iter()
        .find(|f| f.lang == REFERENCE_LANG)
        .ok_or(Error::NoReferenceLanguage)
}

/// Dictionary locale candidates for a document locale.
///
/// Hyphens normalize to underscores; the script-based Chinese codes that
/// Xcode exports fall back to the region-based codes the OS ships.
pub fn locale_candidates(lang: &str) -> (String, Option<&'static str>) {
    let primary = lang.replace('-', "_");
    let fallback = match primary.as_str() {
        "zh_Hans" => Some("zh_CN"),
        "zh_Hant" => Some("zh_TW"),
        _ => None,
    };
    (primary, fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_export(dir: &Path, locales: &[&str]) {
        for locale in locales {
            let inner = dir.join(format!("{locale}.xcloc")).join("Localized Contents");
            fs::create_dir_all(&inner).unwrap();
            fs::write(inner.join(format!("{locale}.xliff")), "<xliff/>").unwrap();
        }
    }

    #[test]
    fn test_discover_finds_xcloc_bundles() {
        let dir = tempfile::tempdir().unwrap();
        make_export(dir.path(), &["en", "fr", "zh-Hans"]);
        fs::create_dir_all(dir.path().join("notes")).unwrap();

        let files = discover(dir.path()).unwrap();
        let langs: Vec<&str> = files.iter().map(|f| f.lang.as_str()).collect();
        assert_eq!(langs, vec!["en", "fr", "zh-Hans"]);
        assert!(files[1].path.ends_with("fr.xcloc/Localized Contents/fr.xliff"));
    }

    #[test]
    fn test_discover_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover(dir.path()).unwrap_err();
        assert!(matches!(err, Error::NoExportsFound { .. }));
    }

    #[test]
    fn test_discover_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover(dir.path().join("gone")).unwrap_err();
        assert!(matches!(err, Error::NoExportsFound { .. }));
    }

    #[test]
    fn test_reference_language() {
        let dir = tempfile::tempdir().unwrap();
        make_export(dir.path(), &["en", "fr"]);
        let files = discover(dir.path()).unwrap();
        assert_eq!(reference(&files).unwrap().lang, "en");
    }

    #[test]
    fn test_reference_language_missing() {
        let dir = tempfile::tempdir().unwrap();
        make_export(dir.path(), &["fr"]);
        let files = discover(dir.path()).unwrap();
        assert!(matches!(
            reference(&files),
            Err(Error::NoReferenceLanguage)
        ));
    }

    #[test]
    fn test_locale_candidates() {
        assert_eq!(locale_candidates("fr"), ("fr".to_string(), None));
        assert_eq!(
            locale_candidates("zh-Hans"),
            ("zh_Hans".to_string(), Some("zh_CN"))
        );
        assert_eq!(
            locale_candidates("zh-Hant"),
            ("zh_Hant".to_string(), Some("zh_TW"))
        );
    }
}
