//! NIB string mining passes

use indexmap::IndexMap;
use std::fs;
use std::path::Path;

use super::TITLE_SUFFIX;
use crate::error::{Error, Result};
use crate::formats::common::XibKey;
use crate::formats::plist;

/// Mine identifier/title pairs from a compiled NIB archive.
///
/// Tries the structured `$objects` scan first; falls back to raw
/// printable-ASCII extraction when the file is not container-decodable.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and
/// [`Error::NibNoPairs`] when neither pass yields any pairs.
///
/// [`Error::Io`]: crate::Error::Io
/// [`Error::NibNoPairs`]: crate::Error::NibNoPairs
pub fn mine_nib<P: AsRef<Path>>(path: P) -> Result<Vec<XibKey>> {
    let path = path.as_ref();
    let data = fs::read(path)?;

    let keys = match structured_strings(&data) {
        Some(strings) => pair_titles(&strings),
        None => {
            tracing::debug!("structured decode failed, raw-mining {}", path.display());
            pair_titles(&ascii_tokens(&data))
        }
    };

    if keys.is_empty() {
        return Err(Error::NibNoPairs {
            path: path.to_path_buf(),
        });
    }
    Ok(keys)
}

/// Flat string sequence from a container-decodable archive: the root
/// dictionary's `$objects` array, string values only, order preserved.
fn structured_strings(data: &[u8]) -> Option<Vec<String>> {
    let value = plist::parse_plist_bytes(data).ok()?;
    let objects = value.as_dict()?.get("$objects")?.as_array()?;
    Some(
        objects
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
    )
}

/// Project bytes onto printable ASCII.
///
/// Bytes 32–127 map to themselves; a high byte whose low seven bits spell
/// `b` is the UTF-8 lead byte of an ellipsis and maps to `…`; everything
/// else becomes the `/` token separator.
pub fn printable_ascii(data: &[u8]) -> String {
    data.iter()
        .map(|&b| match b {
            32..=127 => char::from(b),
            _ if b & 0x7F == b'b' => '…',
            _ => '/',
        })
        .collect()
}

/// Tokenize raw archive bytes: printable projection, split on `/`, keep
/// fragments longer than one character.
fn ascii_tokens(data: &[u8]) -> Vec<String> {
    printable_ascii(data)
        .split('/')
        .filter(|t| t.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

/// Pair each `.title` token with the token that follows it.
///
/// A successor that is itself a `.title` token is never consumed as a
/// source text; the scan moves on and considers it as an identifier in its
/// own right. Duplicate identifiers keep the last value seen.
pub fn pair_titles<S: AsRef<str>>(tokens: &[S]) -> Vec<XibKey> {
    let mut pairs: IndexMap<&str, &str> = IndexMap::new();

    let mut i = 0;
    while i + 1 < tokens.len() {
        let token = tokens[i].as_ref();
        let next = tokens[i + 1].as_ref();
        if token.ends_with(TITLE_SUFFIX) && !next.ends_with(TITLE_SUFFIX) {
            pairs.insert(token, next);
            i += 2;
        } else {
            i += 1;
        }
    }

    pairs
        .into_iter()
        .map(|(key, source)| XibKey::new(key, source))
        .collect()
}
