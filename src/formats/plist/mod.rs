//! Property list decoding
//!
//! macOS ships compiled `.strings` tables and NIB archives as property
//! lists, almost always in the binary `bplist00` encoding, occasionally as
//! XML. This module decodes both into one [`Value`] model; it is not a
//! general plist library - only the shapes that localized resources use.

mod binary;
#[cfg(test)]
pub(crate) mod test_support;
mod xml;

pub use binary::{parse_plist_bytes, read_plist};
pub use xml::parse_plist_xml;

use indexmap::IndexMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Magic prefix of a binary property list.
pub const BPLIST_MAGIC: &[u8; 7] = b"bplist0";

/// Size of the binary property list trailer.
pub const TRAILER_SIZE: usize = 32;

/// A decoded property list value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null object.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number (also used for dates).
    Real(f64),
    /// Raw bytes.
    Data(Vec<u8>),
    /// A string.
    String(String),
    /// A keyed-archive object reference (binary plists only).
    Uid(u64),
    /// An ordered list of values.
    Array(Vec<Value>),
    /// A string-keyed dictionary.
    Dict(IndexMap<String, Value>),
}

impl Value {
    /// Borrow the value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the value as a dictionary, if it is one.
    pub fn as_dict(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Dict(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the value as an array, if it is one.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Convert into a flat string-to-string dictionary.
    ///
    /// # Errors
    /// Returns [`Error::NotAStringDictionary`] if the value is not a
    /// dictionary or any of its values is not a string.
    pub fn into_string_dictionary(self) -> Result<IndexMap<String, String>> {
        let Self::Dict(map) = self else {
            return Err(Error::NotAStringDictionary);
        };

        let mut strings = IndexMap::with_capacity(map.len());
        for (key, value) in map {
            let Self::String(text) = value else {
                return Err(Error::NotAStringDictionary);
            };
            strings.insert(key, text);
        }
        Ok(strings)
    }
}

/// Read a property list file as a flat string-to-string dictionary.
///
/// This is the decode used for `.strings` tables.
///
/// # Errors
/// Returns an error if the file cannot be read, is not a recognizable
/// property list, or is not a flat string dictionary.
pub fn read_string_dictionary<P: AsRef<Path>>(path: P) -> Result<IndexMap<String, String>> {
    let data = fs::read(path)?;
    parse_string_dictionary(&data)
}

/// Parse property list data as a flat string-to-string dictionary.
///
/// Dispatches on the leading bytes: `bplist0` selects the binary reader,
/// a leading `<` (after optional BOM/whitespace) selects the XML reader.
///
/// # Errors
/// Returns [`Error::InvalidPlistMagic`] if the data is neither encoding.
pub fn parse_string_dictionary(data: &[u8]) -> Result<IndexMap<String, String>> {
    parse_plist(data)?.into_string_dictionary()
}

/// Parse property list data in either encoding into a [`Value`].
///
/// # Errors
/// Returns [`Error::InvalidPlistMagic`] if the data is neither a binary
/// nor an XML property list.
pub fn parse_plist(data: &[u8]) -> Result<Value> {
    if data.starts_with(BPLIST_MAGIC) {
        return parse_plist_bytes(data);
    }
    if looks_like_xml(data) {
        return parse_plist_xml(data);
    }

    let mut magic = [0u8; 8];
    let len = data.len().min(8);
    magic[..len].copy_from_slice(&data[..len]);
    Err(Error::InvalidPlistMagic(magic))
}

/// Check whether data starts with an XML declaration or element, skipping
/// a UTF-8 BOM and leading whitespace.
fn looks_like_xml(data: &[u8]) -> bool {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);
    data.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'<')
}
