//! Error types for `MacLoc`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `MacLoc` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Property List Errors ====================
    /// The data is not a recognized property list (neither bplist00 nor XML).
    #[error("invalid property list magic: {0:?}")]
    InvalidPlistMagic([u8; 8]),

    /// The binary property list is too short to hold a trailer.
    #[error("binary property list truncated: {size} bytes")]
    PlistTruncated {
        /// Total size of the data.
        size: usize,
    },

    /// An object marker byte is not a supported type.
    #[error("invalid property list marker 0x{marker:02x} at offset {offset}")]
    InvalidPlistMarker {
        /// The marker byte.
        marker: u8,
        /// Byte offset of the marker within the data.
        offset: u64,
    },

    /// An object reference points outside the offset table.
    #[error("invalid object reference: {0}")]
    InvalidObjectRef(u64),

    /// Object graph nesting exceeds the recursion limit (cyclic or hostile file).
    #[error("property list nesting exceeds depth limit")]
    PlistDepthExceeded,

    /// A dictionary key is not a string.
    #[error("property list dictionary key is not a string")]
    NonStringDictKey,

    /// The property list is not a flat string-to-string dictionary.
    #[error("property list is not a string dictionary")]
    NotAStringDictionary,

    /// An XML property list contains an element this reader does not handle.
    #[error("unsupported property list element: {0}")]
    UnsupportedPlistElement(String),

    /// An XML property list document carries no value.
    #[error("property list document is empty")]
    EmptyPlist,

    /// A UTF-16 string in the property list could not be decoded.
    #[error("invalid UTF-16 string data in property list")]
    InvalidUtf16,

    // ==================== NIB Mining Errors ====================
    /// No identifier/title string pairs could be mined from the archive.
    #[error("no title string pairs found in NIB: {path}")]
    NibNoPairs {
        /// Path of the NIB file.
        path: PathBuf,
    },

    // ==================== Bundle Resource Errors ====================
    /// The bundle directory does not exist.
    #[error("bundle not found: {path}")]
    BundleNotFound {
        /// The missing bundle path.
        path: PathBuf,
    },

    /// The bundle carries no `.lproj` localization directories.
    #[error("bundle has no localizations: {path}")]
    NoLocalizations {
        /// The bundle path.
        path: PathBuf,
    },

    /// The requested localized file decoded in no locale of the bundle.
    #[error("localized resource '{file}' not found in {bundle}")]
    ResourceNotFound {
        /// The bundle path.
        bundle: PathBuf,
        /// The requested file name.
        file: String,
    },

    // ==================== Export Folder Errors ====================
    /// The selected directory contains no `.xcloc` entries.
    #[error("no xcloc exports found in {path}")]
    NoExportsFound {
        /// The selected directory.
        path: PathBuf,
    },

    /// The export folder has no `en` reference locale.
    #[error("no English reference xcloc in export folder")]
    NoReferenceLanguage,

    // ==================== XLIFF Document Errors ====================
    /// No `file` element with a `MainMenu.xib` original was found.
    #[error("no MainMenu.xib file section in document")]
    NoMenuFile,

    /// The main-menu file section yielded no translation-unit keys.
    #[error("no translation units found in document")]
    NoMenuKeys,

    /// One or more per-language files failed during a translate pass.
    #[error("translate failed for {failed} of {total} files")]
    TranslateFailed {
        /// Number of files attempted.
        total: usize,
        /// Number of files that failed.
        failed: usize,
    },

    // ==================== Parsing Errors ====================
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttrError(String),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}

// Add conversion from quick_xml::events::attributes::AttrError
impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttrError(err.to_string())
    }
}

/// A specialized Result type for `MacLoc` operations.
pub type Result<T> = std::result::Result<T, Error>;
