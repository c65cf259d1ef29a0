//! XLIFF reading and key extraction

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fs;
use std::path::Path;

use super::{MENU_FILE, WINDOW_NOTE_PREFIX};
use crate::error::{Error, Result};
use crate::formats::common::XibKey;

/// Keys extracted from one translation document.
#[derive(Debug, Clone)]
pub struct MenuKeys {
    /// One key per translation unit (the window-name unit excluded);
    /// first occurrence wins on duplicates.
    pub keys: Vec<XibKey>,
    /// Display name captured from the window-title unit, if present.
    pub app_name: Option<String>,
}

/// Read a translation document and extract its main-menu keys.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, plus everything
/// [`parse_menu_keys`] returns.
///
/// [`Error::Io`]: crate::Error::Io
pub fn read_menu_keys<P: AsRef<Path>>(path: P) -> Result<MenuKeys> {
    let content = fs::read_to_string(path)?;
    parse_menu_keys(&content)
}

/// Extract (identifier, source text) keys from XLIFF content.
///
/// Only the `file` section whose `original` basename is `MainMenu.xib` is
/// scanned. A source beginning with a tab is stripped of it and its key
/// gets the `$t` marker so it stays distinguishable from an otherwise
/// identical title. The unit whose note begins with the `NSWindow` class
/// designates the application display name; it is captured separately and
/// contributes no key.
///
/// # Errors
///
/// Returns [`Error::NoMenuFile`] when no main-menu file section exists and
/// [`Error::NoMenuKeys`] when the section yields no keys.
///
/// [`Error::NoMenuFile`]: crate::Error::NoMenuFile
/// [`Error::NoMenuKeys`]: crate::Error::NoMenuKeys
pub fn parse_menu_keys(content: &str) -> Result<MenuKeys> {
    let mut reader = Reader::from_str(content);
    // Leading/trailing whitespace in source strings is significant.
    reader.trim_text(false);

    let mut keys: Vec<XibKey> = Vec::new();
    let mut app_name: Option<String> = None;
    let mut menu_file_seen = false;
    let mut in_menu_file = false;

    let mut unit_id: Option<String> = None;
    let mut source_text = String::new();
    let mut note_text = String::new();
    let mut capture = Capture::None;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"file" => {
                    in_menu_file = is_menu_file(&e)?;
                    menu_file_seen |= in_menu_file;
                }
                b"trans-unit" if in_menu_file => {
                    unit_id = attribute(&e, b"id")?;
                    source_text.clear();
                    note_text.clear();
                }
                b"source" if unit_id.is_some() => capture = Capture::Source,
                b"note" if unit_id.is_some() => capture = Capture::Note,
                _ => {}
            },
            Ok(Event::Text(e)) => match capture {
                Capture::Source => source_text.push_str(&e.unescape()?),
                Capture::Note => note_text.push_str(&e.unescape()?),
                Capture::None => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"source" | b"note" => capture = Capture::None,
                b"trans-unit" => {
                    if let Some(id) = unit_id.take() {
                        if note_text.starts_with(WINDOW_NOTE_PREFIX) {
                            app_name = Some(source_text.clone());
                        } else {
                            push_key(&mut keys, &id, &source_text);
                        }
                    }
                }
                b"file" => in_menu_file = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(e)),
            _ => {}
        }
        buf.clear();
    }

    if !menu_file_seen {
        return Err(Error::NoMenuFile);
    }
    if keys.is_empty() {
        return Err(Error::NoMenuKeys);
    }
    Ok(MenuKeys { keys, app_name })
}

enum Capture {
    None,
    Source,
    Note,
}

/// Whether a `file` element's `original` attribute names the main menu.
pub(super) fn is_menu_file(e: &BytesStart<'_>) -> Result<bool> {
    Ok(attribute(e, b"original")?
        .is_some_and(|original| original.rsplit('/').next() == Some(MENU_FILE)))
}

pub(super) fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn push_key(keys: &mut Vec<XibKey>, id: &str, source: &str) {
    let key = match source.strip_prefix('\t') {
        Some(stripped) => XibKey::new(XibKey::tab_marked(id), stripped),
        None => XibKey::new(id, source),
    };
    // At most one unit per identifier; a duplicate never overwrites.
    if !keys.iter().any(|k| k.key == key.key) {
        keys.push(key);
    }
}
