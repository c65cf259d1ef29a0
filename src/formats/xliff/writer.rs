//! XLIFF target rewriting

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::Path;

use super::reader::{attribute, is_menu_file};
use crate::error::{Error, Result};
use crate::formats::common::{DictionaryEntry, XibKey};

/// Escape only the characters required in XML text content (not attributes).
/// In text content, only < and & need escaping. Apostrophes and quotes are fine.
fn escape_text_minimal(s: &str) -> Cow<'_, str> {
    if s.contains('&') || s.contains('<') {
        Cow::Owned(s.replace('&', "&amp;").replace('<', "&lt;"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Fill in translations for one document, rewriting it in place.
///
/// The rewrite happens fully in memory; the file is then replaced
/// atomically, so a failure never leaves a partially written document.
///
/// # Errors
/// Returns an error if the file cannot be read, the XML cannot be parsed,
/// or the replacement write fails.
pub fn translate<P: AsRef<Path>>(
    path: P,
    entries: &[DictionaryEntry],
    app_name: &str,
) -> Result<usize> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let (output, replaced) = rewrite_targets(&content, entries, app_name)?;

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut file = tempfile::NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))?;
    file.write_all(output.as_bytes())?;
    file.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("rewrote {replaced} targets in {}", path.display());
    Ok(replaced)
}

/// Stream XLIFF content through unchanged except for the `target` elements
/// of matched main-menu translation units, which are replaced with the
/// entry's translated text. A plain key match substitutes the application
/// name for a `%@` placeholder; a tab-marked match prepends the tab
/// instead. Returns the rewritten document and the number of units
/// touched.
///
/// # Errors
/// Returns [`Error::XmlError`] on malformed XML.
///
/// [`Error::XmlError`]: crate::Error::XmlError
pub fn rewrite_targets(
    content: &str,
    entries: &[DictionaryEntry],
    app_name: &str,
) -> Result<(String, usize)> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(false);

    let mut output: Vec<u8> = Vec::with_capacity(content.len() + 256);
    let mut writer = Writer::new(&mut output);

    let mut in_menu_file = false;
    // Pending translated text for the unit currently open.
    let mut replacement: Option<String> = None;
    let mut skipping_target = false;
    let mut replaced = 0usize;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if skipping_target {
                    // Inside the old target subtree.
                } else {
                    let name = e.name().as_ref().to_vec();
                    match name.as_slice() {
                        b"file" => {
                            in_menu_file = is_menu_file(&e)?;
                            writer.write_event(Event::Start(e))?;
                        }
                        b"trans-unit" if in_menu_file => {
                            replacement = attribute(&e, b"id")?
                                .and_then(|id| replacement_for(entries, &id, app_name));
                            writer.write_event(Event::Start(e))?;
                        }
                        b"target" if replacement.is_some() => skipping_target = true,
                        _ => writer.write_event(Event::Start(e))?,
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if skipping_target
                    || (e.name().as_ref() == b"target" && replacement.is_some())
                {
                    // Old target dropped; the replacement is emitted at the
                    // unit's close.
                } else {
                    writer.write_event(Event::Empty(e))?;
                }
            }
            Ok(Event::End(e)) => {
                if skipping_target {
                    if e.name().as_ref() == b"target" {
                        skipping_target = false;
                    }
                } else {
                    let name = e.name().as_ref().to_vec();
                    match name.as_slice() {
                        b"trans-unit" => {
                            if let Some(text) = replacement.take() {
                                write_target(&mut writer, &text)?;
                                replaced += 1;
                            }
                            writer.write_event(Event::End(e))?;
                        }
                        b"file" => {
                            in_menu_file = false;
                            writer.write_event(Event::End(e))?;
                        }
                        _ => writer.write_event(Event::End(e))?,
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(event) => {
                if !skipping_target {
                    writer.write_event(event)?;
                }
            }
            Err(e) => return Err(Error::XmlError(e)),
        }
        buf.clear();
    }

    Ok((String::from_utf8(output)?, replaced))
}

/// Translated text for a unit, if any entry's keys claim its identifier.
/// The tab-marked lookup runs second and wins when both match.
fn replacement_for(entries: &[DictionaryEntry], id: &str, app_name: &str) -> Option<String> {
    let mut replacement = entries
        .iter()
        .find(|entry| entry.keys.iter().any(|k| k == id))
        .map(|entry| entry.target.replacen("%@", app_name, 1));

    let tab_key = XibKey::tab_marked(id);
    if let Some(entry) = entries
        .iter()
        .find(|entry| entry.keys.iter().any(|k| *k == tab_key))
    {
        replacement = Some(format!("\t{}", entry.target));
    }

    replacement
}

fn write_target<W: std::io::Write>(writer: &mut Writer<W>, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("target")))?;
    writer.write_event(Event::Text(BytesText::from_escaped(escape_text_minimal(
        text,
    ))))?;
    writer.write_event(Event::End(BytesEnd::new("target")))?;
    Ok(())
}
