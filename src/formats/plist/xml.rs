//! XML property list reading
//!
//! Covers the element set that localized `.strings` exports use:
//! `dict`/`key`/`string` plus the scalar leaves. Anything else errors
//! rather than being guessed at.

use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::events::Event;

use super::Value;
use crate::error::{Error, Result};

enum Frame {
    Dict {
        map: IndexMap<String, Value>,
        pending_key: Option<String>,
    },
    Array(Vec<Value>),
}

/// Parse an XML property list into a [`Value`].
///
/// # Errors
/// Returns an error on malformed XML, unsupported elements, or an empty
/// document.
pub fn parse_plist_xml(data: &[u8]) -> Result<Value> {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);
    let text = String::from_utf8(data.to_vec())?;

    let mut reader = Reader::from_str(&text);
    // Leading/trailing whitespace in localized strings is significant.
    reader.trim_text(false);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Value> = None;
    // Name and accumulated text of the leaf element being read.
    let mut leaf: Option<(Vec<u8>, String)> = None;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.name().as_ref().to_vec();
                if leaf.is_some() {
                    return Err(Error::UnsupportedPlistElement(
                        String::from_utf8_lossy(&name).into_owned(),
                    ));
                }
                match name.as_slice() {
                    b"plist" => {}
                    b"dict" => stack.push(Frame::Dict {
                        map: IndexMap::new(),
                        pending_key: None,
                    }),
                    b"array" => stack.push(Frame::Array(Vec::new())),
                    b"key" | b"string" | b"integer" | b"real" | b"true" | b"false" | b"data"
                    | b"date" => leaf = Some((name, String::new())),
                    other => {
                        return Err(Error::UnsupportedPlistElement(
                            String::from_utf8_lossy(other).into_owned(),
                        ));
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if let Some((_, text)) = &mut leaf {
                    text.push_str(&e.unescape()?);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"plist" => {}
                b"key" => {
                    let key = leaf.take().map(|(_, text)| text).unwrap_or_default();
                    match stack.last_mut() {
                        Some(Frame::Dict { pending_key, .. }) => *pending_key = Some(key),
                        _ => return Err(Error::NonStringDictKey),
                    }
                }
                b"dict" | b"array" => {
                    let value = match stack.pop() {
                        Some(Frame::Dict { map, .. }) => Value::Dict(map),
                        Some(Frame::Array(values)) => Value::Array(values),
                        None => return Err(Error::EmptyPlist),
                    };
                    attach(&mut stack, &mut root, value)?;
                }
                _ => {
                    if let Some((name, text)) = leaf.take() {
                        attach(&mut stack, &mut root, leaf_value(&name, text))?;
                    }
                }
            },
            Ok(Event::Empty(e)) => {
                let value = match e.name().as_ref() {
                    b"true" => Value::Bool(true),
                    b"false" => Value::Bool(false),
                    b"string" => Value::String(String::new()),
                    b"dict" => Value::Dict(IndexMap::new()),
                    b"array" => Value::Array(Vec::new()),
                    b"plist" => continue,
                    other => leaf_value(other, String::new()),
                };
                attach(&mut stack, &mut root, value)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(e)),
            _ => {}
        }
        buf.clear();
    }

    root.ok_or(Error::EmptyPlist)
}

fn leaf_value(name: &[u8], text: String) -> Value {
    match name {
        b"integer" => Value::Int(text.trim().parse().unwrap_or_default()),
        b"real" => Value::Real(text.trim().parse().unwrap_or_default()),
        b"true" => Value::Bool(true),
        b"false" => Value::Bool(false),
        b"data" => Value::Data(text.into_bytes()),
        // string, date
        _ => Value::String(text),
    }
}

fn attach(stack: &mut [Frame], root: &mut Option<Value>, value: Value) -> Result<()> {
    match stack.last_mut() {
        Some(Frame::Dict { map, pending_key }) => {
            let Some(key) = pending_key.take() else {
                return Err(Error::NonStringDictKey);
            };
            map.insert(key, value);
        }
        Some(Frame::Array(values)) => values.push(value),
        None => {
            if root.is_none() {
                *root = Some(value);
            }
        }
    }
    Ok(())
}
