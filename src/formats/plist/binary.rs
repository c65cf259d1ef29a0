//! Binary property list (`bplist00`) reading
//!
//! Layout: an 8-byte magic, the serialized objects, an offset table, and a
//! 32-byte trailer giving the offset-int width, the object-ref width, the
//! object count, the top object index, and the offset-table position. Each
//! object starts with a marker byte whose high nibble selects the type and
//! whose low nibble carries the count (`0xF` escapes to a following int
//! object for long counts).

#![allow(clippy::cast_possible_truncation)]

use byteorder::{BigEndian, ReadBytesExt};
use indexmap::IndexMap;
use std::fs;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use super::{BPLIST_MAGIC, TRAILER_SIZE, Value};
use crate::error::{Error, Result};

/// Nesting limit for object resolution. Keyed archives are flat; anything
/// deeper than this is a malformed or hostile file.
const MAX_DEPTH: usize = 64;

/// Read a binary property list file from disk
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read.
/// Returns [`Error::InvalidPlistMagic`] if the file does not have a valid
/// `bplist0` header.
///
/// [`Error::Io`]: crate::Error::Io
/// [`Error::InvalidPlistMagic`]: crate::Error::InvalidPlistMagic
pub fn read_plist<P: AsRef<Path>>(path: P) -> Result<Value> {
    let data = fs::read(path)?;
    parse_plist_bytes(&data)
}

/// Parse binary property list data from bytes
///
/// # Errors
///
/// Returns [`Error::InvalidPlistMagic`] if the data does not start with
/// `bplist0`, [`Error::PlistTruncated`] if it cannot hold a trailer, and
/// [`Error::Io`] if reading from the byte buffer fails (truncated data).
///
/// [`Error::InvalidPlistMagic`]: crate::Error::InvalidPlistMagic
/// [`Error::PlistTruncated`]: crate::Error::PlistTruncated
/// [`Error::Io`]: crate::Error::Io
pub fn parse_plist_bytes(data: &[u8]) -> Result<Value> {
    if data.len() < BPLIST_MAGIC.len() + 1 + TRAILER_SIZE {
        return Err(Error::PlistTruncated { size: data.len() });
    }
    if !data.starts_with(BPLIST_MAGIC) {
        let mut magic = [0u8; 8];
        magic.copy_from_slice(&data[..8]);
        return Err(Error::InvalidPlistMagic(magic));
    }

    // Trailer: 6 unused bytes, offset-int size, object-ref size,
    // then three big-endian u64s.
    let trailer_offset = data.len() - TRAILER_SIZE;
    let mut trailer = Cursor::new(&data[trailer_offset..]);
    trailer.seek(SeekFrom::Start(6))?;
    let offset_int_size = trailer.read_u8()? as usize;
    let object_ref_size = trailer.read_u8()? as usize;
    let num_objects = trailer.read_u64::<BigEndian>()? as usize;
    let top_object = trailer.read_u64::<BigEndian>()?;
    let table_offset = trailer.read_u64::<BigEndian>()?;

    if !(1..=8).contains(&offset_int_size) {
        return Err(Error::InvalidPlistMarker {
            marker: offset_int_size as u8,
            offset: (trailer_offset + 6) as u64,
        });
    }
    if !(1..=8).contains(&object_ref_size) {
        return Err(Error::InvalidPlistMarker {
            marker: object_ref_size as u8,
            offset: (trailer_offset + 7) as u64,
        });
    }

    // Offset table: num_objects entries of offset_int_size bytes each.
    // The object count is bounded by the data size, so the table-extent
    // arithmetic below cannot overflow.
    if num_objects > data.len() || table_offset as usize >= data.len() {
        return Err(Error::PlistTruncated { size: data.len() });
    }
    if table_offset as usize + num_objects * offset_int_size > data.len() {
        return Err(Error::PlistTruncated { size: data.len() });
    }

    let mut cursor = Cursor::new(&data[..trailer_offset]);
    cursor.seek(SeekFrom::Start(table_offset))?;
    let mut offsets = Vec::with_capacity(num_objects);
    for _ in 0..num_objects {
        offsets.push(cursor.read_uint::<BigEndian>(offset_int_size)?);
    }

    let parser = Parser {
        data: &data[..trailer_offset],
        offsets,
        object_ref_size,
    };
    parser.object_at(top_object, 0)
}

struct Parser<'a> {
    data: &'a [u8],
    offsets: Vec<u64>,
    object_ref_size: usize,
}

impl Parser<'_> {
    fn object_at(&self, index: u64, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(Error::PlistDepthExceeded);
        }

        let offset = *self
            .offsets
            .get(index as usize)
            .ok_or(Error::InvalidObjectRef(index))?;
        if offset as usize >= self.data.len() {
            return Err(Error::InvalidObjectRef(index));
        }

        let mut cursor = Cursor::new(self.data);
        cursor.seek(SeekFrom::Start(offset))?;
        let marker = cursor.read_u8()?;
        let info = marker & 0x0F;

        match marker >> 4 {
            0x0 => match marker {
                0x00 => Ok(Value::Null),
                0x08 => Ok(Value::Bool(false)),
                0x09 => Ok(Value::Bool(true)),
                _ => Err(Error::InvalidPlistMarker { marker, offset }),
            },
            // Integer: 2^info big-endian bytes.
            0x1 => {
                if info > 3 {
                    return Err(Error::InvalidPlistMarker { marker, offset });
                }
                let value = cursor.read_uint::<BigEndian>(1 << info)?;
                Ok(Value::Int(value as i64))
            }
            // Real: 2^info bytes, f32 or f64.
            0x2 => match info {
                2 => Ok(Value::Real(f64::from(cursor.read_f32::<BigEndian>()?))),
                3 => Ok(Value::Real(cursor.read_f64::<BigEndian>()?)),
                _ => Err(Error::InvalidPlistMarker { marker, offset }),
            },
            // Date: 8-byte big-endian float (seconds since 2001).
            0x3 => Ok(Value::Real(cursor.read_f64::<BigEndian>()?)),
            0x4 => {
                let count = self.read_count(&mut cursor, info)?;
                let mut bytes = vec![0u8; count];
                cursor.read_exact(&mut bytes)?;
                Ok(Value::Data(bytes))
            }
            // ASCII string.
            0x5 => {
                let count = self.read_count(&mut cursor, info)?;
                let mut bytes = vec![0u8; count];
                cursor.read_exact(&mut bytes)?;
                Ok(Value::String(String::from_utf8(bytes)?))
            }
            // UTF-16BE string, count is in code units.
            0x6 => {
                let count = self.read_count(&mut cursor, info)?;
                let mut units = Vec::with_capacity(count);
                for _ in 0..count {
                    units.push(cursor.read_u16::<BigEndian>()?);
                }
                let text = String::from_utf16(&units).map_err(|_| Error::InvalidUtf16)?;
                Ok(Value::String(text))
            }
            // Keyed-archive UID: info + 1 bytes.
            0x8 => {
                let value = cursor.read_uint::<BigEndian>(info as usize + 1)?;
                Ok(Value::Uid(value))
            }
            // Array and set: count object refs.
            0xA | 0xC => {
                let count = self.read_count(&mut cursor, info)?;
                let refs = self.read_refs(&mut cursor, count)?;
                let mut values = Vec::with_capacity(count);
                for object_ref in refs {
                    values.push(self.object_at(object_ref, depth + 1)?);
                }
                Ok(Value::Array(values))
            }
            // Dictionary: count key refs, then count value refs.
            0xD => {
                let count = self.read_count(&mut cursor, info)?;
                let key_refs = self.read_refs(&mut cursor, count)?;
                let value_refs = self.read_refs(&mut cursor, count)?;

                let mut map = IndexMap::with_capacity(count);
                for (key_ref, value_ref) in key_refs.into_iter().zip(value_refs) {
                    let Value::String(key) = self.object_at(key_ref, depth + 1)? else {
                        return Err(Error::NonStringDictKey);
                    };
                    let value = self.object_at(value_ref, depth + 1)?;
                    map.insert(key, value);
                }
                Ok(Value::Dict(map))
            }
            _ => Err(Error::InvalidPlistMarker { marker, offset }),
        }
    }

    /// Decode an object count: the marker's low nibble, or an escaped
    /// following int object when the nibble is `0xF`.
    fn read_count(&self, cursor: &mut Cursor<&[u8]>, info: u8) -> Result<usize> {
        if info != 0x0F {
            return Ok(info as usize);
        }

        let offset = cursor.position();
        let marker = cursor.read_u8()?;
        if marker >> 4 != 0x1 || (marker & 0x0F) > 3 {
            return Err(Error::InvalidPlistMarker { marker, offset });
        }
        Ok(cursor.read_uint::<BigEndian>(1 << (marker & 0x0F))? as usize)
    }

    fn read_refs(&self, cursor: &mut Cursor<&[u8]>, count: usize) -> Result<Vec<u64>> {
        let mut refs = Vec::with_capacity(count);
        for _ in 0..count {
            refs.push(cursor.read_uint::<BigEndian>(self.object_ref_size)?);
        }
        Ok(refs)
    }
}
