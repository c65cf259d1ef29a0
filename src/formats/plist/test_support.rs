//! Test-only binary property list encoder
//!
//! Emits just enough of the `bplist00` encoding (strings, arrays,
//! dictionaries) to build reader fixtures without real system files.

/// One serialized object; arrays and dictionaries hold object indices.
enum Obj {
    Str(String),
    Array(Vec<u64>),
    Dict(Vec<u64>, Vec<u64>),
}

pub struct BplistBuilder;

impl BplistBuilder {
    /// A flat string-to-string dictionary, the shape of a compiled
    /// `.strings` table.
    pub fn string_dict(pairs: &[(&str, &str)]) -> Vec<u8> {
        let n = pairs.len() as u64;
        let mut objects = vec![Obj::Dict(
            (1..=n).collect(),
            (n + 1..=2 * n).collect(),
        )];
        objects.extend(pairs.iter().map(|(k, _)| Obj::Str((*k).to_string())));
        objects.extend(pairs.iter().map(|(_, v)| Obj::Str((*v).to_string())));
        build(&objects, 0)
    }

    /// A keyed-archive shell: a top dictionary whose `$objects` array holds
    /// the given strings, the shape the NIB miner scans.
    pub fn objects_archive(strings: &[&str]) -> Vec<u8> {
        let refs = (3..3 + strings.len() as u64).collect();
        let mut objects = vec![
            Obj::Dict(vec![1], vec![2]),
            Obj::Str("$objects".to_string()),
            Obj::Array(refs),
        ];
        objects.extend(strings.iter().map(|s| Obj::Str((*s).to_string())));
        build(&objects, 0)
    }
}

fn build(objects: &[Obj], top: u64) -> Vec<u8> {
    let mut out = b"bplist00".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());

    for obj in objects {
        offsets.push(out.len() as u64);
        match obj {
            Obj::Str(s) => encode_string(&mut out, s),
            Obj::Array(refs) => {
                write_marker(&mut out, 0xA0, refs.len());
                out.extend(refs.iter().map(|&r| r as u8));
            }
            Obj::Dict(keys, values) => {
                write_marker(&mut out, 0xD0, keys.len());
                out.extend(keys.iter().map(|&r| r as u8));
                out.extend(values.iter().map(|&r| r as u8));
            }
        }
    }

    let table_offset = out.len() as u64;
    let offset_int_size: usize = match table_offset {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        _ => 4,
    };
    for offset in &offsets {
        out.extend_from_slice(&offset.to_be_bytes()[8 - offset_int_size..]);
    }

    // Trailer: 6 unused bytes, offset-int size, object-ref size (always 1
    // here), object count, top object, table offset.
    out.extend_from_slice(&[0u8; 6]);
    out.push(offset_int_size as u8);
    out.push(1);
    out.extend_from_slice(&(objects.len() as u64).to_be_bytes());
    out.extend_from_slice(&top.to_be_bytes());
    out.extend_from_slice(&table_offset.to_be_bytes());
    out
}

fn encode_string(out: &mut Vec<u8>, s: &str) {
    if s.is_ascii() {
        write_marker(out, 0x50, s.len());
        out.extend_from_slice(s.as_bytes());
    } else {
        let units: Vec<u16> = s.encode_utf16().collect();
        write_marker(out, 0x60, units.len());
        for unit in units {
            out.extend_from_slice(&unit.to_be_bytes());
        }
    }
}

fn write_marker(out: &mut Vec<u8>, kind: u8, count: usize) {
    if count < 15 {
        out.push(kind | count as u8);
    } else {
        // Low-nibble escape: a following int object carries the count.
        out.push(kind | 0x0F);
        if count <= 0xFF {
            out.push(0x10);
            out.push(count as u8);
        } else {
            out.push(0x11);
            out.extend_from_slice(&(count as u16).to_be_bytes());
        }
    }
}
