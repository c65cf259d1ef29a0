//! Compiled NIB archive string mining
//!
//! NIBs are binary-serialized object graphs. A full deserializer is not
//! needed to recover menu titles: the archive's interned-string table keeps
//! each `<id>.title` key adjacent to its title text, so a positional scan
//! over the string sequence yields (identifier, text) pairs. When the file
//! does not parse as a property list at all, a raw printable-ASCII
//! projection recovers the same sequence.

mod miner;

pub use miner::{mine_nib, pair_titles, printable_ascii};

/// Suffix of title keys in the interned-string table.
pub const TITLE_SUFFIX: &str = ".title";
