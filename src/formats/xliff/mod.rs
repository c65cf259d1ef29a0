//! XLIFF translation documents
//!
//! One document per exported locale. The reader extracts the main-menu
//! translation units without disturbing whitespace; the writer streams the
//! document through untouched except for the `target` elements it fills
//! in, then replaces the file atomically.

mod reader;
mod writer;

pub use reader::{MenuKeys, parse_menu_keys, read_menu_keys};
pub use writer::{rewrite_targets, translate};

/// Basename of the `file` element's `original` attribute that carries the
/// main-menu translation units.
pub const MENU_FILE: &str = "MainMenu.xib";

/// Note prefix designating the unit that holds the application's display
/// name (the window title).
pub const WINDOW_NOTE_PREFIX: &str = "Class = \"NSWindow\";";
