//! # MacLoc
//!
//! A pure-Rust library that fills Xcode localization exports with
//! translations macOS already ships.
//!
//! The system localizes its own menus into dozens of languages. MacLoc
//! harvests those source/translation pairs from framework `.strings`
//! tables and compiled NIB archives, matches them against the main-menu
//! strings of an app's `xcloc`/XLIFF export, and writes the translations
//! back into the per-locale documents.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use macloc::session::{ExportSession, SessionWorker};
//! use macloc::dictionary::SystemDictionary;
//!
//! // Harvest the system dictionary once; it is read-only afterwards.
//! let system = SystemDictionary::load();
//! println!("entries: {}", system.entry_count());
//!
//! // Open an export folder and translate every non-English document.
//! let session = ExportSession::open(&system, "/tmp/MyApp Localizations")?;
//! println!("targets: {}, matches: {}", session.target_key_count(), session.match_count());
//! let report = session.translate_all()?;
//! println!("rewrote {} units", report.replaced_units);
//!
//! // Or run the passes off-thread and consume results over a channel.
//! let (worker, events) = SessionWorker::new(Arc::new(SystemDictionary::load()));
//! worker.open("/tmp/MyApp Localizations".into());
//! # Ok::<(), macloc::Error>(())
//! ```
//!
//! ## Using the Prelude
//!
//! ```
//! use macloc::prelude::*;
//! ```

pub mod dictionary;
pub mod error;
pub mod formats;
pub mod session;
pub mod xcloc;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::dictionary::{
        DictionaryEntry, LanguageDictionary, SystemDictionary, narrow_to_keys,
    };
    pub use crate::error::{Error, Result};
    pub use crate::formats::common::XibKey;
    pub use crate::formats::nib::mine_nib;
    pub use crate::formats::xliff::{read_menu_keys, translate};
    pub use crate::session::{ExportSession, SessionEvent, SessionWorker, TranslateReport};
    pub use crate::xcloc::{XliffFile, discover};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
