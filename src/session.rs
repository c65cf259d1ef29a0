//! Translation sessions
//!
//! One session per opened export folder. The aggregate system dictionary
//! is built once and shared read-only; per-session state (files, keys,
//! narrowed dictionary) is rebuilt on every open and replaced wholesale by
//! the next one. [`SessionWorker`] runs the passes off the caller's thread
//! and delivers results over a channel, tagged with a generation token so
//! results of a superseded selection can be dropped.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::dictionary::{self, DictionaryEntry, LanguageDictionary, SystemDictionary};
use crate::error::{Error, Result};
use crate::formats::common::XibKey;
use crate::formats::xliff;
use crate::xcloc::{self, REFERENCE_LANG, XliffFile};

/// Fallback display name when the reference document has no window unit.
pub const DEFAULT_APP_NAME: &str = "AppName";

/// An opened export folder, ready to translate.
#[derive(Debug, Clone)]
pub struct ExportSession {
    files: Vec<XliffFile>,
    app_name: String,
    target_keys: Vec<XibKey>,
    dictionary: LanguageDictionary,
}

/// Statistics from one translate pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslateReport {
    /// Files rewritten.
    pub translated_files: usize,
    /// Translation units filled across all files.
    pub replaced_units: usize,
    /// Files skipped because no dictionary locale matched theirs.
    pub skipped_files: usize,
}

impl ExportSession {
    /// Open an export folder: discover its xcloc bundles, extract the
    /// reference document's keys and display name, and narrow the system
    /// dictionary to them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoExportsFound`], [`Error::NoReferenceLanguage`],
    /// or a reader error for an unreadable reference document. An empty
    /// narrowed dictionary is not an error; it shows up as a zero
    /// [`match_count`].
    ///
    /// [`Error::NoExportsFound`]: crate::Error::NoExportsFound
    /// [`Error::NoReferenceLanguage`]: crate::Error::NoReferenceLanguage
    /// [`match_count`]: ExportSession::match_count
    pub fn open<P: AsRef<Path>>(system: &SystemDictionary, dir: P) -> Result<Self> {
        let files = xcloc::discover(&dir)?;
        let reference = xcloc::reference(&files)?;
        tracing::info!("opening export: {}", reference.path.display());

        let menu = xliff::read_menu_keys(&reference.path)?;
        let app_name = menu
            .app_name
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

        let dictionary = dictionary::narrow_to_keys(system.languages(), &menu.keys, &app_name)
            .unwrap_or_default();
        if dictionary.is_empty() {
            tracing::warn!("no dictionary entries match this export");
        }

        Ok(Self {
            files,
            app_name,
            target_keys: menu.keys,
            dictionary,
        })
    }

    pub fn files(&self) -> &[XliffFile] {
        &self.files
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Count of distinct source strings in the reference document.
    pub fn target_key_count(&self) -> usize {
        self.target_keys
            .iter()
            .map(|key| key.source.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Matched entries in the first narrowed locale.
    pub fn match_count(&self) -> usize {
        self.dictionary
            .first()
            .map_or(0, |(_, entries)| entries.len())
    }

    /// Apply the narrowed dictionary to every non-reference file.
    ///
    /// Each file is attempted regardless of earlier failures; a file that
    /// fails leaves already-translated files in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TranslateFailed`] after the pass when any file
    /// failed to parse or write.
    ///
    /// [`Error::TranslateFailed`]: crate::Error::TranslateFailed
    pub fn translate_all(&self) -> Result<TranslateReport> {
        let mut report = TranslateReport::default();
        let mut attempted = 0usize;
        let mut failed = 0usize;

        for file in &self.files {
            if file.lang == REFERENCE_LANG {
                continue;
            }
            let Some(entries) = self.entries_for(&file.lang) else {
                tracing::warn!("no dictionary locale for {}", file.lang);
                report.skipped_files += 1;
                continue;
            };

            attempted += 1;
            match xliff::translate(&file.path, entries, &self.app_name) {
                Ok(replaced) => {
                    report.translated_files += 1;
                    report.replaced_units += replaced;
                }
                Err(e) => {
                    tracing::warn!("translate failed for {}: {e}", file.path.display());
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(Error::TranslateFailed {
                total: attempted,
                failed,
            });
        }
        Ok(report)
    }

    /// Narrowed entries for a document locale, trying the normalized code
    /// first and the region-based fallback second.
    fn entries_for(&self, lang: &str) -> Option<&[DictionaryEntry]> {
        let (primary, fallback) = xcloc::locale_candidates(lang);
        self.dictionary
            .get(&primary)
            .or_else(|| fallback.and_then(|code| self.dictionary.get(code)))
            .map(Vec::as_slice)
    }
}

/// Result messages delivered by [`SessionWorker`] jobs.
#[derive(Debug)]
pub enum SessionEvent {
    /// An open pass finished.
    Opened {
        /// The selection this result belongs to.
        generation: u64,
        result: Result<ExportSession>,
    },
    /// A translate pass finished.
    Translated {
        generation: u64,
        result: Result<TranslateReport>,
    },
}

impl SessionEvent {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Opened { generation, .. } | Self::Translated { generation, .. } => *generation,
        }
    }
}

/// Runs session passes off the caller's thread.
///
/// Work is never cancelled; a new open simply bumps the generation so the
/// consumer can drop results of the superseded selection when they
/// eventually arrive.
pub struct SessionWorker {
    dictionary: Arc<SystemDictionary>,
    sender: Sender<SessionEvent>,
    generation: Arc<AtomicU64>,
}

impl SessionWorker {
    pub fn new(dictionary: Arc<SystemDictionary>) -> (Self, Receiver<SessionEvent>) {
        let (sender, receiver) = mpsc::channel();
        let worker = Self {
            dictionary,
            sender,
            generation: Arc::new(AtomicU64::new(0)),
        };
        (worker, receiver)
    }

    /// Entry count of the shared dictionary's first locale.
    pub fn dictionary_entry_count(&self) -> usize {
        self.dictionary.entry_count()
    }

    /// Start an open pass for a newly selected folder, superseding any
    /// in-flight selection.
    pub fn open(&self, dir: PathBuf) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let dictionary = Arc::clone(&self.dictionary);
        let sender = self.sender.clone();
        thread::spawn(move || {
            let result = ExportSession::open(&dictionary, &dir);
            let _ = sender.send(SessionEvent::Opened { generation, result });
        });
    }

    /// Start a translate pass over an opened session.
    pub fn translate(&self, session: Arc<ExportSession>) {
        let generation = self.generation.load(Ordering::SeqCst);
        let sender = self.sender.clone();
        thread::spawn(move || {
            let result = session.translate_all();
            let _ = sender.send(SessionEvent::Translated { generation, result });
        });
    }

    /// Whether an event belongs to the current selection.
    pub fn is_current(&self, event: &SessionEvent) -> bool {
        self.generation.load(Ordering::SeqCst) == event.generation()
    }
}
