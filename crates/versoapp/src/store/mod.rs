//! # Module Store
//!
//! Module content does not live in this crate. Installation, repository catalogs and
//! unlock keys belong to whatever hosts the modules; this crate only *reads* from them
//! through the [`ModuleStore`] trait.
//!
//! ## Contract
//!
//! - Every method takes `&self`, [`ModuleStore::refresh`] included. A store is shared (behind
//!   an `Arc`) between a background search and any number of concurrent reference
//!   resolutions, so implementations must be `Send + Sync` and must not need `&mut` to serve
//!   reads or reloads.
//! - Unknown module codes fail with [`VersoError::ModuleNotFound`].
//! - Content reads on a module that exists but may not be read (e.g. locked, missing unlock
//!   key) fail with [`VersoError::ModuleNotReadable`]. Metadata and counts stay available.
//! - A book the module does not contain fails with [`VersoError::BookAbsent`]; an empty book
//!   is *not* absent.
//! - Strong's annotations for a verse are an empty set when the module carries none.
//!
//! ## Implementations
//!
//! - [`memory::InMemoryStore`]: a catalog populated programmatically. Used by tests and by
//!   hosts that already hold module content in memory.
//! - [`fs::FileStore`]: loads a directory of JSON module files into the same catalog.
//!
//! ## Module File Layout
//!
//! Both implementations share the serde representation below. One file per module:
//!
//! ```text
//! modules/
//! ├── KJV.json            # {"code": "KJV", "type": "bible", "books": [...]}
//! ├── StrongsGreek.json   # {"code": ..., "type": "dictionary", "entries": {...}}
//! └── StrongsHebrew.json
//! ```

use crate::error::Result;
use crate::model::{BookCode, Module, StrongsKeys, StrongsLanguage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod fs;
pub mod memory;

/// Read access to installed modules.
pub trait ModuleStore: Send + Sync {
    /// All modules known to the store, ordered by code.
    fn list_modules(&self) -> Result<Vec<Module>>;

    fn metadata(&self, module: &str) -> Result<Module>;

    /// False for unknown modules as well as for locked ones.
    fn is_readable(&self, module: &str) -> bool;

    /// Books contained in the module, in canonical order.
    fn book_list(&self, module: &str) -> Result<Vec<BookCode>>;

    fn chapter_count(&self, module: &str, book: BookCode) -> Result<u32>;

    fn verse_count(&self, module: &str, book: BookCode, chapter: u32) -> Result<u32>;

    fn raw_verse_text(&self, module: &str, book: BookCode, chapter: u32, verse: u32)
        -> Result<String>;

    fn strongs_annotations(
        &self,
        module: &str,
        book: BookCode,
        chapter: u32,
        verse: u32,
    ) -> Result<StrongsKeys>;

    /// Section heading placed before the verse, if any.
    fn verse_heading(
        &self,
        module: &str,
        book: BookCode,
        chapter: u32,
        verse: u32,
    ) -> Result<Option<String>>;

    /// Introductory text of a book; empty when the module has none.
    fn book_introduction(&self, module: &str, book: BookCode) -> Result<String>;

    /// Entry keys of a dictionary module, sorted.
    fn dictionary_keys(&self, module: &str) -> Result<Vec<String>>;

    /// Raw entry of a dictionary module. `Ok(None)` when the key is absent.
    fn raw_entry(&self, module: &str, key: &str) -> Result<Option<String>>;

    /// Raw Strong's lexicon entry (`G…` or `H…` key). Fails with `KeyNotFound`.
    fn raw_lexicon_entry(&self, key: &str) -> Result<String>;

    /// Whether a lexicon for the given language is installed.
    fn has_lexicon(&self, language: StrongsLanguage) -> bool;

    /// Reloads the catalog from its backing storage and returns the module count.
    /// Stores without backing storage have nothing to reload.
    fn refresh(&self) -> Result<usize> {
        Ok(self.list_modules()?.len())
    }
}

/// Serialized form of one module: metadata plus content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleData {
    #[serde(flatten)]
    pub module: Module,
    /// Locked modules need an unlock key the store does not have.
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub books: Vec<BookData>,
    /// Dictionary entries by key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub entries: BTreeMap<String, String>,
}

impl ModuleData {
    pub fn new(module: Module) -> Self {
        Self {
            module,
            locked: false,
            books: Vec::new(),
            entries: BTreeMap::new(),
        }
    }

    pub fn with_book(mut self, book: BookData) -> Self {
        self.books.push(book);
        self
    }

    pub fn with_entry(mut self, key: impl Into<String>, raw: impl Into<String>) -> Self {
        self.entries.insert(key.into(), raw.into());
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn code(&self) -> &str {
        &self.module.code
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookData {
    pub book: BookCode,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub introduction: String,
    /// Chapters in order; each chapter is its verses in order.
    pub chapters: Vec<Vec<VerseData>>,
}

impl BookData {
    pub fn new(book: BookCode) -> Self {
        Self {
            book,
            introduction: String::new(),
            chapters: Vec::new(),
        }
    }

    /// Appends a chapter of plain verses.
    pub fn with_chapter<I, T>(mut self, verses: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<VerseData>,
    {
        self.chapters
            .push(verses.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_introduction(mut self, introduction: impl Into<String>) -> Self {
        self.introduction = introduction.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseData {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strongs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
}

impl VerseData {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_strongs<I, T>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.strongs = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }
}

impl From<&str> for VerseData {
    fn from(text: &str) -> Self {
        VerseData::new(text)
    }
}

impl From<String> for VerseData {
    fn from(text: String) -> Self {
        VerseData::new(text)
    }
}

/// Spellings under which a lexicon may file a Strong's key: `G26`, `26`, `0026`, `00026`.
pub(crate) fn lexicon_key_candidates(key: &str) -> Vec<String> {
    let key = key.trim();
    let digits = key.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let number = digits.trim_start_matches('0');
    let number = if number.is_empty() { "0" } else { number };

    let mut candidates = vec![key.to_string(), key.to_ascii_uppercase()];
    if let Some(language) = StrongsLanguage::of_key(key) {
        candidates.push(format!("{}{}", language.prefix(), number));
    }
    candidates.push(number.to_string());
    candidates.push(format!("{:0>4}", number));
    candidates.push(format!("{:0>5}", number));
    candidates.dedup();
    candidates
}
