//! # Content Access
//!
//! [`ContentAccessor`] wraps the module store's raw, coordinate-keyed reads behind
//! reference-shaped operations: one verse, a run of verses, a chapter, a book or the whole
//! module. Every [`VerseRecord`] it returns already carries the module's absolute verse
//! index, so consumers never re-resolve.
//!
//! Opening an accessor checks the module up front:
//! - unknown code: [`VersoError::ModuleNotFound`]
//! - locked module: [`VersoError::ModuleNotReadable`]
//! - dictionary module: [`VersoError::UnsupportedModuleType`]
//!
//! Asking for a book the module does not contain fails with [`VersoError::BookAbsent`],
//! which is distinct from an existing book with no verses (an empty result).
//!
//! Headings are not a separate channel: they ride along on [`VerseRecord::heading`] when the
//! module declares `has_headings`, and [`ContentAccessor::headings`] is a filtered view of
//! the same verse stream.

use crate::error::{Result, VersoError};
use crate::model::{BookCode, Module, Reference, StrongsKeys, VerseRecord};
use crate::store::ModuleStore;
use crate::versification::Versification;
use std::ops::Range;

pub struct ContentAccessor<'a, S: ModuleStore + ?Sized> {
    store: &'a S,
    module: Module,
    versification: Versification,
}

impl<'a, S: ModuleStore + ?Sized> ContentAccessor<'a, S> {
    pub fn open(store: &'a S, module: &str) -> Result<Self> {
        let meta = store.metadata(module)?;
        if !meta.module_type.is_versified() {
            return Err(VersoError::UnsupportedModuleType {
                module: module.to_string(),
                kind: meta.module_type.to_string(),
            });
        }
        if !store.is_readable(module) {
            return Err(VersoError::ModuleNotReadable(module.to_string()));
        }
        let versification = Versification::load(store, module)?;
        Ok(Self {
            store,
            module: meta,
            versification,
        })
    }

    /// Builds an accessor from metadata and versification the caller already checked.
    pub(crate) fn from_parts(store: &'a S, module: Module, versification: Versification) -> Self {
        Self {
            store,
            module,
            versification,
        }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn versification(&self) -> &Versification {
        &self.versification
    }

    pub fn verse(&self, reference: &Reference) -> Result<VerseRecord> {
        let absolute =
            self.versification
                .to_absolute(reference.book, reference.chapter, reference.verse)?;
        self.verse_at(absolute)
    }

    pub fn verse_at(&self, absolute: usize) -> Result<VerseRecord> {
        let (book, chapter, verse) = self.versification.from_absolute(absolute)?;
        let code = self.module.code.as_str();
        let content = self.store.raw_verse_text(code, book, chapter, verse)?;
        let heading = if self.module.flags.has_headings {
            self.store.verse_heading(code, book, chapter, verse)?
        } else {
            None
        };
        Ok(VerseRecord {
            module: self.module.code.clone(),
            book,
            chapter,
            verse,
            absolute,
            content,
            heading,
        })
    }

    /// Raw text of the verse at `absolute`, without building a record.
    pub fn raw_text_at(&self, absolute: usize) -> Result<String> {
        let (book, chapter, verse) = self.versification.from_absolute(absolute)?;
        self.store
            .raw_verse_text(&self.module.code, book, chapter, verse)
    }

    /// Strong's keys annotated on the verse at `absolute`.
    pub fn strongs_at(&self, absolute: usize) -> Result<StrongsKeys> {
        let (book, chapter, verse) = self.versification.from_absolute(absolute)?;
        self.store
            .strongs_annotations(&self.module.code, book, chapter, verse)
    }

    /// Verses for a run of absolute indices, in ascending order.
    pub fn verses(&self, range: Range<usize>) -> Result<Vec<VerseRecord>> {
        range.map(|absolute| self.verse_at(absolute)).collect()
    }

    /// Up to `count` consecutive verses starting at `start`, stopping at the end of the module.
    pub fn verses_from(&self, start: &Reference, count: usize) -> Result<Vec<VerseRecord>> {
        let first = self
            .versification
            .to_absolute(start.book, start.chapter, start.verse)?;
        let end = first
            .saturating_add(count)
            .min(self.versification.total_verses());
        self.verses(first..end)
    }

    /// The verses behind a list of references, in the order given.
    pub fn references(&self, references: &[Reference]) -> Result<Vec<VerseRecord>> {
        references.iter().map(|r| self.verse(r)).collect()
    }

    pub fn chapter(&self, book: BookCode, chapter: u32) -> Result<Vec<VerseRecord>> {
        self.require_book(book)?;
        let chapters = self.versification.chapter_count(book)?;
        if chapter == 0 || chapter > chapters {
            return Err(VersoError::OutOfRange(format!(
                "{} has {} chapters, got {}",
                book, chapters, chapter
            )));
        }
        tracing::debug!(module = %self.module.code, %book, chapter, "fetching chapter");
        self.verses(self.versification.chapter_span(book, chapter)?)
    }

    pub fn book(&self, book: BookCode) -> Result<Vec<VerseRecord>> {
        self.book_slice(book, 1, None)
    }

    /// Part of a book: `count` verses (or the rest of the book) from the 1-based verse
    /// position `start_verse` counted across the whole book.
    pub fn book_slice(
        &self,
        book: BookCode,
        start_verse: usize,
        count: Option<usize>,
    ) -> Result<Vec<VerseRecord>> {
        self.require_book(book)?;
        let span = self.versification.book_span(book)?;
        if start_verse == 0 || (start_verse > span.len() && !span.is_empty()) {
            return Err(VersoError::OutOfRange(format!(
                "{} has {} verses, got start {}",
                book,
                span.len(),
                start_verse
            )));
        }
        let first = (span.start + start_verse - 1).min(span.end);
        let end = match count {
            Some(count) => first.saturating_add(count).min(span.end),
            None => span.end,
        };
        tracing::debug!(module = %self.module.code, %book, first, end, "fetching book text");
        self.verses(first..end)
    }

    /// Every verse of the module.
    pub fn all(&self) -> Result<Vec<VerseRecord>> {
        self.verses(0..self.versification.total_verses())
    }

    /// Verses of a book slice that carry a heading.
    pub fn headings(
        &self,
        book: BookCode,
        start_verse: usize,
        count: Option<usize>,
    ) -> Result<Vec<VerseRecord>> {
        Ok(self
            .book_slice(book, start_verse, count)?
            .into_iter()
            .filter(|record| record.heading.is_some())
            .collect())
    }

    pub fn introduction(&self, book: BookCode) -> Result<String> {
        self.require_book(book)?;
        self.store.book_introduction(&self.module.code, book)
    }

    fn require_book(&self, book: BookCode) -> Result<()> {
        if self.versification.has_book(book) {
            Ok(())
        } else {
            Err(VersoError::BookAbsent {
                module: self.module.code.clone(),
                book: book.to_string(),
            })
        }
    }
}
