//! # Versification Model
//!
//! Each versified module defines which books it contains, how many chapters each book has
//! and how many verses each chapter has. [`Versification`] captures that table once, from the
//! module store's metadata, and is read-only afterwards.
//!
//! ## Absolute Verse Index
//!
//! Every verse of a module gets a zero-based *absolute* index: the number of verses in all
//! (book, chapter) pairs before it, in canonical order, plus `verse - 1`. Indices are
//! strictly increasing in canonical order and contiguous, so a module with `N` verses uses
//! exactly `0..N`.
//!
//! Books the module does not contain take no room in the index. Chapters with zero verses
//! are legal and likewise take no room.
//!
//! [`Versification::to_absolute`] and [`Versification::from_absolute`] are exact inverses
//! for valid coordinates; anything out of range fails with
//! [`VersoError::InvalidCoordinate`].

use crate::error::{Result, VersoError};
use crate::model::{BookCode, Reference, Testament};
use crate::store::ModuleStore;
use std::ops::Range;

#[derive(Debug, Clone)]
struct BookEntry {
    book: BookCode,
    /// Absolute index of the first verse of the book.
    first: usize,
    verse_counts: Vec<u32>,
    /// Absolute index of verse 1 of each chapter.
    chapter_starts: Vec<usize>,
    total: usize,
}

#[derive(Debug, Clone)]
pub struct Versification {
    module: String,
    books: Vec<BookEntry>,
    total: usize,
}

impl Versification {
    /// Builds a versification from per-book chapter verse counts.
    ///
    /// Books are put into canonical order; a book listed twice keeps its first entry.
    pub fn new(module: impl Into<String>, mut books: Vec<(BookCode, Vec<u32>)>) -> Self {
        books.sort_by_key(|(book, _)| *book);
        books.dedup_by_key(|(book, _)| *book);

        let mut entries = Vec::with_capacity(books.len());
        let mut next = 0usize;
        for (book, verse_counts) in books {
            let first = next;
            let mut chapter_starts = Vec::with_capacity(verse_counts.len());
            for count in &verse_counts {
                chapter_starts.push(next);
                next += *count as usize;
            }
            entries.push(BookEntry {
                book,
                first,
                verse_counts,
                chapter_starts,
                total: next - first,
            });
        }

        Self {
            module: module.into(),
            books: entries,
            total: next,
        }
    }

    /// Reads the book list and chapter/verse counts for `module` from the store.
    pub fn load<S: ModuleStore + ?Sized>(store: &S, module: &str) -> Result<Self> {
        let meta = store.metadata(module)?;
        if !meta.module_type.is_versified() {
            return Err(VersoError::UnsupportedModuleType {
                module: module.to_string(),
                kind: meta.module_type.to_string(),
            });
        }

        let mut books = Vec::new();
        for book in store.book_list(module)? {
            let chapters = store.chapter_count(module, book)?;
            let mut counts = Vec::with_capacity(chapters as usize);
            for chapter in 1..=chapters {
                counts.push(store.verse_count(module, book, chapter)?);
            }
            books.push((book, counts));
        }

        let versification = Self::new(module, books);
        tracing::debug!(
            module,
            books = versification.books.len(),
            verses = versification.total,
            "loaded versification"
        );
        Ok(versification)
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// Books of the module in canonical order.
    pub fn books(&self) -> impl Iterator<Item = BookCode> + '_ {
        self.books.iter().map(|entry| entry.book)
    }

    pub fn has_book(&self, book: BookCode) -> bool {
        self.entry(book).is_ok()
    }

    pub fn total_verses(&self) -> usize {
        self.total
    }

    pub fn chapter_count(&self, book: BookCode) -> Result<u32> {
        Ok(self.entry(book)?.verse_counts.len() as u32)
    }

    pub fn verse_count(&self, book: BookCode, chapter: u32) -> Result<u32> {
        let entry = self.entry(book)?;
        let idx = self.chapter_idx(entry, chapter)?;
        Ok(entry.verse_counts[idx])
    }

    pub fn chapter_verse_counts(&self, book: BookCode) -> Result<&[u32]> {
        Ok(&self.entry(book)?.verse_counts)
    }

    pub fn book_verse_count(&self, book: BookCode) -> Result<usize> {
        Ok(self.entry(book)?.total)
    }

    pub fn to_absolute(&self, book: BookCode, chapter: u32, verse: u32) -> Result<usize> {
        let entry = self.entry(book)?;
        let idx = self.chapter_idx(entry, chapter)?;
        if verse == 0 || verse > entry.verse_counts[idx] {
            return Err(VersoError::InvalidCoordinate(format!(
                "{} {}:{} in module {}",
                book, chapter, verse, self.module
            )));
        }
        Ok(entry.chapter_starts[idx] + (verse as usize - 1))
    }

    pub fn from_absolute(&self, index: usize) -> Result<(BookCode, u32, u32)> {
        if index >= self.total {
            return Err(VersoError::InvalidCoordinate(format!(
                "absolute index {} in module {} ({} verses)",
                index, self.module, self.total
            )));
        }
        // Empty books share their start with the next book; the last candidate is the real one.
        let book_pos = self.books.partition_point(|entry| entry.first <= index) - 1;
        let entry = &self.books[book_pos];
        let chapter_pos = entry.chapter_starts.partition_point(|start| *start <= index) - 1;
        let verse = index - entry.chapter_starts[chapter_pos] + 1;
        Ok((entry.book, chapter_pos as u32 + 1, verse as u32))
    }

    pub fn reference(&self, book: BookCode, chapter: u32, verse: u32) -> Result<Reference> {
        let absolute = self.to_absolute(book, chapter, verse)?;
        Ok(Reference::new(&self.module, book, chapter, verse, absolute))
    }

    pub fn reference_at(&self, index: usize) -> Result<Reference> {
        let (book, chapter, verse) = self.from_absolute(index)?;
        Ok(Reference::new(&self.module, book, chapter, verse, index))
    }

    /// Absolute index range covering one book.
    pub fn book_span(&self, book: BookCode) -> Result<Range<usize>> {
        let entry = self.entry(book)?;
        Ok(entry.first..entry.first + entry.total)
    }

    /// Absolute index range covering one chapter.
    pub fn chapter_span(&self, book: BookCode, chapter: u32) -> Result<Range<usize>> {
        let entry = self.entry(book)?;
        let idx = self.chapter_idx(entry, chapter)?;
        let start = entry.chapter_starts[idx];
        Ok(start..start + entry.verse_counts[idx] as usize)
    }

    /// Absolute index range covering one testament. Testaments are contiguous because
    /// every Old Testament book precedes every New Testament book.
    pub fn testament_span(&self, testament: Testament) -> Range<usize> {
        let boundary = self
            .books
            .iter()
            .find(|entry| entry.book.testament() == Testament::New)
            .map(|entry| entry.first)
            .unwrap_or(self.total);
        match testament {
            Testament::Old => 0..boundary,
            Testament::New => boundary..self.total,
        }
    }

    fn entry(&self, book: BookCode) -> Result<&BookEntry> {
        self.books
            .binary_search_by_key(&book, |entry| entry.book)
            .map(|pos| &self.books[pos])
            .map_err(|_| {
                VersoError::InvalidCoordinate(format!(
                    "book {} is not part of module {}",
                    book, self.module
                ))
            })
    }

    fn chapter_idx(&self, entry: &BookEntry, chapter: u32) -> Result<usize> {
        if chapter == 0 || chapter as usize > entry.verse_counts.len() {
            return Err(VersoError::InvalidCoordinate(format!(
                "{} chapter {} in module {}",
                entry.book, chapter, self.module
            )));
        }
        Ok(chapter as usize - 1)
    }
}
