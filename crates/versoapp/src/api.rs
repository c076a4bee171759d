//! # API Facade
//!
//! [`VersoApi`] is the single entry point for every verso operation, whatever the UI. It is a
//! thin layer: it parses user-facing arguments (book names, reference expressions), picks the
//! component that does the work and returns structured types. No printing, no formatting.
//!
//! ## Components
//!
//! - Versification queries go to [`Versification`], loaded from the store per call.
//! - Reference expressions go to [`ReferenceResolver`].
//! - Verse content goes through [`ContentAccessor`].
//! - Strong's lookups go through [`LexiconAccessor`].
//! - Searches go to this client's [`SearchEngine`].
//!
//! ## Clients
//!
//! A `VersoApi` is one client handle. It runs at most one search at a time, and
//! [`VersoApi::cancel_search`] only ever touches that search. [`VersoApi::client`] makes
//! another handle over the same store; the two share the per-module scan locks, so they can
//! search different modules in parallel while scans of one module take turns.
//!
//! ## Generic Over ModuleStore
//!
//! - Production: `VersoApi<FileStore>`
//! - Testing: `VersoApi<InMemoryStore>`

use crate::content::ContentAccessor;
use crate::error::{Result, VersoError};
use crate::lexicon::LexiconAccessor;
use crate::model::{BookCode, Module, ModuleType, Reference, StrongsEntry, StrongsLanguage, VerseRecord};
use crate::reference::ReferenceResolver;
use crate::search::{OperationStatus, ProgressCallback, ScanLocks, SearchEngine, SearchHandle, SearchQuery};
use crate::store::ModuleStore;
use crate::versification::Versification;
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct VersoApi<S: ModuleStore + 'static> {
    store: Arc<S>,
    search: SearchEngine<S>,
    progress_step: u8,
}

impl<S: ModuleStore + 'static> VersoApi<S> {
    pub fn new(store: S) -> Self {
        Self::from_shared(Arc::new(store))
    }

    pub fn from_shared(store: Arc<S>) -> Self {
        Self::with_locks(store, Arc::new(ScanLocks::new()), 1)
    }

    fn with_locks(store: Arc<S>, locks: Arc<ScanLocks>, progress_step: u8) -> Self {
        let search = SearchEngine::new(Arc::clone(&store), locks).with_progress_step(progress_step);
        Self {
            store,
            search,
            progress_step,
        }
    }

    /// Minimum percentage points between two progress reports of this client's searches.
    pub fn with_progress_step(self, step: u8) -> Self {
        let locks = Arc::clone(self.search.locks());
        Self::with_locks(self.store, locks, step.max(1))
    }

    /// An independent client over the same store and scan locks.
    pub fn client(&self) -> Self {
        Self::with_locks(
            Arc::clone(&self.store),
            Arc::clone(self.search.locks()),
            self.progress_step,
        )
    }

    // --- Module catalog ---

    /// Rescans the store's backing storage so added and removed modules show up.
    /// Every client over the same store sees the result.
    pub fn refresh_modules(&self) -> Result<usize> {
        let count = self.store.refresh()?;
        tracing::debug!(modules = count, "module catalog refreshed");
        Ok(count)
    }

    pub fn modules(&self, kind: Option<ModuleType>) -> Result<Vec<Module>> {
        let modules = self.store.list_modules()?;
        Ok(match kind {
            Some(kind) => modules.into_iter().filter(|m| m.module_type == kind).collect(),
            None => modules,
        })
    }

    pub fn module(&self, code: &str) -> Result<Module> {
        self.store.metadata(code)
    }

    pub fn is_module_readable(&self, code: &str) -> bool {
        self.store.is_readable(code)
    }

    pub fn module_description(&self, code: &str) -> Result<String> {
        Ok(self.store.metadata(code)?.description)
    }

    // --- Versification ---

    pub fn versification(&self, code: &str) -> Result<Versification> {
        Versification::load(&*self.store, code)
    }

    pub fn book_list(&self, code: &str) -> Result<Vec<BookCode>> {
        Ok(self.versification(code)?.books().collect())
    }

    pub fn module_has_book(&self, code: &str, book: &str) -> Result<bool> {
        let book = parse_book(book)?;
        Ok(self.versification(code)?.has_book(book))
    }

    pub fn chapter_count(&self, code: &str, book: &str) -> Result<u32> {
        let (versification, book) = self.book_in(code, book)?;
        versification.chapter_count(book)
    }

    pub fn verse_count(&self, code: &str, book: &str, chapter: u32) -> Result<u32> {
        let (versification, book) = self.book_in(code, book)?;
        versification.verse_count(book, chapter).map_err(|_| {
            VersoError::OutOfRange(format!("{} has no chapter {}", book, chapter))
        })
    }

    /// Verse counts per chapter for every book of the module, in canonical order.
    pub fn all_chapter_verse_counts(&self, code: &str) -> Result<BTreeMap<BookCode, Vec<u32>>> {
        let versification = self.versification(code)?;
        versification
            .books()
            .map(|book| Ok((book, versification.chapter_verse_counts(book)?.to_vec())))
            .collect()
    }

    pub fn book_verse_count(&self, code: &str, book: &str) -> Result<usize> {
        let (versification, book) = self.book_in(code, book)?;
        versification.book_verse_count(book)
    }

    // --- References ---

    pub fn resolve_references(&self, code: &str, expr: &str) -> Result<Vec<Reference>> {
        let versification = self.versification(code)?;
        ReferenceResolver::new(&versification).resolve(expr)
    }

    /// Display strings ("Gen 1:1") for every verse an expression covers.
    pub fn references_from_range(&self, code: &str, expr: &str) -> Result<Vec<String>> {
        let versification = self.versification(code)?;
        ReferenceResolver::new(&versification).resolve_strings(expr)
    }

    // --- Content ---

    /// The text of exactly one verse.
    pub fn reference_text(&self, code: &str, reference: &str) -> Result<VerseRecord> {
        let accessor = ContentAccessor::open(&*self.store, code)?;
        let reference = ReferenceResolver::new(accessor.versification()).resolve_single(reference)?;
        accessor.verse(&reference)
    }

    /// Every verse a reference expression covers, in canonical order.
    pub fn verses_from_references(&self, code: &str, expr: &str) -> Result<Vec<VerseRecord>> {
        let accessor = ContentAccessor::open(&*self.store, code)?;
        let references = ReferenceResolver::new(accessor.versification()).resolve(expr)?;
        accessor.references(&references)
    }

    pub fn chapter_text(&self, code: &str, book: &str, chapter: u32) -> Result<Vec<VerseRecord>> {
        let book = parse_book(book)?;
        ContentAccessor::open(&*self.store, code)?.chapter(book, chapter)
    }

    /// `count` verses (or the rest of the book) from the 1-based `start_verse` of a book.
    pub fn book_text(
        &self,
        code: &str,
        book: &str,
        start_verse: usize,
        count: Option<usize>,
    ) -> Result<Vec<VerseRecord>> {
        let book = parse_book(book)?;
        ContentAccessor::open(&*self.store, code)?.book_slice(book, start_verse, count)
    }

    /// Up to `count` verses starting at `reference`, continuing across chapters and books.
    pub fn verses_from(&self, code: &str, reference: &str, count: usize) -> Result<Vec<VerseRecord>> {
        let accessor = ContentAccessor::open(&*self.store, code)?;
        let start = ReferenceResolver::new(accessor.versification()).resolve_single(reference)?;
        accessor.verses_from(&start, count)
    }

    pub fn module_text(&self, code: &str) -> Result<Vec<VerseRecord>> {
        ContentAccessor::open(&*self.store, code)?.all()
    }

    pub fn book_headings(
        &self,
        code: &str,
        book: &str,
        start_verse: usize,
        count: Option<usize>,
    ) -> Result<Vec<VerseRecord>> {
        let book = parse_book(book)?;
        ContentAccessor::open(&*self.store, code)?.headings(book, start_verse, count)
    }

    pub fn book_introduction(&self, code: &str, book: &str) -> Result<String> {
        let book = parse_book(book)?;
        ContentAccessor::open(&*self.store, code)?.introduction(book)
    }

    // --- Dictionaries ---

    pub fn dictionary_keys(&self, code: &str) -> Result<Vec<String>> {
        self.require_keyed(code)?;
        self.store.dictionary_keys(code)
    }

    pub fn raw_entry(&self, code: &str, key: &str) -> Result<String> {
        self.require_keyed(code)?;
        self.store
            .raw_entry(code, key)?
            .ok_or_else(|| VersoError::KeyNotFound(format!("{} in {}", key, code)))
    }

    // --- Lexicon ---

    pub fn strongs_entry(&self, key: &str) -> Result<StrongsEntry> {
        LexiconAccessor::new(&*self.store).entry(key)
    }

    pub fn strongs_available(&self) -> bool {
        LexiconAccessor::new(&*self.store).any_available()
    }

    pub fn hebrew_strongs_available(&self) -> bool {
        LexiconAccessor::new(&*self.store).available(StrongsLanguage::Hebrew)
    }

    pub fn greek_strongs_available(&self) -> bool {
        LexiconAccessor::new(&*self.store).available(StrongsLanguage::Greek)
    }

    // --- Search ---

    pub fn start_search(
        &self,
        code: &str,
        query: SearchQuery,
        progress: Option<ProgressCallback>,
    ) -> Result<SearchHandle> {
        self.search.start(code, query, progress)
    }

    /// Status of this client's most recent search.
    pub fn search_status(&self) -> OperationStatus {
        self.search.status()
    }

    /// Cancels this client's running search. Searches of other clients are untouched.
    pub fn cancel_search(&self) {
        self.search.cancel();
    }

    // --- Helpers ---

    fn book_in(&self, code: &str, book: &str) -> Result<(Versification, BookCode)> {
        let book = parse_book(book)?;
        let versification = self.versification(code)?;
        if !versification.has_book(book) {
            return Err(VersoError::BookAbsent {
                module: code.to_string(),
                book: book.to_string(),
            });
        }
        Ok((versification, book))
    }

    fn require_keyed(&self, code: &str) -> Result<()> {
        let meta = self.store.metadata(code)?;
        if !meta.module_type.is_keyed() {
            return Err(VersoError::UnsupportedModuleType {
                module: code.to_string(),
                kind: meta.module_type.to_string(),
            });
        }
        if !self.store.is_readable(code) {
            return Err(VersoError::ModuleNotReadable(code.to_string()));
        }
        Ok(())
    }
}

/// Book names accept OSIS codes and full names in any case ("Gen", "genesis", "1 John").
pub fn parse_book(name: &str) -> Result<BookCode> {
    BookCode::from_name(name).ok_or_else(|| VersoError::UnknownBook(name.trim().to_string()))
}
