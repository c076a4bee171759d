use super::{lexicon_key_candidates, BookData, ModuleData, ModuleStore, VerseData};
use crate::error::{Result, VersoError};
use crate::model::{BookCode, Module, ModuleType, StrongsKeys, StrongsLanguage};
use std::collections::BTreeMap;

/// Module catalog held entirely in memory.
///
/// Populated with `&mut self` before it is shared; reads only need `&self`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    modules: BTreeMap<String, ModuleData>,
    failing_read: Option<(String, BookCode, u32, u32)>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a module. Books are kept in canonical order.
    pub fn insert_module(&mut self, mut data: ModuleData) {
        data.books.sort_by_key(|book| book.book);
        self.modules.insert(data.code().to_string(), data);
    }

    pub fn with_module(mut self, data: ModuleData) -> Self {
        self.insert_module(data);
        self
    }

    pub(crate) fn len(&self) -> usize {
        self.modules.len()
    }

    /// Makes every content read of one verse fail with a store error.
    pub fn set_simulated_read_failure(
        &mut self,
        module: &str,
        book: BookCode,
        chapter: u32,
        verse: u32,
    ) {
        self.failing_read = Some((module.to_string(), book, chapter, verse));
    }

    fn module(&self, module: &str) -> Result<&ModuleData> {
        self.modules
            .get(module)
            .ok_or_else(|| VersoError::ModuleNotFound(module.to_string()))
    }

    fn readable_module(&self, module: &str) -> Result<&ModuleData> {
        let data = self.module(module)?;
        if data.locked {
            return Err(VersoError::ModuleNotReadable(module.to_string()));
        }
        Ok(data)
    }

    fn book<'a>(&self, data: &'a ModuleData, book: BookCode) -> Result<&'a BookData> {
        data.books
            .binary_search_by_key(&book, |entry| entry.book)
            .map(|pos| &data.books[pos])
            .map_err(|_| VersoError::BookAbsent {
                module: data.code().to_string(),
                book: book.to_string(),
            })
    }

    fn verse(&self, module: &str, book: BookCode, chapter: u32, verse: u32) -> Result<&VerseData> {
        if let Some((m, b, c, v)) = &self.failing_read {
            if m == module && *b == book && *c == chapter && *v == verse {
                return Err(VersoError::Store(format!(
                    "simulated read failure at {} {}:{}",
                    book, chapter, verse
                )));
            }
        }
        let data = self.readable_module(module)?;
        let entry = self.book(data, book)?;
        chapter
            .checked_sub(1)
            .and_then(|c| entry.chapters.get(c as usize))
            .and_then(|verses| verse.checked_sub(1).and_then(|v| verses.get(v as usize)))
            .ok_or_else(|| {
                VersoError::InvalidCoordinate(format!(
                    "{} {}:{} in module {}",
                    book, chapter, verse, module
                ))
            })
    }

    fn lexicon(&self, language: StrongsLanguage) -> Option<&ModuleData> {
        self.modules.values().find(|data| {
            data.module.module_type == ModuleType::Dictionary
                && match language {
                    StrongsLanguage::Greek => data.module.flags.has_greek_strongs_keys,
                    StrongsLanguage::Hebrew => data.module.flags.has_hebrew_strongs_keys,
                }
        })
    }
}

impl ModuleStore for InMemoryStore {
    fn list_modules(&self) -> Result<Vec<Module>> {
        Ok(self.modules.values().map(|data| data.module.clone()).collect())
    }

    fn metadata(&self, module: &str) -> Result<Module> {
        Ok(self.module(module)?.module.clone())
    }

    fn is_readable(&self, module: &str) -> bool {
        self.modules.get(module).is_some_and(|data| !data.locked)
    }

    fn book_list(&self, module: &str) -> Result<Vec<BookCode>> {
        Ok(self.module(module)?.books.iter().map(|b| b.book).collect())
    }

    fn chapter_count(&self, module: &str, book: BookCode) -> Result<u32> {
        let data = self.module(module)?;
        Ok(self.book(data, book)?.chapters.len() as u32)
    }

    fn verse_count(&self, module: &str, book: BookCode, chapter: u32) -> Result<u32> {
        let data = self.module(module)?;
        let entry = self.book(data, book)?;
        chapter
            .checked_sub(1)
            .and_then(|c| entry.chapters.get(c as usize))
            .map(|verses| verses.len() as u32)
            .ok_or_else(|| {
                VersoError::InvalidCoordinate(format!(
                    "{} chapter {} in module {}",
                    book, chapter, module
                ))
            })
    }

    fn raw_verse_text(
        &self,
        module: &str,
        book: BookCode,
        chapter: u32,
        verse: u32,
    ) -> Result<String> {
        Ok(self.verse(module, book, chapter, verse)?.text.clone())
    }

    fn strongs_annotations(
        &self,
        module: &str,
        book: BookCode,
        chapter: u32,
        verse: u32,
    ) -> Result<StrongsKeys> {
        Ok(self
            .verse(module, book, chapter, verse)?
            .strongs
            .iter()
            .cloned()
            .collect())
    }

    fn verse_heading(
        &self,
        module: &str,
        book: BookCode,
        chapter: u32,
        verse: u32,
    ) -> Result<Option<String>> {
        Ok(self.verse(module, book, chapter, verse)?.heading.clone())
    }

    fn book_introduction(&self, module: &str, book: BookCode) -> Result<String> {
        let data = self.readable_module(module)?;
        Ok(self.book(data, book)?.introduction.clone())
    }

    fn dictionary_keys(&self, module: &str) -> Result<Vec<String>> {
        let data = self.readable_module(module)?;
        Ok(data.entries.keys().cloned().collect())
    }

    fn raw_entry(&self, module: &str, key: &str) -> Result<Option<String>> {
        let data = self.readable_module(module)?;
        Ok(data.entries.get(key).cloned())
    }

    fn raw_lexicon_entry(&self, key: &str) -> Result<String> {
        let language = StrongsLanguage::of_key(key)
            .ok_or_else(|| VersoError::KeyNotFound(key.to_string()))?;
        let lexicon = self
            .lexicon(language)
            .ok_or_else(|| VersoError::KeyNotFound(format!("{} (no lexicon installed)", key)))?;
        lexicon_key_candidates(key)
            .iter()
            .find_map(|candidate| lexicon.entries.get(candidate))
            .cloned()
            .ok_or_else(|| VersoError::KeyNotFound(key.to_string()))
    }

    fn has_lexicon(&self, language: StrongsLanguage) -> bool {
        self.lexicon(language).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModuleFlags;

    fn b(name: &str) -> BookCode {
        BookCode::from_name(name).unwrap()
    }

    fn store() -> InMemoryStore {
        let bible = ModuleData::new(Module::new("KJV", ModuleType::Bible, "en"))
            .with_book(BookData::new(b("John")).with_chapter(["a", "b"]))
            .with_book(
                BookData::new(b("Gen"))
                    .with_chapter(vec![VerseData::new("x").with_strongs(["H1"])])
                    .with_introduction("intro"),
            );
        let lexicon = ModuleData::new(
            Module::new("StrongsGreek", ModuleType::Dictionary, "grc").with_flags(ModuleFlags {
                has_greek_strongs_keys: true,
                ..Default::default()
            }),
        )
        .with_entry("00026", " 26  agape  ag-ah'-pay");
        InMemoryStore::new()
            .with_module(bible)
            .with_module(lexicon)
            .with_module(ModuleData::new(Module::new("LOCKED", ModuleType::Bible, "en")).locked())
    }

    #[test]
    fn test_books_are_canonically_ordered() {
        assert_eq!(store().book_list("KJV").unwrap(), vec![b("Gen"), b("John")]);
    }

    #[test]
    fn test_unknown_module_and_absent_book() {
        let store = store();
        assert!(matches!(
            store.metadata("NOPE"),
            Err(VersoError::ModuleNotFound(_))
        ));
        assert!(matches!(
            store.chapter_count("KJV", b("Rev")),
            Err(VersoError::BookAbsent { .. })
        ));
    }

    #[test]
    fn test_locked_module_denies_content_but_not_metadata() {
        let store = store();
        assert!(!store.is_readable("LOCKED"));
        assert!(!store.is_readable("NOPE"));
        assert!(store.metadata("LOCKED").is_ok());
        assert!(matches!(
            store.raw_verse_text("LOCKED", b("Gen"), 1, 1),
            Err(VersoError::ModuleNotReadable(_))
        ));
    }

    #[test]
    fn test_verse_reads() {
        let store = store();
        assert_eq!(store.raw_verse_text("KJV", b("John"), 1, 2).unwrap(), "b");
        assert!(store
            .strongs_annotations("KJV", b("Gen"), 1, 1)
            .unwrap()
            .contains("H1"));
        assert!(store
            .strongs_annotations("KJV", b("John"), 1, 1)
            .unwrap()
            .is_empty());
        assert_eq!(store.book_introduction("KJV", b("Gen")).unwrap(), "intro");
        assert!(matches!(
            store.raw_verse_text("KJV", b("John"), 1, 3),
            Err(VersoError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_simulated_read_failure() {
        let mut store = store();
        store.set_simulated_read_failure("KJV", b("John"), 1, 2);
        assert!(store.raw_verse_text("KJV", b("John"), 1, 1).is_ok());
        assert!(matches!(
            store.raw_verse_text("KJV", b("John"), 1, 2),
            Err(VersoError::Store(_))
        ));
    }

    #[test]
    fn test_lexicon_lookup() {
        let store = store();
        assert!(store.has_lexicon(StrongsLanguage::Greek));
        assert!(!store.has_lexicon(StrongsLanguage::Hebrew));
        assert!(store.raw_lexicon_entry("G26").unwrap().contains("agape"));
        assert!(matches!(
            store.raw_lexicon_entry("G27"),
            Err(VersoError::KeyNotFound(_))
        ));
        assert!(matches!(
            store.raw_lexicon_entry("H430"),
            Err(VersoError::KeyNotFound(_))
        ));
    }
}
