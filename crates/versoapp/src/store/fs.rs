use super::memory::InMemoryStore;
use super::{ModuleData, ModuleStore};
use crate::error::{Result, VersoError};
use crate::model::{BookCode, Module, StrongsKeys, StrongsLanguage};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

/// Module store backed by a directory of JSON module files.
///
/// Every `*.json` file in the root directory is one module. Files that fail to parse
/// are skipped with a warning so one broken download does not hide the rest.
///
/// The loaded catalog sits behind a lock, so [`FileStore::refresh`] and
/// [`FileStore::save_module`] work on a shared store.
pub struct FileStore {
    root: PathBuf,
    catalog: RwLock<InMemoryStore>,
}

impl FileStore {
    /// Opens the directory, creating it when missing, and loads every module in it.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            fs::create_dir_all(&root).map_err(VersoError::Io)?;
        }
        let store = Self {
            root,
            catalog: RwLock::new(InMemoryStore::new()),
        };
        store.refresh()?;
        Ok(store)
    }

    /// Rescans the directory, picking up added, changed and removed module files.
    ///
    /// The new catalog replaces the old one in a single step; readers never see it half loaded.
    pub fn refresh(&self) -> Result<usize> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.root)
            .map_err(VersoError::Io)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        let mut catalog = InMemoryStore::new();
        for path in files {
            match load_module_file(&path) {
                Ok(data) => {
                    tracing::debug!(module = data.code(), path = %path.display(), "loaded module");
                    catalog.insert_module(data);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping module file");
                }
            }
        }
        let count = catalog.len();
        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = catalog;
        tracing::info!(root = %self.root.display(), modules = count, "module directory scanned");
        Ok(count)
    }

    /// Writes a module file into the store directory and loads it.
    pub fn save_module(&self, data: ModuleData) -> Result<PathBuf> {
        let path = self.module_path(data.code());
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&data)?).map_err(VersoError::Io)?;
        fs::rename(&tmp, &path).map_err(VersoError::Io)?;
        self.catalog
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert_module(data);
        Ok(path)
    }

    pub fn module_path(&self, module: &str) -> PathBuf {
        self.root.join(format!("{}.json", module))
    }

    fn catalog(&self) -> RwLockReadGuard<'_, InMemoryStore> {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn load_module_file(path: &Path) -> Result<ModuleData> {
    let raw = fs::read_to_string(path).map_err(VersoError::Io)?;
    Ok(serde_json::from_str(&raw)?)
}

impl ModuleStore for FileStore {
    fn list_modules(&self) -> Result<Vec<Module>> {
        self.catalog().list_modules()
    }

    fn metadata(&self, module: &str) -> Result<Module> {
        self.catalog().metadata(module)
    }

    fn is_readable(&self, module: &str) -> bool {
        self.catalog().is_readable(module)
    }

    fn book_list(&self, module: &str) -> Result<Vec<BookCode>> {
        self.catalog().book_list(module)
    }

    fn chapter_count(&self, module: &str, book: BookCode) -> Result<u32> {
        self.catalog().chapter_count(module, book)
    }

    fn verse_count(&self, module: &str, book: BookCode, chapter: u32) -> Result<u32> {
        self.catalog().verse_count(module, book, chapter)
    }

    fn raw_verse_text(
        &self,
        module: &str,
        book: BookCode,
        chapter: u32,
        verse: u32,
    ) -> Result<String> {
        self.catalog().raw_verse_text(module, book, chapter, verse)
    }

    fn strongs_annotations(
        &self,
        module: &str,
        book: BookCode,
        chapter: u32,
        verse: u32,
    ) -> Result<StrongsKeys> {
        self.catalog().strongs_annotations(module, book, chapter, verse)
    }

    fn verse_heading(
        &self,
        module: &str,
        book: BookCode,
        chapter: u32,
        verse: u32,
    ) -> Result<Option<String>> {
        self.catalog().verse_heading(module, book, chapter, verse)
    }

    fn book_introduction(&self, module: &str, book: BookCode) -> Result<String> {
        self.catalog().book_introduction(module, book)
    }

    fn dictionary_keys(&self, module: &str) -> Result<Vec<String>> {
        self.catalog().dictionary_keys(module)
    }

    fn raw_entry(&self, module: &str, key: &str) -> Result<Option<String>> {
        self.catalog().raw_entry(module, key)
    }

    fn raw_lexicon_entry(&self, key: &str) -> Result<String> {
        self.catalog().raw_lexicon_entry(key)
    }

    fn has_lexicon(&self, language: StrongsLanguage) -> bool {
        self.catalog().has_lexicon(language)
    }

    fn refresh(&self) -> Result<usize> {
        FileStore::refresh(self)
    }
}
