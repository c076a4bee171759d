#![allow(dead_code)]

use std::sync::mpsc;
use versoapp::model::{BookCode, Module, ModuleFlags, ModuleType, Testament};
use versoapp::search::ProgressCallback;
use versoapp::store::memory::InMemoryStore;
use versoapp::store::{BookData, ModuleData, VerseData};
pub use versoapp::test_utils::b;
use versoapp::test_utils::{greek_lexicon, hebrew_lexicon, locked_bible, plain_bible};

/// Chapter layout of the generated Bible, in canonical order.
///
/// Absolute layout: Gen 0..30, Exod 30..40, Matt 40..60, John 60..65.
pub const LAYOUT: &[(&str, &[usize])] = &[
    ("Gen", &[10, 10, 10]),
    ("Exod", &[10]),
    ("Matt", &[10, 10]),
    ("John", &[5]),
];

/// Text placed at specific absolute indices; every other verse is filler.
const SPECIAL: &[(usize, &str, &[&str])] = &[
    (5, "The mustard seed is the least of all seeds.", &["H2233"]),
    (29, "I will put enmity between thee and the woman.", &["H802"]),
    (42, "The kingdom is like to a grain of Mustard  seed.", &["G4615", "G2848"]),
    (61, "God so loved the world.", &["G2316", "G25"]),
    (63, "Love is patient.", &["G26"]),
    (64, "Love one another, as God loved you.", &["G26", "G2316"]),
];

pub fn generated_bible(code: &str) -> ModuleData {
    let module = Module::new(code, ModuleType::Bible, "en").with_flags(ModuleFlags {
        has_strongs: true,
        ..Default::default()
    });
    let mut data = ModuleData::new(module);
    let mut absolute = 0;
    for (name, chapters) in LAYOUT {
        let book = b(name);
        let mut book_data = BookData::new(book);
        for (c, verses) in chapters.iter().enumerate() {
            let mut chapter = Vec::new();
            for v in 0..*verses {
                chapter.push(verse_at(absolute, book, c + 1, v + 1));
                absolute += 1;
            }
            book_data = book_data.with_chapter(chapter);
        }
        data = data.with_book(book_data);
    }
    data
}

fn verse_at(absolute: usize, book: BookCode, chapter: usize, verse: usize) -> VerseData {
    if let Some((_, text, strongs)) = SPECIAL.iter().find(|(at, _, _)| *at == absolute) {
        return VerseData::new(*text).with_strongs(strongs.iter().copied());
    }
    let filler = match book.testament() {
        Testament::Old => "H1",
        Testament::New => "G1",
    };
    VerseData::new(format!("{} {}:{} filler", book.osis(), chapter, verse)).with_strongs([filler])
}

/// Two generated Bibles next to the shared lexicons, `PLAIN` and `LOCKED`.
pub fn store() -> InMemoryStore {
    InMemoryStore::new()
        .with_module(generated_bible("WEB"))
        .with_module(generated_bible("ASV"))
        .with_module(plain_bible())
        .with_module(locked_bible())
        .with_module(greek_lexicon())
        .with_module(hebrew_lexicon())
}

/// A progress callback that hands each report to the test and waits for a go signal.
pub fn gated_progress() -> (ProgressCallback, mpsc::Receiver<u8>, mpsc::Sender<()>) {
    let (report_tx, report_rx) = mpsc::channel();
    let (go_tx, go_rx) = mpsc::channel::<()>();
    let callback: ProgressCallback = Box::new(move |percent| {
        let _ = report_tx.send(percent);
        let _ = go_rx.recv();
    });
    (callback, report_rx, go_tx)
}
