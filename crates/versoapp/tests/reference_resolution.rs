mod common;

use common::store;
use proptest::prelude::*;
use versoapp::api::VersoApi;
use versoapp::error::VersoError;
use versoapp::store::memory::InMemoryStore;

fn api() -> VersoApi<InMemoryStore> {
    VersoApi::new(store())
}

fn strings(api: &VersoApi<InMemoryStore>, expr: &str) -> Vec<String> {
    api.references_from_range("WEB", expr).unwrap()
}

#[test]
fn test_verse_span_resolves_in_order() {
    let api = api();
    let refs = api.resolve_references("WEB", "Genesis 1:1-3").unwrap();
    let shown: Vec<String> = refs.iter().map(ToString::to_string).collect();
    assert_eq!(shown, vec!["Gen 1:1", "Gen 1:2", "Gen 1:3"]);
    assert_eq!(
        refs.iter().map(|r| r.absolute).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[test]
fn test_cross_chapter_span() {
    let api = api();
    assert_eq!(
        strings(&api, "Gen 1:9-2:2"),
        vec!["Gen 1:9", "Gen 1:10", "Gen 2:1", "Gen 2:2"]
    );
}

#[test]
fn test_whole_chapter_and_book() {
    let api = api();
    assert_eq!(strings(&api, "John 1").len(), 5);
    assert_eq!(strings(&api, "Exod").len(), 10);
    assert_eq!(strings(&api, "Matt 1-2").len(), 20);
}

#[test]
fn test_multi_range_is_canonical_and_deduplicated() {
    let api = api();
    assert_eq!(
        strings(&api, "Matt 1:1; Gen 1:3,1; Gen 1:1-2"),
        vec!["Gen 1:1", "Gen 1:2", "Gen 1:3", "Matt 1:1"]
    );
}

#[test]
fn test_range_without_book_reuses_previous() {
    let api = api();
    assert_eq!(strings(&api, "Exod 1:2; 1:4"), vec!["Exod 1:2", "Exod 1:4"]);
}

#[test]
fn test_errors_are_not_clamped() {
    let api = api();
    assert!(matches!(
        api.resolve_references("WEB", "Hezekiah 1:1"),
        Err(VersoError::UnknownBook(_))
    ));
    assert!(matches!(
        api.resolve_references("WEB", "Genesis 1:999"),
        Err(VersoError::OutOfRange(_))
    ));
    assert!(matches!(
        api.resolve_references("WEB", "Gen 4"),
        Err(VersoError::OutOfRange(_))
    ));
    assert!(matches!(
        api.resolve_references("WEB", "Gen 1:5-3"),
        Err(VersoError::InvalidRange(_))
    ));
    assert!(matches!(
        api.resolve_references("WEB", "Rev 1:1"),
        Err(VersoError::OutOfRange(_))
    ));
    assert!(matches!(
        api.resolve_references("WEB", ""),
        Err(VersoError::InvalidRange(_))
    ));
}

#[test]
fn test_resolved_references_fetch_matching_text() {
    let api = api();
    let records = api.verses_from_references("WEB", "Gen 1:6; Matt 1:3").unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[0].content.contains("mustard seed"));
    assert_eq!(records[1].absolute, 42);

    let run = api.verses_from("WEB", "Gen 3:9", 3).unwrap();
    let shown: Vec<String> = run.iter().map(|r| r.reference().to_string()).collect();
    assert_eq!(shown, vec!["Gen 3:9", "Gen 3:10", "Exod 1:1"]);
}

#[test]
fn test_book_text_slices() {
    let api = api();
    let slice = api.book_text("WEB", "Matt", 9, Some(3)).unwrap();
    let shown: Vec<String> = slice.iter().map(|r| r.reference().to_string()).collect();
    assert_eq!(shown, vec!["Matt 1:9", "Matt 1:10", "Matt 2:1"]);
    assert_eq!(api.module_text("WEB").unwrap().len(), 65);
}

proptest! {
    #[test]
    fn prop_display_strings_resolve_back(index in 0usize..65) {
        let api = api();
        let versification = api.versification("WEB").unwrap();
        let reference = versification.reference_at(index).unwrap();
        let back = api.resolve_references("WEB", &reference.to_string()).unwrap();
        prop_assert_eq!(back.len(), 1);
        prop_assert_eq!(back[0].absolute, index);
    }
}
