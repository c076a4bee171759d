//! # Strong's Lexicon
//!
//! Raw lexicon entries come from the module store as loosely formatted text:
//!
//! ```text
//!  0026  agape  ag-ah'-pay
//!
//!  from 0025; love, i.e. affection or benevolence; ...
//!
//!  see GREEK for 0025
//! ```
//!
//! The first non-blank line starts with the number, followed by the transcription and the
//! phonetic transcription. Those two are normally separated by runs of two or more spaces;
//! when the header only uses single spaces, the first word is the transcription and the rest
//! is the phonetic form. Everything after the header is the definition.
//! `see GREEK for N` / `see HEBREW for N` mentions become [`StrongsReference`]s.
//!
//! Each sub-field is parsed on its own. A missing transcription or phonetic field becomes an
//! empty string; only a missing number or an empty entry fails with
//! [`VersoError::MalformedLexiconEntry`].

use crate::error::{Result, VersoError};
use crate::model::{StrongsEntry, StrongsLanguage, StrongsReference};
use crate::store::ModuleStore;
use once_cell::sync::Lazy;
use regex::Regex;

static FIELD_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}|\t").expect("valid separator regex"));

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)([GH])?0*(\d+)\b").expect("valid number regex"));

static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)see\s+(GREEK|HEBREW)\s+for\s+0*(\d+)").expect("valid reference regex")
});

/// Parses one raw entry. `key` is the key it was looked up by and decides the language.
pub fn parse_strongs_entry(key: &str, raw: &str) -> Result<StrongsEntry> {
    let mut lines = raw.lines().skip_while(|line| line.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| VersoError::MalformedLexiconEntry(format!("{}: empty entry", key)))?;

    let header = header.trim();
    let caps = NUMBER_RE.captures(header).ok_or_else(|| {
        VersoError::MalformedLexiconEntry(format!("{}: no Strong's number in '{}'", key, header))
    })?;
    let (transcription, phonetic) = header_fields(&header[caps[0].len()..]);
    let language = StrongsLanguage::of_key(key)
        .or_else(|| caps.get(1).and_then(|m| StrongsLanguage::of_key(m.as_str())))
        .ok_or_else(|| {
            VersoError::MalformedLexiconEntry(format!("{}: cannot tell Greek from Hebrew", key))
        })?;

    let body: Vec<&str> = lines.map(str::trim).collect();
    let definition = body
        .iter()
        .filter(|line| !is_reference_line(line))
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    let mut references: Vec<StrongsReference> = Vec::new();
    for line in &body {
        for caps in REFERENCE_RE.captures_iter(line) {
            let prefix = if caps[1].eq_ignore_ascii_case("GREEK") { 'G' } else { 'H' };
            let target = format!("{}{}", prefix, &caps[2]);
            if !references.iter().any(|r| r.key == target) {
                references.push(StrongsReference {
                    text: caps[0].to_string(),
                    key: target,
                });
            }
        }
    }

    Ok(StrongsEntry {
        key: format!("{}{}", language.prefix(), &caps[2]),
        transcription,
        phonetic_transcription: phonetic,
        definition,
        references,
        raw_entry: raw.to_string(),
    })
}

/// Transcription and phonetic form from the header text after the number.
fn header_fields(rest: &str) -> (String, String) {
    let rest = rest.trim();
    if FIELD_SEPARATOR.is_match(rest) {
        let mut fields = FIELD_SEPARATOR.split(rest).filter(|field| !field.is_empty());
        let transcription = fields.next().unwrap_or_default().to_string();
        let phonetic = fields.collect::<Vec<_>>().join(" ");
        return (transcription, phonetic);
    }
    match rest.split_once(char::is_whitespace) {
        Some((transcription, phonetic)) => (transcription.to_string(), phonetic.trim().to_string()),
        None => (rest.to_string(), String::new()),
    }
}

fn is_reference_line(line: &str) -> bool {
    REFERENCE_RE
        .find(line)
        .is_some_and(|m| m.start() == 0 && m.end() == line.len())
}

/// Looks entries up in the store's Strong's lexicons.
pub struct LexiconAccessor<'a, S: ModuleStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ModuleStore + ?Sized> LexiconAccessor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn entry(&self, key: &str) -> Result<StrongsEntry> {
        let key = key.trim();
        if StrongsLanguage::of_key(key).is_none() {
            return Err(VersoError::KeyNotFound(key.to_string()));
        }
        let raw = self.store.raw_lexicon_entry(key)?;
        let entry = parse_strongs_entry(key, &raw)?;
        tracing::debug!(key, references = entry.references.len(), "parsed lexicon entry");
        Ok(entry)
    }

    pub fn available(&self, language: StrongsLanguage) -> bool {
        self.store.has_lexicon(language)
    }

    pub fn any_available(&self) -> bool {
        self.available(StrongsLanguage::Hebrew) || self.available(StrongsLanguage::Greek)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use crate::test_utils::sample_store;

    #[test]
    fn test_full_entry() {
        let store = sample_store();
        let entry = LexiconAccessor::new(&store).entry("G26").unwrap();
        assert_eq!(entry.key, "G26");
        assert_eq!(entry.transcription, "agape");
        assert_eq!(entry.phonetic_transcription, "ag-ah'-pay");
        assert!(entry.definition.starts_with("from 0025; love"));
        assert!(!entry.definition.contains("see GREEK"));
        assert_eq!(
            entry.references,
            vec![StrongsReference {
                text: "see GREEK for 0025".to_string(),
                key: "G25".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_phonetic_is_empty() {
        let store = sample_store();
        let entry = LexiconAccessor::new(&store).entry("G2316").unwrap();
        assert_eq!(entry.transcription, "theos");
        assert_eq!(entry.phonetic_transcription, "");
        assert!(entry.references.is_empty());
    }

    #[test]
    fn test_hebrew_references() {
        let store = sample_store();
        let entry = LexiconAccessor::new(&store).entry("h430").unwrap();
        assert_eq!(entry.key, "H430");
        let keys: Vec<&str> = entry.references.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["H433", "H410"]);
    }

    #[test]
    fn test_malformed_entries() {
        let store = sample_store();
        assert!(matches!(
            LexiconAccessor::new(&store).entry("G9999"),
            Err(VersoError::MalformedLexiconEntry(_))
        ));
        assert!(matches!(
            parse_strongs_entry("G1", "agape  ag-ah'-pay\n love"),
            Err(VersoError::MalformedLexiconEntry(_))
        ));
    }

    #[test]
    fn test_single_space_header() {
        let entry = parse_strongs_entry("G26", "26 agape ag-ah'-pay\n\n love.").unwrap();
        assert_eq!(entry.key, "G26");
        assert_eq!(entry.transcription, "agape");
        assert_eq!(entry.phonetic_transcription, "ag-ah'-pay");
        assert_eq!(entry.definition, "love.");

        let entry = parse_strongs_entry("H430", "0430\tel\n gods").unwrap();
        assert_eq!(entry.key, "H430");
        assert_eq!(entry.transcription, "el");
        assert_eq!(entry.phonetic_transcription, "");

        let entry = parse_strongs_entry("G2316", "G2316").unwrap();
        assert_eq!(entry.transcription, "");
        assert_eq!(entry.definition, "");
    }

    #[test]
    fn test_unknown_keys() {
        let store = sample_store();
        let lexicon = LexiconAccessor::new(&store);
        assert!(matches!(lexicon.entry("G1"), Err(VersoError::KeyNotFound(_))));
        assert!(matches!(lexicon.entry("26"), Err(VersoError::KeyNotFound(_))));
    }

    #[test]
    fn test_availability() {
        let store = sample_store();
        assert!(LexiconAccessor::new(&store).any_available());
        let empty = InMemoryStore::new();
        let lexicon = LexiconAccessor::new(&empty);
        assert!(!lexicon.any_available());
        assert!(!lexicon.available(StrongsLanguage::Greek));
    }
}
