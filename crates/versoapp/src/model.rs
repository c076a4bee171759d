//! # Domain Model
//!
//! Core value types shared by every layer: [`Module`], [`BookCode`], [`Reference`],
//! [`VerseRecord`] and the lexicon records [`StrongsEntry`] / [`StrongsReference`].
//!
//! ## Books and Canonical Order
//!
//! A Bible-type module may contain any subset of a fixed set of 66 books. Each book is
//! identified by its OSIS short code (`Gen`, `1Sam`, `Matt`, ...). [`BookCode`] is a small
//! `Copy` handle into that fixed table, and its `Ord` implementation *is* the canonical order:
//! Old Testament books first, New Testament books from [`NT_BOUNDARY`] onward.
//!
//! Book names are looked up leniently: case is ignored, as are spaces and dots, so
//! `"1 Samuel"`, `"1sam"` and `"1Sam."` all resolve to the same code.
//!
//! ## Module Types
//!
//! [`ModuleType`] is a closed set. Behaviour that differs by type (does the module have a
//! versification? is it keyed by dictionary entries?) is expressed as methods on the enum,
//! so callers match on the tag instead of relying on dynamic dispatch.
//!
//! ## Ordering of Verse Records
//!
//! A [`VerseRecord`] always carries its module-wide absolute verse index. Records of the same
//! module order by that index; see [`crate::versification`] for how it is computed.

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

struct BookInfo {
    osis: &'static str,
    name: &'static str,
    aliases: &'static [&'static str],
}

const fn book(
    osis: &'static str,
    name: &'static str,
    aliases: &'static [&'static str],
) -> BookInfo {
    BookInfo {
        osis,
        name,
        aliases,
    }
}

// Aliases are stored pre-normalized (lowercase, no spaces or dots).
static BOOKS: [BookInfo; 66] = [
    book("Gen", "Genesis", &["gn", "ge"]),
    book("Exod", "Exodus", &["ex", "exo"]),
    book("Lev", "Leviticus", &["lv", "le"]),
    book("Num", "Numbers", &["nm", "nu"]),
    book("Deut", "Deuteronomy", &["dt", "deu"]),
    book("Josh", "Joshua", &["jos", "jsh"]),
    book("Judg", "Judges", &["jdg", "jg"]),
    book("Ruth", "Ruth", &["rth", "ru"]),
    book("1Sam", "1 Samuel", &["1sa", "1sm"]),
    book("2Sam", "2 Samuel", &["2sa", "2sm"]),
    book("1Kgs", "1 Kings", &["1ki", "1kin"]),
    book("2Kgs", "2 Kings", &["2ki", "2kin"]),
    book("1Chr", "1 Chronicles", &["1ch", "1chron"]),
    book("2Chr", "2 Chronicles", &["2ch", "2chron"]),
    book("Ezra", "Ezra", &["ezr"]),
    book("Neh", "Nehemiah", &["ne"]),
    book("Esth", "Esther", &["est", "es"]),
    book("Job", "Job", &["jb"]),
    book("Ps", "Psalms", &["psalm", "psa", "pss"]),
    book("Prov", "Proverbs", &["pr", "prv", "pro"]),
    book("Eccl", "Ecclesiastes", &["ecc", "qoh"]),
    book("Song", "Song of Solomon", &["songofsongs", "sos", "canticles"]),
    book("Isa", "Isaiah", &["is"]),
    book("Jer", "Jeremiah", &["je", "jr"]),
    book("Lam", "Lamentations", &["la"]),
    book("Ezek", "Ezekiel", &["eze", "ezk"]),
    book("Dan", "Daniel", &["da", "dn"]),
    book("Hos", "Hosea", &["ho"]),
    book("Joel", "Joel", &["jl"]),
    book("Amos", "Amos", &["am"]),
    book("Obad", "Obadiah", &["ob", "oba"]),
    book("Jonah", "Jonah", &["jon", "jnh"]),
    book("Mic", "Micah", &["mi"]),
    book("Nah", "Nahum", &["na"]),
    book("Hab", "Habakkuk", &["hb"]),
    book("Zeph", "Zephaniah", &["zep", "zp"]),
    book("Hag", "Haggai", &["hg"]),
    book("Zech", "Zechariah", &["zec", "zc"]),
    book("Mal", "Malachi", &["ml"]),
    book("Matt", "Matthew", &["mt", "mat"]),
    book("Mark", "Mark", &["mk", "mar", "mrk"]),
    book("Luke", "Luke", &["lk", "luk"]),
    book("John", "John", &["jn", "jhn", "joh"]),
    book("Acts", "Acts", &["ac", "act"]),
    book("Rom", "Romans", &["ro", "rm"]),
    book("1Cor", "1 Corinthians", &["1co"]),
    book("2Cor", "2 Corinthians", &["2co"]),
    book("Gal", "Galatians", &["ga"]),
    book("Eph", "Ephesians", &["ep"]),
    book("Phil", "Philippians", &["php", "pp"]),
    book("Col", "Colossians", &["co"]),
    book("1Thess", "1 Thessalonians", &["1th", "1thes"]),
    book("2Thess", "2 Thessalonians", &["2th", "2thes"]),
    book("1Tim", "1 Timothy", &["1ti", "1tm"]),
    book("2Tim", "2 Timothy", &["2ti", "2tm"]),
    book("Titus", "Titus", &["tit", "ti"]),
    book("Phlm", "Philemon", &["phm", "philem"]),
    book("Heb", "Hebrews", &["he"]),
    book("Jas", "James", &["jm", "jam"]),
    book("1Pet", "1 Peter", &["1pe", "1pt"]),
    book("2Pet", "2 Peter", &["2pe", "2pt"]),
    book("1John", "1 John", &["1jn", "1jo"]),
    book("2John", "2 John", &["2jn", "2jo"]),
    book("3John", "3 John", &["3jn", "3jo"]),
    book("Jude", "Jude", &["jud", "jde"]),
    book("Rev", "Revelation", &["re", "rv", "apocalypse"]),
];

/// Ordinal of the first New Testament book (Matthew) in canonical order.
pub const NT_BOUNDARY: u8 = 39;

static BOOK_LOOKUP: Lazy<HashMap<String, BookCode>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (idx, info) in BOOKS.iter().enumerate() {
        let code = BookCode(idx as u8);
        map.insert(normalize_book_name(info.osis), code);
        map.insert(normalize_book_name(info.name), code);
        for alias in info.aliases {
            map.insert((*alias).to_string(), code);
        }
    }
    map
});

fn normalize_book_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Testament {
    Old,
    New,
}

/// Canonical identifier of one of the 66 books. Ordering is canonical order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookCode(u8);

impl BookCode {
    /// Looks a book up by OSIS code, full English name or a common abbreviation.
    pub fn from_name(name: &str) -> Option<BookCode> {
        BOOK_LOOKUP.get(&normalize_book_name(name)).copied()
    }

    pub fn from_ordinal(ordinal: u8) -> Option<BookCode> {
        ((ordinal as usize) < BOOKS.len()).then_some(BookCode(ordinal))
    }

    /// Every book in canonical order.
    pub fn all() -> impl Iterator<Item = BookCode> {
        (0..BOOKS.len() as u8).map(BookCode)
    }

    pub fn ordinal(self) -> u8 {
        self.0
    }

    pub fn osis(self) -> &'static str {
        BOOKS[self.0 as usize].osis
    }

    pub fn name(self) -> &'static str {
        BOOKS[self.0 as usize].name
    }

    pub fn testament(self) -> Testament {
        if self.0 < NT_BOUNDARY {
            Testament::Old
        } else {
            Testament::New
        }
    }
}

impl fmt::Debug for BookCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BookCode({})", self.osis())
    }
}

impl fmt::Display for BookCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.osis())
    }
}

impl FromStr for BookCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookCode::from_name(s).ok_or_else(|| format!("Unknown book: {}", s))
    }
}

impl Serialize for BookCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.osis())
    }
}

impl<'de> Deserialize<'de> for BookCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Bible,
    #[serde(alias = "dict")]
    Dictionary,
    Commentary,
}

impl ModuleType {
    /// Bible and commentary modules are addressed by book/chapter/verse.
    pub fn is_versified(self) -> bool {
        match self {
            ModuleType::Bible | ModuleType::Commentary => true,
            ModuleType::Dictionary => false,
        }
    }

    /// Dictionary modules are addressed by entry key.
    pub fn is_keyed(self) -> bool {
        matches!(self, ModuleType::Dictionary)
    }

    pub fn label(self) -> &'static str {
        match self {
            ModuleType::Bible => "bible",
            ModuleType::Dictionary => "dictionary",
            ModuleType::Commentary => "commentary",
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ModuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bible" => Ok(ModuleType::Bible),
            "dict" | "dictionary" => Ok(ModuleType::Dictionary),
            "commentary" => Ok(ModuleType::Commentary),
            other => Err(format!("Unknown module type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleFlags {
    pub has_strongs: bool,
    pub has_footnotes: bool,
    pub has_headings: bool,
    pub has_cross_references: bool,
    pub is_right_to_left: bool,
    pub has_greek_strongs_keys: bool,
    pub has_hebrew_strongs_keys: bool,
}

/// Metadata of one text collection. Owned by the module store; this crate only
/// refers to modules by `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub code: String,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    pub language: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub flags: ModuleFlags,
}

impl Module {
    pub fn new(code: impl Into<String>, module_type: ModuleType, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            module_type,
            language: language.into(),
            description: String::new(),
            flags: ModuleFlags::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_flags(mut self, flags: ModuleFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Which Strong's lexicon a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrongsLanguage {
    Hebrew,
    Greek,
}

impl StrongsLanguage {
    /// `H…` keys are Hebrew, `G…` keys are Greek.
    pub fn of_key(key: &str) -> Option<StrongsLanguage> {
        match key.trim().chars().next()?.to_ascii_uppercase() {
            'H' => Some(StrongsLanguage::Hebrew),
            'G' => Some(StrongsLanguage::Greek),
            _ => None,
        }
    }

    pub fn prefix(self) -> char {
        match self {
            StrongsLanguage::Hebrew => 'H',
            StrongsLanguage::Greek => 'G',
        }
    }
}

/// One spelling per Strong's number: `g0026`, `G26` and `G00026` all become `G26`.
///
/// Anything that is not a language letter followed by digits is only trimmed and uppercased.
pub fn canonical_strongs_key(key: &str) -> String {
    let key = key.trim();
    let digits = key.get(1..).unwrap_or_default();
    match StrongsLanguage::of_key(key) {
        Some(language) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            let number = digits.trim_start_matches('0');
            let number = if number.is_empty() { "0" } else { number };
            format!("{}{}", language.prefix(), number)
        }
        _ => key.to_ascii_uppercase(),
    }
}

/// A single resolved coordinate inside a module.
///
/// Only built by the versification model (through the resolver or content accessor),
/// so chapter and verse are always in range for `module`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Reference {
    pub module: String,
    pub book: BookCode,
    pub chapter: u32,
    pub verse: u32,
    pub absolute: usize,
}

impl Reference {
    pub(crate) fn new(module: &str, book: BookCode, chapter: u32, verse: u32, absolute: usize) -> Self {
        Self {
            module: module.to_string(),
            book,
            chapter,
            verse,
            absolute,
        }
    }
}

/// Canonical reference string, e.g. `Gen 1:1`. The resolver accepts this form back.
impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book.osis(), self.chapter, self.verse)
    }
}

impl PartialOrd for Reference {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Reference {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (&self.module, self.absolute).cmp(&(&other.module, other.absolute))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseRecord {
    pub module: String,
    pub book: BookCode,
    pub chapter: u32,
    pub verse: u32,
    pub absolute: usize,
    pub content: String,
    /// Section heading attached before this verse, when the module has headings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
}

impl VerseRecord {
    pub fn reference(&self) -> Reference {
        Reference::new(&self.module, self.book, self.chapter, self.verse, self.absolute)
    }
}

impl fmt::Display for VerseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{} {}",
            self.book.osis(),
            self.chapter,
            self.verse,
            self.content
        )
    }
}

/// Strong's annotation keys attached to one verse.
pub type StrongsKeys = BTreeSet<String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrongsReference {
    /// The mention as it appears in the entry, e.g. `see GREEK for 0025`.
    pub text: String,
    /// Normalized target key, e.g. `G25`.
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrongsEntry {
    pub key: String,
    pub transcription: String,
    pub phonetic_transcription: String,
    pub definition: String,
    pub references: Vec<StrongsReference>,
    pub raw_entry: String,
}
