//! # Rendering
//!
//! Plain functions from records to strings, so output can be tested without a terminal.
//! Colors come from `console` and switch off by themselves when stdout is not a tty.
//!
//! The search progress line is the one piece of stateful output: it is redrawn in place on
//! stderr and cleared before results are printed.

use console::{style, Term};
use serde::Serialize;
use std::collections::BTreeMap;
use versoapp::config::VersoConfig;
use versoapp::model::{BookCode, Module, StrongsEntry, VerseRecord};

pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// One line per module: code, type, language, description. Locked modules are marked.
pub fn modules(modules: &[(Module, bool)]) -> String {
    if modules.is_empty() {
        return format!("{}\n", style("No modules installed.").dim());
    }
    let width = modules.iter().map(|(m, _)| m.code.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (module, readable) in modules {
        let lock = if *readable { "" } else { " [locked]" };
        out.push_str(&format!(
            "{} {:<10} {:<4} {}{}\n",
            style(format!("{:<width$}", module.code, width = width)).bold(),
            module.module_type,
            module.language,
            module.description,
            style(lock).red()
        ));
    }
    out
}

pub fn books(counts: &BTreeMap<BookCode, Vec<u32>>) -> String {
    let mut out = String::new();
    for (book, chapters) in counts {
        let verses: u32 = chapters.iter().sum();
        out.push_str(&format!(
            "{:<6} {:<24} {:>3} chapters {:>5} verses\n",
            style(book.osis()).cyan(),
            book.name(),
            chapters.len(),
            verses
        ));
    }
    out
}

/// Verses with their reference; a heading annotation is printed above its verse.
pub fn verses(records: &[VerseRecord]) -> String {
    let mut out = String::new();
    for record in records {
        if let Some(heading) = &record.heading {
            out.push_str(&format!("{}\n", style(heading).bold().underlined()));
        }
        out.push_str(&format!(
            "{} {}\n",
            style(record.reference()).cyan(),
            record.content.trim()
        ));
    }
    out
}

pub fn search_summary(term: &str, hits: usize) -> String {
    let noun = if hits == 1 { "verse" } else { "verses" };
    format!(
        "{}\n",
        style(format!("{} {} matching \"{}\"", hits, noun, term)).dim()
    )
}

pub fn strongs(entry: &StrongsEntry) -> String {
    let mut out = format!("{}  {}", style(&entry.key).bold(), entry.transcription);
    if !entry.phonetic_transcription.is_empty() {
        out.push_str(&format!("  {}", style(&entry.phonetic_transcription).dim()));
    }
    out.push_str("\n\n");
    out.push_str(&entry.definition);
    out.push('\n');
    if !entry.references.is_empty() {
        let keys: Vec<&str> = entry.references.iter().map(|r| r.key.as_str()).collect();
        out.push_str(&format!("\nSee also: {}\n", keys.join(", ")));
    }
    out
}

pub fn config(config: &VersoConfig, path: Option<&std::path::Path>) -> String {
    let mut out = String::new();
    if let Some(path) = path {
        out.push_str(&format!("{}\n", style(format!("# {}", path.display())).dim()));
    }
    out.push_str(&format!("module_dir = \"{}\"\n", config.module_dir().display()));
    out.push_str(&format!("progress_step = {}\n", config.progress_step()));
    out.push_str(&format!("case_sensitive = {}\n", config.case_sensitive));
    out
}

/// A single in-place progress line on stderr.
#[derive(Clone)]
pub struct ProgressLine {
    term: Term,
    label: String,
}

impl ProgressLine {
    /// `None` when stderr is not a terminal.
    pub fn new(label: impl Into<String>) -> Option<Self> {
        let term = Term::stderr();
        term.is_term().then(|| Self {
            term,
            label: label.into(),
        })
    }

    pub fn draw(&self, percent: u8) {
        let _ = self.term.clear_line();
        let _ = self.term.write_str(&format!(
            "{} {:>3}%",
            style(&self.label).dim(),
            percent
        ));
    }

    pub fn clear(&self) {
        let _ = self.term.clear_line();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use versoapp::model::{ModuleType, StrongsReference};

    fn record(book: &str, chapter: u32, verse: u32, content: &str) -> VerseRecord {
        VerseRecord {
            module: "KJV".to_string(),
            book: BookCode::from_name(book).unwrap(),
            chapter,
            verse,
            absolute: 0,
            content: content.to_string(),
            heading: None,
        }
    }

    #[test]
    fn test_verses_show_reference_and_heading() {
        console::set_colors_enabled(false);
        let mut first = record("Gen", 1, 1, "In the beginning.");
        first.heading = Some("The Creation".to_string());
        let out = verses(&[first, record("Gen", 1, 2, "And the earth. ")]);
        assert_eq!(
            out,
            "The Creation\nGen 1:1 In the beginning.\nGen 1:2 And the earth.\n"
        );
    }

    #[test]
    fn test_modules_marks_locked() {
        console::set_colors_enabled(false);
        let out = modules(&[
            (Module::new("KJV", ModuleType::Bible, "en"), true),
            (Module::new("NASB", ModuleType::Bible, "en"), false),
        ]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(!lines[0].contains("[locked]"));
        assert!(lines[1].starts_with("NASB"));
        assert!(lines[1].ends_with("[locked]"));
        assert!(modules(&[]).contains("No modules"));
    }

    #[test]
    fn test_books_sum_verses() {
        console::set_colors_enabled(false);
        let mut counts = BTreeMap::new();
        counts.insert(BookCode::from_name("John").unwrap(), vec![51, 25]);
        let out = books(&counts);
        assert!(out.contains("John"));
        assert!(out.contains("2 chapters"));
        assert!(out.contains("76 verses"));
    }

    #[test]
    fn test_strongs_lists_references() {
        console::set_colors_enabled(false);
        let entry = StrongsEntry {
            key: "G26".to_string(),
            transcription: "agape".to_string(),
            phonetic_transcription: String::new(),
            definition: "love".to_string(),
            references: vec![StrongsReference {
                text: "see GREEK for 0025".to_string(),
                key: "G25".to_string(),
            }],
            raw_entry: String::new(),
        };
        let out = strongs(&entry);
        assert!(out.starts_with("G26  agape\n\nlove\n"));
        assert!(out.ends_with("See also: G25\n"));
    }

    #[test]
    fn test_search_summary_pluralizes() {
        console::set_colors_enabled(false);
        assert_eq!(search_summary("love", 1), "1 verse matching \"love\"\n");
        assert_eq!(search_summary("love", 3), "3 verses matching \"love\"\n");
    }
}
