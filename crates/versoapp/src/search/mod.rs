//! # Search
//!
//! Full-module scans for a phrase, a set of words or a Strong's number. A scan runs on its
//! own worker thread and is driven through a [`SearchHandle`]:
//!
//! ```text
//!   start ──► Running ──► Completed(records)
//!                 │
//!                 ├──► Cancelled          (cancel() observed between verses)
//!                 └──► Failed(cause)      (store read failed mid-scan)
//! ```
//!
//! Everything that can be checked before the scan starts is checked synchronously by
//! [`SearchEngine::start`], which then returns an error instead of a handle: unknown or
//! unreadable module, dictionary module, or a Strong's query against a module without
//! annotations.
//!
//! ## Concurrency
//!
//! - One engine runs at most one search at a time. Starting another while the first is
//!   still running fails with [`VersoError::OperationInProgress`](crate::error::VersoError).
//!   Once the first reaches a terminal state the engine accepts a new one.
//! - Scans of the same module are serialized across all engines that share a
//!   [`ScanLocks`] registry. Different modules scan in parallel.
//! - Cancellation is cooperative: the worker checks the flag before each verse, so a cancel
//!   takes effect within one verse read.
//!
//! ## Progress
//!
//! The optional callback receives whole percentages. Reports never go down, are spaced at
//! least `progress_step` points apart, and the last report of a successful scan is exactly
//! 100. Nothing is reported after a scan ends in `Cancelled` or `Failed`.
//!
//! ## Results
//!
//! Matching verses come back ascending by absolute index. With `extended_boundaries`, each
//! match also pulls in its neighbours within the same chapter. A verse is never returned
//! twice, even when it is both a match and a neighbour.

mod engine;
mod matcher;
mod operation;

pub use engine::{ProgressCallback, SearchEngine};
pub use operation::{OperationStatus, ScanLocks, SearchCanceller, SearchHandle, SearchOutcome};

use crate::model::Testament;
use crate::versification::Versification;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchMode {
    /// The normalized query occurs as a contiguous substring.
    #[default]
    Phrase,
    /// Every whitespace-separated token occurs somewhere in the verse, in any order.
    ///
    /// Tokens match inside words, like phrases do: `love` finds "loved" and `god` finds
    /// "ungodly".
    MultiWord,
    /// The verse is annotated with this Strong's number. Spellings are normalized, so `g26`,
    /// `G026` and `G26` are the same key, while `G260` is a different one.
    StrongsNumber,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SearchMode::Phrase => "phrase",
            SearchMode::MultiWord => "multi-word",
            SearchMode::StrongsNumber => "strongs",
        };
        f.write_str(label)
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "phrase" => Ok(SearchMode::Phrase),
            "multi-word" | "multiword" | "words" => Ok(SearchMode::MultiWord),
            "strongs" | "strongsnumber" | "strongs-number" => Ok(SearchMode::StrongsNumber),
            other => Err(format!("unknown search mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchScope {
    #[default]
    Module,
    OldTestament,
    NewTestament,
}

impl SearchScope {
    /// Absolute indices the scope covers in a module.
    pub fn span(self, versification: &Versification) -> Range<usize> {
        match self {
            SearchScope::Module => 0..versification.total_verses(),
            SearchScope::OldTestament => versification.testament_span(Testament::Old),
            SearchScope::NewTestament => versification.testament_span(Testament::New),
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SearchScope::Module => "module",
            SearchScope::OldTestament => "ot",
            SearchScope::NewTestament => "nt",
        };
        f.write_str(label)
    }
}

impl FromStr for SearchScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "module" | "all" => Ok(SearchScope::Module),
            "ot" | "old" | "oldtestament" => Ok(SearchScope::OldTestament),
            "nt" | "new" | "newtestament" => Ok(SearchScope::NewTestament),
            other => Err(format!("unknown search scope: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub term: String,
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default)]
    pub scope: SearchScope,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub extended_boundaries: bool,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            term: term.into(),
            mode,
            scope: SearchScope::default(),
            case_sensitive: false,
            extended_boundaries: false,
        }
    }

    pub fn phrase(term: impl Into<String>) -> Self {
        Self::new(term, SearchMode::Phrase)
    }

    pub fn multi_word(term: impl Into<String>) -> Self {
        Self::new(term, SearchMode::MultiWord)
    }

    pub fn strongs(key: impl Into<String>) -> Self {
        Self::new(key, SearchMode::StrongsNumber)
    }

    pub fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn extended(mut self, extended_boundaries: bool) -> Self {
        self.extended_boundaries = extended_boundaries;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookCode;

    fn b(name: &str) -> BookCode {
        BookCode::from_name(name).unwrap()
    }

    #[test]
    fn test_scope_spans() {
        let v = Versification::new("T", vec![(b("Gen"), vec![3, 2]), (b("Matt"), vec![4])]);
        assert_eq!(SearchScope::Module.span(&v), 0..9);
        assert_eq!(SearchScope::OldTestament.span(&v), 0..5);
        assert_eq!(SearchScope::NewTestament.span(&v), 5..9);
    }

    #[test]
    fn test_scope_without_new_testament_is_empty() {
        let v = Versification::new("T", vec![(b("Gen"), vec![3])]);
        assert!(SearchScope::NewTestament.span(&v).is_empty());
    }

    #[test]
    fn test_mode_and_scope_parse() {
        assert_eq!("multi-word".parse::<SearchMode>().unwrap(), SearchMode::MultiWord);
        assert_eq!("Strongs".parse::<SearchMode>().unwrap(), SearchMode::StrongsNumber);
        assert_eq!("NT".parse::<SearchScope>().unwrap(), SearchScope::NewTestament);
        assert!("regex".parse::<SearchMode>().is_err());
    }

    #[test]
    fn test_query_deserializes_with_defaults() {
        let query: SearchQuery = serde_json::from_str(r#"{"term": "love"}"#).unwrap();
        assert_eq!(query, SearchQuery::phrase("love"));
        let query: SearchQuery =
            serde_json::from_str(r#"{"term": "G26", "mode": "strongsNumber", "scope": "newTestament"}"#)
                .unwrap();
        assert_eq!(query.mode, SearchMode::StrongsNumber);
        assert_eq!(query.scope, SearchScope::NewTestament);
    }
}
