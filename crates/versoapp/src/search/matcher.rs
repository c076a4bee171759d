use super::{SearchMode, SearchQuery};
use crate::model::{canonical_strongs_key, StrongsKeys};

/// Collapses whitespace runs to one space and, unless case matters, folds case.
pub(crate) fn normalize(text: &str, case_sensitive: bool) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if case_sensitive {
        collapsed
    } else {
        collapsed.to_lowercase()
    }
}

/// A query compiled once per scan.
#[derive(Debug, Clone)]
pub(crate) enum Matcher {
    Phrase { needle: String, case_sensitive: bool },
    Words { tokens: Vec<String>, case_sensitive: bool },
    Strongs { key: String },
}

impl Matcher {
    pub(crate) fn new(query: &SearchQuery) -> Self {
        let case_sensitive = query.case_sensitive;
        match query.mode {
            SearchMode::Phrase => Matcher::Phrase {
                needle: normalize(&query.term, case_sensitive),
                case_sensitive,
            },
            SearchMode::MultiWord => Matcher::Words {
                tokens: normalize(&query.term, case_sensitive)
                    .split(' ')
                    .filter(|token| !token.is_empty())
                    .map(str::to_string)
                    .collect(),
                case_sensitive,
            },
            SearchMode::StrongsNumber => Matcher::Strongs {
                key: canonical_strongs_key(&query.term),
            },
        }
    }

    pub(crate) fn needs_annotations(&self) -> bool {
        matches!(self, Matcher::Strongs { .. })
    }

    /// An empty query matches nothing.
    pub(crate) fn matches_text(&self, text: &str) -> bool {
        match self {
            Matcher::Phrase {
                needle,
                case_sensitive,
            } => !needle.is_empty() && normalize(text, *case_sensitive).contains(needle.as_str()),
            Matcher::Words {
                tokens,
                case_sensitive,
            } => {
                if tokens.is_empty() {
                    return false;
                }
                let haystack = normalize(text, *case_sensitive);
                tokens.iter().all(|token| haystack.contains(token.as_str()))
            }
            Matcher::Strongs { .. } => false,
        }
    }

    pub(crate) fn matches_annotations(&self, keys: &StrongsKeys) -> bool {
        match self {
            Matcher::Strongs { key } => {
                !key.is_empty() && keys.iter().any(|k| canonical_strongs_key(k) == *key)
            }
            _ => false,
        }
    }
}
