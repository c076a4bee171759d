//! # Reference Resolution
//!
//! Users address text with strings like `"Gen 1:1-3"` or `"John 3; Rom 5:1,8"`. This module
//! turns such strings into ordered lists of [`Reference`]s, one per verse.
//!
//! Resolution runs in two stages so that half-parsed input never leaks further:
//!
//! 1. [`parse_range_expression`]: pure syntax. Produces [`RangeSpec`]s or fails with
//!    [`VersoError::InvalidRange`] (bad syntax) / [`VersoError::UnknownBook`].
//! 2. [`ReferenceResolver::resolve`]: checks every parsed range against a module's
//!    [`Versification`] and expands it verse by verse.
//!
//! ## Grammar
//!
//! - **Book**: `Gen`: every verse of the book
//! - **Chapter**: `Gen 1`: every verse of the chapter
//! - **Verse**: `Gen 1:3`
//! - **Verse span**: `Gen 1:3-5`: inclusive, within chapter 1
//! - **Cross-chapter span**: `Gen 1:30-2:3`
//! - **Chapter span**: `Gen 1-2`, `Gen 1-2:3`
//! - **Lists**: `Gen 1:1,3,5-7`: later items reuse the book and, for bare numbers after a
//!   verse-level item, the chapter
//! - **Multiple ranges**: `Gen 1:1; Exod 2:3; 4:5`: a range without a book reuses the
//!   previous range's book
//!
//! ## Policy
//!
//! - Chapter or verse numbers outside the module's versification fail with
//!   [`VersoError::OutOfRange`]. Nothing is clamped and no partial result is returned.
//! - A span whose end precedes its start fails with [`VersoError::InvalidRange`]; it is never
//!   silently reversed.
//! - The combined output is in canonical ascending order with duplicates removed, no matter
//!   in which order the individual ranges were written.

use crate::error::{Result, VersoError};
use crate::model::{BookCode, Reference};
use crate::versification::Versification;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<book>(?:[1-3]\s*)?[^\d\s:;,\-][^\d:;,\-]*?)?\s*(?P<spec>\d+(?::\d+)?(?:\s*-\s*\d+(?::\d+)?)?)?$",
    )
    .expect("valid reference regex")
});

static SPEC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<c1>\d+)(?::(?P<v1>\d+))?(?:\s*-\s*(?P<a>\d+)(?::(?P<b>\d+))?)?$")
        .expect("valid span regex")
});

/// A chapter, optionally narrowed to one verse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub chapter: u32,
    pub verse: Option<u32>,
}

impl Point {
    fn chapter(chapter: u32) -> Self {
        Self {
            chapter,
            verse: None,
        }
    }

    fn verse(chapter: u32, verse: u32) -> Self {
        Self {
            chapter,
            verse: Some(verse),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    WholeBook,
    Single(Point),
    Range(Point, Point),
}

/// One syntactically valid range, not yet checked against a versification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub book: BookCode,
    pub span: Span,
}

/// Parses a reference-range expression into range specs, in the order written.
pub fn parse_range_expression(expr: &str) -> Result<Vec<RangeSpec>> {
    let mut specs = Vec::new();
    let mut last_book: Option<BookCode> = None;

    for group in expr.split(';') {
        let group = group.trim();
        if group.is_empty() {
            continue;
        }

        // Chapter of the previous item, when that item named a verse.
        let mut verse_context: Option<u32> = None;
        for (pos, item) in group.split(',').enumerate() {
            let item = item.trim();
            if item.is_empty() {
                return Err(VersoError::InvalidRange(format!("empty list item in '{}'", group)));
            }
            let caps = ITEM_RE
                .captures(item)
                .ok_or_else(|| VersoError::InvalidRange(format!("cannot parse '{}'", item)))?;

            let book = match caps.name("book").map(|m| m.as_str().trim()) {
                Some(name) if !name.is_empty() => {
                    if pos > 0 {
                        // A new book inside a list starts a fresh context.
                        verse_context = None;
                    }
                    BookCode::from_name(name)
                        .ok_or_else(|| VersoError::UnknownBook(name.to_string()))?
                }
                _ => last_book
                    .ok_or_else(|| VersoError::UnknownBook(format!("no book given in '{}'", item)))?,
            };
            last_book = Some(book);

            let span = match caps.name("spec") {
                None => Span::WholeBook,
                Some(spec) => {
                    let context = if pos > 0 { verse_context } else { None };
                    parse_span(spec.as_str(), context)?
                }
            };

            verse_context = match span {
                Span::Single(Point {
                    chapter,
                    verse: Some(_),
                }) => Some(chapter),
                Span::Range(_, end) if end.verse.is_some() => Some(end.chapter),
                _ => None,
            };
            specs.push(RangeSpec { book, span });
        }
    }

    if specs.is_empty() {
        return Err(VersoError::InvalidRange("empty reference".to_string()));
    }
    Ok(specs)
}

/// `context` is the current chapter when a bare number means a verse.
fn parse_span(spec: &str, context: Option<u32>) -> Result<Span> {
    let caps = SPEC_RE
        .captures(spec)
        .ok_or_else(|| VersoError::InvalidRange(format!("cannot parse '{}'", spec)))?;
    let num = |name: &str| -> Result<Option<u32>> {
        caps.name(name)
            .map(|m| {
                m.as_str()
                    .parse::<u32>()
                    .map_err(|_| VersoError::OutOfRange(format!("number too large: {}", m.as_str())))
            })
            .transpose()
    };

    let c1 = num("c1")?.unwrap_or_default();
    let v1 = num("v1")?;
    let a = num("a")?;
    let b = num("b")?;

    let start = match (context, v1) {
        (Some(chapter), None) => Point::verse(chapter, c1),
        (_, Some(verse)) => Point::verse(c1, verse),
        (None, None) => Point::chapter(c1),
    };

    let Some(a) = a else {
        return Ok(Span::Single(start));
    };
    let end = match b {
        Some(verse) => Point::verse(a, verse),
        // "1:3-5": a bare end after a verse is a verse of the same chapter.
        None if start.verse.is_some() => Point::verse(start.chapter, a),
        None => Point::chapter(a),
    };
    Ok(Span::Range(start, end))
}

/// Expands range expressions against one module's versification.
pub struct ReferenceResolver<'a> {
    versification: &'a Versification,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(versification: &'a Versification) -> Self {
        Self { versification }
    }

    /// Resolves an expression into canonical, de-duplicated verse references.
    pub fn resolve(&self, expr: &str) -> Result<Vec<Reference>> {
        let specs = parse_range_expression(expr)?;
        let mut by_index: BTreeMap<usize, Reference> = BTreeMap::new();
        for spec in &specs {
            for index in self.expand(spec)? {
                if !by_index.contains_key(&index) {
                    by_index.insert(index, self.versification.reference_at(index)?);
                }
            }
        }
        tracing::debug!(
            module = self.versification.module(),
            expr,
            verses = by_index.len(),
            "resolved reference range"
        );
        Ok(by_index.into_values().collect())
    }

    /// Like [`resolve`](Self::resolve), rendered as canonical strings (`Gen 1:1`).
    pub fn resolve_strings(&self, expr: &str) -> Result<Vec<String>> {
        Ok(self.resolve(expr)?.iter().map(ToString::to_string).collect())
    }

    /// Resolves an expression that must name exactly one verse.
    pub fn resolve_single(&self, expr: &str) -> Result<Reference> {
        let mut refs = self.resolve(expr)?;
        if refs.len() != 1 {
            return Err(VersoError::InvalidRange(format!(
                "'{}' names {} verses, expected one",
                expr,
                refs.len()
            )));
        }
        Ok(refs.remove(0))
    }

    /// Absolute indices covered by one parsed range, ascending.
    fn expand(&self, spec: &RangeSpec) -> Result<std::ops::Range<usize>> {
        let v = self.versification;
        if !v.has_book(spec.book) {
            return Err(VersoError::OutOfRange(format!(
                "book {} is not part of module {}",
                spec.book,
                v.module()
            )));
        }

        match spec.span {
            Span::WholeBook => v.book_span(spec.book),
            Span::Single(point) => {
                let (start, end) = self.bounds(spec.book, point)?;
                Ok(start..end)
            }
            Span::Range(from, to) => {
                let descending = to.chapter < from.chapter
                    || (to.chapter == from.chapter
                        && matches!((from.verse, to.verse), (Some(f), Some(t)) if t < f));
                if descending {
                    return Err(VersoError::InvalidRange(format!(
                        "{} range ends before it starts",
                        spec.book
                    )));
                }
                let (start, _) = self.bounds(spec.book, from)?;
                let (_, end) = self.bounds(spec.book, to)?;
                Ok(start..end.max(start))
            }
        }
    }

    /// Half-open absolute bounds of a point: one verse, or a whole chapter.
    fn bounds(&self, book: BookCode, point: Point) -> Result<(usize, usize)> {
        let v = self.versification;
        let chapters = v.chapter_count(book)?;
        if point.chapter == 0 || point.chapter > chapters {
            return Err(VersoError::OutOfRange(format!(
                "{} has {} chapters, got {}",
                book, chapters, point.chapter
            )));
        }
        match point.verse {
            None => {
                let span = v.chapter_span(book, point.chapter)?;
                Ok((span.start, span.end))
            }
            Some(verse) => {
                let verses = v.verse_count(book, point.chapter)?;
                if verse == 0 || verse > verses {
                    return Err(VersoError::OutOfRange(format!(
                        "{} {} has {} verses, got {}",
                        book, point.chapter, verses, verse
                    )));
                }
                let index = v.to_absolute(book, point.chapter, verse)?;
                Ok((index, index + 1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(name: &str) -> BookCode {
        BookCode::from_name(name).unwrap()
    }

    fn versification() -> Versification {
        Versification::new(
            "TEST",
            vec![
                (b("Gen"), vec![5, 3, 4]),
                (b("1John"), vec![2, 2]),
                (b("John"), vec![3]),
            ],
        )
    }

    fn resolve(expr: &str) -> Result<Vec<String>> {
        let v = versification();
        ReferenceResolver::new(&v).resolve_strings(expr)
    }

    #[test]
    fn test_parse_forms() {
        let gen = b("Gen");
        assert_eq!(
            parse_range_expression("Gen").unwrap(),
            vec![RangeSpec {
                book: gen,
                span: Span::WholeBook
            }]
        );
        assert_eq!(
            parse_range_expression("Genesis 2").unwrap()[0].span,
            Span::Single(Point::chapter(2))
        );
        assert_eq!(
            parse_range_expression("Gen 1:3-5").unwrap()[0].span,
            Span::Range(Point::verse(1, 3), Point::verse(1, 5))
        );
        assert_eq!(
            parse_range_expression("Gen 1:3-2:1").unwrap()[0].span,
            Span::Range(Point::verse(1, 3), Point::verse(2, 1))
        );
        assert_eq!(
            parse_range_expression("Gen 1-2").unwrap()[0].span,
            Span::Range(Point::chapter(1), Point::chapter(2))
        );
        assert_eq!(
            parse_range_expression("1 John 2:1").unwrap()[0].book,
            b("1John")
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_range_expression("Hezekiah 1:1"),
            Err(VersoError::UnknownBook(_))
        ));
        assert!(matches!(
            parse_range_expression("1:1"),
            Err(VersoError::UnknownBook(_))
        ));
        assert!(matches!(
            parse_range_expression(""),
            Err(VersoError::InvalidRange(_))
        ));
        assert!(matches!(
            parse_range_expression("Gen 1:1x"),
            Err(VersoError::InvalidRange(_))
        ));
        assert!(matches!(
            parse_range_expression("Gen 1:1,,2"),
            Err(VersoError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_verse_span() {
        assert_eq!(
            resolve("Genesis 1:1-3").unwrap(),
            vec!["Gen 1:1", "Gen 1:2", "Gen 1:3"]
        );
    }

    #[test]
    fn test_chapter_expands_to_all_verses() {
        assert_eq!(
            resolve("Gen 2").unwrap(),
            vec!["Gen 2:1", "Gen 2:2", "Gen 2:3"]
        );
    }

    #[test]
    fn test_cross_chapter_span() {
        assert_eq!(
            resolve("Gen 1:4-2:2").unwrap(),
            vec!["Gen 1:4", "Gen 1:5", "Gen 2:1", "Gen 2:2"]
        );
        assert_eq!(resolve("Gen 2-3").unwrap().len(), 7);
        assert_eq!(resolve("Gen 2-3:1").unwrap().len(), 4);
    }

    #[test]
    fn test_whole_book() {
        assert_eq!(resolve("1 John").unwrap().len(), 4);
    }

    #[test]
    fn test_lists_and_multiple_ranges() {
        assert_eq!(
            resolve("Gen 1:1,3,5").unwrap(),
            vec!["Gen 1:1", "Gen 1:3", "Gen 1:5"]
        );
        assert_eq!(
            resolve("Gen 1:1; 2:2").unwrap(),
            vec!["Gen 1:1", "Gen 2:2"]
        );
        assert_eq!(
            resolve("Gen 1:2, 3:1-2").unwrap(),
            vec!["Gen 1:2", "Gen 3:1", "Gen 3:2"]
        );
    }

    #[test]
    fn test_output_is_canonical_and_deduplicated() {
        assert_eq!(
            resolve("John 1:1; Gen 1:2; Gen 1:1-2").unwrap(),
            vec!["Gen 1:1", "Gen 1:2", "John 1:1"]
        );
    }

    #[test]
    fn test_out_of_range() {
        for expr in ["Gen 1:999", "Gen 4", "Gen 0", "Gen 1:0", "Gen 1:1-9", "Exod 1:1"] {
            assert!(
                matches!(resolve(expr), Err(VersoError::OutOfRange(_))),
                "{} should be out of range",
                expr
            );
        }
    }

    #[test]
    fn test_descending_range_is_rejected() {
        assert!(matches!(
            resolve("Gen 1:3-1"),
            Err(VersoError::InvalidRange(_))
        ));
        assert!(matches!(
            resolve("Gen 3-1"),
            Err(VersoError::InvalidRange(_))
        ));
        assert!(matches!(
            resolve("Gen 2:1-1:5"),
            Err(VersoError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_output_round_trips_through_resolver() {
        let v = versification();
        let resolver = ReferenceResolver::new(&v);
        for reference in resolver.resolve("Gen 1-3").unwrap() {
            let again = resolver.resolve_single(&reference.to_string()).unwrap();
            assert_eq!(again, reference);
        }
    }

    #[test]
    fn test_resolve_single_rejects_ranges() {
        let v = versification();
        let resolver = ReferenceResolver::new(&v);
        assert_eq!(resolver.resolve_single("John 1:2").unwrap().absolute, 13);
        assert!(matches!(
            resolver.resolve_single("John 1"),
            Err(VersoError::InvalidRange(_))
        ));
    }
}
