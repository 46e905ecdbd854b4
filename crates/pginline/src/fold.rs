//! Case-folded view of SQL text.
//!
//! Keyword matching in the grammar is case-insensitive, but every byte written to
//! the output must come from the caller's text. [`CaseFoldingSource`] keeps both:
//! the grammar scans [`CaseFoldingSource::folded`], and offsets it reports are
//! mapped back onto [`CaseFoldingSource::original`] for text extraction.
//!
//! Which parts of the text may be folded is a lexical question, so the grammar
//! builds the source (see [`SqlGrammar::fold`](crate::SqlGrammar::fold)). String
//! bodies and dollar-quote tags are never folded.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// 1-based line/column of a char in the original SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    /// Counted in chars, not bytes.
    pub column: usize,
}

/// Uppercase a single char for grammar matching.
///
/// Chars whose uppercase form is not exactly one code point (`ß` -> `SS`) are
/// left alone so that folding never changes the char count.
pub fn fold_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// SQL text paired with its uppercase-folded form.
#[derive(Debug, Clone)]
pub struct CaseFoldingSource<'a> {
    original: &'a str,
    folded: String,
    /// `(folded offset, original offset)` of every char boundary, plus the end.
    boundaries: Vec<(usize, usize)>,
    /// Every folded char has the same UTF-8 width as its original.
    same_widths: bool,
}

impl<'a> CaseFoldingSource<'a> {
    /// Fold every char of `original`.
    ///
    /// Only suitable for grammars without case-sensitive quoting. SQL dollar-quote
    /// tags and escape strings are case-sensitive, so [`PgQueryGrammar`] folds
    /// keywords and bare identifiers only, through [`Self::with_folded_spans`].
    ///
    /// [`PgQueryGrammar`]: crate::PgQueryGrammar
    pub fn new(original: &'a str) -> Self {
        Self::build(original, |_, c| fold_char(c))
    }

    /// Fold only the chars inside `spans` (sorted byte ranges of `original`);
    /// everything else is copied unchanged.
    ///
    /// Inside a span a char is never folded from non-ASCII to ASCII (`ı` stays
    /// `ı`), so a folded word cannot turn into a keyword it did not spell.
    pub fn with_folded_spans(original: &'a str, spans: &[Range<usize>]) -> Self {
        let mut spans = spans.iter().peekable();
        Self::build(original, |offset, c| {
            while spans.next_if(|s| s.end <= offset).is_some() {}
            match spans.peek() {
                Some(span) if span.start <= offset => fold_word_char(c),
                _ => c,
            }
        })
    }

    /// No folding at all.
    pub fn verbatim(original: &'a str) -> Self {
        Self::with_folded_spans(original, &[])
    }

    fn build(original: &'a str, mut fold: impl FnMut(usize, char) -> char) -> Self {
        let mut folded = String::with_capacity(original.len());
        let mut boundaries = Vec::with_capacity(original.len() + 1);
        let mut same_widths = true;

        for (offset, c) in original.char_indices() {
            boundaries.push((folded.len(), offset));
            let upper = fold(offset, c);
            same_widths &= upper.len_utf8() == c.len_utf8();
            folded.push(upper);
        }
        boundaries.push((folded.len(), original.len()));

        Self {
            original,
            folded,
            boundaries,
            same_widths,
        }
    }

    /// The caller's text, untouched.
    pub fn original(&self) -> &'a str {
        self.original
    }

    /// The text the grammar scans.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Map a byte offset in the folded text to the matching offset in the original.
    ///
    /// Offsets inside a char round down to its start; offsets past the end clamp to
    /// the end.
    pub fn original_offset(&self, folded_offset: usize) -> usize {
        if self.same_widths {
            return floor_char_boundary(self.original, folded_offset);
        }
        match self
            .boundaries
            .binary_search_by_key(&folded_offset, |&(folded, _)| folded)
        {
            Ok(i) => self.boundaries[i].1,
            Err(i) => self.boundaries[i.saturating_sub(1)].1,
        }
    }

    /// Original text covered by a byte range of the folded text.
    pub fn original_slice(&self, folded: Range<usize>) -> &'a str {
        let start = self.original_offset(folded.start);
        let end = self.original_offset(folded.end).max(start);
        &self.original[start..end]
    }

    /// Line/column of a byte offset in the original text.
    pub fn position_of(&self, original_offset: usize) -> Position {
        let offset = floor_char_boundary(self.original, original_offset);
        let prefix = &self.original[..offset];
        let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
        Position {
            line: prefix.matches('\n').count() + 1,
            column: prefix[line_start..].chars().count() + 1,
        }
    }

    /// Position just past the last char.
    pub fn end_position(&self) -> Position {
        self.position_of(self.original.len())
    }
}

fn fold_word_char(c: char) -> char {
    let upper = fold_char(c);
    if upper.is_ascii() == c.is_ascii() {
        upper
    } else {
        c
    }
}

fn floor_char_boundary(s: &str, offset: usize) -> usize {
    if offset >= s.len() {
        return s.len();
    }
    let mut end = offset;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}
