//! The SQL grammar seam.
//!
//! pginline never re-implements SQL syntax. A [`SqlGrammar`] supplies the token
//! stream, the placeholder token kind, a single-statement parse, and a channel for
//! syntax errors. [`PgQueryGrammar`] is the PostgreSQL parser (via `pg_query`).

use std::ops::Range;

use pg_query::protobuf::{KeywordKind, Token as ScanTokenKind};

use crate::error::SyntaxError;
use crate::fold::{CaseFoldingSource, Position};

/// Kind of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Anything copied to the output as-is: keywords, identifiers, operators,
    /// literals, whitespace and comments.
    Text,
    /// A positional parameter such as `$1`.
    Placeholder,
    /// End of input. Always the last token, with empty text.
    Eof,
}

/// A lexical unit of the original SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Exact source text in the caller's casing.
    pub text: &'a str,
    pub position: Position,
}

/// Receives syntax errors while a statement is parsed.
pub trait SyntaxErrorSink {
    fn syntax_error(&mut self, error: SyntaxError);
}

/// A SQL grammar usable for validation and placeholder discovery.
pub trait SqlGrammar {
    /// Build the case-folded view of `sql` the other entry points work on.
    ///
    /// The default folds every char, which is only correct when case never
    /// matters inside quoted text.
    fn fold<'a>(&self, sql: &'a str) -> CaseFoldingSource<'a> {
        CaseFoldingSource::new(sql)
    }

    /// Split `source` into tokens whose texts concatenate back to the original SQL,
    /// terminated by a [`TokenKind::Eof`] token.
    fn tokenize<'a>(&self, source: &CaseFoldingSource<'a>) -> Result<Vec<Token<'a>>, SyntaxError>;

    /// Parse `source` as exactly one statement, reporting every syntax error found
    /// into `sink`.
    fn parse_single_statement(&self, source: &CaseFoldingSource<'_>, sink: &mut dyn SyntaxErrorSink);
}

/// PostgreSQL grammar backed by libpg_query.
///
/// Both entry points work on [`CaseFoldingSource::folded`]; offsets reported by
/// the scanner are mapped back onto the original text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgQueryGrammar;

/// A scanner token, as a byte range of the folded text.
#[derive(Debug, Clone)]
struct Lexeme {
    span: Range<usize>,
    placeholder: bool,
}

impl PgQueryGrammar {
    pub fn new() -> Self {
        Self
    }

    fn lex(folded: &str) -> Result<Vec<Lexeme>, pg_query::Error> {
        let scanned = pg_query::scan(folded)?;
        Ok(scanned
            .tokens
            .iter()
            .filter_map(|t| {
                let start = usize::try_from(t.start).ok()?;
                let end = usize::try_from(t.end).ok()?;
                (start < end).then(|| Lexeme {
                    span: start..end,
                    placeholder: t.token() == ScanTokenKind::Param,
                })
            })
            .collect())
    }

    /// Turn a libpg_query error message into a positioned [`SyntaxError`].
    fn locate_error(&self, source: &CaseFoldingSource<'_>, message: String) -> SyntaxError {
        if message.contains("at end of input") {
            return error_at_end(source, message);
        }

        if let Some(near) = quoted_near(&message) {
            let folded = source.folded();
            let lexemes = Self::lex(folded).unwrap_or_default();
            let candidates: Vec<&Lexeme> = lexemes
                .iter()
                .filter(|l| &folded[l.span.clone()] == near)
                .collect();

            let span = match candidates.as_slice() {
                [] => folded.find(near).map(|start| start..start + near.len()),
                [only] => Some(only.span.clone()),
                many => Some(Self::pick_failing(folded, many, &message)),
            };

            if let Some(span) = span {
                let text = source.original_slice(span.clone());
                let message = message.replacen(&format!("\"{near}\""), &format!("\"{text}\""), 1);
                return error_at_span(source, span, message);
            }
        }

        if let Some(offset) = extract_error_location(&message)
            .and_then(|pos| char_offset(source.folded(), pos.saturating_sub(1)))
        {
            return self.error_at_offset(source, offset, message);
        }

        error_at_end(source, message)
    }

    /// The same token text occurs more than once: the failing occurrence is the
    /// first one at which the statement prefix ending there reproduces the error.
    fn pick_failing(folded: &str, candidates: &[&Lexeme], message: &str) -> Range<usize> {
        for candidate in candidates {
            if let Err(e) = pg_query::parse(&folded[..candidate.span.end]) {
                if grammar_message(e) == message {
                    return candidate.span.clone();
                }
            }
        }
        candidates[0].span.clone()
    }

    /// Error pointing at the first token starting at or after a folded offset.
    fn error_at_offset(
        &self,
        source: &CaseFoldingSource<'_>,
        folded_offset: usize,
        message: String,
    ) -> SyntaxError {
        let next = Self::lex(source.folded())
            .unwrap_or_default()
            .into_iter()
            .find(|l| l.span.start >= folded_offset);
        match next {
            Some(lexeme) => error_at_span(source, lexeme.span, message),
            None => error_at_end(source, message),
        }
    }
}

impl SqlGrammar for PgQueryGrammar {
    /// Folds keywords and bare identifiers only. Strings (including `E'...'` and
    /// `U&'...'`), dollar-quote tags and quoted identifiers are case-sensitive and
    /// stay as written. Input the scanner rejects is not folded at all, so the
    /// error surfaces unchanged.
    fn fold<'a>(&self, sql: &'a str) -> CaseFoldingSource<'a> {
        let words: Vec<Range<usize>> = match pg_query::scan(sql) {
            Ok(scanned) => scanned
                .tokens
                .iter()
                .filter_map(|t| {
                    let start = usize::try_from(t.start).ok()?;
                    let end = usize::try_from(t.end).ok()?;
                    let text = sql.get(start..end)?;
                    let word = t.keyword_kind() != KeywordKind::NoKeyword
                        || (t.token() == ScanTokenKind::Ident && !text.contains('"'));
                    word.then_some(start..end)
                })
                .collect(),
            Err(_) => Vec::new(),
        };
        CaseFoldingSource::with_folded_spans(sql, &words)
    }

    fn tokenize<'a>(&self, source: &CaseFoldingSource<'a>) -> Result<Vec<Token<'a>>, SyntaxError> {
        let folded = source.folded();
        let lexemes = Self::lex(folded).map_err(|e| self.locate_error(source, grammar_message(e)))?;

        let mut tokens = Vec::with_capacity(lexemes.len() * 2 + 1);
        let mut cursor = 0usize;
        for lexeme in lexemes {
            if lexeme.span.start < cursor {
                continue;
            }
            if lexeme.span.start > cursor {
                tokens.push(token(source, cursor..lexeme.span.start, TokenKind::Text));
            }
            let kind = if lexeme.placeholder {
                TokenKind::Placeholder
            } else {
                TokenKind::Text
            };
            cursor = lexeme.span.end;
            tokens.push(token(source, lexeme.span, kind));
        }
        if cursor < folded.len() {
            tokens.push(token(source, cursor..folded.len(), TokenKind::Text));
        }
        tokens.push(Token {
            kind: TokenKind::Eof,
            text: "",
            position: source.end_position(),
        });

        Ok(tokens)
    }

    fn parse_single_statement(&self, source: &CaseFoldingSource<'_>, sink: &mut dyn SyntaxErrorSink) {
        let folded = source.folded();

        // libpg_query takes a C string.
        if let Some(nul) = folded.find('\0') {
            let start = source.original_offset(nul);
            let position = source.position_of(start);
            sink.syntax_error(SyntaxError {
                line: position.line,
                column: position.column,
                text: String::new(),
                message: "nul byte in SQL text".to_string(),
            });
            return;
        }

        match pg_query::parse(folded) {
            Ok(parsed) => {
                let stmts = &parsed.protobuf.stmts;
                if stmts.is_empty() {
                    sink.syntax_error(error_at_end(
                        source,
                        "syntax error at end of input: expected a statement".to_string(),
                    ));
                }
                for extra in stmts.iter().skip(1) {
                    let offset = usize::try_from(extra.stmt_location).unwrap_or(0);
                    sink.syntax_error(self.error_at_offset(
                        source,
                        offset,
                        "multiple statements are not supported".to_string(),
                    ));
                }
            }
            Err(e) => sink.syntax_error(self.locate_error(source, grammar_message(e))),
        }
    }
}

fn token<'a>(source: &CaseFoldingSource<'a>, span: Range<usize>, kind: TokenKind) -> Token<'a> {
    Token {
        kind,
        position: source.position_of(source.original_offset(span.start)),
        text: source.original_slice(span),
    }
}

fn error_at_span(source: &CaseFoldingSource<'_>, span: Range<usize>, message: String) -> SyntaxError {
    let position = source.position_of(source.original_offset(span.start));
    SyntaxError {
        line: position.line,
        column: position.column,
        text: source.original_slice(span).to_string(),
        message,
    }
}

fn error_at_end(source: &CaseFoldingSource<'_>, message: String) -> SyntaxError {
    let position = source.end_position();
    SyntaxError {
        line: position.line,
        column: position.column,
        text: String::new(),
        message,
    }
}

fn grammar_message(e: pg_query::Error) -> String {
    match e {
        pg_query::Error::Parse(message) => message,
        other => other.to_string(),
    }
}

/// The token text in `... at or near "TEXT"`.
fn quoted_near(message: &str) -> Option<&str> {
    const MARKER: &str = "at or near \"";
    let start = message.find(MARKER)? + MARKER.len();
    let end = message.rfind('"')?;
    (end > start).then(|| &message[start..end])
}

/// Extract error location from a parser message (`... at position N`).
fn extract_error_location(error: &str) -> Option<usize> {
    let pos = error.rfind("position ")?;
    let after_pos = &error[pos + 9..];
    let num_str: String = after_pos
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    num_str.parse().ok()
}

/// Byte offset of the `index`-th char (0-based).
fn char_offset(s: &str, index: usize) -> Option<usize> {
    s.char_indices().nth(index).map(|(offset, _)| offset)
}
