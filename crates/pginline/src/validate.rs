//! Syntax validation of a statement template.

use crate::error::SyntaxError;
use crate::grammar::{SqlGrammar, SyntaxErrorSink};

/// Keeps the first syntax error reported during a parse and ignores the rest.
#[derive(Debug, Default)]
pub struct FirstErrorSink {
    error: Option<SyntaxError>,
}

impl FirstErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&SyntaxError> {
        self.error.as_ref()
    }

    pub fn into_result(self) -> Result<(), SyntaxError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl SyntaxErrorSink for FirstErrorSink {
    fn syntax_error(&mut self, error: SyntaxError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

/// Check that `sql` is exactly one syntactically valid statement.
///
/// Keywords match regardless of case. Only syntax is checked; unknown tables or
/// columns are left to the server.
pub fn validate_with<G: SqlGrammar + ?Sized>(grammar: &G, sql: &str) -> Result<(), SyntaxError> {
    let source = grammar.fold(sql);
    let mut sink = FirstErrorSink::new();
    grammar.parse_single_statement(&source, &mut sink);
    sink.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::PgQueryGrammar;

    fn err(line: usize, column: usize, text: &str) -> SyntaxError {
        SyntaxError {
            line,
            column,
            text: text.to_string(),
            message: String::new(),
        }
    }

    #[test]
    fn test_first_error_wins() {
        let mut sink = FirstErrorSink::new();
        sink.syntax_error(err(1, 5, "a"));
        sink.syntax_error(err(2, 1, "b"));
        assert_eq!(sink.error().map(|e| e.text.as_str()), Some("a"));
        assert_eq!(sink.into_result().unwrap_err().line, 1);
    }

    #[test]
    fn test_empty_sink_is_ok() {
        assert!(FirstErrorSink::new().into_result().is_ok());
    }

    #[test]
    fn test_validate_is_case_insensitive() {
        for sql in [
            "SELECT id FROM users WHERE id = $1",
            "select id from users where id = $1",
            "Select Id From Users Where Id = $1",
        ] {
            assert!(validate_with(&PgQueryGrammar, sql).is_ok(), "{sql}");
        }
    }

    #[test]
    fn test_validate_ignores_semantics() {
        assert!(validate_with(&PgQueryGrammar, "SELECT no_such_column FROM no_such_table").is_ok());
    }

    #[test]
    fn test_validate_keeps_first_of_many_statements() {
        let e = validate_with(&PgQueryGrammar, "SELECT 1; SELECT 2; SELECT 3").unwrap_err();
        assert_eq!(e.column, 11);
    }

    #[test]
    fn test_validate_rejects_unbalanced_parenthesis() {
        let e = validate_with(&PgQueryGrammar, "SELECT * FROM (").unwrap_err();
        assert_eq!(e.text, "");
        assert_eq!(e.line, 1);
    }
}
