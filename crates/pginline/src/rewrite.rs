//! Placeholder substitution over the token stream.

use crate::error::{InlineResult, ParameterIndexError};
use crate::grammar::{SqlGrammar, TokenKind};
use crate::literal::{ParamValue, format_literal};

/// Marker that starts every placeholder token.
const PLACEHOLDER_MARKER: char = '$';

/// Replace every placeholder token in `sql` with the literal of the value it
/// refers to, copying all other text unchanged.
///
/// `sql` is expected to have passed validation already. Placeholders may repeat
/// and appear in any order; each one is resolved against `values` on its own.
pub fn rewrite_with<G: SqlGrammar + ?Sized>(
    grammar: &G,
    sql: &str,
    values: &[ParamValue],
) -> InlineResult<String> {
    let source = grammar.fold(sql);
    let tokens = grammar.tokenize(&source)?;

    let mut out = String::with_capacity(sql.len() + values.len() * 8);
    for token in tokens {
        match token.kind {
            TokenKind::Eof => break,
            TokenKind::Text => out.push_str(token.text),
            TokenKind::Placeholder => {
                let index = parameter_index(token.text, values.len())?;
                let literal = format_literal(&values[index - 1])?;
                if needs_separator(&out, &literal) {
                    out.push(' ');
                }
                out.push_str(&literal);
            }
        }
    }

    Ok(out)
}

/// Parse the 1-based index of a placeholder token and check it against `count`.
pub fn parameter_index(text: &str, count: usize) -> Result<usize, ParameterIndexError> {
    let digits = text.strip_prefix(PLACEHOLDER_MARKER).unwrap_or(text);
    if digits.is_empty() {
        return Err(ParameterIndexError::Missing);
    }
    let index: i64 = digits.parse().map_err(|_| ParameterIndexError::Invalid {
        text: text.to_string(),
    })?;

    match usize::try_from(index) {
        Ok(i) if (1..=count).contains(&i) => Ok(i),
        _ => Err(ParameterIndexError::OutOfRange { index, count }),
    }
}

/// Whether `literal` appended right after `out` would lex differently than the
/// placeholder it replaces.
///
/// A leading `-` can merge into `--` or a longer operator. A leading `'` can turn
/// the preceding text into a string prefix (`U&'...'`, `E'...'`) or continue a
/// string that just closed.
fn needs_separator(out: &str, literal: &str) -> bool {
    let (Some(prev), Some(first)) = (out.chars().next_back(), literal.chars().next()) else {
        return false;
    };
    match first {
        '-' => is_operator_char(prev),
        '\'' => prev == '&' || prev == '\'' || is_identifier_char(prev),
        _ => false,
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || !c.is_ascii()
}

fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '<' | '>' | '=' | '~' | '!' | '@' | '#' | '%' | '^' | '&' | '|'
            | '`' | '?'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InlineError;
    use crate::grammar::PgQueryGrammar;
    use crate::params;

    fn rewrite(sql: &str, values: &[ParamValue]) -> InlineResult<String> {
        rewrite_with(&PgQueryGrammar, sql, values)
    }

    #[test]
    fn test_parameter_index() {
        assert_eq!(parameter_index("$1", 1), Ok(1));
        assert_eq!(parameter_index("$3", 5), Ok(3));
        assert_eq!(parameter_index("$", 5), Err(ParameterIndexError::Missing));
        assert_eq!(
            parameter_index("$0", 5),
            Err(ParameterIndexError::OutOfRange { index: 0, count: 5 })
        );
        assert_eq!(
            parameter_index("$6", 5),
            Err(ParameterIndexError::OutOfRange { index: 6, count: 5 })
        );
        assert_eq!(
            parameter_index("$-1", 5),
            Err(ParameterIndexError::OutOfRange { index: -1, count: 5 })
        );
        assert!(matches!(
            parameter_index("$x", 5),
            Err(ParameterIndexError::Invalid { .. })
        ));
        assert!(matches!(
            parameter_index("$99999999999999999999", 5),
            Err(ParameterIndexError::Invalid { .. })
        ));
    }

    #[test]
    fn test_rewrite_substitutes_values() {
        let sql = rewrite(
            "SELECT * FROM t WHERE name = $1 AND id = $2",
            &params!["O'Brien", 42],
        )
        .unwrap();
        assert_eq!(sql, "SELECT * FROM t WHERE name = 'O''Brien' AND id = 42");
    }

    #[test]
    fn test_rewrite_preserves_text_verbatim() {
        let sql = "select  Id,\n\t\"MiXed\" -- keep me\nFROM t /* and me */ WHERE s = 'AbC'";
        assert_eq!(rewrite(sql, &[]).unwrap(), sql);
    }

    #[test]
    fn test_rewrite_repeated_and_out_of_order() {
        let sql = rewrite("SELECT $2, $1, $2", &params![1, "b"]).unwrap();
        assert_eq!(sql, "SELECT 'b', 1, 'b'");
    }

    #[test]
    fn test_rewrite_ignores_lookalikes() {
        let sql = rewrite("SELECT '$1', $1 -- $1", &params![5]).unwrap();
        assert_eq!(sql, "SELECT '$1', 5 -- $1");
    }

    #[test]
    fn test_rewrite_out_of_range() {
        let err = rewrite("SELECT $1", &[]).unwrap_err();
        assert!(matches!(
            err,
            InlineError::ParameterIndex(ParameterIndexError::OutOfRange { index: 1, count: 0 })
        ));
    }

    #[test]
    fn test_rewrite_stops_at_first_error() {
        let err = rewrite("SELECT $1, $2", &params![ParamValue::unsupported::<()>()]).unwrap_err();
        assert!(err.is_unsupported_type());
    }

    #[test]
    fn test_rewrite_keeps_negative_literal_apart_from_operator() {
        let sql = rewrite("SELECT 1-$1", &params![-5]).unwrap();
        assert_eq!(sql, "SELECT 1- -5");
        let sql = rewrite("SELECT 1 - $1", &params![-5]).unwrap();
        assert_eq!(sql, "SELECT 1 - -5");
        let sql = rewrite("SELECT 2*$1", &params![-0.5]).unwrap();
        assert_eq!(sql, "SELECT 2* -0.5");
        let sql = rewrite("SELECT ($1)", &params![-5]).unwrap();
        assert_eq!(sql, "SELECT (-5)");
    }

    #[test]
    fn test_rewrite_keeps_string_literal_apart_from_prefix() {
        let sql = rewrite("SELECT U&$1 FROM t", &params!["abc"]).unwrap();
        assert_eq!(sql, "SELECT U& 'abc' FROM t");
        let sql = rewrite("SELECT u&$1", &params!["\\zzzz"]).unwrap();
        assert_eq!(sql, "SELECT u& '\\zzzz'");
        // Only strings are spaced out after `&`.
        let sql = rewrite("SELECT 5&$1", &params![3]).unwrap();
        assert_eq!(sql, "SELECT 5&3");
    }

    #[test]
    fn test_needs_separator() {
        assert!(needs_separator("SELECT 1-", "-5"));
        assert!(!needs_separator("SELECT (", "-5"));
        assert!(needs_separator("SELECT U&", "'a'"));
        assert!(needs_separator("SELECT E", "'a'"));
        assert!(needs_separator("SELECT 'x'", "'a'"));
        assert!(!needs_separator("SELECT ", "'a'"));
        assert!(!needs_separator("SELECT (", "'a'"));
        assert!(!needs_separator("", "'a'"));
    }

    #[test]
    fn test_rewrite_dollar_quote_body_is_not_substituted() {
        let sql = "SELECT $a$ $A$, $1, $A$ $a$";
        assert_eq!(rewrite(sql, &params!["$a$ || current_user || $a$"]).unwrap(), sql);
    }

    #[test]
    fn test_rewrite_case_folding_keeps_output_case() {
        let sql = rewrite("select ıd from T where x = $1", &params!["Ab"]).unwrap();
        assert_eq!(sql, "select ıd from T where x = 'Ab'");
    }
}
