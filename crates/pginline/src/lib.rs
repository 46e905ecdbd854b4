//! pginline
//!
//! Turn a PostgreSQL statement template with positional placeholders (`$1`, `$2`, ...)
//! and a list of values into one literal SQL string, for engines that cannot bind
//! parameters themselves.
//!
//! The template is parsed by the PostgreSQL grammar (libpg_query) before anything
//! is substituted, and only tokens the grammar classifies as parameters are
//! replaced. Values are rendered as escaped literals, so their content can never
//! change the statement's structure.
//!
//! # Features
//!
//! - **Syntax validation**: exactly one statement, keywords in any case, first error reported
//! - **Token-level substitution**: `'$1'`, `"$1"` or `-- $1` are never touched
//! - **Typed literals**: text, integers, floats and booleans; anything else is an error
//! - **Verbatim output**: everything that is not a placeholder is copied byte for byte
//!
//! # Example
//!
//! ```
//! use pginline::{inline_sql, params};
//!
//! let sql = inline_sql(
//!     "SELECT * FROM t WHERE name = $1 AND id = $2",
//!     &params!["O'Brien", 42],
//! )
//! .unwrap();
//! assert_eq!(sql, "SELECT * FROM t WHERE name = 'O''Brien' AND id = 42");
//!
//! // Invalid SQL never reaches substitution.
//! assert!(inline_sql("SELECT * FROM (", &params![1]).unwrap_err().is_syntax_error());
//! ```

pub mod config;
pub mod error;
pub mod fold;
pub mod grammar;
pub mod inliner;
pub mod literal;
pub mod rewrite;
pub mod validate;

pub use config::InlineConfig;
pub use error::{InlineError, InlineResult, ParameterIndexError, SyntaxError};
pub use fold::{CaseFoldingSource, Position, fold_char};
pub use grammar::{PgQueryGrammar, SqlGrammar, SyntaxErrorSink, Token, TokenKind};
pub use inliner::SqlInliner;
pub use literal::{ParamValue, format_literal, quote_text};
pub use validate::FirstErrorSink;

/// Check that `sql` is a single syntactically valid PostgreSQL statement.
///
/// # Example
/// ```
/// use pginline::validate_sql;
///
/// assert!(validate_sql("select * from users where id = $1").is_ok());
///
/// let err = validate_sql("SELECT * FORM users").unwrap_err();
/// assert_eq!(err.as_syntax_error().unwrap().text, "FORM");
/// ```
pub fn validate_sql(sql: &str) -> InlineResult<()> {
    SqlInliner::new().validate(sql)
}

/// Substitute the placeholders of an already validated template.
pub fn rewrite_sql(sql: &str, values: &[ParamValue]) -> InlineResult<String> {
    SqlInliner::new().rewrite(sql, values)
}

/// Validate `sql` and substitute every placeholder with the literal of its value.
pub fn inline_sql(sql: &str, values: &[ParamValue]) -> InlineResult<String> {
    SqlInliner::new().inline(sql, values)
}
