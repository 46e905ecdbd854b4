use crate::config::InlineConfig;
use crate::error::{InlineError, InlineResult};
use crate::grammar::{PgQueryGrammar, SqlGrammar};
use crate::literal::ParamValue;
use crate::rewrite::rewrite_with;
use crate::validate::validate_with;

/// Validates statement templates and inlines their positional parameters.
///
/// Holds no per-call state: one inliner can serve any number of calls, from any
/// number of threads when the grammar allows it.
#[derive(Debug, Clone, Default)]
pub struct SqlInliner<G = PgQueryGrammar> {
    grammar: G,
    config: InlineConfig,
}

impl SqlInliner<PgQueryGrammar> {
    /// Inliner over the PostgreSQL grammar with default configuration.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G: SqlGrammar> SqlInliner<G> {
    /// Inliner over a custom grammar.
    pub fn with_grammar(grammar: G) -> Self {
        Self {
            grammar,
            config: InlineConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn config(mut self, config: InlineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn inline_config(&self) -> &InlineConfig {
        &self.config
    }

    pub fn grammar(&self) -> &G {
        &self.grammar
    }

    /// Check that `sql` is a single valid statement.
    pub fn validate(&self, sql: &str) -> InlineResult<()> {
        self.check_length(sql)?;
        validate_with(&self.grammar, sql).map_err(|e| {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                target: "pginline.sql",
                line = e.line,
                column = e.column,
                text = %e.text,
                "template rejected: {}",
                e.message
            );
            InlineError::Syntax(e)
        })
    }

    /// Substitute placeholders without validating first.
    ///
    /// Only use this on templates that already passed [`SqlInliner::validate`].
    pub fn rewrite(&self, sql: &str, values: &[ParamValue]) -> InlineResult<String> {
        self.check_length(sql)?;
        rewrite_with(&self.grammar, sql, values)
    }

    /// Validate `sql`, then substitute every placeholder with its value's literal.
    ///
    /// Either the whole statement is returned or an error; never a partially
    /// substituted string.
    pub fn inline(&self, sql: &str, values: &[ParamValue]) -> InlineResult<String> {
        self.validate(sql)?;
        let out = rewrite_with(&self.grammar, sql, values)?;
        self.log(&out, values.len());
        Ok(out)
    }

    fn check_length(&self, sql: &str) -> InlineResult<()> {
        match self.config.max_sql_length {
            Some(max) if sql.len() > max => Err(InlineError::InputTooLarge {
                len: sql.len(),
                max,
            }),
            _ => Ok(()),
        }
    }

    #[cfg(feature = "tracing")]
    fn log(&self, sql: &str, param_count: usize) {
        if !self.config.log_sql {
            return;
        }
        let sql = match self.config.max_logged_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        };
        tracing::debug!(target: "pginline.sql", param_count, sql = %sql, "inlined statement");
    }

    #[cfg(not(feature = "tracing"))]
    fn log(&self, _sql: &str, _param_count: usize) {}
}

#[cfg(feature = "tracing")]
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
