/// Configuration for [`SqlInliner`](crate::SqlInliner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineConfig {
    /// Reject templates longer than this many bytes before scanning them.
    pub max_sql_length: Option<usize>,
    /// Emit the inlined SQL as a `pginline.sql` debug event.
    pub log_sql: bool,
    /// Truncate logged SQL (in bytes). `None` means no truncation.
    pub max_logged_sql_length: Option<usize>,
}

impl Default for InlineConfig {
    fn default() -> Self {
        Self {
            max_sql_length: None,
            log_sql: true,
            max_logged_sql_length: Some(200),
        }
    }
}

impl InlineConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject templates longer than `len` bytes.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Accept templates of any length.
    pub fn unlimited(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Enable or disable logging of the inlined SQL.
    pub fn log_sql(mut self, enabled: bool) -> Self {
        self.log_sql = enabled;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_logged_sql_length(mut self, len: usize) -> Self {
        self.max_logged_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_logged_sql_length = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = InlineConfig::new()
            .max_sql_length(4096)
            .log_sql(false)
            .no_truncate();
        assert_eq!(config.max_sql_length, Some(4096));
        assert!(!config.log_sql);
        assert_eq!(config.max_logged_sql_length, None);

        let config = config.unlimited().max_logged_sql_length(80);
        assert_eq!(config.max_sql_length, None);
        assert_eq!(config.max_logged_sql_length, Some(80));
    }
}
