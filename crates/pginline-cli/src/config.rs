use pginline::InlineConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "pginline.toml";
pub const DEFAULT_LOG_FILTER: &str = "pginline=debug";

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// `None` when no config file was found.
    pub config_path: Option<PathBuf>,
    pub file: ConfigFile,
}

impl ProjectConfig {
    /// Load the config named on the command line, or `pginline.toml` if it exists.
    ///
    /// An explicit path must exist; the default one is optional.
    pub fn discover(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load(path.to_path_buf()),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load(path)
                } else {
                    Ok(Self {
                        config_path: None,
                        file: ConfigFile::default(),
                    })
                }
            }
        }
    }

    pub fn load(config_path: PathBuf) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::parse(&raw).map_err(|e| {
            anyhow::anyhow!(
                "failed to parse config file {}: {e}",
                config_path.display()
            )
        })?;

        Ok(Self {
            config_path: Some(config_path),
            file,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub inline: InlineSection,
    pub log: LogSection,
}

impl ConfigFile {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let file: ConfigFile = toml::from_str(raw)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.inline.max_sql_length == Some(0) {
            anyhow::bail!("inline.max_sql_length must be greater than 0");
        }
        if let Some(filter) = &self.log.filter {
            if filter.trim().is_empty() {
                anyhow::bail!("log.filter must not be empty");
            }
        }
        Ok(())
    }

    pub fn inline_config(&self) -> InlineConfig {
        let mut config = InlineConfig::new().log_sql(self.inline.log_sql);
        if let Some(max) = self.inline.max_sql_length {
            config = config.max_sql_length(max);
        }
        match self.inline.max_logged_sql_length {
            0 => config.no_truncate(),
            max => config.max_logged_sql_length(max),
        }
    }

    pub fn log_filter(&self) -> &str {
        self.log.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InlineSection {
    /// Reject templates longer than this many bytes.
    pub max_sql_length: Option<usize>,
    pub log_sql: bool,
    /// `0` logs statements without truncation.
    pub max_logged_sql_length: usize,
}

impl Default for InlineSection {
    fn default() -> Self {
        Self {
            max_sql_length: None,
            log_sql: true,
            max_logged_sql_length: 200,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` takes precedence.
    pub filter: Option<String>,
}
