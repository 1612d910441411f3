use std::{fs, path::Path, path::PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

pub const DEFAULT_OUTPUT: &str = "transformed_data.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => bail!("unknown log format '{other}' (expected json or pretty)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub output: PathBuf,
    pub log_format: LogFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            log_format: LogFormat::default(),
        }
    }
}

/// On-disk shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    output: Option<PathBuf>,
    log_format: Option<LogFormat>,
}

impl CliConfig {
    /// Defaults, then the TOML file (if any), then `KINGCOUNTY_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        if let Some(path) = path {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            config
                .merge_toml(&raw)
                .with_context(|| format!("invalid config {}", path.display()))?;
        }
        config.merge_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn merge_toml(&mut self, raw: &str) -> Result<()> {
        let file: ConfigFile = toml::from_str(raw)?;
        if let Some(output) = file.output {
            self.output = output;
        }
        if let Some(log_format) = file.log_format {
            self.log_format = log_format;
        }
        Ok(())
    }

    fn merge_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(output) = lookup("KINGCOUNTY_OUTPUT") {
            self.output = PathBuf::from(output);
        }
        if let Some(format) = lookup("KINGCOUNTY_LOG_FORMAT") {
            self.log_format = format.parse().context("KINGCOUNTY_LOG_FORMAT")?;
        }
        Ok(())
    }
}
