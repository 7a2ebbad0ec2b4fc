use std::path::Path;

use dumpguard_core::config::ValidatorConfigBuilder;
use dumpguard_core::utils::date_parser::parse_timestamp;
use dumpguard_core::{ConfigError, ValidatorConfig};
use serde::Deserialize;

use crate::errors::CliError;

/// Optional overrides read from a TOML file.
///
/// ```toml
/// window_start = "2024-12-02 19:00:00+00:00"
/// window_end = "2024-12-03 19:00:00+00:00"
/// date_tag = "20241204"
/// source_tag = "jti_vita-ploom"
/// databases = ["online", "offline"]
/// environments = ["PRD", "QA", "DEV"]
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub window_start: Option<String>,
    pub window_end: Option<String>,
    pub date_tag: Option<String>,
    pub source_tag: Option<String>,
    pub databases: Option<Vec<String>>,
    pub environments: Option<Vec<String>>,
}

impl Config {
    pub fn into_validator_config(self) -> Result<ValidatorConfig, CliError> {
        let mut builder = ValidatorConfigBuilder::new();
        if let Some(start) = self.window_start {
            builder = builder.window_start(timestamp(&start)?);
        }
        if let Some(end) = self.window_end {
            builder = builder.window_end(timestamp(&end)?);
        }
        if let Some(tag) = self.date_tag {
            builder = builder.date_tag(tag);
        }
        if let Some(tag) = self.source_tag {
            builder = builder.source_tag(tag);
        }
        if let Some(databases) = self.databases {
            builder = builder.databases(databases);
        }
        if let Some(environments) = self.environments {
            builder = builder.environments(environments);
        }
        Ok(builder.build()?)
    }
}

fn timestamp(value: &str) -> Result<chrono::DateTime<chrono::Utc>, CliError> {
    parse_timestamp(value).ok_or_else(|| ConfigError::InvalidTimestamp(value.to_string()).into())
}

pub fn config_from_str(content: &str, path: &str) -> Result<Config, CliError> {
    toml::from_str(content).map_err(|e| CliError::ConfigParse {
        path: path.to_string(),
        message: e.message().to_string(),
    })
}

/// Load the run configuration, falling back to the built-in defaults.
pub fn parse_config(path: Option<&Path>) -> Result<ValidatorConfig, CliError> {
    let Some(path) = path else {
        return Ok(ValidatorConfig::default());
    };
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: display.clone(),
        source,
    })?;
    config_from_str(&content, &display)?.into_validator_config()
}
