use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};

use crate::errors::ConfigError;

/// ETL export mode of a dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EtlMode {
    /// Daily delta export, checked against the freshness window
    Delta,
    /// Full snapshot export
    Full,
}

impl EtlMode {
    pub const ALL: [EtlMode; 2] = [EtlMode::Delta, EtlMode::Full];

    /// Directory the mode's dumps live in under the base path
    pub fn dir_name(self) -> &'static str {
        match self {
            EtlMode::Delta => "daily",
            EtlMode::Full => "full",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EtlMode::Delta => "delta",
            EtlMode::Full => "full",
        }
    }
}

impl fmt::Display for EtlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EtlMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "delta" | "daily" => Ok(EtlMode::Delta),
            "full" => Ok(EtlMode::Full),
            other => Err(format!("Unknown ETL mode '{}'. Supported: delta, full", other)),
        }
    }
}

/// Half-open validity window `[start, end)` in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ConfigError> {
        if start >= end {
            return Err(ConfigError::InvalidWindow {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn start_micros(&self) -> i64 {
        self.start.timestamp_micros()
    }

    pub fn end_micros(&self) -> i64 {
        self.end.timestamp_micros()
    }

    pub fn contains_micros(&self, micros: i64) -> bool {
        self.start_micros() <= micros && micros < self.end_micros()
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        // We can safely unwrap, both instants are valid and unambiguous in UTC
        Self {
            start: Utc.with_ymd_and_hms(2024, 12, 2, 19, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 12, 3, 19, 0, 0).unwrap(),
        }
    }
}

/// Immutable settings for one validation run
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorConfig {
    window: TimeWindow,
    date_tag: String,
    source_tag: String,
    databases: Vec<String>,
    environments: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            window: TimeWindow::default(),
            date_tag: "20241204".to_string(),
            source_tag: "jti_vita-ploom".to_string(),
            databases: vec!["online".to_string(), "offline".to_string()],
            environments: vec!["PRD".to_string(), "QA".to_string(), "DEV".to_string()],
        }
    }
}

impl ValidatorConfig {
    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn date_tag(&self) -> &str {
        &self.date_tag
    }

    pub fn source_tag(&self) -> &str {
        &self.source_tag
    }

    pub fn databases(&self) -> &[String] {
        &self.databases
    }

    /// Deployment environments the dumps may originate from. Informational only.
    pub fn environments(&self) -> &[String] {
        &self.environments
    }
}

/// Builder for [`ValidatorConfig`], starting from the defaults
#[derive(Debug, Clone)]
pub struct ValidatorConfigBuilder {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    date_tag: String,
    source_tag: String,
    databases: Vec<String>,
    environments: Vec<String>,
}

impl Default for ValidatorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidatorConfigBuilder {
    pub fn new() -> Self {
        let defaults = ValidatorConfig::default();
        Self {
            start: defaults.window.start,
            end: defaults.window.end,
            date_tag: defaults.date_tag,
            source_tag: defaults.source_tag,
            databases: defaults.databases,
            environments: defaults.environments,
        }
    }

    pub fn window_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    pub fn window_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = end;
        self
    }

    pub fn date_tag(mut self, tag: impl Into<String>) -> Self {
        self.date_tag = tag.into();
        self
    }

    pub fn source_tag(mut self, tag: impl Into<String>) -> Self {
        self.source_tag = tag.into();
        self
    }

    pub fn databases(mut self, databases: Vec<String>) -> Self {
        self.databases = databases;
        self
    }

    pub fn environments(mut self, environments: Vec<String>) -> Self {
        self.environments = environments;
        self
    }

    /// Build a [`ValidatorConfig`]
    pub fn build(self) -> Result<ValidatorConfig, ConfigError> {
        if self.databases.is_empty() {
            return Err(ConfigError::NoDatabases);
        }
        Ok(ValidatorConfig {
            window: TimeWindow::new(self.start, self.end)?,
            date_tag: self.date_tag,
            source_tag: self.source_tag,
            databases: self.databases,
            environments: self.environments,
        })
    }
}
