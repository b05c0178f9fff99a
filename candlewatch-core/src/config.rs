//! Dashboard configuration: TOML file, environment overrides, validation.
//!
//! Every field has a default so an empty file (or no file at all) is valid
//! input. Connection secrets are usually supplied through the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::KeywordTable;
use crate::scanner::DEFAULT_CAP;
use crate::stats::DEFAULT_STATS_WINDOW;
use crate::streak::DEFAULT_EXHAUSTION_THRESHOLD;
use crate::timefmt::ClockZone;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Remote table connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Public (anon) API key sent as `apikey` and bearer token.
    pub api_key: String,
    pub table: String,
    pub timestamp_column: String,
    pub label_column: String,
    pub row_limit: usize,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: "eurusd_otc_completo".to_string(),
            timestamp_column: "datetime_mao".to_string(),
            label_column: "cor".to_string(),
            row_limit: 300,
            timeout_secs: 10,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_secs: 5 }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Knobs for the derived views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub stats_window: usize,
    pub pattern_cap: usize,
    pub exhaustion_threshold: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            stats_window: DEFAULT_STATS_WINDOW,
            pattern_cap: DEFAULT_CAP,
            exhaustion_threshold: DEFAULT_EXHAUSTION_THRESHOLD,
        }
    }
}

/// Complete dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    pub polling: PollingConfig,
    pub analysis: AnalysisConfig,
    pub clock: ClockZone,
    pub keywords: KeywordTable,
}

impl DashboardConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string. Keywords are normalized to uppercase.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.keywords = config.keywords.normalized();
        Ok(config)
    }

    /// Load from `path` if given, otherwise start from defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(format!("serialize: {e}")))
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup (the process environment in production).
    ///
    /// `CANDLEWATCH_*` names win over the `SUPABASE_*` fallbacks.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| lookup(k))
                .find(|v| !v.trim().is_empty())
        };

        if let Some(url) = first(&["CANDLEWATCH_URL", "SUPABASE_URL"]) {
            self.source.url = url;
        }
        if let Some(key) = first(&["CANDLEWATCH_API_KEY", "SUPABASE_ANON_KEY"]) {
            self.source.api_key = key;
        }
        if let Some(table) = first(&["CANDLEWATCH_TABLE"]) {
            self.source.table = table;
        }
        if let Some(secs) = first(&["CANDLEWATCH_INTERVAL_SECS"]).and_then(|v| v.parse().ok()) {
            self.polling.interval_secs = secs;
        }
    }

    /// Validate the configuration. `require_source` is false in demo mode.
    pub fn validate(&self, require_source: bool) -> Result<(), ConfigError> {
        if self.source.row_limit == 0 {
            return Err(ConfigError::Invalid("source.row_limit must be positive".into()));
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Invalid("source.timeout_secs must be positive".into()));
        }
        if self.polling.interval_secs == 0 {
            return Err(ConfigError::Invalid("polling.interval_secs must be positive".into()));
        }
        if self.analysis.stats_window == 0 {
            return Err(ConfigError::Invalid("analysis.stats_window must be positive".into()));
        }
        if self.analysis.pattern_cap == 0 {
            return Err(ConfigError::Invalid("analysis.pattern_cap must be positive".into()));
        }
        if self.analysis.exhaustion_threshold == 0 {
            return Err(ConfigError::Invalid(
                "analysis.exhaustion_threshold must be positive".into(),
            ));
        }
        if self.keywords.up.is_empty() || self.keywords.down.is_empty() {
            return Err(ConfigError::Invalid("keywords.up and keywords.down must not be empty".into()));
        }
        let overlap = self.keywords.overlap();
        if !overlap.is_empty() {
            let pairs: Vec<String> = overlap
                .iter()
                .map(|(up, down)| format!("{up} in {down}"))
                .collect();
            return Err(ConfigError::Invalid(format!(
                "up keywords would capture down labels: {}",
                pairs.join(", ")
            )));
        }
        if self.clock.offset().is_none() {
            return Err(ConfigError::Invalid("clock.utc_offset_minutes out of range".into()));
        }
        if require_source {
            if self.source.url.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "source.url is not set (config file or CANDLEWATCH_URL)".into(),
                ));
            }
            if self.source.api_key.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "source.api_key is not set (config file or CANDLEWATCH_API_KEY)".into(),
                ));
            }
            for (name, value) in [
                ("source.table", &self.source.table),
                ("source.timestamp_column", &self.source.timestamp_column),
                ("source.label_column", &self.source.label_column),
            ] {
                if value.trim().is_empty() {
                    return Err(ConfigError::Invalid(format!("{name} must not be empty")));
                }
            }
        }
        Ok(())
    }
}
