//! Application configuration.
//!
//! # Responsibility
//! - Load settings from an optional TOML file.
//! - Apply `NEEDLEREQ_*` environment overrides on top.
//! - Build the injected handles (store, gate, series options) from one value.
//!
//! # Invariants
//! - A validated config has a non-empty db path and secret and shows at
//!   least one period per chart.

use crate::aggregate::series::{MissingPeriods, SeriesOptions, DEFAULT_MAX_PERIODS};
use crate::gate::{DeleteGate, DEFAULT_DELETE_SECRET};
use crate::logging::default_log_level;
use crate::store::{EventStore, StoreConfig};
use log::info;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "NEEDLEREQ_DB_PATH";
pub const ENV_DELETE_SECRET: &str = "NEEDLEREQ_DELETE_SECRET";
pub const ENV_CHART_DIR: &str = "NEEDLEREQ_CHART_DIR";
pub const ENV_LOG_LEVEL: &str = "NEEDLEREQ_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "NEEDLEREQ_LOG_DIR";

const DEFAULT_DB_FILE: &str = "database.db";
const DEFAULT_CHART_DIR: &str = "charts";

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub delete_secret: String,
    pub max_periods: usize,
    pub missing_periods: MissingPeriods,
    pub chart_dir: PathBuf,
    pub log_level: String,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            delete_secret: DEFAULT_DELETE_SECRET.to_string(),
            max_periods: DEFAULT_MAX_PERIODS,
            missing_periods: MissingPeriods::default(),
            chart_dir: PathBuf::from(DEFAULT_CHART_DIR),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("db_path", &self.db_path)
            .field("delete_secret", &"<redacted>")
            .field("max_periods", &self.max_periods)
            .field("missing_periods", &self.missing_periods)
            .field("chart_dir", &self.chart_dir)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

impl AppConfig {
    /// Loads `path` (when given), applies process env overrides and validates.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        info!(
            "event=config_load module=config status=ok from_file={} db_path={}",
            path.is_some(),
            config.db_path.display()
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overrides fields from `lookup`, which maps env var names to values.
    /// Blank values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(value) = get(ENV_DB_PATH) {
            self.db_path = PathBuf::from(value);
        }
        if let Some(value) = get(ENV_DELETE_SECRET) {
            self.delete_secret = value;
        }
        if let Some(value) = get(ENV_CHART_DIR) {
            self.chart_dir = PathBuf::from(value);
        }
        if let Some(value) = get(ENV_LOG_LEVEL) {
            self.log_level = value;
        }
        if let Some(value) = get(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(value));
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("db_path must not be empty".to_string()));
        }
        if self.delete_secret.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "delete_secret must not be empty".to_string(),
            ));
        }
        if self.max_periods == 0 {
            return Err(ConfigError::Invalid(
                "max_periods must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn store(&self) -> EventStore {
        EventStore::new(StoreConfig::new(self.db_path.clone()))
    }

    pub fn delete_gate(&self) -> DeleteGate {
        DeleteGate::new(self.delete_secret.trim())
    }

    pub fn series_options(&self) -> SeriesOptions {
        SeriesOptions {
            max_periods: self.max_periods,
            missing: self.missing_periods,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, ENV_DB_PATH, ENV_DELETE_SECRET, ENV_LOG_DIR};
    use crate::aggregate::series::MissingPeriods;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().expect("defaults should validate");
        assert_eq!(config.db_path, PathBuf::from("database.db"));
        assert_eq!(config.max_periods, 10);
        assert_eq!(config.missing_periods, MissingPeriods::Omit);
    }

    #[test]
    fn parses_partial_toml_over_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            db_path = "/var/lib/needlereq/requisitions.db"
            max_periods = 6
            missing_periods = "zero_fill"
            "#,
        )
        .expect("toml should parse");

        assert_eq!(
            config.db_path,
            PathBuf::from("/var/lib/needlereq/requisitions.db")
        );
        assert_eq!(config.max_periods, 6);
        assert_eq!(config.missing_periods, MissingPeriods::ZeroFill);
        assert_eq!(config.delete_secret, "1220");
    }

    #[test]
    fn rejects_unknown_keys() {
        let result: Result<AppConfig, _> = toml::from_str("password = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn env_overrides_replace_non_blank_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_DB_PATH, "/tmp/other.db"),
            (ENV_DELETE_SECRET, "   "),
            (ENV_LOG_DIR, "/tmp/logs"),
        ]);
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|value| value.to_string()));

        assert_eq!(config.db_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.delete_secret, "1220");
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
    }

    #[test]
    fn validate_rejects_zero_periods() {
        let config = AppConfig {
            max_periods: 0,
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let rendered = format!("{:?}", AppConfig::default());
        assert!(!rendered.contains("1220"));
    }
}
