//! [`Config`]-related definitions.

use std::{num::NonZeroUsize, path::PathBuf, time};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::collection::SearchScope;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Dataset configuration.
    #[serde(default)]
    pub data: Data,

    /// Users table configuration.
    #[serde(default)]
    pub table: Table,

    /// Log configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Dataset configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Data {
    /// Path to the JSON file with users.
    #[default(PathBuf::from("users.json"))]
    pub path: PathBuf,
}

/// Users table configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Table {
    /// Number of users shown on a single page.
    #[default(NonZeroUsize::MIN.saturating_add(4))]
    pub rows_per_page: NonZeroUsize,

    /// Fields the search text is matched against.
    pub search_scope: SearchScope,

    /// Time a posted notice stays visible.
    #[default(time::Duration::from_secs(3))]
    #[serde(with = "humantime_serde")]
    pub notice_timeout: time::Duration,
}

impl From<Table> for service::Config {
    fn from(value: Table) -> Self {
        let Table {
            rows_per_page,
            search_scope,
            notice_timeout: _,
        } = value;
        Self {
            default_page_size: rows_per_page,
            search_scope,
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use config::{builder::DefaultState, ConfigBuilder, FileFormat};
    use service::collection::SearchScope;

    use super::Config;

    fn parse(toml: &str) -> Config {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn fills_missing_fields_with_defaults() {
        let conf = parse("");

        assert_eq!(conf.data.path.to_str(), Some("users.json"));
        assert_eq!(conf.table.rows_per_page.get(), 5);
        assert_eq!(conf.table.search_scope, SearchScope::NameAndEmail);
        assert_eq!(conf.table.notice_timeout, Duration::from_secs(3));
        assert_eq!(tracing::Level::from(conf.log.level), tracing::Level::INFO);
    }

    #[test]
    fn reads_table_settings() {
        let conf = parse(
            r#"
            [table]
            rows_per_page = 6
            search_scope = "name"
            notice_timeout = "1s 500ms"

            [log]
            level = "DEBUG"
            "#,
        );

        assert_eq!(conf.table.rows_per_page.get(), 6);
        assert_eq!(conf.table.search_scope, SearchScope::Name);
        assert_eq!(conf.table.notice_timeout, Duration::from_millis(1500));
        assert_eq!(
            tracing::Level::from(conf.log.level),
            tracing::Level::DEBUG,
        );
    }

    #[test]
    fn rejects_zero_rows_per_page() {
        let res = ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::from_str(
                "[table]\nrows_per_page = 0",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize::<Config>();

        assert!(res.is_err());
    }
}
