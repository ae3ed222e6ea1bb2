//! Offers application configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | variable                          | default         |
//! |-----------------------------------|-----------------|
//! | `STAYRATE_DB_PATH`                | `./stayrate.db` |
//! | `STAYRATE_DB_MAX_CONNECTIONS`     | `5`             |
//! | `STAYRATE_CURRENCY`               | `TND`           |
//! | `STAYRATE_TIMEZONE_OFFSET_HOURS`  | `1`             |

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use stayrate_db::DbConfig;

pub const ENV_DB_PATH: &str = "STAYRATE_DB_PATH";
pub const ENV_DB_MAX_CONNECTIONS: &str = "STAYRATE_DB_MAX_CONNECTIONS";
pub const ENV_CURRENCY: &str = "STAYRATE_CURRENCY";
pub const ENV_TIMEZONE_OFFSET_HOURS: &str = "STAYRATE_TIMEZONE_OFFSET_HOURS";

/// Offers application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite file holding the policy records (`:memory:` for a scratch database)
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// ISO 4217 code prices are quoted in
    pub currency: String,

    /// Offset from UTC used to decide what "today" is for validity checks
    pub timezone_offset_hours: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from("./stayrate.db"),
            db_max_connections: 5,
            currency: "TND".to_string(),
            timezone_offset_hours: 1,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let config = AppConfig {
            database_path: lookup(ENV_DB_PATH)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            db_max_connections: match lookup(ENV_DB_MAX_CONNECTIONS) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(ENV_DB_MAX_CONNECTIONS.to_string()))?,
                None => defaults.db_max_connections,
            },

            currency: lookup(ENV_CURRENCY)
                .map(|v| v.trim().to_uppercase())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.currency),

            timezone_offset_hours: match lookup(ENV_TIMEZONE_OFFSET_HOURS) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(ENV_TIMEZONE_OFFSET_HOURS.to_string()))?,
                None => defaults.timezone_offset_hours,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(ENV_DB_MAX_CONNECTIONS.to_string()));
        }

        if !(-12..=14).contains(&self.timezone_offset_hours) {
            return Err(ConfigError::InvalidValue(ENV_TIMEZONE_OFFSET_HOURS.to_string()));
        }

        Ok(())
    }

    /// Pool settings for this configuration.
    pub fn db_config(&self) -> DbConfig {
        if self.database_path.as_os_str() == ":memory:" {
            return DbConfig::in_memory();
        }

        DbConfig::new(&self.database_path).max_connections(self.db_max_connections)
    }

    /// Today's calendar date in the configured offset.
    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }

    /// Calendar date of `instant` in the configured offset.
    pub fn date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        // Range-checked in validate(); UTC if constructed by hand out of range.
        match FixedOffset::east_opt(self.timezone_offset_hours * 3600) {
            Some(offset) => instant.with_timezone(&offset).date_naive(),
            None => instant.date_naive(),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.currency, "TND");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/var/lib/stayrate.db"),
            (ENV_DB_MAX_CONNECTIONS, "8"),
            (ENV_CURRENCY, "eur"),
            (ENV_TIMEZONE_OFFSET_HOURS, "-5"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/stayrate.db"));
        assert_eq!(config.db_max_connections, 8);
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.timezone_offset_hours, -5);
        assert_eq!(config.db_config().max_connections, 8);
    }

    #[test]
    fn test_invalid_values() {
        assert!(AppConfig::from_lookup(lookup(&[(ENV_DB_MAX_CONNECTIONS, "lots")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(ENV_DB_MAX_CONNECTIONS, "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(ENV_TIMEZONE_OFFSET_HOURS, "20")])).is_err());
    }

    #[test]
    fn test_in_memory_path() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_DB_PATH, ":memory:")])).unwrap();
        assert!(config.db_config().is_in_memory());
    }

    #[test]
    fn test_date_at_offset() {
        // 23:30 UTC on Dec 31 is already Jan 1 in Tunis (UTC+1).
        let instant = Utc.with_ymd_and_hms(2024, 12, 31, 23, 30, 0).unwrap();

        let tunis = AppConfig::default();
        assert_eq!(tunis.date_at(instant), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        let utc = AppConfig {
            timezone_offset_hours: 0,
            ..AppConfig::default()
        };
        assert_eq!(utc.date_at(instant), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }
}
