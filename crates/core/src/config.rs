//! Engine configuration.
//!
//! The engine reads no environment variables; the host application builds an
//! [`EngineConfig`] (or deserializes one from its own settings) and hands it to
//! the services at construction time.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LOOKUP_TIMEOUT_MS, DEFAULT_REFRESH_INTERVAL_SECS, DEFAULT_SEASON_HISTORY,
    DEFAULT_TOP_CLUBS,
};
use crate::errors::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Delay between two scheduled recompute passes.
    #[serde(with = "duration_secs")]
    pub refresh_interval: Duration,
    /// Upper bound for a single metric lookup.
    #[serde(with = "duration_millis")]
    pub lookup_timeout: Duration,
    /// Number of past seasons in the club earned-points series.
    pub season_history: usize,
    /// Number of clubs in season top lists.
    pub top_clubs: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            lookup_timeout: Duration::from_millis(DEFAULT_LOOKUP_TIMEOUT_MS),
            season_history: DEFAULT_SEASON_HISTORY,
            top_clubs: DEFAULT_TOP_CLUBS,
        }
    }
}

impl EngineConfig {
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn with_season_history(mut self, seasons: usize) -> Self {
        self.season_history = seasons;
        self
    }

    pub fn with_top_clubs(mut self, clubs: usize) -> Self {
        self.top_clubs = clubs;
        self
    }

    /// Rejects values that would make the scheduler spin or every lookup fail.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval.is_zero() {
            return Err(Error::InvalidConfigValue(
                "refresh_interval must be greater than zero".to_string(),
            ));
        }
        if self.lookup_timeout.is_zero() {
            return Err(Error::InvalidConfigValue(
                "lookup_timeout must be greater than zero".to_string(),
            ));
        }
        if self.top_clubs == 0 {
            return Err(Error::InvalidConfigValue(
                "top_clubs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
