//! Configuration for circuit breaker behavior and its loaders.

use fusebox_core::{
    Error, Result, DEFAULT_BREAKER_NAME, DEFAULT_RESET_TIMEOUT, FUSEBOX_BREAKER_NAME_VAR,
    FUSEBOX_RESET_TIMEOUT_VAR,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for circuit breaker behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CircuitBreakerConfig {
    /// Label attached to log events and stats snapshots
    pub name: String,
    /// Duration to stay open before offering a probe call
    #[serde(rename = "reset_timeout_ms", with = "millis")]
    pub reset_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_BREAKER_NAME.to_string(),
            reset_timeout: DEFAULT_RESET_TIMEOUT,
        }
    }
}

impl CircuitBreakerConfig {
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_reset_timeout(mut self, reset_timeout: Duration) -> Self {
        self.reset_timeout = reset_timeout;
        self
    }

    /// Parse a JSON document; absent fields keep their defaults
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source)
            .map_err(|e| Error::json(format!("invalid breaker configuration: {e}"), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::file_system(path, "read", e))?;
        Self::from_json_str(&contents)
    }

    /// Defaults overlaid with `FUSEBOX_BREAKER_NAME` and `FUSEBOX_RESET_TIMEOUT_MS`
    pub fn from_env() -> Result<Self> {
        Self::default().overlay_env()
    }

    /// Apply any breaker variables present in the process environment
    pub fn overlay_env(self) -> Result<Self> {
        self.overlay(|key| std::env::var(key).ok())
    }

    fn overlay<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup(FUSEBOX_BREAKER_NAME_VAR) {
            self.name = name;
        }
        if let Some(raw) = lookup(FUSEBOX_RESET_TIMEOUT_VAR) {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                Error::environment(
                    FUSEBOX_RESET_TIMEOUT_VAR,
                    format!("expected a whole number of milliseconds, got '{raw}'"),
                )
            })?;
            self.reset_timeout = Duration::from_millis(millis);
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::configuration("breaker name cannot be empty"));
        }
        Ok(())
    }
}

/// Serialize a `Duration` as integer milliseconds
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
