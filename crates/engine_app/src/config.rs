//! Tick loop configuration.
//!
//! Loaded from a JSON file (every field optional), then overridden by
//! environment variables, then validated.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Environment variable overriding [`TickConfig::tick_rate`].
pub const TICK_RATE_ENV: &str = "ENGINE_TICK_RATE";

/// Environment variable overriding [`TickConfig::max_ticks`].
pub const MAX_TICKS_ENV: &str = "ENGINE_MAX_TICKS";

/// Errors raised while loading a [`TickConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`TickConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidOverride {
        /// The environment variable.
        key: &'static str,
        /// Its raw value.
        value: String,
    },

    /// The tick rate is not a positive finite number, or is so small that
    /// one time step overflows a `Duration`.
    #[error("tick rate must be positive, got {0}")]
    InvalidTickRate(f64),
}

/// Configuration for the fixed-timestep tick loop.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TickConfig {
    /// Target ticks per second. Every tick advances time by `1 / tick_rate`.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
    /// Sleep between ticks to match wall-clock time. Headless runs turn this
    /// off and run as fast as possible.
    pub realtime: bool,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
            realtime: true,
        }
    }
}

impl TickConfig {
    /// Parse a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Apply [`TICK_RATE_ENV`] and [`MAX_TICKS_ENV`] from the process
    /// environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(TICK_RATE_ENV) {
            self.tick_rate = value.trim().parse().map_err(|_| ConfigError::InvalidOverride {
                key: TICK_RATE_ENV,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(MAX_TICKS_ENV) {
            self.max_ticks = value.trim().parse().map_err(|_| ConfigError::InvalidOverride {
                key: MAX_TICKS_ENV,
                value: value.clone(),
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject configurations the tick loop cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = self.tick_rate.is_finite() && self.tick_rate > 0.0;
        // The time step must also fit a `Duration` for realtime pacing.
        if positive && Duration::try_from_secs_f64(self.delta()).is_ok() {
            Ok(())
        } else {
            Err(ConfigError::InvalidTickRate(self.tick_rate))
        }
    }

    /// The fixed time step, in seconds.
    #[must_use]
    pub fn delta(&self) -> f64 {
        1.0 / self.tick_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TickConfig::default();
        assert_eq!(config.tick_rate, 60.0);
        assert_eq!(config.max_ticks, 0);
        assert!(config.realtime);
        assert!((config.delta() - 1.0 / 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = TickConfig::from_json_str(r#"{ "max_ticks": 120 }"#).unwrap();
        assert_eq!(config.max_ticks, 120);
        assert_eq!(config.tick_rate, 60.0);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = TickConfig::from_json_str(r#"{ "tickrate": 30 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_tick_rate_is_rejected() {
        let err = TickConfig::from_json_str(r#"{ "tick_rate": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTickRate(rate) if rate == 0.0));
    }

    #[test]
    fn test_vanishing_tick_rate_is_rejected() {
        let err = TickConfig::from_json_str(r#"{ "tick_rate": 1e-20 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTickRate(rate) if rate == 1e-20));
        assert!(TickConfig::from_json_str(r#"{ "tick_rate": 0.001 }"#).is_ok());
    }

    #[test]
    fn test_overrides_apply() {
        let config = TickConfig::default()
            .with_overrides(|key| match key {
                TICK_RATE_ENV => Some("30".to_string()),
                MAX_TICKS_ENV => Some(" 10 ".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.tick_rate, 30.0);
        assert_eq!(config.max_ticks, 10);
    }

    #[test]
    fn test_bad_override_is_reported() {
        let err = TickConfig::default()
            .with_overrides(|key| (key == MAX_TICKS_ENV).then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidOverride { key: MAX_TICKS_ENV, .. }
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TickConfig::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
