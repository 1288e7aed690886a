// src/config.rs

//! Station configuration.
//!
//! Loaded from a TOML file; any key may be omitted and falls back to its
//! default. `VANTAGE_PORT` overrides the port from the environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::frame::LinkSettings;
use crate::common::timing;
use crate::console::ConsoleSettings;

/// Environment variable that overrides [`StationConfig::port`].
pub const PORT_ENV: &str = "VANTAGE_PORT";

/// Upper bound for `read_timeout_ms` and `wake_settle_ms`.
pub const MAX_TIMEOUT_MS: u64 = 60_000;
/// Upper bound for `refresh_interval_secs`: one day.
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 86_400;

#[cfg(windows)]
const DEFAULT_PORT: &str = "COM3";
#[cfg(not(windows))]
const DEFAULT_PORT: &str = "/dev/ttyUSB0";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Serial device the console is attached to.
    pub port: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    pub wake_attempts: u8,
    pub wake_settle_ms: u64,
    /// Pause between snapshots in the refresh loop.
    pub refresh_interval_secs: u64,
}

impl Default for StationConfig {
    fn default() -> Self {
        StationConfig {
            port: DEFAULT_PORT.to_string(),
            baud_rate: LinkSettings::DEFAULT_BAUD,
            read_timeout_ms: timing::READ_TIMEOUT.as_millis() as u64,
            wake_attempts: timing::WAKE_ATTEMPTS,
            wake_settle_ms: timing::WAKE_SETTLE.as_millis() as u64,
            refresh_interval_secs: 5,
        }
    }
}

impl StationConfig {
    /// Reads `path`, applies environment overrides and validates the result.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

        let mut config = Self::from_toml_str(&text)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup(PORT_ENV).filter(|p| !p.is_empty()) {
            log::info!("Using {} from environment", PORT_ENV);
            self.port = port;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port.trim().is_empty() {
            return Err(ConfigError::Invalid("port must not be empty".into()));
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::Invalid("baud_rate must be greater than 0".into()));
        }
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::Invalid("read_timeout_ms must be greater than 0".into()));
        }
        if self.read_timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "read_timeout_ms must be at most {}",
                MAX_TIMEOUT_MS
            )));
        }
        if self.wake_attempts == 0 {
            return Err(ConfigError::Invalid("wake_attempts must be greater than 0".into()));
        }
        if self.wake_settle_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "wake_settle_ms must be at most {}",
                MAX_TIMEOUT_MS
            )));
        }
        if self.refresh_interval_secs == 0 || self.refresh_interval_secs > MAX_REFRESH_INTERVAL_SECS {
            return Err(ConfigError::Invalid(format!(
                "refresh_interval_secs must be between 1 and {}",
                MAX_REFRESH_INTERVAL_SECS
            )));
        }
        Ok(())
    }

    pub fn console_settings(&self) -> ConsoleSettings {
        ConsoleSettings {
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            wake_attempts: self.wake_attempts,
            wake_settle: Duration::from_millis(self.wake_settle_ms),
        }
    }

    /// 8N1 at the configured baud rate.
    pub fn link_settings(&self) -> LinkSettings {
        LinkSettings::eight_n_one(self.baud_rate)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}
