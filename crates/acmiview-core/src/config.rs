//! Configuration management for the acmiview replay engine.
//!
//! This module provides a configuration system that supports:
//! - Loading from YAML files
//! - Environment variable overrides (`ACMIVIEW__SECTION__FIELD`)
//! - Validation of all settings
//! - Reference point, classification rules, playback, trail and logging settings

use crate::error::{ConfigError, Result};
use crate::geo::ReferencePoint;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::Level;

/// Main application configuration.
///
/// # Examples
///
/// ```
/// use acmiview_core::config::AppConfig;
///
/// let config = AppConfig::from_yaml("reference:\n  longitude_deg: 10.0\n  latitude_deg: 45.0\n").unwrap();
/// assert_eq!(config.reference.latitude_deg, 45.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Geodetic origin of the local frame
    #[serde(default)]
    pub reference: ReferencePoint,

    /// Entity classification rules
    #[serde(default)]
    pub classification: ClassificationConfig,

    /// Playback clock settings
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Trail rendering window
    #[serde(default)]
    pub trail: TrailConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&contents)
    }

    /// Loads configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            ConfigError::InvalidFormat {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Loads configuration using the `config` crate, layering `ACMIVIEW__*`
    /// environment variables over the optional file.
    pub fn from_config_builder<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut builder = config::Config::builder();
        let origin = match path {
            Some(path) => {
                let path = path.as_ref();
                builder = builder.add_source(config::File::from(path).required(true));
                path.display().to_string()
            }
            None => "<environment>".to_string(),
        };

        let config = builder
            .add_source(
                config::Environment::with_prefix("ACMIVIEW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::LoadFailed {
                path: origin,
                reason: e.to_string(),
            })?;

        config.try_deserialize().map_err(|e| {
            ConfigError::InvalidFormat {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<()> {
        self.reference
            .validate()
            .map_err(|e| ConfigError::invalid_value("reference", e.to_string()))?;
        self.classification.validate()?;
        self.playback.validate()?;
        self.trail.validate()?;
        self.logging.parse_level()?;
        Ok(())
    }
}

/// Rules that decide whether a new entity is an aircraft, a missile or an explosion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Id prefixes of entities launched by one of the sides
    #[serde(default = "default_side_prefixes")]
    pub side_prefixes: Vec<String>,

    /// Name substrings that mark a weapon
    #[serde(default = "default_missile_designators")]
    pub missile_designators: Vec<String>,

    /// Type substring (case-insensitive) that marks an explosion
    #[serde(default = "default_explosion_keyword")]
    pub explosion_keyword: String,

    /// Radius used for explosions without a usable `Radius=` attribute
    #[serde(default = "default_explosion_radius")]
    pub explosion_radius: f64,
}

fn default_side_prefixes() -> Vec<String> {
    vec!["A".to_string(), "B".to_string()]
}

fn default_missile_designators() -> Vec<String> {
    vec!["AIM".to_string()]
}

fn default_explosion_keyword() -> String {
    "explosion".to_string()
}

fn default_explosion_radius() -> f64 {
    300.0
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            side_prefixes: default_side_prefixes(),
            missile_designators: default_missile_designators(),
            explosion_keyword: default_explosion_keyword(),
            explosion_radius: default_explosion_radius(),
        }
    }
}

impl ClassificationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.side_prefixes.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::invalid_value(
                "classification.side_prefixes",
                "prefixes cannot be empty",
            )
            .into());
        }
        if self.missile_designators.iter().any(|d| d.is_empty()) {
            return Err(ConfigError::invalid_value(
                "classification.missile_designators",
                "designators cannot be empty",
            )
            .into());
        }
        if self.explosion_keyword.is_empty() {
            return Err(ConfigError::invalid_value(
                "classification.explosion_keyword",
                "keyword cannot be empty",
            )
            .into());
        }
        if !(self.explosion_radius.is_finite() && self.explosion_radius > 0.0) {
            return Err(ConfigError::invalid_value(
                "classification.explosion_radius",
                format!("must be a positive number, got {}", self.explosion_radius),
            )
            .into());
        }
        Ok(())
    }
}

/// Playback clock settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Playback speed multiplier
    #[serde(default = "default_speed")]
    pub speed: f64,

    /// Interval between playback ticks in milliseconds
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    /// Seconds moved by a single step forward or back
    #[serde(default = "default_step")]
    pub step_secs: f64,

    /// Whether playback wraps to the start after the end
    #[serde(default = "default_true")]
    pub looping: bool,
}

fn default_speed() -> f64 {
    1.0
}

fn default_tick_interval() -> u64 {
    100
}

fn default_step() -> f64 {
    5.0
}

fn default_true() -> bool {
    true
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            tick_interval_ms: default_tick_interval(),
            step_secs: default_step(),
            looping: true,
        }
    }
}

impl PlaybackConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(ConfigError::invalid_value(
                "playback.speed",
                format!("must be a positive number, got {}", self.speed),
            )
            .into());
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::invalid_value(
                "playback.tick_interval_ms",
                "tick interval cannot be 0",
            )
            .into());
        }
        if !(self.step_secs.is_finite() && self.step_secs > 0.0) {
            return Err(ConfigError::invalid_value(
                "playback.step_secs",
                format!("must be a positive number, got {}", self.step_secs),
            )
            .into());
        }
        Ok(())
    }

    /// Returns the tick interval as a Duration.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Trail window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailConfig {
    /// Whether trails are drawn at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Look-back window in seconds
    #[serde(default = "default_trail_length")]
    pub length_secs: f64,
}

pub const MIN_TRAIL_SECS: f64 = 1.0;
pub const MAX_TRAIL_SECS: f64 = 300.0;

fn default_trail_length() -> f64 {
    30.0
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            length_secs: default_trail_length(),
        }
    }
}

impl TrailConfig {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_TRAIL_SECS..=MAX_TRAIL_SECS).contains(&self.length_secs) {
            return Err(ConfigError::invalid_value(
                "trail.length_secs",
                format!(
                    "must be between {} and {}, got {}",
                    MIN_TRAIL_SECS, MAX_TRAIL_SECS, self.length_secs
                ),
            )
            .into());
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "text" or "json"
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Whether to include file/line info
    #[serde(default)]
    pub file_line: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Text,
            file_line: false,
        }
    }
}

impl LoggingConfig {
    /// Parses the log level string to a tracing Level.
    pub fn parse_level(&self) -> Result<Level> {
        self.level.parse().map_err(|_| {
            ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Invalid log level: {}", self.level),
            }
            .into()
        })
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// JSON format for structured logging
    Json,
}
