//! Configuration loading traits and types.
//!
//! This module provides a standardized way to load TOML configuration files
//! across the robot workspace, plus the reader for the plain-text heading
//! gain file consumed at teleop entry.
//!
//! # Usage
//!
//! ```rust,no_run
//! use robo_common::config::{ConfigLoader, SharedConfig, ConfigError};
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Debug, Deserialize)]
//! struct MyAppConfig {
//!     shared: SharedConfig,
//!     period_ms: u64,
//! }
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = MyAppConfig::load(Path::new("robot.toml"))?;
//!     println!("Service: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// File could not be read for a reason other than absence.
    #[error("Failed to read configuration: {0}")]
    Io(String),

    /// TOML or value parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A line-oriented file ended before every value was read.
    #[error("Expected {expected} values, found {found}")]
    MissingValue { expected: usize, found: usize },

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Common configuration fields shared across the robot binaries.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "practice-bot"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Robot instance identifier.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

fn default_service_name() -> String {
    "robot".to_string()
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: default_service_name(),
        }
    }
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trait for loading configuration from TOML files.
///
/// Default implementation works with any type implementing
/// `serde::de::DeserializeOwned`.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read_file(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.display().to_string())
        } else {
            ConfigError::Io(format!("{}: {e}", path.display()))
        }
    })
}

// ─── Heading Gain File ──────────────────────────────────────────────

/// Gains of the heading-hold filter, read from the plain-text gain file.
///
/// File layout is one float per line, in order: proportional gain,
/// integral gain, spin-suppression threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    pub ki: f64,
    /// Twist magnitude at or below which heading hold may engage.
    pub spin_threshold: f64,
}

impl HeadingGains {
    /// Number of values the gain file must provide.
    pub const VALUE_COUNT: usize = 3;

    /// Read the gain file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse the gain file contents.
    ///
    /// Whitespace around each value is ignored, as are lines after the
    /// third value. An empty line before the third value is a parse error.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = [0.0_f64; Self::VALUE_COUNT];
        let mut found = 0;

        for (line_no, line) in content.lines().take(Self::VALUE_COUNT).enumerate() {
            let text = line.trim();
            values[line_no] = text.parse::<f64>().map_err(|e| {
                ConfigError::ParseError(format!("line {}: {text:?}: {e}", line_no + 1))
            })?;
            found += 1;
        }

        if found < Self::VALUE_COUNT {
            return Err(ConfigError::MissingValue {
                expected: Self::VALUE_COUNT,
                found,
            });
        }

        let gains = Self {
            kp: values[0],
            ki: values[1],
            spin_threshold: values[2],
        };
        gains.validate()?;
        Ok(gains)
    }

    /// Reject non-finite values and a negative threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.kp.is_finite() && self.ki.is_finite() && self.spin_threshold.is_finite()) {
            return Err(ConfigError::ValidationError(
                "heading gains must be finite".to_string(),
            ));
        }
        if self.spin_threshold < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "spin threshold {} must be >= 0",
                self.spin_threshold
            )));
        }
        Ok(())
    }
}
