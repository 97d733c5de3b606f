//! Configuration loading traits and types.
//!
//! This module provides a standardized way to load TOML configuration files
//! across the ECU workspace, plus the top-level `EcuConfig` document.
//!
//! # Usage
//!
//! ```rust,no_run
//! use ecu_common::config::{ConfigError, EcuConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = EcuConfig::load_validated(Path::new("ecu.toml"))?;
//!     println!("Service: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::consts::SERVICE_NAME;
use crate::control_unit::config::{ControlParams, CycleConfig};
use crate::hal::config::{ChannelMap, PeripheralConfig};

/// Error type for configuration loading operations.
///
/// This enum represents all possible errors that can occur when loading
/// configuration files.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Represents the verbosity level of logging output.
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

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

fn default_service_name() -> String {
    SERVICE_NAME.to_string()
}

/// Common configuration fields shared across ECU applications.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "ecu-torque-bench-01"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    #[serde(default = "default_service_name")]
    pub service_name: String,
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
    /// Returns `ConfigError::ValidationError` if:
    /// - `service_name` is empty
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
/// This trait provides a default implementation that works with any type
/// implementing `serde::de::DeserializeOwned`.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

/// Complete ECU configuration document (`ecu.toml`).
///
/// Every section is optional; omitted sections take the reference values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EcuConfig {
    /// Logging and service identity.
    #[serde(default)]
    pub shared: SharedConfig,
    /// Cycle runner timing.
    #[serde(default)]
    pub cycle: CycleConfig,
    /// Peripheral driver selection and MCAL parameters.
    #[serde(default)]
    pub peripheral: PeripheralConfig,
    /// Channel bindings of the five quantities.
    #[serde(default)]
    pub channels: ChannelMap,
    /// Control law calibration.
    #[serde(default)]
    pub control: ControlParams,
}

impl EcuConfig {
    /// Parse from a TOML string without validating.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load from a file and validate every section.
    pub fn load_validated(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.cycle.validate()?;
        self.peripheral.validate()?;
        self.channels.validate()?;
        self.control.validate()?;
        self.validate_motor_range()?;
        Ok(())
    }

    /// The motor driver must accept every command the control law can
    /// produce: `control.max_torque <= channels.motor.max_value`.
    fn validate_motor_range(&self) -> Result<(), ConfigError> {
        let Some(motor_max) = self.channels.motor.and_then(|m| m.max_value) else {
            return Ok(());
        };
        if self.control.max_torque > motor_max {
            return Err(ConfigError::ValidationError(format!(
                "control.max_torque ({}) exceeds channels.motor.max_value ({})",
                self.control.max_torque, motor_max
            )));
        }
        Ok(())
    }
}
