//! Configuration bundle loader and startup assembly.
//!
//! Loads `EcuConfig` from TOML, applies command-line overrides, validates
//! the result, and builds the initialized peripheral and the RTE from it.

use std::path::Path;

use ecu_common::config::{ConfigError, ConfigLoader, EcuConfig};
use ecu_common::consts::DEFAULT_CONFIG_PATH;
use ecu_common::hal::driver::{Peripheral, PeripheralError};
use ecu_hal::driver_registry::{DriverRegistry, RegistryError};
use thiserror::Error;
use tracing::{info, warn};

use crate::rte::Rte;

// ─── Error Type ─────────────────────────────────────────────────────

/// Startup failure before the control loop is entered.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Configuration could not be loaded or is invalid.
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    /// Requested driver is not registered.
    #[error("driver registry: {0}")]
    Registry(#[from] RegistryError),
    /// Peripheral initialization failed.
    #[error("peripheral: {0}")]
    Peripheral(#[from] PeripheralError),
}

// ─── Overrides ──────────────────────────────────────────────────────

/// Command-line values that take precedence over the TOML file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    /// `peripheral.driver`
    pub driver: Option<String>,
    /// `peripheral.seed`
    pub seed: Option<u64>,
    /// `cycle.max_cycles`
    pub max_cycles: Option<u64>,
    /// `cycle.cycle_time_us`, given in milliseconds
    pub cycle_time_ms: Option<u64>,
}

impl ConfigOverrides {
    /// Apply the overrides in place.
    pub fn apply(&self, config: &mut EcuConfig) {
        if let Some(driver) = &self.driver {
            config.peripheral.driver = driver.clone();
        }
        if let Some(seed) = self.seed {
            config.peripheral.seed = Some(seed);
        }
        if let Some(max_cycles) = self.max_cycles {
            config.cycle.max_cycles = max_cycles;
        }
        if let Some(ms) = self.cycle_time_ms {
            config.cycle.cycle_time_us = ms.saturating_mul(1000);
        }
    }
}

// ─── Loading ────────────────────────────────────────────────────────

/// Load, override and validate the configuration.
///
/// With no explicit path, `DEFAULT_CONFIG_PATH` is tried and the reference
/// configuration is used if it does not exist. An explicit path must exist.
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<EcuConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            EcuConfig::load(path)?
        }
        None => match EcuConfig::load(Path::new(DEFAULT_CONFIG_PATH)) {
            Ok(config) => {
                info!("Loaded configuration from {}", DEFAULT_CONFIG_PATH);
                config
            }
            Err(ConfigError::FileNotFound) => {
                warn!(
                    "No configuration at {}, using reference defaults",
                    DEFAULT_CONFIG_PATH
                );
                EcuConfig::default()
            }
            Err(e) => return Err(e),
        },
    };

    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Load from a TOML string, override and validate. Used by tests.
pub fn load_config_from_str(
    content: &str,
    overrides: &ConfigOverrides,
) -> Result<EcuConfig, ConfigError> {
    let mut config = EcuConfig::from_toml(content)?;
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

// ─── Assembly ───────────────────────────────────────────────────────

/// Create the configured driver and run its MCAL initialization.
pub fn build_peripheral(
    registry: &DriverRegistry,
    config: &EcuConfig,
) -> Result<Box<dyn Peripheral>, StartupError> {
    let mut peripheral = registry.create_driver(&config.peripheral)?;
    peripheral.init(&config.peripheral)?;
    info!(
        "Peripheral '{}' v{} initialized",
        peripheral.name(),
        peripheral.version()
    );
    Ok(peripheral)
}

/// Build the RTE over the configured, initialized peripheral.
pub fn build_rte(registry: &DriverRegistry, config: &EcuConfig) -> Result<Rte, StartupError> {
    let peripheral = build_peripheral(registry, config)?;
    Ok(Rte::with_pwm_period(
        peripheral,
        config.channels,
        config.peripheral.pwm_period_ms,
    ))
}
