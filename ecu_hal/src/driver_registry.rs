//! Driver registry for peripheral drivers.
//!
//! Provides a `DriverRegistry` struct for registering and retrieving
//! peripheral driver factories. This uses constructor-injection rather than
//! global state.

use ecu_common::hal::config::PeripheralConfig;
use ecu_common::hal::driver::{DriverFactory, Peripheral};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by the driver registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No driver registered under the requested name.
    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    /// A driver with the same name is already registered.
    #[error("Driver '{0}' is already registered")]
    AlreadyRegistered(&'static str),
}

/// Registry of available peripheral drivers.
///
/// Constructed at startup, populated via `register()`, and consulted once
/// when the control unit builds its peripheral.
pub struct DriverRegistry {
    factories: HashMap<&'static str, DriverFactory>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry holding every built-in driver.
    pub fn with_builtin_drivers() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        crate::drivers::register_all_drivers(&mut registry)?;
        Ok(registry)
    }

    /// Register a driver factory.
    ///
    /// # Errors
    /// Returns `RegistryError::AlreadyRegistered` if the name is taken.
    pub fn register(
        &mut self,
        name: &'static str,
        factory: DriverFactory,
    ) -> Result<(), RegistryError> {
        if self.factories.contains_key(name) {
            return Err(RegistryError::AlreadyRegistered(name));
        }
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Get a driver factory by name.
    pub fn get_factory(&self, name: &str) -> Option<DriverFactory> {
        self.factories.get(name).copied()
    }

    /// Create the driver named by `config.driver`.
    ///
    /// The returned driver is not yet initialized; call `Peripheral::init`.
    ///
    /// # Errors
    /// Returns `RegistryError::DriverNotFound` if no driver with that name is registered.
    pub fn create_driver(
        &self,
        config: &PeripheralConfig,
    ) -> Result<Box<dyn Peripheral>, RegistryError> {
        let factory = self
            .get_factory(&config.driver)
            .ok_or_else(|| RegistryError::DriverNotFound(config.driver.clone()))?;
        Ok(factory(config))
    }

    /// List all registered driver names, sorted.
    pub fn list_drivers(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
