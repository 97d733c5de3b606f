//! Peripheral driver implementations.
//!
//! - [`simulation`] - Random-sample driver for manual runs without hardware
//! - [`scripted`] - Deterministic driver for tests and reproducible runs
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the `Peripheral` trait family from `ecu_common::hal::driver`
//! 3. Register the driver in `register_all_drivers()`

mod channels;
pub mod scripted;
pub mod simulation;

pub use scripted::ScriptedPeripheral;
pub use simulation::SimulationPeripheral;

use crate::driver_registry::{DriverRegistry, RegistryError};

/// Register all built-in drivers.
pub fn register_all_drivers(registry: &mut DriverRegistry) -> Result<(), RegistryError> {
    registry.register(simulation::DRIVER_NAME, simulation::create_driver)?;
    registry.register(scripted::DRIVER_NAME, scripted::create_driver)?;
    Ok(())
}
