//! Simulation driver module.
//!
//! Software peripheral for manual runs without hardware: analog and digital
//! samples are drawn from a seedable random source, PWM outputs are latched,
//! and the CAN transport produces random standard frames.

mod driver;

pub use driver::SimulationPeripheral;

use ecu_common::hal::config::PeripheralConfig;
use ecu_common::hal::driver::Peripheral;

/// Registry name of the simulation driver.
pub const DRIVER_NAME: &str = "simulation";

/// Factory function to create a simulation driver instance.
pub fn create_driver(config: &PeripheralConfig) -> Box<dyn Peripheral> {
    Box::new(SimulationPeripheral::new(config.seed))
}
