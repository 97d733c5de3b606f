//! # ECU HAL Library
//!
//! Peripheral drivers with a pluggable factory registry, and the
//! sensor/actuator abstraction layer (IoHwAb) that turns raw channel
//! samples into engineering units.
//!
//! Drivers implement the `Peripheral` trait family defined in
//! `ecu_common::hal::driver`.
//!
//! # Module Structure
//!
//! - [`driver_registry`] - Driver factory registration
//! - [`drivers`] - Peripheral driver implementations (simulation, scripted)
//! - [`io_hw_ab`] - Generic per-quantity abstraction `IoHwAb<Q>`
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                            ecu_hal                               │
//! │  ┌─────────────────┐   ┌──────────────┐   ┌──────────────────┐   │
//! │  │ IoHwAb<Q> x5    │──►│ dyn          │◄──│ Driver Registry  │   │
//! │  │ (unit convert)  │   │ Peripheral   │   │ (by name)        │   │
//! │  └─────────────────┘   └──────┬───────┘   └──────────────────┘   │
//! │                               │                                  │
//! │                 ┌─────────────┴────────────┐                     │
//! │                 ▼                          ▼                     │
//! │        SimulationPeripheral       ScriptedPeripheral             │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod driver_registry;
pub mod drivers;
pub mod io_hw_ab;

// Re-export key types for convenience
pub use crate::driver_registry::{DriverRegistry, RegistryError};
pub use crate::drivers::{ScriptedPeripheral, SimulationPeripheral, register_all_drivers};
pub use crate::io_hw_ab::{
    ActualTorque, Initializable, IoHwAb, LoadWeight, MotorTorque, Readable, ThrottlePosition,
    VehicleSpeed, Writable,
};
