//! # ECU Control Unit Library
//!
//! Torque control software component for a vehicle ECU. Each cycle reads
//! throttle position, vehicle speed and load weight, computes a bounded
//! torque command, applies it to the motor driver, and compares it with the
//! torque read back from the torque sensor.
//!
//! ## Layers
//!
//! 1. **Peripheral**: `ecu_common::hal::driver::Peripheral` (simulation or scripted)
//! 2. **IoHwAb**: `ecu_hal::io_hw_ab::IoHwAb<Q>`, one instance per quantity
//! 3. **RTE**: [`rte::Rte`], named access facade owning the instances
//! 4. **SWC**: [`torque_control::TorqueControl`], lifecycle and control cycle
//!
//! The control law itself lives in [`control`] as a pure function.

pub mod config;
pub mod control;
pub mod cycle;
pub mod observer;
pub mod rte;
pub mod torque_control;
