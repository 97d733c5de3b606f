//! Hardware abstraction layer contracts, constants and configuration.
//!
//! This module contains the peripheral capability traits, the
//! sensor/actuator abstraction error type, and the configuration types
//! shared by the HAL drivers and the control unit.

pub mod config;
pub mod consts;
pub mod driver;
pub mod error;
pub mod types;
