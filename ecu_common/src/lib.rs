//! ECU Common Library
//!
//! This crate provides shared constants, configuration loading utilities,
//! and the hardware abstraction contracts for all ECU workspace crates.
//!
//! # Module Structure
//!
//! - [`hal`] - Peripheral capability traits, errors, HAL configuration
//! - [`control_unit`] - Torque control state, events, errors and calibration
//! - [`config`] - Configuration loading traits and the `EcuConfig` document
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use ecu_common::prelude::*;
//! let params = ControlParams::default();
//! assert_eq!(params.max_torque, 100.0);
//! ```

pub mod config;
pub mod consts;
pub mod control_unit;
pub mod hal;
pub mod prelude;
