//! Sensor/actuator abstraction error type.
//!
//! Errors raised by an IoHwAb instance surface unchanged through the RTE
//! facade to the torque control component.

use crate::hal::driver::PeripheralError;
use thiserror::Error;

/// Error types for IoHwAb init/read/write operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IoHwAbError {
    /// Configuration absent or unusable at init.
    #[error("{quantity}: invalid configuration: {reason}")]
    InvalidConfig {
        /// Quantity name (e.g. "load_sensor")
        quantity: &'static str,
        /// What is wrong with the configuration
        reason: String,
    },

    /// Argument rejected before reaching the peripheral.
    #[error("{quantity}: invalid argument: {reason}")]
    InvalidArgument {
        /// Quantity name
        quantity: &'static str,
        /// What is wrong with the argument
        reason: String,
    },

    /// Command outside the configured engineering range.
    #[error("{quantity}: value {value:.3} out of range [{min}, {max}]")]
    OutOfRange {
        /// Quantity name
        quantity: &'static str,
        /// Rejected value
        value: f32,
        /// Lower bound (inclusive)
        min: f32,
        /// Upper bound (inclusive)
        max: f32,
    },

    /// Instance used before a successful `init()`.
    #[error("{quantity}: not initialized")]
    NotInitialized {
        /// Quantity name
        quantity: &'static str,
    },

    /// Underlying sample or actuation failure.
    #[error("peripheral error: {0}")]
    Peripheral(#[from] PeripheralError),
}

impl IoHwAbError {
    /// Short machine-readable kind, stable across messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "invalid_config",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::OutOfRange { .. } => "out_of_range",
            Self::NotInitialized { .. } => "not_initialized",
            Self::Peripheral(_) => "peripheral_error",
        }
    }
}
