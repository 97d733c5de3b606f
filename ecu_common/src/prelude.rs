//! Prelude module for common re-exports.
//!
//! ```rust
//! use ecu_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, EcuConfig, LogLevel, SharedConfig};
pub use crate::control_unit::config::{ControlParams, CycleConfig};
pub use crate::hal::config::{ChannelMap, PeripheralConfig, SensorConfig};

// ─── Peripheral Contracts ───────────────────────────────────────────
pub use crate::hal::driver::{
    AnalogInput, CanTransport, DigitalIo, Peripheral, PeripheralError, PwmOutput,
};
pub use crate::hal::error::IoHwAbError;
pub use crate::hal::types::{CanFrame, DioLevel};

// ─── Control Unit ───────────────────────────────────────────────────
pub use crate::control_unit::error::{ControlError, CycleFaults};
pub use crate::control_unit::event::{ControlEvent, Deviation};
pub use crate::control_unit::state::{ControlState, Subsystem};
