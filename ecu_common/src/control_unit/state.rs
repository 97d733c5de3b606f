//! State enums for the torque control component.
//!
//! `ControlState` is the component lifecycle; `Subsystem` names the five
//! abstraction instances in their mandatory initialization order.

use serde::{Deserialize, Serialize};

/// Torque control component lifecycle.
///
/// `Uninitialized → Ready` only after all five subsystem inits succeed.
/// There is no transition back short of a process restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ControlState {
    /// At least one subsystem is not initialized.
    #[default]
    Uninitialized = 0,
    /// All subsystems initialized; `update()` accepted.
    Ready = 1,
}

impl ControlState {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Uninitialized),
            1 => Some(Self::Ready),
            _ => None,
        }
    }

    /// Returns true in `Ready`.
    #[inline]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// One of the five sensor/actuator abstraction instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Subsystem {
    /// Throttle position sensor.
    Throttle = 0,
    /// Vehicle speed sensor.
    Speed = 1,
    /// Load weight sensor.
    Load = 2,
    /// Actual torque sensor.
    TorqueSensor = 3,
    /// Motor driver (torque command output).
    MotorDriver = 4,
}

impl Subsystem {
    /// Initialization order of the component.
    pub const INIT_ORDER: [Self; 5] = [
        Self::Throttle,
        Self::Speed,
        Self::Load,
        Self::TorqueSensor,
        Self::MotorDriver,
    ];

    /// Stable name used in logs and reports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Throttle => "throttle_sensor",
            Self::Speed => "speed_sensor",
            Self::Load => "load_sensor",
            Self::TorqueSensor => "torque_sensor",
            Self::MotorDriver => "motor_driver",
        }
    }

    /// Engineering unit of the quantity.
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Throttle => "ratio",
            Self::Speed => "km/h",
            Self::Load => "kg",
            Self::TorqueSensor | Self::MotorDriver => "Nm",
        }
    }
}

impl std::fmt::Display for Subsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
