//! Error types for the torque control component.
//!
//! `ControlError` is returned by `init()`/`update()`. Per-quantity failures
//! inside a cycle are not errors of the cycle; they are collected in
//! `CycleFaults` and the cycle completes.

use bitflags::bitflags;
use thiserror::Error;

use super::state::Subsystem;
use crate::hal::error::IoHwAbError;

/// Torque control component errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    /// A subsystem init failed; the component stays `Uninitialized`.
    #[error("initialization of {subsystem} failed: {source}")]
    InitFailed {
        /// First subsystem whose init failed.
        subsystem: Subsystem,
        /// Abstraction-layer error, unchanged.
        #[source]
        source: IoHwAbError,
    },

    /// `update()` called before the component reached `Ready`.
    #[error("torque control not ready: init() has not completed")]
    NotReady,

    /// `init()` called on a component that is already `Ready`.
    #[error("torque control already initialized")]
    AlreadyInitialized,
}

bitflags! {
    /// Steps of one control cycle that failed and fell back to a default.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CycleFaults: u8 {
        /// Throttle read failed (0.0 used).
        const THROTTLE_READ = 0x01;
        /// Speed read failed (0.0 used).
        const SPEED_READ    = 0x02;
        /// Load read failed (0.0 used).
        const LOAD_READ     = 0x04;
        /// Torque command write failed.
        const MOTOR_WRITE   = 0x08;
        /// Actual torque read failed (0.0 used).
        const TORQUE_READ   = 0x10;
    }
}

impl CycleFaults {
    /// Fault flag for the given subsystem's read or write step.
    #[inline]
    pub const fn for_subsystem(subsystem: Subsystem) -> Self {
        match subsystem {
            Subsystem::Throttle => Self::THROTTLE_READ,
            Subsystem::Speed => Self::SPEED_READ,
            Subsystem::Load => Self::LOAD_READ,
            Subsystem::TorqueSensor => Self::TORQUE_READ,
            Subsystem::MotorDriver => Self::MOTOR_WRITE,
        }
    }

    /// Mask of the three input reads feeding the control law.
    pub const INPUT_MASK: Self = Self::from_bits_truncate(
        Self::THROTTLE_READ.bits() | Self::SPEED_READ.bits() | Self::LOAD_READ.bits(),
    );

    /// Returns true if any control-law input fell back to its default.
    #[inline]
    pub const fn has_input_fault(&self) -> bool {
        self.intersects(Self::INPUT_MASK)
    }
}
