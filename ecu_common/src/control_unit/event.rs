//! Control events emitted by the torque control component.
//!
//! Events are the only reporting channel of the component. Observers
//! decide whether they become log lines, counters, or test assertions.

use super::state::Subsystem;
use crate::hal::error::IoHwAbError;

/// Direction in which the actual torque differs from the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deviation {
    /// `actual < desired`: torque increase needed.
    IncreaseNeeded,
    /// `actual > desired`: torque decrease needed.
    DecreaseNeeded,
    /// `actual == desired`.
    OnTarget,
}

impl Deviation {
    /// Classify `actual` against `desired` (exact comparison, no hysteresis).
    #[inline]
    pub fn classify(actual: f32, desired: f32) -> Self {
        if actual < desired {
            Self::IncreaseNeeded
        } else if actual > desired {
            Self::DecreaseNeeded
        } else {
            Self::OnTarget
        }
    }
}

/// One reportable step of initialization or of a control cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// A subsystem init succeeded.
    SubsystemReady(Subsystem),
    /// A subsystem init failed; initialization halted.
    InitFailed {
        /// Failing subsystem.
        subsystem: Subsystem,
        /// Abstraction-layer error.
        error: IoHwAbError,
    },
    /// All subsystems initialized.
    Ready,
    /// An input was read successfully.
    InputRead {
        /// Source subsystem.
        subsystem: Subsystem,
        /// Value in engineering units.
        value: f32,
    },
    /// A read failed; the cycle continues with 0.0 for that input.
    ReadFailed {
        /// Source subsystem.
        subsystem: Subsystem,
        /// Abstraction-layer error.
        error: IoHwAbError,
    },
    /// Control law evaluated.
    DemandComputed {
        /// Demand before clamping [Nm].
        raw: f32,
        /// Clamped torque command [Nm].
        desired: f32,
    },
    /// Torque command accepted by the motor driver.
    CommandWritten {
        /// Torque command [Nm].
        torque: f32,
    },
    /// Torque command rejected by the motor driver.
    WriteFailed {
        /// Torque command [Nm].
        torque: f32,
        /// Abstraction-layer error.
        error: IoHwAbError,
    },
    /// Actual torque differs from the command. Observational only.
    Deviation {
        /// Direction of the correction.
        deviation: Deviation,
        /// Actual torque [Nm].
        actual: f32,
        /// Commanded torque [Nm].
        desired: f32,
    },
}
