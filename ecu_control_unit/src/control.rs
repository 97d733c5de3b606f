//! Torque control law.
//!
//! Pure function of the three cycle inputs and the calibration:
//!
//! ```text
//! raw = throttle * max_torque
//! if speed > derate_speed_kmh: raw *= derate_factor
//! if load  > heavy_load_kg:    raw += load_bonus_nm
//! desired = clamp(raw, min_torque, max_torque)
//! ```
//!
//! Thresholds are strict. All arithmetic is `f32`.

use ecu_common::control_unit::config::ControlParams;
use serde::Serialize;

/// Inputs of one control cycle, in engineering units.
///
/// A failed read contributes `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ControlInputs {
    /// Throttle position `[0, 1]`.
    pub throttle: f32,
    /// Vehicle speed [km/h].
    pub speed_kmh: f32,
    /// Load weight [kg].
    pub load_kg: f32,
}

/// Output of the control law.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TorqueDemand {
    /// Demand before clamping [Nm].
    pub raw: f32,
    /// Torque command after clamping [Nm].
    pub desired: f32,
}

impl TorqueDemand {
    /// Whether the clamp changed the demand.
    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.raw != self.desired
    }
}

/// Clamp a torque demand to `[min_torque, max_torque]`.
#[inline]
pub fn clamp_torque(value: f32, params: &ControlParams) -> f32 {
    value.clamp(params.min_torque, params.max_torque)
}

/// Evaluate the control law.
#[inline]
pub fn compute_demand(inputs: &ControlInputs, params: &ControlParams) -> TorqueDemand {
    let mut raw = inputs.throttle * params.max_torque;

    if inputs.speed_kmh > params.derate_speed_kmh {
        raw *= params.derate_factor;
    }

    if inputs.load_kg > params.heavy_load_kg {
        raw += params.load_bonus_nm;
    }

    TorqueDemand {
        raw,
        desired: clamp_torque(raw, params),
    }
}
