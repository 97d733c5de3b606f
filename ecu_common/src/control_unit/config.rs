//! Configuration structures for the torque control unit.
//!
//! All config types use `serde::Deserialize` for TOML loading.
//! Every field has a default equal to the reference calibration, so an
//! empty section is valid.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::consts::{CYCLE_TIME_US, CYCLE_TIME_US_MAX, CYCLE_TIME_US_MIN};

// ─── Control Law Calibration ────────────────────────────────────────

/// Upper bound of the torque command [Nm].
pub const MAX_TORQUE: f32 = 100.0;
/// Lower bound of the torque command [Nm].
pub const MIN_TORQUE: f32 = 0.0;
/// Speed above which the demand is de-rated [km/h].
pub const DERATE_SPEED_KMH: f32 = 50.0;
/// De-rate multiplier applied above `DERATE_SPEED_KMH`.
pub const DERATE_FACTOR: f32 = 0.8;
/// Load above which the demand is compensated [kg].
pub const HEAVY_LOAD_KG: f32 = 500.0;
/// Torque added above `HEAVY_LOAD_KG` [Nm].
pub const LOAD_BONUS_NM: f32 = 10.0;

fn default_max_torque() -> f32 {
    MAX_TORQUE
}
fn default_min_torque() -> f32 {
    MIN_TORQUE
}
fn default_derate_speed() -> f32 {
    DERATE_SPEED_KMH
}
fn default_derate_factor() -> f32 {
    DERATE_FACTOR
}
fn default_heavy_load() -> f32 {
    HEAVY_LOAD_KG
}
fn default_load_bonus() -> f32 {
    LOAD_BONUS_NM
}

/// Control law parameters, `[control]` section.
///
/// Read once at startup; never written back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlParams {
    /// Torque command ceiling and full-throttle demand [Nm].
    #[serde(default = "default_max_torque")]
    pub max_torque: f32,
    /// Torque command floor [Nm].
    #[serde(default = "default_min_torque")]
    pub min_torque: f32,
    /// De-rate threshold, strictly greater triggers [km/h].
    #[serde(default = "default_derate_speed")]
    pub derate_speed_kmh: f32,
    /// De-rate multiplier, in `(0, 1]`.
    #[serde(default = "default_derate_factor")]
    pub derate_factor: f32,
    /// Heavy-load threshold, strictly greater triggers [kg].
    #[serde(default = "default_heavy_load")]
    pub heavy_load_kg: f32,
    /// Heavy-load compensation [Nm].
    #[serde(default = "default_load_bonus")]
    pub load_bonus_nm: f32,
}

impl Default for ControlParams {
    fn default() -> Self {
        Self {
            max_torque: MAX_TORQUE,
            min_torque: MIN_TORQUE,
            derate_speed_kmh: DERATE_SPEED_KMH,
            derate_factor: DERATE_FACTOR,
            heavy_load_kg: HEAVY_LOAD_KG,
            load_bonus_nm: LOAD_BONUS_NM,
        }
    }
}

impl ControlParams {
    /// Validate the calibration.
    ///
    /// # Validation Rules
    /// 1. All values finite
    /// 2. `0 <= min_torque < max_torque`
    /// 3. `derate_factor` in `(0, 1]`
    /// 4. thresholds `>= 0`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("max_torque", self.max_torque),
            ("min_torque", self.min_torque),
            ("derate_speed_kmh", self.derate_speed_kmh),
            ("derate_factor", self.derate_factor),
            ("heavy_load_kg", self.heavy_load_kg),
            ("load_bonus_nm", self.load_bonus_nm),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "control.{name} must be finite"
                )));
            }
        }

        if self.min_torque < 0.0 || self.min_torque >= self.max_torque {
            return Err(ConfigError::ValidationError(format!(
                "control: require 0 <= min_torque ({}) < max_torque ({})",
                self.min_torque, self.max_torque
            )));
        }

        if self.derate_factor <= 0.0 || self.derate_factor > 1.0 {
            return Err(ConfigError::ValidationError(format!(
                "control.derate_factor {} outside (0, 1]",
                self.derate_factor
            )));
        }

        if self.derate_speed_kmh < 0.0 || self.heavy_load_kg < 0.0 {
            return Err(ConfigError::ValidationError(
                "control thresholds must be non-negative".to_string(),
            ));
        }

        Ok(())
    }
}

// ─── Cycle Timing ───────────────────────────────────────────────────

fn default_cycle_time_us() -> u64 {
    CYCLE_TIME_US
}

/// Cycle runner configuration, `[cycle]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CycleConfig {
    /// Control cycle period [µs].
    #[serde(default = "default_cycle_time_us")]
    pub cycle_time_us: u64,
    /// Number of cycles to run; 0 runs until a shutdown signal.
    #[serde(default)]
    pub max_cycles: u64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            cycle_time_us: CYCLE_TIME_US,
            max_cycles: 0,
        }
    }
}

impl CycleConfig {
    /// Validate the cycle period bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(CYCLE_TIME_US_MIN..=CYCLE_TIME_US_MAX).contains(&self.cycle_time_us) {
            return Err(ConfigError::ValidationError(format!(
                "cycle.cycle_time_us {} outside [{}, {}]",
                self.cycle_time_us, CYCLE_TIME_US_MIN, CYCLE_TIME_US_MAX
            )));
        }
        Ok(())
    }
}
