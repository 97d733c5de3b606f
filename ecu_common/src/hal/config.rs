//! HAL configuration types.
//!
//! This module contains configuration types for the hardware abstraction layer:
//! - `PeripheralConfig` - Driver selection and MCAL initialization parameters
//! - `SensorConfig` - Per-quantity channel binding and range ceiling
//! - `ChannelMap` - The five torque-control bindings

use crate::config::ConfigError;
use crate::hal::consts::{
    ADC_FULL_SCALE, ADC_RESOLUTION_BITS, ADC_SAMPLING_RATE_HZ, LOAD_CHANNEL, LOAD_MAX_KG,
    MAX_CHANNELS, MOTOR_CHANNEL, MOTOR_MAX_TORQUE_NM, PWM_PERIOD_MS, SAMPLE_DELAY_MS_MAX,
    SPEED_CHANNEL, SPEED_MAX_KMH, THROTTLE_CHANNEL, TORQUE_SENSOR_CHANNEL, TORQUE_SENSOR_MAX_NM,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn default_driver() -> String {
    "simulation".to_string()
}

fn default_sampling_rate() -> u32 {
    ADC_SAMPLING_RATE_HZ
}

fn default_resolution() -> u8 {
    ADC_RESOLUTION_BITS
}

fn default_pwm_period() -> u16 {
    PWM_PERIOD_MS
}

/// Peripheral (MCAL) configuration, `[peripheral]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeripheralConfig {
    /// Registered driver name ("simulation" or "scripted").
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Seed for the simulation driver's random source. `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Synchronous delay per analog/digital sample [ms]. 0 disables it.
    #[serde(default)]
    pub sample_delay_ms: u32,

    /// ADC sampling rate [Hz].
    #[serde(default = "default_sampling_rate")]
    pub adc_sampling_rate_hz: u32,

    /// ADC resolution [bit]. Only 10-bit converters are supported.
    #[serde(default = "default_resolution")]
    pub adc_resolution_bits: u8,

    /// PWM period [ms].
    #[serde(default = "default_pwm_period")]
    pub pwm_period_ms: u16,

    /// Fixed raw samples served by the scripted driver.
    #[serde(default)]
    pub scripted_samples: Vec<ScriptedSample>,
}

impl Default for PeripheralConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            seed: None,
            sample_delay_ms: 0,
            adc_sampling_rate_hz: ADC_SAMPLING_RATE_HZ,
            adc_resolution_bits: ADC_RESOLUTION_BITS,
            pwm_period_ms: PWM_PERIOD_MS,
            scripted_samples: Vec::new(),
        }
    }
}

impl PeripheralConfig {
    /// Validate the peripheral configuration.
    ///
    /// # Validation Rules
    /// 1. `driver` is not empty
    /// 2. `sample_delay_ms` <= SAMPLE_DELAY_MS_MAX
    /// 3. `adc_sampling_rate_hz` > 0
    /// 4. `adc_resolution_bits` == 10
    /// 5. `pwm_period_ms` > 0
    /// 6. scripted samples address valid channels and stay within the ADC range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.driver.is_empty() {
            return Err(ConfigError::ValidationError(
                "peripheral.driver cannot be empty".to_string(),
            ));
        }

        if self.sample_delay_ms > SAMPLE_DELAY_MS_MAX {
            return Err(ConfigError::ValidationError(format!(
                "peripheral.sample_delay_ms {} exceeds {} ms",
                self.sample_delay_ms, SAMPLE_DELAY_MS_MAX
            )));
        }

        if self.adc_sampling_rate_hz == 0 {
            return Err(ConfigError::ValidationError(
                "peripheral.adc_sampling_rate_hz must be greater than 0".to_string(),
            ));
        }

        if self.adc_resolution_bits != ADC_RESOLUTION_BITS {
            return Err(ConfigError::ValidationError(format!(
                "peripheral.adc_resolution_bits {} unsupported (only {}-bit)",
                self.adc_resolution_bits, ADC_RESOLUTION_BITS
            )));
        }

        if self.pwm_period_ms == 0 {
            return Err(ConfigError::ValidationError(
                "peripheral.pwm_period_ms must be greater than 0".to_string(),
            ));
        }

        for sample in &self.scripted_samples {
            if sample.channel as usize >= MAX_CHANNELS {
                return Err(ConfigError::ValidationError(format!(
                    "scripted sample channel {} out of range (max {})",
                    sample.channel,
                    MAX_CHANNELS - 1
                )));
            }
            if sample.raw > ADC_FULL_SCALE {
                return Err(ConfigError::ValidationError(format!(
                    "scripted sample {} on channel {} exceeds {}",
                    sample.raw, sample.channel, ADC_FULL_SCALE
                )));
            }
        }

        Ok(())
    }
}

/// One fixed ADC code served by the scripted driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedSample {
    /// ADC channel.
    pub channel: u8,
    /// Raw code (0..=1023).
    pub raw: u16,
}

/// Channel binding and range ceiling of one physical quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorConfig {
    /// Peripheral channel (ADC for sensors, PWM for the motor driver).
    pub channel: u8,

    /// Engineering-unit ceiling used for scaling. Absent for throttle.
    #[serde(default)]
    pub max_value: Option<f32>,

    /// Optional DIO status line checked by `check_status`.
    #[serde(default)]
    pub status_channel: Option<u8>,
}

impl SensorConfig {
    /// Binding with a fixed 0.0–1.0 range (throttle).
    pub const fn normalized(channel: u8) -> Self {
        Self {
            channel,
            max_value: None,
            status_channel: None,
        }
    }

    /// Binding scaled linearly to `0.0..=max_value`.
    pub const fn scaled(channel: u8, max_value: f32) -> Self {
        Self {
            channel,
            max_value: Some(max_value),
            status_channel: None,
        }
    }

    /// Attach a DIO status line.
    pub const fn with_status_channel(mut self, channel: u8) -> Self {
        self.status_channel = Some(channel);
        self
    }
}

fn default_throttle() -> Option<SensorConfig> {
    Some(SensorConfig::normalized(THROTTLE_CHANNEL))
}

fn default_speed() -> Option<SensorConfig> {
    Some(SensorConfig::scaled(SPEED_CHANNEL, SPEED_MAX_KMH))
}

fn default_load() -> Option<SensorConfig> {
    Some(SensorConfig::scaled(LOAD_CHANNEL, LOAD_MAX_KG))
}

fn default_torque_sensor() -> Option<SensorConfig> {
    Some(SensorConfig::scaled(TORQUE_SENSOR_CHANNEL, TORQUE_SENSOR_MAX_NM))
}

fn default_motor() -> Option<SensorConfig> {
    Some(SensorConfig::scaled(MOTOR_CHANNEL, MOTOR_MAX_TORQUE_NM))
}

/// The five bindings handed to the RTE init operations, `[channels]` section.
///
/// Omitted sections fall back to the reference assignment. A `None` entry
/// reaches the abstraction's `init` as an absent configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelMap {
    /// Throttle position sensor.
    #[serde(default = "default_throttle")]
    pub throttle: Option<SensorConfig>,
    /// Vehicle speed sensor.
    #[serde(default = "default_speed")]
    pub speed: Option<SensorConfig>,
    /// Load weight sensor.
    #[serde(default = "default_load")]
    pub load: Option<SensorConfig>,
    /// Torque feedback sensor.
    #[serde(default = "default_torque_sensor")]
    pub torque_sensor: Option<SensorConfig>,
    /// Motor driver (PWM).
    #[serde(default = "default_motor")]
    pub motor: Option<SensorConfig>,
}

impl Default for ChannelMap {
    fn default() -> Self {
        Self {
            throttle: default_throttle(),
            speed: default_speed(),
            load: default_load(),
            torque_sensor: default_torque_sensor(),
            motor: default_motor(),
        }
    }
}

impl ChannelMap {
    /// Validate channel numbers and ADC channel uniqueness.
    ///
    /// Range ceilings are checked by the abstraction's `init`, so a
    /// missing or bad `max_value` surfaces as `InvalidConfig` there.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sensors = [
            ("throttle", &self.throttle),
            ("speed", &self.speed),
            ("load", &self.load),
            ("torque_sensor", &self.torque_sensor),
        ];

        let mut adc_channels = HashSet::new();
        for (name, config) in sensors {
            let Some(config) = config else { continue };
            check_channel(name, config.channel)?;
            if let Some(status) = config.status_channel {
                check_channel(name, status)?;
            }
            if !adc_channels.insert(config.channel) {
                return Err(ConfigError::ValidationError(format!(
                    "channels.{name}: ADC channel {} already bound",
                    config.channel
                )));
            }
        }

        if let Some(motor) = &self.motor {
            check_channel("motor", motor.channel)?;
        }

        Ok(())
    }
}

fn check_channel(name: &str, channel: u8) -> Result<(), ConfigError> {
    if channel as usize >= MAX_CHANNELS {
        return Err(ConfigError::ValidationError(format!(
            "channels.{name}: channel {channel} out of range (max {})",
            MAX_CHANNELS - 1
        )));
    }
    Ok(())
}
