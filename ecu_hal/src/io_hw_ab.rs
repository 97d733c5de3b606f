//! Sensor/actuator abstraction layer (IoHwAb).
//!
//! One generic instance type, `IoHwAb<Q>`, serves every physical quantity.
//! An instance owns its `SensorConfig` once `init()` succeeds and converts
//! raw converter codes into engineering units:
//!
//! | Quantity           | Channel | Conversion                         |
//! |--------------------|---------|------------------------------------|
//! | `ThrottlePosition` | ADC     | `raw / 1023`, clamped to `[0, 1]`  |
//! | `VehicleSpeed`     | ADC     | `raw / 1023 * max_value`           |
//! | `LoadWeight`       | ADC     | `raw / 1023 * max_value`           |
//! | `ActualTorque`     | ADC     | `raw / 1023 * max_value`           |
//! | `MotorTorque`      | PWM     | `duty = round(v / max_value * 100)`|
//!
//! Instances do not own the peripheral; every operation borrows it.

mod quantity;

pub use quantity::{
    ActualTorque, ActuatorQuantity, ChannelKind, LoadWeight, MotorTorque, Quantity,
    SensorQuantity, ThrottlePosition, VehicleSpeed,
};

use ecu_common::hal::config::SensorConfig;
use ecu_common::hal::consts::{ADC_FULL_SCALE, DUTY_CYCLE_MAX, MAX_CHANNELS, PWM_PERIOD_MS};
use ecu_common::hal::driver::{Peripheral, PeripheralError};
use ecu_common::hal::error::IoHwAbError;
use ecu_common::hal::types::DioLevel;
use std::fmt;
use std::marker::PhantomData;
use tracing::{info, trace, warn};

// ─── Capability Traits ──────────────────────────────────────────────

/// Configuration lifecycle of an abstraction instance.
pub trait Initializable {
    /// Validate `config`, arm its peripheral channels and take ownership of it.
    ///
    /// # Errors
    /// - `InvalidConfig` if `config` is `None` or unusable
    /// - `Peripheral` if arming a channel fails
    fn init(
        &mut self,
        peripheral: &mut dyn Peripheral,
        config: Option<SensorConfig>,
    ) -> Result<(), IoHwAbError>;

    /// Whether `init()` has succeeded.
    fn is_initialized(&self) -> bool;
}

/// Instance producing a value in engineering units.
pub trait Readable<T> {
    /// Sample the bound channel and convert it.
    fn read(&self, peripheral: &mut dyn Peripheral) -> Result<T, IoHwAbError>;
}

/// Instance accepting a command in engineering units.
pub trait Writable<T> {
    /// Validate `value` and drive the bound channel.
    fn write(&mut self, peripheral: &mut dyn Peripheral, value: T) -> Result<(), IoHwAbError>;
}

// ─── Instance ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum Binding {
    Unbound,
    Bound {
        config: SensorConfig,
        /// Engineering-unit ceiling; 1.0 for normalized quantities.
        full_scale: f32,
    },
}

/// Abstraction instance for quantity `Q`.
pub struct IoHwAb<Q: Quantity> {
    binding: Binding,
    pwm_period_ms: u16,
    _quantity: PhantomData<Q>,
}

impl<Q: Quantity> IoHwAb<Q> {
    /// Create an unbound instance.
    pub const fn new() -> Self {
        Self {
            binding: Binding::Unbound,
            pwm_period_ms: PWM_PERIOD_MS,
            _quantity: PhantomData,
        }
    }

    /// Set the PWM period armed by `init()`. Only used by actuator quantities.
    pub const fn with_pwm_period(mut self, period_ms: u16) -> Self {
        self.pwm_period_ms = period_ms;
        self
    }

    /// Configuration owned by this instance, once initialized.
    pub fn config(&self) -> Option<&SensorConfig> {
        match &self.binding {
            Binding::Bound { config, .. } => Some(config),
            Binding::Unbound => None,
        }
    }

    /// Engineering-unit ceiling applied by conversions, once initialized.
    pub fn full_scale(&self) -> Option<f32> {
        match self.binding {
            Binding::Bound { full_scale, .. } => Some(full_scale),
            Binding::Unbound => None,
        }
    }

    fn bound(&self) -> Result<(SensorConfig, f32), IoHwAbError> {
        match self.binding {
            Binding::Bound { config, full_scale } => Ok((config, full_scale)),
            Binding::Unbound => Err(IoHwAbError::NotInitialized { quantity: Q::NAME }),
        }
    }

    fn invalid_config(reason: impl Into<String>) -> IoHwAbError {
        IoHwAbError::InvalidConfig {
            quantity: Q::NAME,
            reason: reason.into(),
        }
    }

    fn check_channel(role: &str, channel: u8) -> Result<(), IoHwAbError> {
        if channel as usize >= MAX_CHANNELS {
            return Err(Self::invalid_config(format!(
                "{role} channel {channel} out of range (max {})",
                MAX_CHANNELS - 1
            )));
        }
        Ok(())
    }

    fn resolve_full_scale(config: &SensorConfig) -> Result<f32, IoHwAbError> {
        if !Q::REQUIRES_MAX {
            if let Some(max) = config.max_value {
                warn!("{}: max_value {} ignored, range is fixed", Q::NAME, max);
            }
            return Ok(1.0);
        }
        match config.max_value {
            Some(max) if max.is_finite() && max > 0.0 => Ok(max),
            Some(max) => Err(Self::invalid_config(format!(
                "max_value {max} must be finite and greater than 0"
            ))),
            None => Err(Self::invalid_config("max_value is required")),
        }
    }
}

impl<Q: Quantity> Default for IoHwAb<Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q: Quantity> fmt::Debug for IoHwAb<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoHwAb")
            .field("quantity", &Q::NAME)
            .field("binding", &self.binding)
            .finish()
    }
}

impl<Q: Quantity> Initializable for IoHwAb<Q> {
    /// A failed init leaves any previous binding in place.
    fn init(
        &mut self,
        peripheral: &mut dyn Peripheral,
        config: Option<SensorConfig>,
    ) -> Result<(), IoHwAbError> {
        let config = config.ok_or_else(|| Self::invalid_config("configuration absent"))?;

        Self::check_channel("signal", config.channel)?;
        if let Some(status) = config.status_channel {
            Self::check_channel("status", status)?;
        }
        let full_scale = Self::resolve_full_scale(&config)?;

        match Q::CHANNEL_KIND {
            ChannelKind::Adc => peripheral.arm_adc_channel(config.channel)?,
            ChannelKind::Pwm => peripheral.arm_pwm_channel(config.channel, self.pwm_period_ms)?,
        }
        if let Some(status) = config.status_channel {
            peripheral.arm_dio_channel(status)?;
        }

        self.binding = Binding::Bound { config, full_scale };
        info!(
            "{} initialized on {:?} channel {} (full scale {} {})",
            Q::NAME,
            Q::CHANNEL_KIND,
            config.channel,
            full_scale,
            Q::SUBSYSTEM.unit()
        );
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        matches!(self.binding, Binding::Bound { .. })
    }
}

impl<Q: SensorQuantity> IoHwAb<Q> {
    /// Convert a raw converter code into engineering units.
    fn convert(raw: u16, full_scale: f32) -> f32 {
        let ratio = f32::from(raw) / f32::from(ADC_FULL_SCALE);
        if Q::REQUIRES_MAX {
            ratio * full_scale
        } else {
            ratio.clamp(0.0, 1.0)
        }
    }

    /// Read the optional digital status line.
    ///
    /// # Errors
    /// - `NotInitialized` before init
    /// - `InvalidConfig` if no status channel is configured
    pub fn check_status(&self, peripheral: &mut dyn Peripheral) -> Result<DioLevel, IoHwAbError> {
        let (config, _) = self.bound()?;
        let channel = config
            .status_channel
            .ok_or_else(|| Self::invalid_config("no status channel configured"))?;
        let level = peripheral.read_dio(channel)?;
        trace!("{} status line {} reads {:?}", Q::NAME, channel, level);
        Ok(level)
    }
}

impl<Q: SensorQuantity> Readable<f32> for IoHwAb<Q> {
    fn read(&self, peripheral: &mut dyn Peripheral) -> Result<f32, IoHwAbError> {
        let (config, full_scale) = self.bound()?;
        let raw = peripheral.read_adc(config.channel)?;
        if raw > ADC_FULL_SCALE {
            return Err(PeripheralError::SampleOutOfRange {
                channel: config.channel,
                raw,
            }
            .into());
        }
        let value = Self::convert(raw, full_scale);
        trace!("{} raw={} value={:.3}", Q::NAME, raw, value);
        Ok(value)
    }
}

impl<Q: ActuatorQuantity> IoHwAb<Q> {
    /// Duty cycle [%] for a command already checked against the range.
    fn duty_for(value: f32, full_scale: f32) -> u16 {
        let duty = ((value / full_scale) * f32::from(DUTY_CYCLE_MAX)).round();
        duty.clamp(0.0, f32::from(DUTY_CYCLE_MAX)) as u16
    }

    /// Command torque through the bound PWM channel. Same as `Writable::write`.
    pub fn write_torque(
        &mut self,
        peripheral: &mut dyn Peripheral,
        value: f32,
    ) -> Result<(), IoHwAbError> {
        self.write(peripheral, value)
    }
}

impl<Q: ActuatorQuantity> Writable<f32> for IoHwAb<Q> {
    fn write(&mut self, peripheral: &mut dyn Peripheral, value: f32) -> Result<(), IoHwAbError> {
        let (config, full_scale) = self.bound()?;
        if !value.is_finite() {
            return Err(IoHwAbError::InvalidArgument {
                quantity: Q::NAME,
                reason: format!("command {value} is not finite"),
            });
        }
        if !(0.0..=full_scale).contains(&value) {
            return Err(IoHwAbError::OutOfRange {
                quantity: Q::NAME,
                value,
                min: 0.0,
                max: full_scale,
            });
        }

        let duty = Self::duty_for(value, full_scale);
        peripheral.set_duty_cycle(config.channel, duty)?;
        trace!("{} command={:.3} duty={}%", Q::NAME, value, duty);
        Ok(())
    }
}
