//! Physical quantities bound by the abstraction layer.
//!
//! Each quantity is a zero-sized marker type. The marker fixes the
//! direction (sensor or actuator), whether a `max_value` is required, and
//! the subsystem name used in errors and logs.

use ecu_common::control_unit::state::Subsystem;

/// Peripheral channel kind bound at init.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// ADC input.
    Adc,
    /// PWM output.
    Pwm,
}

/// A physical quantity served by one `IoHwAb` instance.
pub trait Quantity: Send + 'static {
    /// Subsystem this quantity belongs to.
    const SUBSYSTEM: Subsystem;
    /// Name used in errors and logs.
    const NAME: &'static str = Self::SUBSYSTEM.name();
    /// Peripheral channel kind armed at init.
    const CHANNEL_KIND: ChannelKind;
    /// Whether `SensorConfig::max_value` is mandatory.
    const REQUIRES_MAX: bool;
}

/// Quantity read from an ADC channel.
pub trait SensorQuantity: Quantity {}

/// Quantity driven through a PWM channel.
pub trait ActuatorQuantity: Quantity {}

/// Throttle pedal position, `0.0..=1.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThrottlePosition;

/// Vehicle speed [km/h].
#[derive(Debug, Clone, Copy, Default)]
pub struct VehicleSpeed;

/// Load weight [kg].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadWeight;

/// Actual torque read back from the torque sensor [Nm].
#[derive(Debug, Clone, Copy, Default)]
pub struct ActualTorque;

/// Torque command to the motor driver [Nm].
#[derive(Debug, Clone, Copy, Default)]
pub struct MotorTorque;

impl Quantity for ThrottlePosition {
    const SUBSYSTEM: Subsystem = Subsystem::Throttle;
    const CHANNEL_KIND: ChannelKind = ChannelKind::Adc;
    const REQUIRES_MAX: bool = false;
}

impl Quantity for VehicleSpeed {
    const SUBSYSTEM: Subsystem = Subsystem::Speed;
    const CHANNEL_KIND: ChannelKind = ChannelKind::Adc;
    const REQUIRES_MAX: bool = true;
}

impl Quantity for LoadWeight {
    const SUBSYSTEM: Subsystem = Subsystem::Load;
    const CHANNEL_KIND: ChannelKind = ChannelKind::Adc;
    const REQUIRES_MAX: bool = true;
}

impl Quantity for ActualTorque {
    const SUBSYSTEM: Subsystem = Subsystem::TorqueSensor;
    const CHANNEL_KIND: ChannelKind = ChannelKind::Adc;
    const REQUIRES_MAX: bool = true;
}

impl Quantity for MotorTorque {
    const SUBSYSTEM: Subsystem = Subsystem::MotorDriver;
    const CHANNEL_KIND: ChannelKind = ChannelKind::Pwm;
    const REQUIRES_MAX: bool = true;
}

impl SensorQuantity for ThrottlePosition {}
impl SensorQuantity for VehicleSpeed {}
impl SensorQuantity for LoadWeight {}
impl SensorQuantity for ActualTorque {}
impl ActuatorQuantity for MotorTorque {}
