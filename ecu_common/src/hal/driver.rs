//! Peripheral driver traits and error types.
//!
//! This module defines:
//! - `AnalogInput`, `DigitalIo`, `PwmOutput`, `CanTransport` - Channel-addressed capabilities
//! - `Peripheral` trait - Umbrella interface for pluggable peripheral drivers
//! - `PeripheralError` enum - Error types for peripheral operations
//! - `DriverFactory` type alias - Factory function type
//! - `PeripheralDiagnostics` struct - Optional driver counters

use crate::hal::config::PeripheralConfig;
use crate::hal::types::{CanFrame, DioLevel};
use serde::Serialize;
use thiserror::Error;

/// Error types for peripheral operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeripheralError {
    /// Driver used before `init()` or after `shutdown()`
    #[error("Peripheral not initialized")]
    NotInitialized,

    /// Driver initialization failed
    #[error("Initialization failed: {0}")]
    InitFailed(String),

    /// Channel number outside the addressable range
    #[error("Invalid channel {0}")]
    InvalidChannel(u8),

    /// Channel accessed before it was armed
    #[error("{kind} channel {channel} not armed")]
    ChannelNotArmed {
        /// Peripheral kind ("ADC", "DIO", "PWM")
        kind: &'static str,
        /// Channel number
        channel: u8,
    },

    /// Converter returned a code outside its full-scale range
    #[error("ADC channel {channel} sample {raw} outside converter range")]
    SampleOutOfRange {
        /// Channel number
        channel: u8,
        /// Raw code returned by the converter
        raw: u16,
    },

    /// Duty cycle above 100 %
    #[error("PWM channel {channel} duty cycle {duty}% out of range")]
    InvalidDutyCycle {
        /// Channel number
        channel: u8,
        /// Requested duty cycle [%]
        duty: u16,
    },

    /// Malformed CAN frame
    #[error("Invalid CAN frame: {0}")]
    InvalidFrame(String),

    /// Hardware (or simulated) communication failure
    #[error("Hardware communication error: {0}")]
    Communication(String),
}

/// Analog-to-digital conversion capability.
pub trait AnalogInput {
    /// Arm an ADC channel for subsequent sampling.
    fn arm_adc_channel(&mut self, channel: u8) -> Result<(), PeripheralError>;

    /// Sample an armed ADC channel. Returns the raw code in `0..=ADC_FULL_SCALE`.
    fn read_adc(&mut self, channel: u8) -> Result<u16, PeripheralError>;
}

/// Digital I/O capability.
pub trait DigitalIo {
    /// Arm a DIO line.
    fn arm_dio_channel(&mut self, channel: u8) -> Result<(), PeripheralError>;

    /// Read the level of an armed DIO line.
    fn read_dio(&mut self, channel: u8) -> Result<DioLevel, PeripheralError>;

    /// Drive an armed DIO line.
    fn write_dio(&mut self, channel: u8, level: DioLevel) -> Result<(), PeripheralError>;
}

/// Pulse-width modulation output capability.
pub trait PwmOutput {
    /// Arm a PWM channel with the given period; duty cycle starts at 0 %.
    fn arm_pwm_channel(&mut self, channel: u8, period_ms: u16) -> Result<(), PeripheralError>;

    /// Set the duty cycle [%] of an armed PWM channel.
    fn set_duty_cycle(&mut self, channel: u8, duty_percent: u16) -> Result<(), PeripheralError>;

    /// Last duty cycle applied to a channel, `None` if the channel is not armed.
    fn duty_cycle(&self, channel: u8) -> Option<u16>;
}

/// CAN-style message transport capability.
pub trait CanTransport {
    /// Queue a frame for transmission.
    fn send(&mut self, frame: &CanFrame) -> Result<(), PeripheralError>;

    /// Fetch the next received frame, if any.
    fn receive(&mut self) -> Result<Option<CanFrame>, PeripheralError>;
}

/// Factory function type for creating driver instances.
pub type DriverFactory = fn(&PeripheralConfig) -> Box<dyn Peripheral>;

/// Optional driver counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeripheralDiagnostics {
    /// Number of ADC samples taken
    pub adc_reads: u64,
    /// Number of DIO reads
    pub dio_reads: u64,
    /// Number of DIO writes
    pub dio_writes: u64,
    /// Number of PWM duty-cycle updates
    pub pwm_writes: u64,
    /// Number of CAN frames sent
    pub can_sent: u64,
    /// Number of CAN frames received
    pub can_received: u64,
    /// Number of failed operations
    pub errors: u64,
}

/// Trait defining the interface for peripheral drivers.
///
/// The torque-control stack talks to hardware only through this trait,
/// enabling pluggable backends (simulation, scripted test doubles, real MCAL).
///
/// # Lifecycle
///
/// 1. `init()` - Called once before any channel is armed
/// 2. `arm_*_channel()` - Called by the abstraction layer for each bound channel
/// 3. read/write operations - Called every control cycle
/// 4. `shutdown()` - Called when the control unit is stopping
pub trait Peripheral: AnalogInput + DigitalIo + PwmOutput + CanTransport + Send {
    /// Returns the driver's unique identifier (e.g., "simulation", "scripted").
    fn name(&self) -> &'static str;

    /// Returns the driver's semantic version.
    fn version(&self) -> &'static str;

    /// Initialize ADC, DIO, PWM and CAN with the peripheral configuration.
    ///
    /// # Errors
    /// Return `PeripheralError::InitFailed` if initialization cannot complete.
    fn init(&mut self, config: &PeripheralConfig) -> Result<(), PeripheralError>;

    /// Release the peripheral. Armed channels are disarmed.
    fn shutdown(&mut self) -> Result<(), PeripheralError>;

    /// Get driver counters.
    /// Default: None
    fn diagnostics(&self) -> Option<PeripheralDiagnostics> {
        None
    }
}
