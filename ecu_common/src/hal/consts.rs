//! HAL (Hardware Abstraction Layer) constants.
//!
//! Peripheral limits plus the reference channel assignment and range
//! ceilings of the five torque-control quantities.

use static_assertions::const_assert;

/// Resolution of the analog-to-digital converter [bit].
pub const ADC_RESOLUTION_BITS: u8 = 10;

/// Full-scale raw ADC code (10-bit converter).
pub const ADC_FULL_SCALE: u16 = 1023;

/// Default ADC sampling rate [Hz].
pub const ADC_SAMPLING_RATE_HZ: u32 = 1000;

/// Default PWM period [ms].
pub const PWM_PERIOD_MS: u16 = 1000;

/// Largest duty cycle accepted by a PWM output [%].
pub const DUTY_CYCLE_MAX: u16 = 100;

/// Number of addressable channels per peripheral kind.
pub const MAX_CHANNELS: usize = 16;

/// Upper bound for the simulated per-sample delay [ms].
pub const SAMPLE_DELAY_MS_MAX: u32 = 1000;

/// Highest standard (11-bit) CAN identifier.
pub const CAN_MAX_ID: u16 = 0x7FF;

/// Maximum CAN payload length [bytes].
pub const CAN_MAX_DLC: usize = 8;

// ─── Reference Channel Map ──────────────────────────────────────────

/// Throttle position sensor ADC channel.
pub const THROTTLE_CHANNEL: u8 = 0;

/// Vehicle speed sensor ADC channel.
pub const SPEED_CHANNEL: u8 = 1;
/// Vehicle speed sensor full-scale value [km/h].
pub const SPEED_MAX_KMH: f32 = 200.0;

/// Load weight sensor ADC channel.
pub const LOAD_CHANNEL: u8 = 2;
/// Load weight sensor full-scale value [kg].
pub const LOAD_MAX_KG: f32 = 1000.0;

/// Torque feedback sensor ADC channel.
pub const TORQUE_SENSOR_CHANNEL: u8 = 3;
/// Torque feedback sensor full-scale value [Nm].
pub const TORQUE_SENSOR_MAX_NM: f32 = 500.0;

/// Motor driver PWM channel.
pub const MOTOR_CHANNEL: u8 = 1;
/// Motor driver maximum torque [Nm].
pub const MOTOR_MAX_TORQUE_NM: f32 = 300.0;

const_assert!(ADC_FULL_SCALE as u32 == (1u32 << ADC_RESOLUTION_BITS) - 1);
const_assert!((THROTTLE_CHANNEL as usize) < MAX_CHANNELS);
const_assert!((SPEED_CHANNEL as usize) < MAX_CHANNELS);
const_assert!((LOAD_CHANNEL as usize) < MAX_CHANNELS);
const_assert!((TORQUE_SENSOR_CHANNEL as usize) < MAX_CHANNELS);
const_assert!((MOTOR_CHANNEL as usize) < MAX_CHANNELS);
const_assert!(CAN_MAX_DLC == 8);
