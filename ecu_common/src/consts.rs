//! System-wide constants for the ECU workspace.
//!
//! Single source of truth for cycle timing and default paths.
//! Imported by all crates; do not duplicate them elsewhere.

/// Default control cycle time in microseconds (10 Hz = 100 000 µs).
pub const CYCLE_TIME_US: u64 = 100_000;

/// Minimum accepted control cycle time [µs].
pub const CYCLE_TIME_US_MIN: u64 = 1_000;

/// Maximum accepted control cycle time [µs] (10 s).
pub const CYCLE_TIME_US_MAX: u64 = 10_000_000;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/ecu/ecu.toml";

/// Canonical service name of the torque control unit (used for logging).
pub const SERVICE_NAME: &str = "ecu_torque_control";
