//! Shared fixtures for the integration tests.

mod faults;
mod init_failure;
mod properties;
mod scenarios;
mod startup;

use ecu_common::control_unit::config::ControlParams;
use ecu_common::hal::config::{ChannelMap, PeripheralConfig};
use ecu_common::hal::consts::{ADC_FULL_SCALE, LOAD_CHANNEL, SPEED_CHANNEL, THROTTLE_CHANNEL};
use ecu_common::hal::driver::Peripheral;
use ecu_control_unit::observer::RecordingObserver;
use ecu_control_unit::rte::Rte;
use ecu_control_unit::torque_control::TorqueControl;
use ecu_hal::drivers::ScriptedPeripheral;

/// Component wired to a scripted peripheral, plus a handle to program it.
pub struct Bench {
    pub control: TorqueControl<RecordingObserver>,
    pub peripheral: ScriptedPeripheral,
}

impl Bench {
    /// Reference channels and calibration.
    pub fn new() -> Self {
        Self::with(ChannelMap::default(), ControlParams::default())
    }

    /// Custom channels and calibration.
    pub fn with(channels: ChannelMap, params: ControlParams) -> Self {
        let mut driver = ScriptedPeripheral::new();
        driver
            .init(&PeripheralConfig::default())
            .expect("scripted peripheral init");
        let peripheral = driver.clone();
        let rte = Rte::new(Box::new(driver), channels);
        let control = TorqueControl::with_observer(rte, params, RecordingObserver::new());
        Self {
            control,
            peripheral,
        }
    }

    /// Initialized bench with reference channels and calibration.
    pub fn ready() -> Self {
        let mut bench = Self::new();
        bench.control.init().expect("reference init");
        bench.control.observer_mut().clear();
        bench
    }

    /// Program the three control inputs in engineering units (reference ranges).
    pub fn set_inputs(&self, throttle: f32, speed_kmh: f32, load_kg: f32) {
        self.peripheral
            .set_sample(THROTTLE_CHANNEL, raw_for(throttle, 1.0));
        self.peripheral
            .set_sample(SPEED_CHANNEL, raw_for(speed_kmh, 200.0));
        self.peripheral.set_sample(LOAD_CHANNEL, raw_for(load_kg, 1000.0));
    }
}

/// Nearest raw code for `value` on a channel scaled to `max`.
pub fn raw_for(value: f32, max: f32) -> u16 {
    ((value / max) * f32::from(ADC_FULL_SCALE)).round() as u16
}

/// Approximate equality for values reconstructed from 10-bit codes.
pub fn assert_close(actual: f32, expected: f32, tol: f32) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected} ± {tol}, got {actual}"
    );
}
