//! Integration test: initialization failures.
//!
//! The first failing subsystem halts initialization, is named in the
//! error, and leaves the component `Uninitialized`.

use ecu_common::control_unit::config::ControlParams;
use ecu_common::control_unit::error::ControlError;
use ecu_common::control_unit::event::ControlEvent;
use ecu_common::control_unit::state::{ControlState, Subsystem};
use ecu_common::hal::config::{ChannelMap, PeripheralConfig, SensorConfig};
use ecu_common::hal::driver::{Peripheral, PeripheralError};
use ecu_common::hal::error::IoHwAbError;
use ecu_control_unit::observer::RecordingObserver;
use ecu_control_unit::rte::Rte;
use ecu_control_unit::torque_control::TorqueControl;
use ecu_hal::drivers::ScriptedPeripheral;

use super::Bench;

#[test]
fn missing_load_config_halts_init() {
    let channels = ChannelMap {
        load: None,
        ..ChannelMap::default()
    };
    let mut bench = Bench::with(channels, ControlParams::default());

    let err = bench.control.init().unwrap_err();
    match &err {
        ControlError::InitFailed { subsystem, source } => {
            assert_eq!(*subsystem, Subsystem::Load);
            assert!(matches!(source, IoHwAbError::InvalidConfig { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(bench.control.state(), ControlState::Uninitialized);
    assert_eq!(bench.control.update(), Err(ControlError::NotReady));

    // Later subsystems were never attempted.
    assert!(bench.control.rte().is_initialized(Subsystem::Speed));
    assert!(!bench.control.rte().is_initialized(Subsystem::TorqueSensor));
    assert!(!bench.control.rte().is_initialized(Subsystem::MotorDriver));
    assert_eq!(bench.peripheral.duty(1), None);

    let events = bench.control.observer().events();
    assert_eq!(events.len(), 3);
    assert!(matches!(
        events[2],
        ControlEvent::InitFailed {
            subsystem: Subsystem::Load,
            ..
        }
    ));
}

#[test]
fn motor_without_max_is_invalid() {
    let channels = ChannelMap {
        motor: Some(SensorConfig::normalized(1)),
        ..ChannelMap::default()
    };
    let mut bench = Bench::with(channels, ControlParams::default());

    let err = bench.control.init().unwrap_err();
    assert!(matches!(
        err,
        ControlError::InitFailed {
            subsystem: Subsystem::MotorDriver,
            source: IoHwAbError::InvalidConfig { .. }
        }
    ));
    assert!(!bench.control.is_ready());
}

#[test]
fn uninitialized_peripheral_surfaces_as_peripheral_error() {
    let driver = ScriptedPeripheral::new();
    let rte = Rte::new(Box::new(driver), ChannelMap::default());
    let mut control =
        TorqueControl::with_observer(rte, ControlParams::default(), RecordingObserver::new());

    let err = control.init().unwrap_err();
    assert_eq!(
        err,
        ControlError::InitFailed {
            subsystem: Subsystem::Throttle,
            source: IoHwAbError::Peripheral(PeripheralError::NotInitialized),
        }
    );
}

#[test]
fn retry_after_fixing_peripheral_succeeds() {
    let mut driver = ScriptedPeripheral::new();
    let rte = Rte::new(Box::new(driver.clone()), ChannelMap::default());
    let mut control =
        TorqueControl::with_observer(rte, ControlParams::default(), RecordingObserver::new());

    assert!(control.init().is_err());

    driver.init(&PeripheralConfig::default()).unwrap();
    assert!(driver.is_initialized());
    control.init().unwrap();
    assert_eq!(control.state(), ControlState::Ready);
}

#[test]
fn duplicate_adc_binding_rejected_by_validation() {
    let channels = ChannelMap {
        speed: Some(SensorConfig::scaled(0, 200.0)),
        ..ChannelMap::default()
    };
    assert!(channels.validate().is_err());
}
