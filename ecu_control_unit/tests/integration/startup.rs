//! Integration test: startup sequence.
//!
//! Validates: config loading from a TOML string → driver created from the
//! registry → MCAL init → five subsystem inits in order → first cycle.

use ecu_common::control_unit::event::ControlEvent;
use ecu_common::control_unit::state::{ControlState, Subsystem};
use ecu_control_unit::config::{ConfigOverrides, build_rte, load_config_from_str};
use ecu_control_unit::observer::RecordingObserver;
use ecu_control_unit::torque_control::TorqueControl;
use ecu_hal::driver_registry::DriverRegistry;

// ── Minimal config TOML ─────────────────────────────────────────────

const ECU_TOML: &str = r#"
[shared]
service_name = "bench-ecu"

[cycle]
cycle_time_us = 10000
max_cycles = 3

[peripheral]
driver = "scripted"

[[peripheral.scripted_samples]]
channel = 0
raw = 1023

[[peripheral.scripted_samples]]
channel = 3
raw = 1023
"#;

#[test]
fn config_to_first_cycle() {
    let config = load_config_from_str(ECU_TOML, &ConfigOverrides::default()).unwrap();
    let registry = DriverRegistry::with_builtin_drivers().unwrap();
    let rte = build_rte(&registry, &config).unwrap();

    let mut control = TorqueControl::with_observer(rte, config.control, RecordingObserver::new());
    assert_eq!(control.state(), ControlState::Uninitialized);

    control.init().unwrap();
    assert_eq!(control.state(), ControlState::Ready);

    let report = control.update().unwrap();
    assert_eq!(report.inputs.throttle, 1.0);
    assert_eq!(report.demand.desired, 100.0);
    assert_eq!(report.actual_torque, 500.0);
    assert_eq!(control.rte().peripheral().duty_cycle(1), Some(33));
}

#[test]
fn subsystems_initialize_in_order() {
    let config = load_config_from_str(ECU_TOML, &ConfigOverrides::default()).unwrap();
    let registry = DriverRegistry::with_builtin_drivers().unwrap();
    let rte = build_rte(&registry, &config).unwrap();
    let mut control = TorqueControl::with_observer(rte, config.control, RecordingObserver::new());
    control.init().unwrap();

    let ready: Vec<Subsystem> = control
        .observer()
        .events()
        .iter()
        .filter_map(|e| match e {
            ControlEvent::SubsystemReady(s) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(ready, Subsystem::INIT_ORDER.to_vec());
    assert_eq!(control.observer().events().last(), Some(&ControlEvent::Ready));

    for subsystem in Subsystem::INIT_ORDER {
        assert!(control.rte().is_initialized(subsystem));
    }
}

#[test]
fn simulation_driver_runs_with_seed() {
    let overrides = ConfigOverrides {
        driver: Some("simulation".to_string()),
        seed: Some(1234),
        ..ConfigOverrides::default()
    };
    let config = load_config_from_str("", &overrides).unwrap();
    let registry = DriverRegistry::with_builtin_drivers().unwrap();
    let rte = build_rte(&registry, &config).unwrap();

    let mut control = TorqueControl::with_observer(rte, config.control, RecordingObserver::new());
    control.init().unwrap();
    for _ in 0..20 {
        let report = control.update().unwrap();
        assert!(report.faults.is_empty());
        assert!((0.0..=100.0).contains(&report.demand.desired));
        assert!((0.0..=1.0).contains(&report.inputs.throttle));
    }
}

#[test]
fn shutdown_after_run() {
    let config = load_config_from_str(ECU_TOML, &ConfigOverrides::default()).unwrap();
    let registry = DriverRegistry::with_builtin_drivers().unwrap();
    let rte = build_rte(&registry, &config).unwrap();
    let mut control = TorqueControl::with_observer(rte, config.control, RecordingObserver::new());
    control.init().unwrap();
    control.update().unwrap();

    let (mut rte, _) = control.into_parts();
    let diag = rte.peripheral().diagnostics().unwrap();
    assert_eq!(diag.adc_reads, 4);
    assert_eq!(diag.pwm_writes, 1);
    rte.shutdown().unwrap();
}
