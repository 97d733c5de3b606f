//! Integration test: reference driving scenarios end to end.
//!
//! Inputs are programmed as 10-bit codes, so reconstructed values carry
//! up to half a code of quantization.

use ecu_common::control_unit::event::{ControlEvent, Deviation};
use ecu_common::hal::consts::{MOTOR_CHANNEL, TORQUE_SENSOR_CHANNEL};

use super::{Bench, assert_close, raw_for};

#[test]
fn cruising_half_throttle() {
    let mut bench = Bench::ready();
    bench.set_inputs(0.5, 30.0, 200.0);

    let report = bench.control.update().unwrap();
    assert_close(report.inputs.throttle, 0.5, 0.001);
    assert_close(report.demand.desired, 50.0, 0.1);
    assert!(report.faults.is_empty());
    assert_eq!(bench.peripheral.duty(MOTOR_CHANNEL), Some(17));
}

#[test]
fn fast_and_heavy() {
    let mut bench = Bench::ready();
    bench.set_inputs(0.9, 60.0, 600.0);

    let report = bench.control.update().unwrap();
    assert!(report.inputs.speed_kmh > 50.0);
    assert!(report.inputs.load_kg > 500.0);
    assert_close(report.demand.desired, 82.0, 0.1);
    assert_eq!(bench.peripheral.duty(MOTOR_CHANNEL), Some(27));
}

#[test]
fn full_throttle_standstill() {
    let mut bench = Bench::ready();
    bench.set_inputs(1.0, 0.0, 0.0);

    let report = bench.control.update().unwrap();
    assert_eq!(report.demand.desired, 100.0);
    assert_eq!(bench.peripheral.duty(MOTOR_CHANNEL), Some(33));
}

#[test]
fn full_throttle_heavy_load_is_clamped() {
    let mut bench = Bench::ready();
    bench.set_inputs(1.0, 0.0, 1000.0);

    let report = bench.control.update().unwrap();
    assert_eq!(report.demand.raw, 110.0);
    assert_eq!(report.demand.desired, 100.0);
}

#[test]
fn deviation_is_reported_not_corrected() {
    let mut bench = Bench::ready();
    bench.set_inputs(1.0, 0.0, 0.0);

    bench
        .peripheral
        .set_sample(TORQUE_SENSOR_CHANNEL, raw_for(20.0, 500.0));
    let low = bench.control.update().unwrap();
    assert_eq!(low.deviation, Deviation::IncreaseNeeded);

    bench
        .peripheral
        .set_sample(TORQUE_SENSOR_CHANNEL, raw_for(400.0, 500.0));
    let high = bench.control.update().unwrap();
    assert_eq!(high.deviation, Deviation::DecreaseNeeded);

    // Command unchanged by the comparison.
    assert_eq!(low.demand.desired, high.demand.desired);
    assert_eq!(
        bench.peripheral.duty_history(),
        vec![(MOTOR_CHANNEL, 33), (MOTOR_CHANNEL, 33)]
    );

    let deviations = bench
        .control
        .observer()
        .events()
        .iter()
        .filter(|e| matches!(e, ControlEvent::Deviation { .. }))
        .count();
    assert_eq!(deviations, 2);
}

#[test]
fn on_target_emits_no_deviation_event() {
    let mut bench = Bench::ready();
    let report = bench.control.update().unwrap();
    assert_eq!(report.deviation, Deviation::OnTarget);
    assert!(
        !bench
            .control
            .observer()
            .events()
            .iter()
            .any(|e| matches!(e, ControlEvent::Deviation { .. }))
    );
}

#[test]
fn cycle_event_sequence() {
    let mut bench = Bench::ready();
    bench.set_inputs(0.5, 0.0, 0.0);
    bench.control.update().unwrap();

    let kinds: Vec<&'static str> = bench
        .control
        .observer()
        .events()
        .iter()
        .map(|e| match e {
            ControlEvent::InputRead { .. } => "read",
            ControlEvent::ReadFailed { .. } => "read_failed",
            ControlEvent::DemandComputed { .. } => "demand",
            ControlEvent::CommandWritten { .. } => "write",
            ControlEvent::WriteFailed { .. } => "write_failed",
            ControlEvent::Deviation { .. } => "deviation",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["read", "read", "read", "demand", "write", "read", "deviation"]
    );
}
