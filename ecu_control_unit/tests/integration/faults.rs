//! Integration test: per-cycle faults.
//!
//! Read and write failures are reported, recorded in the cycle report, and
//! never abort the cycle. Failed inputs contribute 0.0.

use ecu_common::control_unit::config::CycleConfig;
use ecu_common::control_unit::error::CycleFaults;
use ecu_common::control_unit::event::{ControlEvent, Deviation};
use ecu_common::control_unit::state::Subsystem;
use ecu_common::hal::consts::{
    LOAD_CHANNEL, MOTOR_CHANNEL, SPEED_CHANNEL, THROTTLE_CHANNEL, TORQUE_SENSOR_CHANNEL,
};
use ecu_control_unit::cycle::CycleRunner;

use super::Bench;

#[test]
fn throttle_failure_commands_zero() {
    let mut bench = Bench::ready();
    bench.set_inputs(0.8, 10.0, 100.0);
    bench.peripheral.fail_adc(THROTTLE_CHANNEL);

    let report = bench.control.update().unwrap();
    assert_eq!(report.inputs.throttle, 0.0);
    assert_eq!(report.demand.desired, 0.0);
    assert_eq!(report.faults, CycleFaults::THROTTLE_READ);
    assert!(report.faults.has_input_fault());
    assert_eq!(bench.peripheral.duty(MOTOR_CHANNEL), Some(0));

    assert!(bench.control.observer().events().iter().any(|e| matches!(
        e,
        ControlEvent::ReadFailed {
            subsystem: Subsystem::Throttle,
            ..
        }
    )));
}

#[test]
fn speed_failure_skips_derate() {
    let mut bench = Bench::ready();
    bench.set_inputs(1.0, 150.0, 0.0);
    bench.peripheral.fail_adc(SPEED_CHANNEL);

    let report = bench.control.update().unwrap();
    assert_eq!(report.inputs.speed_kmh, 0.0);
    assert_eq!(report.demand.desired, 100.0);
}

#[test]
fn load_failure_skips_bonus() {
    let mut bench = Bench::ready();
    bench.set_inputs(0.0, 0.0, 900.0);
    bench.peripheral.fail_adc(LOAD_CHANNEL);

    let report = bench.control.update().unwrap();
    assert_eq!(report.demand.desired, 0.0);
    assert_eq!(report.faults, CycleFaults::LOAD_READ);
}

#[test]
fn write_failure_is_not_fatal() {
    let mut bench = Bench::ready();
    bench.set_inputs(1.0, 0.0, 0.0);
    bench.peripheral.fail_pwm(MOTOR_CHANNEL);

    let report = bench.control.update().unwrap();
    assert_eq!(report.faults, CycleFaults::MOTOR_WRITE);
    assert!(!report.command_applied());
    assert_eq!(report.deviation, Deviation::IncreaseNeeded);
    assert_eq!(bench.peripheral.duty(MOTOR_CHANNEL), Some(0));

    bench.peripheral.clear_faults();
    let report = bench.control.update().unwrap();
    assert!(report.command_applied());
    assert_eq!(bench.peripheral.duty(MOTOR_CHANNEL), Some(33));
}

#[test]
fn out_of_range_sample_is_a_read_fault() {
    let mut bench = Bench::ready();
    bench.peripheral.set_sample(TORQUE_SENSOR_CHANNEL, 4095);

    let report = bench.control.update().unwrap();
    assert_eq!(report.faults, CycleFaults::TORQUE_READ);
    assert_eq!(report.actual_torque, 0.0);
}

#[test]
fn every_step_failing_still_completes() {
    let mut bench = Bench::ready();
    for channel in [THROTTLE_CHANNEL, SPEED_CHANNEL, LOAD_CHANNEL, TORQUE_SENSOR_CHANNEL] {
        bench.peripheral.fail_adc(channel);
    }
    bench.peripheral.fail_pwm(MOTOR_CHANNEL);

    let report = bench.control.update().unwrap();
    assert_eq!(report.faults, CycleFaults::all());
    assert_eq!(report.deviation, Deviation::OnTarget);
}

#[test]
fn runner_stops_after_max_cycles() {
    let bench = Bench::ready();
    bench.set_inputs(0.5, 0.0, 0.0);
    bench.peripheral.fail_adc(LOAD_CHANNEL);

    let config = CycleConfig {
        cycle_time_us: 1_000,
        max_cycles: 5,
    };
    let mut runner = CycleRunner::new(bench.control, &config);
    let summary = runner.run().unwrap();

    assert_eq!(summary.timing.cycle_count, 5);
    assert_eq!(summary.control.faulted_cycles, 5);
    assert_eq!(summary.control.read_failures, 5);
    assert_eq!(summary.control.write_failures, 0);
    assert_eq!(summary.control.increase_needed, 5);
    assert_eq!(bench.peripheral.duty_history().len(), 5);
    assert!(!runner.running_flag().load(std::sync::atomic::Ordering::SeqCst));
}

#[test]
fn runner_honours_cleared_flag() {
    let bench = Bench::ready();
    let config = CycleConfig {
        cycle_time_us: 1_000,
        max_cycles: 0,
    };
    let mut runner = CycleRunner::new(bench.control, &config);
    let flag = runner.running_flag();

    let stopper = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(30));
        flag.store(false, std::sync::atomic::Ordering::SeqCst);
    });
    let summary = runner.run().unwrap();
    stopper.join().unwrap();

    assert!(summary.timing.cycle_count > 0);
    assert!(serde_json::to_string(&summary).unwrap().contains("cycle_count"));
}

#[test]
fn runner_stopped_before_start_runs_no_cycle() {
    let bench = Bench::ready();
    let config = CycleConfig {
        cycle_time_us: 1_000,
        max_cycles: 3,
    };
    let mut runner = CycleRunner::new(bench.control, &config);
    assert!(runner.running_flag().load(std::sync::atomic::Ordering::SeqCst));

    runner
        .running_flag()
        .store(false, std::sync::atomic::Ordering::SeqCst);
    let summary = runner.run().unwrap();

    assert_eq!(summary.timing.cycle_count, 0);
    assert!(bench.peripheral.duty_history().is_empty());
}

#[test]
fn runner_rejects_uninitialized_component() {
    let bench = Bench::new();
    let mut runner = CycleRunner::new(bench.control, &CycleConfig::default());
    assert!(runner.run().is_err());
}
