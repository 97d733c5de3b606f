//! Property tests: control law bounds and the read → compute → write path.

use ecu_common::control_unit::config::ControlParams;
use ecu_common::hal::consts::{
    LOAD_CHANNEL, MOTOR_CHANNEL, MOTOR_MAX_TORQUE_NM, SPEED_CHANNEL, THROTTLE_CHANNEL,
};
use ecu_control_unit::control::{ControlInputs, clamp_torque, compute_demand};
use proptest::prelude::*;

use super::Bench;

fn inputs() -> impl Strategy<Value = ControlInputs> {
    (0.0f32..=1.0, 0.0f32..=250.0, 0.0f32..=1500.0).prop_map(|(throttle, speed_kmh, load_kg)| {
        ControlInputs {
            throttle,
            speed_kmh,
            load_kg,
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn demand_stays_within_limits(inputs in inputs()) {
        let params = ControlParams::default();
        let demand = compute_demand(&inputs, &params);
        prop_assert!(demand.desired >= params.min_torque);
        prop_assert!(demand.desired <= params.max_torque);
        prop_assert_eq!(clamp_torque(demand.desired, &params), demand.desired);
    }

    #[test]
    fn demand_matches_formula(inputs in inputs()) {
        let params = ControlParams::default();
        let mut expected = inputs.throttle * 100.0;
        if inputs.speed_kmh > 50.0 {
            expected *= 0.8;
        }
        if inputs.load_kg > 500.0 {
            expected += 10.0;
        }
        let demand = compute_demand(&inputs, &params);
        prop_assert_eq!(demand.raw, expected);
        prop_assert_eq!(demand.desired, expected.clamp(0.0, 100.0));
    }

    #[test]
    fn demand_is_monotonic_in_throttle(
        base in inputs(),
        a in 0.0f32..=1.0,
        b in 0.0f32..=1.0,
    ) {
        let params = ControlParams::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let low = compute_demand(&ControlInputs { throttle: lo, ..base }, &params);
        let high = compute_demand(&ControlInputs { throttle: hi, ..base }, &params);
        prop_assert!(low.desired <= high.desired);
    }

    #[test]
    fn clamp_is_monotonic_and_idempotent(a in -500.0f32..=500.0, b in -500.0f32..=500.0) {
        let params = ControlParams::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let clamped_lo = clamp_torque(lo, &params);
        let clamped_hi = clamp_torque(hi, &params);
        prop_assert!(clamped_lo <= clamped_hi);
        prop_assert!((params.min_torque..=params.max_torque).contains(&clamped_lo));
        prop_assert_eq!(clamp_torque(clamped_hi, &params), clamped_hi);
    }

    #[test]
    fn cycle_writes_scaled_command(
        throttle in 0u16..=1023,
        speed in 0u16..=1023,
        load in 0u16..=1023,
    ) {
        let mut bench = Bench::ready();
        bench.peripheral.set_sample(THROTTLE_CHANNEL, throttle);
        bench.peripheral.set_sample(SPEED_CHANNEL, speed);
        bench.peripheral.set_sample(LOAD_CHANNEL, load);

        let report = bench.control.update().unwrap();
        prop_assert!(report.faults.is_empty());
        prop_assert_eq!(
            report.demand,
            compute_demand(&report.inputs, bench.control.params())
        );

        let expected = (report.demand.desired / MOTOR_MAX_TORQUE_NM * 100.0).round() as u16;
        prop_assert_eq!(bench.peripheral.duty(MOTOR_CHANNEL), Some(expected));
    }
}
