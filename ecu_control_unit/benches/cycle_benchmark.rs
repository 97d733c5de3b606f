//! Cycle benchmark: control law alone and one full read → compute → write
//! → compare cycle against the scripted peripheral.
//!
//! The full-cycle group excludes pacing sleeps and logging; the observer
//! discards every event.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use ecu_common::control_unit::config::ControlParams;
use ecu_common::control_unit::event::ControlEvent;
use ecu_common::hal::config::{ChannelMap, PeripheralConfig};
use ecu_common::hal::consts::{LOAD_CHANNEL, SPEED_CHANNEL, THROTTLE_CHANNEL, TORQUE_SENSOR_CHANNEL};
use ecu_common::hal::driver::Peripheral;
use ecu_control_unit::control::{ControlInputs, compute_demand};
use ecu_control_unit::observer::ControlObserver;
use ecu_control_unit::rte::Rte;
use ecu_control_unit::torque_control::TorqueControl;
use ecu_hal::drivers::ScriptedPeripheral;

/// Observer that drops every event.
struct NullObserver;

impl ControlObserver for NullObserver {
    #[inline]
    fn notify(&mut self, _event: &ControlEvent) {}
}

/// (throttle, speed, load, actual torque) raw codes per operating point.
const OPERATING_POINTS: [(&str, [u16; 4]); 3] = [
    ("idle", [0, 0, 0, 0]),
    ("cruise", [512, 153, 205, 100]),
    ("derated_heavy", [921, 307, 614, 600]),
];

fn bench_control_law(c: &mut Criterion) {
    let params = ControlParams::default();
    let inputs = ControlInputs {
        throttle: 0.9,
        speed_kmh: 60.0,
        load_kg: 600.0,
    };

    c.bench_function("compute_demand", |b| {
        b.iter(|| compute_demand(black_box(&inputs), black_box(&params)));
    });
}

fn bench_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycle_full");
    group.significance_level(0.01);
    group.sample_size(500);

    for (name, [throttle, speed, load, torque]) in OPERATING_POINTS {
        let mut driver = ScriptedPeripheral::new();
        driver
            .init(&PeripheralConfig::default())
            .expect("scripted peripheral init");
        driver.set_sample(THROTTLE_CHANNEL, throttle);
        driver.set_sample(SPEED_CHANNEL, speed);
        driver.set_sample(LOAD_CHANNEL, load);
        driver.set_sample(TORQUE_SENSOR_CHANNEL, torque);

        let rte = Rte::new(Box::new(driver), ChannelMap::default());
        let mut control = TorqueControl::with_observer(rte, ControlParams::default(), NullObserver);
        control.init().expect("reference init");

        group.bench_with_input(BenchmarkId::new("point", name), &name, |b, _| {
            b.iter(|| black_box(control.update()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_control_law, bench_cycle);
criterion_main!(benches);
