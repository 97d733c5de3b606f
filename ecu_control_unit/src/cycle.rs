//! Periodic cycle runner: update → record → sleep.
//!
//! Runs the torque control component at a fixed period until the running
//! flag is cleared or the configured number of cycles is reached. Pacing
//! uses `std::thread::sleep` for the remainder of each period; there is no
//! real-time scheduling.
//!
//! ## Overruns
//! A cycle that exceeds its period is counted and logged (the first ten,
//! then every thousandth). The loop never aborts on an overrun.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use ecu_common::control_unit::config::CycleConfig;
use ecu_common::control_unit::error::{ControlError, CycleFaults};
use ecu_common::control_unit::event::Deviation;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::observer::ControlObserver;
use crate::torque_control::{CycleReport, TorqueControl};

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle timing statistics.
#[derive(Debug, Clone, Serialize)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: u64,
    /// Minimum cycle duration [ns] (0 before the first cycle).
    pub min_cycle_ns: u64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: u64,
    /// Running sum for average computation.
    pub sum_cycle_ns: u64,
    /// Number of cycles that exceeded their period.
    pub overruns: u64,
}

impl CycleStats {
    /// Create a new zeroed stats instance.
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: 0,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
        }
    }

    /// Record a cycle duration.
    #[inline]
    pub fn record(&mut self, duration_ns: u64) {
        if self.cycle_count == 0 || duration_ns < self.min_cycle_ns {
            self.min_cycle_ns = duration_ns;
        }
        if duration_ns > self.max_cycle_ns {
            self.max_cycle_ns = duration_ns;
        }
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.sum_cycle_ns = self.sum_cycle_ns.saturating_add(duration_ns);
    }

    /// Average cycle time [ns] (returns 0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> u64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Control Outcome Tally ──────────────────────────────────────────

/// Aggregated control outcomes over a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ControlTally {
    /// Cycles in which at least one step failed.
    pub faulted_cycles: u64,
    /// Input reads that fell back to 0.0.
    pub read_failures: u64,
    /// Torque commands rejected by the motor driver.
    pub write_failures: u64,
    /// Cycles reporting "increase torque needed".
    pub increase_needed: u64,
    /// Cycles reporting "decrease torque needed".
    pub decrease_needed: u64,
    /// Cycles on target.
    pub on_target: u64,
    /// Cycles whose raw demand was clamped.
    pub saturated: u64,
    /// Last commanded torque [Nm].
    pub last_desired_torque: f32,
    /// Last actual torque [Nm].
    pub last_actual_torque: f32,
}

impl ControlTally {
    /// Fold one cycle report into the tally.
    pub fn record(&mut self, report: &CycleReport) {
        if !report.faults.is_empty() {
            self.faulted_cycles += 1;
        }
        let read_faults = report.faults.difference(CycleFaults::MOTOR_WRITE);
        self.read_failures += u64::from(read_faults.bits().count_ones());
        if !report.command_applied() {
            self.write_failures += 1;
        }
        match report.deviation {
            Deviation::IncreaseNeeded => self.increase_needed += 1,
            Deviation::DecreaseNeeded => self.decrease_needed += 1,
            Deviation::OnTarget => self.on_target += 1,
        }
        if report.demand.is_saturated() {
            self.saturated += 1;
        }
        self.last_desired_torque = report.demand.desired;
        self.last_actual_torque = report.actual_torque;
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Configured period [µs].
    pub cycle_time_us: u64,
    /// Timing statistics.
    pub timing: CycleStats,
    /// Control outcomes.
    pub control: ControlTally,
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Fixed-period driver of a `TorqueControl` component.
pub struct CycleRunner<O: ControlObserver> {
    control: TorqueControl<O>,
    cycle_time: Duration,
    max_cycles: u64,
    running: Arc<AtomicBool>,
    stats: CycleStats,
    tally: ControlTally,
}

impl<O: ControlObserver> CycleRunner<O> {
    /// Wrap an initialized component.
    pub fn new(control: TorqueControl<O>, config: &CycleConfig) -> Self {
        Self {
            control,
            cycle_time: Duration::from_micros(config.cycle_time_us),
            max_cycles: config.max_cycles,
            running: Arc::new(AtomicBool::new(true)),
            stats: CycleStats::new(),
            tally: ControlTally::default(),
        }
    }

    /// Flag that stops the loop when cleared. Starts set; clearing it
    /// before `run()` makes `run()` return without executing a cycle.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Run until the running flag is cleared or `max_cycles` is reached
    /// (0 = unlimited).
    ///
    /// # Errors
    /// `ControlError::NotReady` if the component was not initialized.
    pub fn run(&mut self) -> Result<RunSummary, ControlError> {
        if !self.control.is_ready() {
            return Err(ControlError::NotReady);
        }

        info!(
            "Starting control loop (cycle_time={}us, max_cycles={})",
            self.cycle_time.as_micros(),
            self.max_cycles
        );

        while self.running.load(Ordering::SeqCst)
            && (self.max_cycles == 0 || self.stats.cycle_count < self.max_cycles)
        {
            let cycle_start = Instant::now();

            self.step()?;

            let elapsed = cycle_start.elapsed();
            let elapsed_ns = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
            self.stats.record(elapsed_ns);

            if elapsed > self.cycle_time {
                self.stats.overruns += 1;
                if self.stats.overruns <= 10 || self.stats.overruns % 1000 == 0 {
                    warn!(
                        "Cycle overrun #{}: cycle took {}us (target {}us)",
                        self.stats.overruns,
                        elapsed.as_micros(),
                        self.cycle_time.as_micros()
                    );
                }
            } else {
                thread::sleep(self.cycle_time - elapsed);
            }

            if self.stats.cycle_count % 1000 == 0 {
                debug!(
                    "Control loop: {} cycles, avg={}ns, max={}ns, overruns={}",
                    self.stats.cycle_count,
                    self.stats.avg_cycle_ns(),
                    self.stats.max_cycle_ns,
                    self.stats.overruns
                );
            }
        }

        self.running.store(false, Ordering::SeqCst);
        info!(
            "Control loop stopped after {} cycles ({} faulted, {} overruns)",
            self.stats.cycle_count, self.tally.faulted_cycles, self.stats.overruns
        );
        Ok(self.summary())
    }

    /// Run exactly one cycle without pacing and fold its report into the tally.
    pub fn step(&mut self) -> Result<CycleReport, ControlError> {
        let report = self.control.update()?;
        self.tally.record(&report);
        Ok(report)
    }

    /// Snapshot of the run so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            cycle_time_us: u64::try_from(self.cycle_time.as_micros()).unwrap_or(u64::MAX),
            timing: self.stats.clone(),
            control: self.tally.clone(),
        }
    }

    /// Timing statistics.
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Driven component.
    pub fn control(&self) -> &TorqueControl<O> {
        &self.control
    }

    /// Release the driven component.
    pub fn into_control(self) -> TorqueControl<O> {
        self.control
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{ControlInputs, TorqueDemand};

    #[test]
    fn cycle_stats_basic() {
        let mut stats = CycleStats::new();
        assert_eq!(stats.cycle_count, 0);
        assert_eq!(stats.avg_cycle_ns(), 0);

        stats.record(500_000);
        assert_eq!(stats.cycle_count, 1);
        assert_eq!(stats.last_cycle_ns, 500_000);
        assert_eq!(stats.min_cycle_ns, 500_000);
        assert_eq!(stats.max_cycle_ns, 500_000);
        assert_eq!(stats.avg_cycle_ns(), 500_000);

        stats.record(600_000);
        stats.record(400_000);
        assert_eq!(stats.cycle_count, 3);
        assert_eq!(stats.min_cycle_ns, 400_000);
        assert_eq!(stats.max_cycle_ns, 600_000);
        assert_eq!(stats.avg_cycle_ns(), 500_000);
    }

    fn report(faults: CycleFaults, deviation: Deviation, raw: f32, desired: f32) -> CycleReport {
        CycleReport {
            inputs: ControlInputs::default(),
            demand: TorqueDemand { raw, desired },
            actual_torque: 0.0,
            deviation,
            faults,
        }
    }

    #[test]
    fn tally_counts_outcomes() {
        let mut tally = ControlTally::default();
        tally.record(&report(
            CycleFaults::empty(),
            Deviation::OnTarget,
            0.0,
            0.0,
        ));
        tally.record(&report(
            CycleFaults::SPEED_READ | CycleFaults::LOAD_READ | CycleFaults::MOTOR_WRITE,
            Deviation::IncreaseNeeded,
            110.0,
            100.0,
        ));

        assert_eq!(tally.faulted_cycles, 1);
        assert_eq!(tally.read_failures, 2);
        assert_eq!(tally.write_failures, 1);
        assert_eq!(tally.on_target, 1);
        assert_eq!(tally.increase_needed, 1);
        assert_eq!(tally.saturated, 1);
        assert_eq!(tally.last_desired_torque, 100.0);
    }
}
