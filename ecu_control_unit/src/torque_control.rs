//! Torque control software component.
//!
//! Lifecycle: `Uninitialized → Ready` once all five subsystems initialize
//! in order. Each `update()` reads the three inputs, evaluates the control
//! law, commands the motor driver and reads back the actual torque for an
//! observational comparison. Per-quantity failures never abort a cycle;
//! they are reported to the observer and recorded in `CycleReport::faults`.

use ecu_common::control_unit::config::ControlParams;
use ecu_common::control_unit::error::{ControlError, CycleFaults};
use ecu_common::control_unit::event::{ControlEvent, Deviation};
use ecu_common::control_unit::state::{ControlState, Subsystem};
use ecu_common::hal::error::IoHwAbError;

use crate::control::{ControlInputs, TorqueDemand, compute_demand};
use crate::observer::{ControlObserver, TracingObserver};
use crate::rte::Rte;

/// Result of one control cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    /// Inputs fed to the control law (0.0 where a read failed).
    pub inputs: ControlInputs,
    /// Raw and clamped demand.
    pub demand: TorqueDemand,
    /// Actual torque read back (0.0 if the read failed).
    pub actual_torque: f32,
    /// Direction of the actual/command difference.
    pub deviation: Deviation,
    /// Steps that failed this cycle.
    pub faults: CycleFaults,
}

impl CycleReport {
    /// Whether the motor accepted this cycle's command.
    #[inline]
    pub fn command_applied(&self) -> bool {
        !self.faults.contains(CycleFaults::MOTOR_WRITE)
    }
}

/// Torque control component.
pub struct TorqueControl<O: ControlObserver = TracingObserver> {
    rte: Rte,
    params: ControlParams,
    state: ControlState,
    observer: O,
}

impl TorqueControl<TracingObserver> {
    /// Create a component that logs its events.
    pub fn new(rte: Rte, params: ControlParams) -> Self {
        Self::with_observer(rte, params, TracingObserver)
    }
}

impl<O: ControlObserver> TorqueControl<O> {
    /// Create a component with a custom observer.
    pub fn with_observer(rte: Rte, params: ControlParams, observer: O) -> Self {
        Self {
            rte,
            params,
            state: ControlState::Uninitialized,
            observer,
        }
    }

    /// Initialize the five subsystems in order.
    ///
    /// # Errors
    /// - `AlreadyInitialized` if the component is `Ready`
    /// - `InitFailed` naming the first subsystem that failed; later
    ///   subsystems are not attempted and the state stays `Uninitialized`
    pub fn init(&mut self) -> Result<(), ControlError> {
        if self.state.is_ready() {
            return Err(ControlError::AlreadyInitialized);
        }

        for subsystem in Subsystem::INIT_ORDER {
            if let Err(error) = self.rte.init_subsystem(subsystem) {
                self.observer.notify(&ControlEvent::InitFailed {
                    subsystem,
                    error: error.clone(),
                });
                return Err(ControlError::InitFailed {
                    subsystem,
                    source: error,
                });
            }
            self.observer.notify(&ControlEvent::SubsystemReady(subsystem));
        }

        self.state = ControlState::Ready;
        self.observer.notify(&ControlEvent::Ready);
        Ok(())
    }

    /// Run one control cycle.
    ///
    /// # Errors
    /// `NotReady` unless `init()` has succeeded.
    pub fn update(&mut self) -> Result<CycleReport, ControlError> {
        if !self.state.is_ready() {
            return Err(ControlError::NotReady);
        }

        let mut faults = CycleFaults::empty();

        let read = self.rte.read_throttle_position();
        let throttle = self.input(Subsystem::Throttle, read, &mut faults);
        let read = self.rte.read_vehicle_speed();
        let speed_kmh = self.input(Subsystem::Speed, read, &mut faults);
        let read = self.rte.read_load_weight();
        let load_kg = self.input(Subsystem::Load, read, &mut faults);

        let inputs = ControlInputs {
            throttle,
            speed_kmh,
            load_kg,
        };
        let demand = compute_demand(&inputs, &self.params);
        self.observer.notify(&ControlEvent::DemandComputed {
            raw: demand.raw,
            desired: demand.desired,
        });

        match self.rte.write_motor_torque(demand.desired) {
            Ok(()) => self.observer.notify(&ControlEvent::CommandWritten {
                torque: demand.desired,
            }),
            Err(error) => {
                faults |= CycleFaults::MOTOR_WRITE;
                self.observer.notify(&ControlEvent::WriteFailed {
                    torque: demand.desired,
                    error,
                });
            }
        }

        let read = self.rte.read_actual_torque();
        let actual_torque = self.input(Subsystem::TorqueSensor, read, &mut faults);

        let deviation = Deviation::classify(actual_torque, demand.desired);
        if deviation != Deviation::OnTarget {
            self.observer.notify(&ControlEvent::Deviation {
                deviation,
                actual: actual_torque,
                desired: demand.desired,
            });
        }

        Ok(CycleReport {
            inputs,
            demand,
            actual_torque,
            deviation,
            faults,
        })
    }

    fn input(
        &mut self,
        subsystem: Subsystem,
        read: Result<f32, IoHwAbError>,
        faults: &mut CycleFaults,
    ) -> f32 {
        match read {
            Ok(value) => {
                self.observer
                    .notify(&ControlEvent::InputRead { subsystem, value });
                value
            }
            Err(error) => {
                *faults |= CycleFaults::for_subsystem(subsystem);
                self.observer
                    .notify(&ControlEvent::ReadFailed { subsystem, error });
                0.0
            }
        }
    }

    /// Lifecycle state.
    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Whether `update()` is accepted.
    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Control law calibration.
    pub fn params(&self) -> &ControlParams {
        &self.params
    }

    /// Access facade.
    pub fn rte(&self) -> &Rte {
        &self.rte
    }

    /// Access facade, mutable.
    pub fn rte_mut(&mut self) -> &mut Rte {
        &mut self.rte
    }

    /// Event observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Event observer, mutable.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Release the facade and the observer.
    pub fn into_parts(self) -> (Rte, O) {
        (self.rte, self.observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::RecordingObserver;
    use ecu_common::hal::config::{ChannelMap, PeripheralConfig};
    use ecu_common::hal::driver::Peripheral;
    use ecu_hal::drivers::ScriptedPeripheral;

    fn component() -> (TorqueControl<RecordingObserver>, ScriptedPeripheral) {
        let mut driver = ScriptedPeripheral::new();
        driver.init(&PeripheralConfig::default()).unwrap();
        let handle = driver.clone();
        let rte = Rte::new(Box::new(driver), ChannelMap::default());
        let tc = TorqueControl::with_observer(rte, ControlParams::default(), RecordingObserver::new());
        (tc, handle)
    }

    #[test]
    fn update_before_init_is_rejected() {
        let (mut tc, _) = component();
        assert_eq!(tc.update(), Err(ControlError::NotReady));
        assert_eq!(tc.state(), ControlState::Uninitialized);
    }

    #[test]
    fn init_emits_events_in_order() {
        let (mut tc, _) = component();
        tc.init().unwrap();
        assert!(tc.is_ready());

        let expected: Vec<ControlEvent> = Subsystem::INIT_ORDER
            .into_iter()
            .map(ControlEvent::SubsystemReady)
            .chain(std::iter::once(ControlEvent::Ready))
            .collect();
        assert_eq!(tc.observer().events(), expected.as_slice());
    }

    #[test]
    fn second_init_rejected() {
        let (mut tc, _) = component();
        tc.init().unwrap();
        assert_eq!(tc.init(), Err(ControlError::AlreadyInitialized));
        assert!(tc.is_ready());
    }

    #[test]
    fn zero_inputs_command_zero_torque() {
        let (mut tc, handle) = component();
        tc.init().unwrap();
        let report = tc.update().unwrap();
        assert_eq!(report.demand.desired, 0.0);
        assert_eq!(report.deviation, Deviation::OnTarget);
        assert!(report.faults.is_empty());
        assert_eq!(handle.duty(1), Some(0));
    }

    #[test]
    fn failed_actual_read_still_compared() {
        let (mut tc, handle) = component();
        tc.init().unwrap();
        handle.set_sample(0, 1023);
        handle.fail_adc(3);

        let report = tc.update().unwrap();
        assert_eq!(report.actual_torque, 0.0);
        assert_eq!(report.deviation, Deviation::IncreaseNeeded);
        assert_eq!(report.faults, CycleFaults::TORQUE_READ);
        assert!(report.command_applied());
    }

    #[test]
    fn into_parts_returns_observer() {
        let (mut tc, _) = component();
        tc.init().unwrap();
        let (_rte, observer) = tc.into_parts();
        assert_eq!(observer.events().last(), Some(&ControlEvent::Ready));
    }
}
