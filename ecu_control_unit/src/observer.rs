//! Control event observers.
//!
//! The torque control component reports every step through a
//! `ControlObserver`. `TracingObserver` turns events into log lines;
//! `RecordingObserver` keeps them for inspection.

use ecu_common::control_unit::event::{ControlEvent, Deviation};
use tracing::{debug, error, info, warn};

/// Receiver of control events.
pub trait ControlObserver {
    /// Handle one event. Must not block.
    fn notify(&mut self, event: &ControlEvent);
}

/// Logs control events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ControlObserver for TracingObserver {
    fn notify(&mut self, event: &ControlEvent) {
        match event {
            ControlEvent::SubsystemReady(subsystem) => {
                info!("{} initialized", subsystem);
            }
            ControlEvent::InitFailed { subsystem, error } => {
                error!("{} initialization failed: {}", subsystem, error);
            }
            ControlEvent::Ready => {
                info!("Torque control ready");
            }
            ControlEvent::InputRead { subsystem, value } => {
                debug!("{} = {:.3} {}", subsystem, value, subsystem.unit());
            }
            ControlEvent::ReadFailed { subsystem, error } => {
                warn!("{} read failed, using 0.0: {}", subsystem, error);
            }
            ControlEvent::DemandComputed { raw, desired } => {
                debug!("Torque demand raw={:.3} desired={:.3} Nm", raw, desired);
            }
            ControlEvent::CommandWritten { torque } => {
                debug!("Torque command {:.3} Nm applied", torque);
            }
            ControlEvent::WriteFailed { torque, error } => {
                warn!("Torque command {:.3} Nm rejected: {}", torque, error);
            }
            ControlEvent::Deviation {
                deviation,
                actual,
                desired,
            } => match deviation {
                Deviation::IncreaseNeeded => info!(
                    "Actual torque {:.3} Nm below command {:.3} Nm: increase torque needed",
                    actual, desired
                ),
                Deviation::DecreaseNeeded => info!(
                    "Actual torque {:.3} Nm above command {:.3} Nm: decrease torque needed",
                    actual, desired
                ),
                Deviation::OnTarget => {}
            },
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Vec<ControlEvent>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, oldest first.
    pub fn events(&self) -> &[ControlEvent] {
        &self.events
    }

    /// Drop all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl ControlObserver for RecordingObserver {
    fn notify(&mut self, event: &ControlEvent) {
        self.events.push(event.clone());
    }
}

impl<O: ControlObserver + ?Sized> ControlObserver for &mut O {
    fn notify(&mut self, event: &ControlEvent) {
        (**self).notify(event);
    }
}
