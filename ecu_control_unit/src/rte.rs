//! Runtime environment (RTE) access facade.
//!
//! `Rte` owns the peripheral handle and the five abstraction instances and
//! exposes one named read/write/init operation per physical quantity.
//! Errors from the abstraction layer pass through unchanged. The facade
//! holds no control-law state.

use ecu_common::control_unit::state::Subsystem;
use ecu_common::hal::config::{ChannelMap, SensorConfig};
use ecu_common::hal::consts::PWM_PERIOD_MS;
use ecu_common::hal::driver::{Peripheral, PeripheralError};
use ecu_common::hal::error::IoHwAbError;
use ecu_common::hal::types::DioLevel;
use ecu_hal::io_hw_ab::{
    ActualTorque, Initializable, IoHwAb, LoadWeight, MotorTorque, Readable, ThrottlePosition,
    VehicleSpeed, Writable,
};
use tracing::info;

/// Access facade between the torque control component and the IoHwAb layer.
pub struct Rte {
    peripheral: Box<dyn Peripheral>,
    channels: ChannelMap,
    throttle: IoHwAb<ThrottlePosition>,
    speed: IoHwAb<VehicleSpeed>,
    load: IoHwAb<LoadWeight>,
    torque_sensor: IoHwAb<ActualTorque>,
    motor: IoHwAb<MotorTorque>,
}

impl Rte {
    /// Create a facade over an initialized peripheral.
    ///
    /// `channels` holds the configuration each `init_*` forwards; a `None`
    /// entry is forwarded as-is and rejected by the abstraction instance.
    pub fn new(peripheral: Box<dyn Peripheral>, channels: ChannelMap) -> Self {
        Self::with_pwm_period(peripheral, channels, PWM_PERIOD_MS)
    }

    /// Same as `new`, with the motor PWM period taken from the peripheral config.
    pub fn with_pwm_period(
        peripheral: Box<dyn Peripheral>,
        channels: ChannelMap,
        pwm_period_ms: u16,
    ) -> Self {
        info!(
            "RTE bound to peripheral '{}' v{}",
            peripheral.name(),
            peripheral.version()
        );
        Self {
            peripheral,
            channels,
            throttle: IoHwAb::new(),
            speed: IoHwAb::new(),
            load: IoHwAb::new(),
            torque_sensor: IoHwAb::new(),
            motor: IoHwAb::new().with_pwm_period(pwm_period_ms),
        }
    }

    // ─── Init ───────────────────────────────────────────────────────

    /// Initialize the throttle position sensor.
    pub fn init_throttle_sensor(&mut self) -> Result<(), IoHwAbError> {
        self.throttle
            .init(self.peripheral.as_mut(), self.channels.throttle)
    }

    /// Initialize the vehicle speed sensor.
    pub fn init_speed_sensor(&mut self) -> Result<(), IoHwAbError> {
        self.speed.init(self.peripheral.as_mut(), self.channels.speed)
    }

    /// Initialize the load weight sensor.
    pub fn init_load_sensor(&mut self) -> Result<(), IoHwAbError> {
        self.load.init(self.peripheral.as_mut(), self.channels.load)
    }

    /// Initialize the actual torque sensor.
    pub fn init_torque_sensor(&mut self) -> Result<(), IoHwAbError> {
        self.torque_sensor
            .init(self.peripheral.as_mut(), self.channels.torque_sensor)
    }

    /// Initialize the motor driver.
    pub fn init_motor_driver(&mut self) -> Result<(), IoHwAbError> {
        self.motor.init(self.peripheral.as_mut(), self.channels.motor)
    }

    /// Initialize one subsystem by identifier.
    pub fn init_subsystem(&mut self, subsystem: Subsystem) -> Result<(), IoHwAbError> {
        match subsystem {
            Subsystem::Throttle => self.init_throttle_sensor(),
            Subsystem::Speed => self.init_speed_sensor(),
            Subsystem::Load => self.init_load_sensor(),
            Subsystem::TorqueSensor => self.init_torque_sensor(),
            Subsystem::MotorDriver => self.init_motor_driver(),
        }
    }

    /// Whether a subsystem's abstraction instance is initialized.
    pub fn is_initialized(&self, subsystem: Subsystem) -> bool {
        match subsystem {
            Subsystem::Throttle => self.throttle.is_initialized(),
            Subsystem::Speed => self.speed.is_initialized(),
            Subsystem::Load => self.load.is_initialized(),
            Subsystem::TorqueSensor => self.torque_sensor.is_initialized(),
            Subsystem::MotorDriver => self.motor.is_initialized(),
        }
    }

    // ─── Read / Write ───────────────────────────────────────────────

    /// Throttle position `[0, 1]`.
    pub fn read_throttle_position(&mut self) -> Result<f32, IoHwAbError> {
        self.throttle.read(self.peripheral.as_mut())
    }

    /// Vehicle speed [km/h].
    pub fn read_vehicle_speed(&mut self) -> Result<f32, IoHwAbError> {
        self.speed.read(self.peripheral.as_mut())
    }

    /// Load weight [kg].
    pub fn read_load_weight(&mut self) -> Result<f32, IoHwAbError> {
        self.load.read(self.peripheral.as_mut())
    }

    /// Actual torque [Nm].
    pub fn read_actual_torque(&mut self) -> Result<f32, IoHwAbError> {
        self.torque_sensor.read(self.peripheral.as_mut())
    }

    /// Command motor torque [Nm].
    pub fn write_motor_torque(&mut self, torque: f32) -> Result<(), IoHwAbError> {
        self.motor.write(self.peripheral.as_mut(), torque)
    }

    /// Read the throttle status line, if one is configured.
    pub fn read_throttle_status(&mut self) -> Result<DioLevel, IoHwAbError> {
        self.throttle.check_status(self.peripheral.as_mut())
    }

    // ─── Accessors ──────────────────────────────────────────────────

    /// Configuration owned by an initialized instance.
    pub fn sensor_config(&self, subsystem: Subsystem) -> Option<&SensorConfig> {
        match subsystem {
            Subsystem::Throttle => self.throttle.config(),
            Subsystem::Speed => self.speed.config(),
            Subsystem::Load => self.load.config(),
            Subsystem::TorqueSensor => self.torque_sensor.config(),
            Subsystem::MotorDriver => self.motor.config(),
        }
    }

    /// Configuration forwarded by the `init_*` operations.
    pub fn channels(&self) -> &ChannelMap {
        &self.channels
    }

    /// Underlying peripheral.
    pub fn peripheral(&self) -> &dyn Peripheral {
        self.peripheral.as_ref()
    }

    /// Underlying peripheral, mutable.
    pub fn peripheral_mut(&mut self) -> &mut dyn Peripheral {
        self.peripheral.as_mut()
    }

    /// Shut the peripheral down.
    pub fn shutdown(&mut self) -> Result<(), PeripheralError> {
        self.peripheral.shutdown()
    }
}
