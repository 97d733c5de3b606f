//! Simulation driver implementation.
//!
//! The `SimulationPeripheral` implements the `Peripheral` trait family with
//! random analog/digital samples and an optional synchronous sampling delay
//! that models a slow converter.

use super::DRIVER_NAME;
use crate::drivers::channels::ChannelTable;
use ecu_common::hal::config::PeripheralConfig;
use ecu_common::hal::consts::{ADC_FULL_SCALE, CAN_MAX_DLC, CAN_MAX_ID};
use ecu_common::hal::driver::{
    AnalogInput, CanTransport, DigitalIo, Peripheral, PeripheralDiagnostics, PeripheralError,
    PwmOutput,
};
use ecu_common::hal::types::{CanFrame, DioLevel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Simulation driver implementing the `Peripheral` trait.
pub struct SimulationPeripheral {
    /// Random source for samples and frames
    rng: StdRng,
    /// Seed used, if deterministic
    seed: Option<u64>,
    /// Initialized flag
    initialized: bool,
    /// Delay applied before each analog/digital sample
    sample_delay: Duration,
    /// Armed channels
    channels: ChannelTable,
    /// Operation counters
    diagnostics: PeripheralDiagnostics,
}

impl SimulationPeripheral {
    /// Create a new simulation driver. `None` seeds from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            seed,
            initialized: false,
            sample_delay: Duration::ZERO,
            channels: ChannelTable::default(),
            diagnostics: PeripheralDiagnostics::default(),
        }
    }

    fn ensure_initialized(&mut self) -> Result<(), PeripheralError> {
        if !self.initialized {
            self.diagnostics.errors += 1;
            return Err(PeripheralError::NotInitialized);
        }
        Ok(())
    }

    fn track<T>(&mut self, result: Result<T, PeripheralError>) -> Result<T, PeripheralError> {
        if result.is_err() {
            self.diagnostics.errors += 1;
        }
        result
    }

    fn simulate_sampling(&self) {
        if !self.sample_delay.is_zero() {
            thread::sleep(self.sample_delay);
        }
    }
}

impl Default for SimulationPeripheral {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AnalogInput for SimulationPeripheral {
    fn arm_adc_channel(&mut self, channel: u8) -> Result<(), PeripheralError> {
        self.ensure_initialized()?;
        let result = self.channels.arm_adc(channel);
        self.track(result)?;
        info!("ADC channel {} armed", channel);
        Ok(())
    }

    fn read_adc(&mut self, channel: u8) -> Result<u16, PeripheralError> {
        self.ensure_initialized()?;
        let result = self.channels.ensure_adc(channel);
        self.track(result)?;

        self.simulate_sampling();
        let raw = self.rng.gen_range(0..=ADC_FULL_SCALE);
        self.diagnostics.adc_reads += 1;
        trace!("ADC channel {} sampled raw={}", channel, raw);
        Ok(raw)
    }
}

impl DigitalIo for SimulationPeripheral {
    fn arm_dio_channel(&mut self, channel: u8) -> Result<(), PeripheralError> {
        self.ensure_initialized()?;
        let result = self.channels.arm_dio(channel);
        self.track(result)?;
        info!("DIO channel {} armed", channel);
        Ok(())
    }

    fn read_dio(&mut self, channel: u8) -> Result<DioLevel, PeripheralError> {
        self.ensure_initialized()?;
        let result = self.channels.dio_level(channel);
        self.track(result)?;

        self.simulate_sampling();
        let level = DioLevel::from(self.rng.gen_bool(0.5));
        self.diagnostics.dio_reads += 1;
        trace!("DIO channel {} read {:?}", channel, level);
        Ok(level)
    }

    fn write_dio(&mut self, channel: u8, level: DioLevel) -> Result<(), PeripheralError> {
        self.ensure_initialized()?;
        let result = self.channels.set_dio_level(channel, level);
        self.track(result)?;
        self.diagnostics.dio_writes += 1;
        debug!("DIO channel {} set {:?}", channel, level);
        Ok(())
    }
}

impl PwmOutput for SimulationPeripheral {
    fn arm_pwm_channel(&mut self, channel: u8, period_ms: u16) -> Result<(), PeripheralError> {
        self.ensure_initialized()?;
        let result = self.channels.arm_pwm(channel, period_ms);
        self.track(result)?;
        info!("PWM channel {} armed, period={}ms, duty=0%", channel, period_ms);
        Ok(())
    }

    fn set_duty_cycle(&mut self, channel: u8, duty_percent: u16) -> Result<(), PeripheralError> {
        self.ensure_initialized()?;
        let result = self.channels.set_duty(channel, duty_percent);
        self.track(result)?;
        self.diagnostics.pwm_writes += 1;
        debug!("PWM channel {} duty={}%", channel, duty_percent);
        Ok(())
    }

    fn duty_cycle(&self, channel: u8) -> Option<u16> {
        self.channels.duty(channel)
    }
}

impl CanTransport for SimulationPeripheral {
    fn send(&mut self, frame: &CanFrame) -> Result<(), PeripheralError> {
        self.ensure_initialized()?;
        self.diagnostics.can_sent += 1;
        debug!(
            "CAN tx id=0x{:03X} len={} data={:02X?}",
            frame.id(),
            frame.len(),
            frame.data()
        );
        Ok(())
    }

    fn receive(&mut self) -> Result<Option<CanFrame>, PeripheralError> {
        self.ensure_initialized()?;

        let id = self.rng.gen_range(0..=CAN_MAX_ID);
        let len = self.rng.gen_range(0..=CAN_MAX_DLC);
        let mut payload = [0u8; CAN_MAX_DLC];
        self.rng.fill(&mut payload[..len]);

        let frame = CanFrame::new(id, &payload[..len]);
        let frame = self.track(frame)?;
        self.diagnostics.can_received += 1;
        trace!("CAN rx id=0x{:03X} len={}", frame.id(), frame.len());
        Ok(Some(frame))
    }
}

impl Peripheral for SimulationPeripheral {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn init(&mut self, config: &PeripheralConfig) -> Result<(), PeripheralError> {
        config
            .validate()
            .map_err(|e| PeripheralError::InitFailed(e.to_string()))?;

        self.sample_delay = Duration::from_millis(u64::from(config.sample_delay_ms));
        self.channels.clear();
        self.initialized = true;

        info!(
            "Simulation peripheral initialized: ADC {}-bit @ {} Hz, PWM period {} ms, sample delay {:?}, seed {:?}",
            config.adc_resolution_bits,
            config.adc_sampling_rate_hz,
            config.pwm_period_ms,
            self.sample_delay,
            self.seed
        );
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), PeripheralError> {
        self.channels.clear();
        self.initialized = false;
        info!("Simulation peripheral shut down");
        Ok(())
    }

    fn diagnostics(&self) -> Option<PeripheralDiagnostics> {
        Some(self.diagnostics.clone())
    }
}
