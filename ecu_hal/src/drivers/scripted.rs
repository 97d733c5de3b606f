//! Scripted driver.
//!
//! Deterministic peripheral whose analog samples, digital input levels,
//! injected faults and received CAN frames are programmed by the caller.
//! Clones share state, so a test keeps one handle while the control unit
//! owns another, and can reprogram samples between cycles or read back the
//! applied duty cycles.

use crate::drivers::channels::ChannelTable;
use ecu_common::hal::config::{PeripheralConfig, ScriptedSample};
use ecu_common::hal::consts::MAX_CHANNELS;
use ecu_common::hal::driver::{
    AnalogInput, CanTransport, DigitalIo, Peripheral, PeripheralDiagnostics, PeripheralError,
    PwmOutput,
};
use ecu_common::hal::types::{CanFrame, DioLevel};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Registry name of the scripted driver.
pub const DRIVER_NAME: &str = "scripted";

/// Factory function to create a scripted driver preloaded with
/// `config.scripted_samples`.
pub fn create_driver(config: &PeripheralConfig) -> Box<dyn Peripheral> {
    Box::new(ScriptedPeripheral::with_samples(&config.scripted_samples))
}

#[derive(Debug, Default)]
struct ScriptedState {
    initialized: bool,
    init_failure: Option<String>,
    channels: ChannelTable,
    samples: [u16; MAX_CHANNELS],
    input_levels: [DioLevel; MAX_CHANNELS],
    adc_faults: u16,
    pwm_faults: u16,
    rx_queue: VecDeque<CanFrame>,
    tx_log: Vec<CanFrame>,
    duty_log: Vec<(u8, u16)>,
    diagnostics: PeripheralDiagnostics,
}

impl ScriptedState {
    fn ensure_initialized(&mut self) -> Result<(), PeripheralError> {
        if self.initialized {
            Ok(())
        } else {
            self.diagnostics.errors += 1;
            Err(PeripheralError::NotInitialized)
        }
    }

    fn track<T>(&mut self, result: Result<T, PeripheralError>) -> Result<T, PeripheralError> {
        if result.is_err() {
            self.diagnostics.errors += 1;
        }
        result
    }
}

fn bit(channel: u8) -> u16 {
    1u16.checked_shl(u32::from(channel)).unwrap_or(0)
}

/// Deterministic peripheral driven by the caller.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPeripheral {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedPeripheral {
    /// Create a driver with every sample at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a driver preloaded with fixed samples.
    pub fn with_samples(samples: &[ScriptedSample]) -> Self {
        let driver = Self::new();
        for sample in samples {
            driver.set_sample(sample.channel, sample.raw);
        }
        driver
    }

    // ─── Programming ────────────────────────────────────────────────

    /// Set the raw code returned by the next reads of `channel`.
    ///
    /// Codes above the converter range are returned as-is, to exercise
    /// range checks in the layers above. Channels beyond the addressable
    /// range are ignored.
    pub fn set_sample(&self, channel: u8, raw: u16) {
        if let Some(slot) = self.state.lock().samples.get_mut(channel as usize) {
            *slot = raw;
        }
    }

    /// Set the level returned by reads of a DIO line.
    pub fn set_input_level(&self, channel: u8, level: DioLevel) {
        if let Some(slot) = self.state.lock().input_levels.get_mut(channel as usize) {
            *slot = level;
        }
    }

    /// Make reads of `channel` fail with a communication error.
    pub fn fail_adc(&self, channel: u8) {
        self.state.lock().adc_faults |= bit(channel);
    }

    /// Make duty-cycle updates of `channel` fail with a communication error.
    pub fn fail_pwm(&self, channel: u8) {
        self.state.lock().pwm_faults |= bit(channel);
    }

    /// Make the next `init()` fail with the given reason.
    pub fn fail_init(&self, reason: impl Into<String>) {
        self.state.lock().init_failure = Some(reason.into());
    }

    /// Remove every injected fault.
    pub fn clear_faults(&self) {
        let mut state = self.state.lock();
        state.adc_faults = 0;
        state.pwm_faults = 0;
        state.init_failure = None;
    }

    /// Queue a frame for `receive()`.
    pub fn push_rx_frame(&self, frame: CanFrame) {
        self.state.lock().rx_queue.push_back(frame);
    }

    // ─── Inspection ─────────────────────────────────────────────────

    /// Whether `init()` has succeeded and `shutdown()` was not called since.
    pub fn is_initialized(&self) -> bool {
        self.state.lock().initialized
    }

    /// Current duty cycle of a PWM channel, `None` if not armed.
    pub fn duty(&self, channel: u8) -> Option<u16> {
        self.state.lock().channels.duty(channel)
    }

    /// Period of a PWM channel, `None` if not armed.
    pub fn pwm_period(&self, channel: u8) -> Option<u16> {
        self.state.lock().channels.pwm_period(channel)
    }

    /// Every accepted duty-cycle update as `(channel, duty)`, oldest first.
    pub fn duty_history(&self) -> Vec<(u8, u16)> {
        self.state.lock().duty_log.clone()
    }

    /// Whether an ADC channel is armed.
    pub fn is_adc_armed(&self, channel: u8) -> bool {
        self.state.lock().channels.ensure_adc(channel).is_ok()
    }

    /// Frames passed to `send()`, oldest first.
    pub fn sent_frames(&self) -> Vec<CanFrame> {
        self.state.lock().tx_log.clone()
    }

    /// Snapshot of the operation counters.
    pub fn counters(&self) -> PeripheralDiagnostics {
        self.state.lock().diagnostics.clone()
    }
}

impl AnalogInput for ScriptedPeripheral {
    fn arm_adc_channel(&mut self, channel: u8) -> Result<(), PeripheralError> {
        let mut state = self.state.lock();
        state.ensure_initialized()?;
        let result = state.channels.arm_adc(channel);
        state.track(result)?;
        debug!("ADC channel {} armed", channel);
        Ok(())
    }

    fn read_adc(&mut self, channel: u8) -> Result<u16, PeripheralError> {
        let mut state = self.state.lock();
        state.ensure_initialized()?;
        let result = state.channels.ensure_adc(channel);
        state.track(result)?;

        if state.adc_faults & bit(channel) != 0 {
            state.diagnostics.errors += 1;
            return Err(PeripheralError::Communication(format!(
                "injected ADC fault on channel {channel}"
            )));
        }

        let raw = state.samples[channel as usize];
        state.diagnostics.adc_reads += 1;
        trace!("ADC channel {} scripted raw={}", channel, raw);
        Ok(raw)
    }
}

impl DigitalIo for ScriptedPeripheral {
    fn arm_dio_channel(&mut self, channel: u8) -> Result<(), PeripheralError> {
        let mut state = self.state.lock();
        state.ensure_initialized()?;
        let result = state.channels.arm_dio(channel);
        state.track(result)?;
        debug!("DIO channel {} armed", channel);
        Ok(())
    }

    fn read_dio(&mut self, channel: u8) -> Result<DioLevel, PeripheralError> {
        let mut state = self.state.lock();
        state.ensure_initialized()?;
        let result = state.channels.dio_level(channel);
        state.track(result)?;
        state.diagnostics.dio_reads += 1;
        Ok(state.input_levels[channel as usize])
    }

    fn write_dio(&mut self, channel: u8, level: DioLevel) -> Result<(), PeripheralError> {
        let mut state = self.state.lock();
        state.ensure_initialized()?;
        let result = state.channels.set_dio_level(channel, level);
        state.track(result)?;
        state.diagnostics.dio_writes += 1;
        Ok(())
    }
}

impl PwmOutput for ScriptedPeripheral {
    fn arm_pwm_channel(&mut self, channel: u8, period_ms: u16) -> Result<(), PeripheralError> {
        let mut state = self.state.lock();
        state.ensure_initialized()?;
        let result = state.channels.arm_pwm(channel, period_ms);
        state.track(result)?;
        debug!("PWM channel {} armed, period={}ms", channel, period_ms);
        Ok(())
    }

    fn set_duty_cycle(&mut self, channel: u8, duty_percent: u16) -> Result<(), PeripheralError> {
        let mut state = self.state.lock();
        state.ensure_initialized()?;

        if state.pwm_faults & bit(channel) != 0 {
            state.diagnostics.errors += 1;
            return Err(PeripheralError::Communication(format!(
                "injected PWM fault on channel {channel}"
            )));
        }

        let result = state.channels.set_duty(channel, duty_percent);
        state.track(result)?;
        state.duty_log.push((channel, duty_percent));
        state.diagnostics.pwm_writes += 1;
        Ok(())
    }

    fn duty_cycle(&self, channel: u8) -> Option<u16> {
        self.duty(channel)
    }
}

impl CanTransport for ScriptedPeripheral {
    fn send(&mut self, frame: &CanFrame) -> Result<(), PeripheralError> {
        let mut state = self.state.lock();
        state.ensure_initialized()?;
        state.tx_log.push(frame.clone());
        state.diagnostics.can_sent += 1;
        Ok(())
    }

    fn receive(&mut self) -> Result<Option<CanFrame>, PeripheralError> {
        let mut state = self.state.lock();
        state.ensure_initialized()?;
        let frame = state.rx_queue.pop_front();
        if frame.is_some() {
            state.diagnostics.can_received += 1;
        }
        Ok(frame)
    }
}

impl Peripheral for ScriptedPeripheral {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn init(&mut self, config: &PeripheralConfig) -> Result<(), PeripheralError> {
        let mut state = self.state.lock();
        if let Some(reason) = state.init_failure.take() {
            state.diagnostics.errors += 1;
            return Err(PeripheralError::InitFailed(reason));
        }
        config
            .validate()
            .map_err(|e| PeripheralError::InitFailed(e.to_string()))?;

        state.channels.clear();
        state.initialized = true;
        info!(
            "Scripted peripheral initialized with {} preset samples",
            config.scripted_samples.len()
        );
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), PeripheralError> {
        let mut state = self.state.lock();
        state.channels.clear();
        state.initialized = false;
        info!("Scripted peripheral shut down");
        Ok(())
    }

    fn diagnostics(&self) -> Option<PeripheralDiagnostics> {
        Some(self.counters())
    }
}
