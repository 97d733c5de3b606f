//! Per-channel arming and output state shared by the built-in drivers.

use ecu_common::hal::consts::{DUTY_CYCLE_MAX, MAX_CHANNELS};
use ecu_common::hal::driver::PeripheralError;
use ecu_common::hal::types::DioLevel;

#[derive(Debug, Clone, Copy)]
struct PwmChannel {
    period_ms: u16,
    duty: u16,
}

/// Armed channels of one peripheral instance.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChannelTable {
    adc_armed: u16,
    dio: [Option<DioLevel>; MAX_CHANNELS],
    pwm: [Option<PwmChannel>; MAX_CHANNELS],
}

impl ChannelTable {
    fn index(channel: u8) -> Result<usize, PeripheralError> {
        let idx = channel as usize;
        if idx >= MAX_CHANNELS {
            return Err(PeripheralError::InvalidChannel(channel));
        }
        Ok(idx)
    }

    pub(crate) fn arm_adc(&mut self, channel: u8) -> Result<(), PeripheralError> {
        let idx = Self::index(channel)?;
        self.adc_armed |= 1 << idx;
        Ok(())
    }

    pub(crate) fn ensure_adc(&self, channel: u8) -> Result<(), PeripheralError> {
        let idx = Self::index(channel)?;
        if self.adc_armed & (1 << idx) == 0 {
            return Err(PeripheralError::ChannelNotArmed {
                kind: "ADC",
                channel,
            });
        }
        Ok(())
    }

    /// Arming a line that is already armed keeps its level.
    pub(crate) fn arm_dio(&mut self, channel: u8) -> Result<(), PeripheralError> {
        let idx = Self::index(channel)?;
        self.dio[idx].get_or_insert(DioLevel::Low);
        Ok(())
    }

    pub(crate) fn dio_level(&self, channel: u8) -> Result<DioLevel, PeripheralError> {
        let idx = Self::index(channel)?;
        self.dio[idx].ok_or(PeripheralError::ChannelNotArmed {
            kind: "DIO",
            channel,
        })
    }

    pub(crate) fn set_dio_level(
        &mut self,
        channel: u8,
        level: DioLevel,
    ) -> Result<(), PeripheralError> {
        let idx = Self::index(channel)?;
        match &mut self.dio[idx] {
            Some(current) => {
                *current = level;
                Ok(())
            }
            None => Err(PeripheralError::ChannelNotArmed {
                kind: "DIO",
                channel,
            }),
        }
    }

    pub(crate) fn arm_pwm(&mut self, channel: u8, period_ms: u16) -> Result<(), PeripheralError> {
        let idx = Self::index(channel)?;
        self.pwm[idx] = Some(PwmChannel { period_ms, duty: 0 });
        Ok(())
    }

    pub(crate) fn set_duty(&mut self, channel: u8, duty: u16) -> Result<(), PeripheralError> {
        let idx = Self::index(channel)?;
        if duty > DUTY_CYCLE_MAX {
            return Err(PeripheralError::InvalidDutyCycle { channel, duty });
        }
        match &mut self.pwm[idx] {
            Some(pwm) => {
                pwm.duty = duty;
                Ok(())
            }
            None => Err(PeripheralError::ChannelNotArmed {
                kind: "PWM",
                channel,
            }),
        }
    }

    pub(crate) fn duty(&self, channel: u8) -> Option<u16> {
        let idx = Self::index(channel).ok()?;
        self.pwm[idx].map(|pwm| pwm.duty)
    }

    pub(crate) fn pwm_period(&self, channel: u8) -> Option<u16> {
        let idx = Self::index(channel).ok()?;
        self.pwm[idx].map(|pwm| pwm.period_ms)
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}
