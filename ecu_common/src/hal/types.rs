//! Peripheral data types.
//!
//! This module defines the values exchanged with peripheral drivers:
//! - `DioLevel` - Digital line level
//! - `CanFrame` - Standard-identifier CAN message

use crate::hal::consts::{CAN_MAX_DLC, CAN_MAX_ID};
use crate::hal::driver::PeripheralError;
use serde::{Deserialize, Serialize};

/// Level of a digital I/O line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum DioLevel {
    /// Line is low.
    #[default]
    Low = 0,
    /// Line is high.
    High = 1,
}

impl DioLevel {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Low),
            1 => Some(Self::High),
            _ => None,
        }
    }

    /// Returns true if the line is high.
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

impl From<bool> for DioLevel {
    fn from(value: bool) -> Self {
        if value { Self::High } else { Self::Low }
    }
}

/// CAN frame with an 11-bit identifier and up to 8 payload bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanFrame {
    id: u16,
    data: heapless::Vec<u8, CAN_MAX_DLC>,
}

impl CanFrame {
    /// Build a frame, validating identifier range and payload length.
    ///
    /// # Errors
    /// Returns `PeripheralError::InvalidFrame` if `id > 0x7FF` or the
    /// payload is longer than 8 bytes.
    pub fn new(id: u16, payload: &[u8]) -> Result<Self, PeripheralError> {
        if id > CAN_MAX_ID {
            return Err(PeripheralError::InvalidFrame(format!(
                "identifier {id:#x} exceeds {CAN_MAX_ID:#x}"
            )));
        }
        let data = heapless::Vec::from_slice(payload).map_err(|_| {
            PeripheralError::InvalidFrame(format!(
                "payload of {} bytes exceeds {CAN_MAX_DLC}",
                payload.len()
            ))
        })?;
        Ok(Self { id, data })
    }

    /// Frame identifier.
    #[inline]
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Payload bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Data length code.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true for a zero-length frame.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
