//! Analog payload codec for dimmer ramps.
//!
//! Layout: byte 0 is the control byte (bit 7 direction, bits 0-6 duration
//! code), byte 1 is the target level (`brightness * 255`).
//!
//! Durations from 2.55s upward are stored linearly in steps of 2.55s
//! (codes 1-63). Shorter durations use a reciprocal scale in codes 64-127
//! so fast ramps keep more resolution. Both directions are lossy.

use serde::{Deserialize, Serialize};

use super::error::ProtocolError;
use super::event::validate_payload;

pub const MIN_DURATION: f64 = 0.04;
pub const MAX_DURATION: f64 = 160.0;

/// Length of one linear duration step, and the numerator of the reciprocal scale.
pub const DURATION_STEP: f64 = 2.55;

const DIRECTION_BIT: u8 = 0x80;
const DURATION_MASK: u8 = 0x7F;
const RECIPROCAL_BASE: u8 = 64;

/// Brightness, ramp duration and direction carried by a dimmer command.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalogPayload {
    /// Target level in `0.0..=1.0`.
    pub brightness: f64,
    /// Ramp duration in seconds, `0.04..=160.0`.
    pub duration: f64,
    /// 0 or 1. Only 0 is accepted unless `brightness == 1.0`.
    pub direction: u8,
}

impl AnalogPayload {
    pub fn new(brightness: f64, duration: f64, direction: u8) -> Self {
        Self {
            brightness,
            duration,
            direction,
        }
    }

    /// Encode into the two payload bytes.
    ///
    /// ```rust
    /// use homebus::protocol::AnalogPayload;
    ///
    /// let bytes = AnalogPayload::new(1.0, 5.1, 0).pack().unwrap();
    /// assert_eq!(bytes, [2, 255]);
    /// ```
    pub fn pack(&self) -> Result<[u8; 2], ProtocolError> {
        self.validate()?;

        let level = (self.brightness * 255.0).round() as u8;
        let code = if self.duration >= DURATION_STEP {
            ((self.duration / DURATION_STEP).round() as u8) & DURATION_MASK
        } else {
            let steps = (DURATION_STEP / self.duration - 1.0).round() as u8;
            steps.wrapping_add(RECIPROCAL_BASE) & DURATION_MASK
        };
        let direction = if self.direction == 1 { DIRECTION_BIT } else { 0 };

        Ok([direction | code, level])
    }

    /// Decode a raw payload, validating it like an event payload first.
    pub fn unpack(payload: &[i64]) -> Result<Self, ProtocolError> {
        validate_payload(payload).map(Self::from_bytes)
    }

    /// Decode two already-valid bytes.
    pub fn from_bytes([control, level]: [u8; 2]) -> Self {
        let code = control & DURATION_MASK;
        let duration = if code < RECIPROCAL_BASE {
            f64::from(code) * DURATION_STEP
        } else {
            DURATION_STEP / f64::from(code - RECIPROCAL_BASE + 1)
        };

        Self {
            brightness: f64::from(level) / 255.0,
            duration,
            direction: u8::from(control & DIRECTION_BIT != 0),
        }
    }

    fn validate(&self) -> Result<(), ProtocolError> {
        if !(0.0..=1.0).contains(&self.brightness) {
            return Err(ProtocolError::InvalidBrightness(self.brightness));
        }
        if !(MIN_DURATION..=MAX_DURATION).contains(&self.duration) {
            return Err(ProtocolError::InvalidDuration(self.duration));
        }
        // Direction is only ever sent together with full brightness.
        if self.direction > 1 || (self.direction != 0 && self.brightness != 1.0) {
            return Err(ProtocolError::InvalidDirection {
                direction: self.direction,
                brightness: self.brightness,
            });
        }
        Ok(())
    }
}

/// Brightness carried by a payload, if any.
pub fn brightness_of(data: Option<[u8; 2]>) -> Option<f64> {
    data.map(|bytes| AnalogPayload::from_bytes(bytes).brightness)
}
