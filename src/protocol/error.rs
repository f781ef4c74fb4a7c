//! Validation errors raised while building or decoding bus data.

use thiserror::Error;

/// Errors raised synchronously when constructing events, packing analog
/// payloads or assembling device records.
///
/// These are hard failures for malformed data. Well-formed traffic that no
/// transition accepts is not an error; the engine simply ignores it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProtocolError {
    #[error("Address {0} out of range (expected 0..=242)")]
    InvalidAddress(i64),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Payload must be exactly 2 bytes, got {0}")]
    InvalidPayloadLength(usize),

    #[error("Payload byte {value} at index {index} out of range (expected 0..=255)")]
    InvalidPayloadByte { index: usize, value: i64 },

    #[error("Brightness {0} out of range (expected 0.0..=1.0)")]
    InvalidBrightness(f64),

    #[error("Duration {0}s out of range (expected 0.04..=160.0)")]
    InvalidDuration(f64),

    #[error("Direction {direction} not allowed with brightness {brightness}")]
    InvalidDirection { direction: u8, brightness: f64 },

    #[error("A {kind} device needs {expected} address(es), got {found}")]
    InvalidAddressCount {
        kind: String,
        expected: usize,
        found: usize,
    },

    #[error("Address index {index} out of range for a device with {len} address(es)")]
    UnknownAddressIndex { index: usize, len: usize },

    #[error("A {kind} device cannot carry an analog payload")]
    AnalogNotSupported { kind: String },

    #[error("Auxiliary fields do not fit a {kind} device")]
    InvalidAuxiliary { kind: String },

    #[error("A {kind} device has no state '{state}'")]
    UnsupportedState { kind: String, state: String },
}
