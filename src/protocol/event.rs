//! Atomic bus events: address, command code and optional two-byte payload.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::analog::AnalogPayload;
use super::command::Command;
use super::error::ProtocolError;

/// Highest valid bus address.
pub const MAX_ADDRESS: u8 = 242;

/// A bus endpoint address in `0..=242`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Address(u8);

impl Address {
    pub fn new(value: i64) -> Result<Self, ProtocolError> {
        match u8::try_from(value) {
            Ok(v) if v <= MAX_ADDRESS => Ok(Self(v)),
            _ => Err(ProtocolError::InvalidAddress(value)),
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Address {
    type Error = ProtocolError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Address> for u8 {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How a caller names the command of an event: a raw code or a catalog name.
#[derive(Clone, Debug, PartialEq)]
pub enum CommandSpec {
    Code(i64),
    Name(String),
    Command(Command),
}

impl CommandSpec {
    /// Resolve to a numeric code, validating range or catalog membership.
    pub fn resolve(&self) -> Result<u8, ProtocolError> {
        match self {
            Self::Code(code) => {
                u8::try_from(*code).map_err(|_| ProtocolError::InvalidCommand(code.to_string()))
            }
            Self::Name(name) => name.parse::<Command>().map(Command::code),
            Self::Command(command) => Ok(command.code()),
        }
    }
}

impl From<i32> for CommandSpec {
    fn from(code: i32) -> Self {
        Self::Code(i64::from(code))
    }
}

impl From<&str> for CommandSpec {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<Command> for CommandSpec {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}

/// Immutable bus event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceEvent {
    address: Address,
    command: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<[u8; 2]>,
}

impl DeviceEvent {
    /// Build an event without payload.
    ///
    /// ```rust
    /// use homebus::protocol::DeviceEvent;
    ///
    /// let event = DeviceEvent::new(7, "off").unwrap();
    /// assert_eq!(event.command(), 12);
    /// assert!(DeviceEvent::new(243, 3).is_err());
    /// ```
    pub fn new(address: i64, command: impl Into<CommandSpec>) -> Result<Self, ProtocolError> {
        let address = Address::new(address)?;
        let command = command.into().resolve()?;
        Ok(Self {
            address,
            command,
            data: None,
        })
    }

    /// Build an event from values that are valid by construction.
    pub const fn from_parts(address: Address, command: u8, data: Option<[u8; 2]>) -> Self {
        Self {
            address,
            command,
            data,
        }
    }

    /// Attach a two-byte payload, validating length and byte range.
    pub fn with_payload(self, payload: &[i64]) -> Result<Self, ProtocolError> {
        let data = validate_payload(payload)?;
        Ok(Self {
            data: Some(data),
            ..self
        })
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    pub const fn command(&self) -> u8 {
        self.command
    }

    pub const fn data(&self) -> Option<[u8; 2]> {
        self.data
    }
}

impl fmt::Display for DeviceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data {
            Some([b0, b1]) => write!(f, "{{{}, {}, [{}, {}]}}", self.address, self.command, b0, b1),
            None => write!(f, "{{{}, {}}}", self.address, self.command),
        }
    }
}

/// Payload handed to the engine when transmitting.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Raw bytes, validated like any event payload.
    Raw(Vec<i64>),
    /// Ramp parameters; only device kinds with an analog event builder accept them.
    Analog(AnalogPayload),
}

impl From<AnalogPayload> for Payload {
    fn from(payload: AnalogPayload) -> Self {
        Self::Analog(payload)
    }
}

/// Validate a raw payload: exactly two entries, each a byte.
pub fn validate_payload(payload: &[i64]) -> Result<[u8; 2], ProtocolError> {
    let [b0, b1] = payload else {
        return Err(ProtocolError::InvalidPayloadLength(payload.len()));
    };
    let byte = |index: usize, value: i64| {
        u8::try_from(value).map_err(|_| ProtocolError::InvalidPayloadByte { index, value })
    };
    Ok([byte(0, *b0)?, byte(1, *b1)?])
}

/// Construct an event, validating address, command and optional payload.
pub fn make_event(
    address: i64,
    command: impl Into<CommandSpec>,
    payload: Option<&[i64]>,
) -> Result<DeviceEvent, ProtocolError> {
    let event = DeviceEvent::new(address, command)?;
    match payload {
        Some(bytes) => event.with_payload(bytes),
        None => Ok(event),
    }
}
