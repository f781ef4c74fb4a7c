//! Wire-level protocol: command catalog, event codec and analog payloads.
//!
//! Everything here is pure validation and encoding. Constructors fail fast
//! with a [`ProtocolError`] on malformed input.

mod analog;
mod command;
mod error;
mod event;

pub use analog::{brightness_of, AnalogPayload, DURATION_STEP, MAX_DURATION, MIN_DURATION};
pub use command::{commands_for_code, is_valid_name, name_to_code, Command};
pub use error::ProtocolError;
pub use event::{
    make_event, validate_payload, Address, CommandSpec, DeviceEvent, Payload,
    MAX_ADDRESS,
};
