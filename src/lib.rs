//! Homebus: protocol core for a small home-automation bus
//!
//! Numbered devices (switches, dimmers, motors and motor groups) are driven
//! by atomic events: an address, a command code and an optional two-byte
//! payload. This crate validates and encodes those events and runs a
//! table-driven state machine per device kind.
//!
//! # Core Concepts
//!
//! - **Protocol**: command catalog, event codec and analog ramp payloads
//! - **Devices**: caller-owned records with a symbolic state and per-kind fields
//! - **Tables**: immutable per-kind transitions, guards, actions and defaults
//! - **Engine**: applies inbound events and synthesizes outbound ones
//!
//! Malformed data is rejected with an error. Well-formed traffic that no
//! transition accepts is ignored.
//!
//! # Example
//!
//! ```rust
//! use homebus::core::{Device, DeviceKind, DeviceState};
//! use homebus::engine::{Bus, Intent, RecordingSink, TransmitOptions};
//! use homebus::protocol::DeviceEvent;
//!
//! let mut bus = Bus::new(RecordingSink::new());
//! let mut lamp = Device::new(DeviceKind::Switch, &[0]).unwrap();
//!
//! bus.receive(&mut lamp, &DeviceEvent::new(0, "on").unwrap());
//! assert_eq!(lamp.state, DeviceState::On);
//!
//! let sent = bus
//!     .transmit(&mut lamp, Intent::Default, None, TransmitOptions::default())
//!     .unwrap();
//! assert_eq!(sent, Some(DeviceEvent::new(0, "off").unwrap()));
//! assert_eq!(lamp.state, DeviceState::Off);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod engine;
pub mod protocol;
pub mod table;

// Re-export commonly used types
pub use config::{BusConfig, ConfigError};
pub use core::{Device, DeviceKind, DeviceState, State};
pub use engine::{Bus, EventSink, Intent, StateMachine, StateResult, TransmitOptions};
pub use protocol::{AnalogPayload, Command, DeviceEvent, Payload, ProtocolError};
