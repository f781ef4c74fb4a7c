//! Transition tables for the four bus device kinds.
//!
//! Each table is built once per process on first use and never changes.

use std::sync::OnceLock;

use super::transition::{plain_event, TransitionTable};
use crate::builder::{StateBuilder, TableBuilder, TransitionBuilder};
use crate::core::{AddressRole, Auxiliary, Device, DeviceKind, DeviceState};
use crate::protocol::{brightness_of, Address, Command, DeviceEvent, Payload, ProtocolError};

static SWITCH: OnceLock<TransitionTable> = OnceLock::new();
static DIMMER: OnceLock<TransitionTable> = OnceLock::new();
static DIRECTIONAL: OnceLock<TransitionTable> = OnceLock::new();
static DIRECTIONAL_GROUP: OnceLock<TransitionTable> = OnceLock::new();

impl DeviceKind {
    /// The transition table driving devices of this kind.
    pub fn table(self) -> &'static TransitionTable {
        match self {
            Self::Switch => SWITCH.get_or_init(switch_table),
            Self::Dimmer => DIMMER.get_or_init(dimmer_table),
            Self::Directional => DIRECTIONAL.get_or_init(directional_table),
            Self::DirectionalGroup => DIRECTIONAL_GROUP.get_or_init(directional_group_table),
        }
    }
}

fn switch_table() -> TransitionTable {
    TableBuilder::new()
        .global(TransitionBuilder::new(Command::On, DeviceState::On).build())
        .global(TransitionBuilder::new(Command::Off, DeviceState::Off).build())
        .state(
            DeviceState::Undefined,
            StateBuilder::new().default_named(Command::On).build(),
        )
        .state(
            DeviceState::Off,
            StateBuilder::new()
                .default_named(Command::On)
                .transition(TransitionBuilder::new(Command::Toggle, DeviceState::On).build())
                .build(),
        )
        .state(
            DeviceState::On,
            StateBuilder::new()
                .default_named(Command::Off)
                .transition(TransitionBuilder::new(Command::Toggle, DeviceState::Off).build())
                .build(),
        )
        .build()
}

fn dimmer_table() -> TransitionTable {
    TableBuilder::new()
        .global(
            TransitionBuilder::new(Command::On, DeviceState::On)
                .action(|device, event| {
                    set_brightness(device, brightness_of(event.data()).unwrap_or(1.0))
                })
                .build(),
        )
        .global(TransitionBuilder::new(Command::Off, DeviceState::Off).build())
        .state(
            DeviceState::Undefined,
            StateBuilder::new().default_named(Command::On).build(),
        )
        .state(
            DeviceState::Off,
            StateBuilder::new()
                .on_entry(|device, _| {
                    if let Auxiliary::Dimmer { brightness, memory } = &mut device.aux {
                        // a repeated off must not overwrite the remembered level
                        if *brightness > 0.0 {
                            *memory = Some(*brightness);
                        }
                        *brightness = 0.0;
                    }
                })
                .default_named(Command::On)
                .transition(
                    TransitionBuilder::new(Command::Toggle, DeviceState::On)
                        .action(|device, _| {
                            let restored = match device.aux {
                                Auxiliary::Dimmer { memory, .. } => memory.unwrap_or(1.0),
                                _ => 1.0,
                            };
                            set_brightness(device, restored);
                        })
                        .build(),
                )
                .build(),
        )
        .state(
            DeviceState::On,
            StateBuilder::new()
                .default_named(Command::Off)
                .transition(TransitionBuilder::new(Command::Toggle, DeviceState::Off).build())
                .build(),
        )
        .event_builder(dimmer_event)
        .build()
}

fn set_brightness(device: &mut Device, value: f64) {
    if let Auxiliary::Dimmer { brightness, .. } = &mut device.aux {
        *brightness = value;
    }
}

/// Dimmers pack analog ramps into the payload; raw bytes pass through.
fn dimmer_event(
    device: &Device,
    address: Address,
    command: u8,
    payload: Option<&Payload>,
) -> Result<DeviceEvent, ProtocolError> {
    match payload {
        Some(Payload::Analog(analog)) => {
            Ok(DeviceEvent::from_parts(address, command, Some(analog.pack()?)))
        }
        _ => plain_event(device, address, command, payload),
    }
}

fn remembered_direction(device: &Device) -> Option<DeviceState> {
    match device.aux {
        Auxiliary::Directional { memory } => memory,
        _ => None,
    }
}

/// Stop entry: remember the direction the motor was travelling in.
fn remember_direction(device: &mut Device, _: &DeviceEvent) {
    let previous = device.state;
    if let Auxiliary::Directional { memory } = &mut device.aux {
        if previous.is_moving() {
            *memory = Some(previous);
        }
    }
}

/// After a stop, travel the opposite way of the last move (up when unknown).
fn resumes_up(device: &Device) -> bool {
    matches!(remembered_direction(device), None | Some(DeviceState::Down))
}

fn resumes_down(device: &Device) -> bool {
    remembered_direction(device) == Some(DeviceState::Up)
}

fn directional_table() -> TransitionTable {
    TableBuilder::new()
        .global(TransitionBuilder::new(Command::Up, DeviceState::Up).build())
        .global(TransitionBuilder::new(Command::Down, DeviceState::Down).build())
        .global(TransitionBuilder::new(Command::Stop, DeviceState::Stop).build())
        .state(
            DeviceState::Undefined,
            StateBuilder::new().default_named(Command::Up).build(),
        )
        .state(
            DeviceState::Up,
            StateBuilder::new()
                .default_named(Command::Stop)
                .transition(TransitionBuilder::new(Command::UpStop, DeviceState::Stop).build())
                .transition(TransitionBuilder::new(Command::DownStop, DeviceState::Down).build())
                .build(),
        )
        .state(
            DeviceState::Down,
            StateBuilder::new()
                .default_named(Command::Stop)
                .transition(TransitionBuilder::new(Command::DownStop, DeviceState::Stop).build())
                .transition(TransitionBuilder::new(Command::UpStop, DeviceState::Up).build())
                .build(),
        )
        .state(
            DeviceState::Stop,
            StateBuilder::new()
                .on_entry(remember_direction)
                .default_among(vec![
                    TransitionBuilder::new(Command::Up, DeviceState::Up)
                        .when(|device, _| resumes_up(device))
                        .build(),
                    TransitionBuilder::new(Command::Down, DeviceState::Down)
                        .when(|device, _| resumes_down(device))
                        .build(),
                ])
                .transition(TransitionBuilder::new(Command::UpStop, DeviceState::Up).build())
                .transition(TransitionBuilder::new(Command::DownStop, DeviceState::Down).build())
                .build(),
        )
        .build()
}

fn role_of(device: &Device, event: &DeviceEvent) -> Option<usize> {
    device.address_index(event.address())
}

/// Group moves only react to the group or central address.
fn via_group_or_central(device: &Device, event: Option<&DeviceEvent>) -> bool {
    event.is_some_and(|e| {
        matches!(
            role_of(device, e),
            Some(i) if i == AddressRole::Group.index() || i == AddressRole::Central.index()
        )
    })
}

/// Single-device stepping only reacts to the own address. Without an event
/// the caller is stepping this device directly.
fn via_own_address(device: &Device, event: Option<&DeviceEvent>) -> bool {
    event.map_or(true, |e| role_of(device, e) == Some(AddressRole::Own.index()))
}

fn step(command: Command, target: DeviceState) -> TransitionBuilder {
    TransitionBuilder::new(command, target).when(via_own_address)
}

fn group_move(command: Command, target: DeviceState) -> TransitionBuilder {
    TransitionBuilder::new(command, target).when(via_group_or_central)
}

/// Group defaults: step commands on the own address, group moves on the
/// group and central addresses.
fn directional_group_table() -> TransitionTable {
    TableBuilder::new()
        .global(group_move(Command::Up, DeviceState::Up).build())
        .global(group_move(Command::Down, DeviceState::Down).build())
        .global(group_move(Command::Stop, DeviceState::Stop).build())
        .state(
            DeviceState::Undefined,
            StateBuilder::new()
                .default_among(vec![
                    step(Command::UpStop, DeviceState::Up).build(),
                    group_move(Command::Up, DeviceState::Up).build(),
                ])
                .transition(step(Command::UpStop, DeviceState::Up).build())
                .transition(step(Command::DownStop, DeviceState::Down).build())
                .build(),
        )
        .state(
            DeviceState::Up,
            StateBuilder::new()
                .default_among(vec![
                    step(Command::UpStop, DeviceState::Stop).build(),
                    group_move(Command::Stop, DeviceState::Stop).build(),
                ])
                .transition(step(Command::UpStop, DeviceState::Stop).build())
                .transition(step(Command::DownStop, DeviceState::Down).build())
                .build(),
        )
        .state(
            DeviceState::Down,
            StateBuilder::new()
                .default_among(vec![
                    step(Command::DownStop, DeviceState::Stop).build(),
                    group_move(Command::Stop, DeviceState::Stop).build(),
                ])
                .transition(step(Command::DownStop, DeviceState::Stop).build())
                .transition(step(Command::UpStop, DeviceState::Up).build())
                .build(),
        )
        .state(
            DeviceState::Stop,
            StateBuilder::new()
                .on_entry(remember_direction)
                .default_among(vec![
                    TransitionBuilder::new(Command::UpStop, DeviceState::Up)
                        .when(|device, event| via_own_address(device, event) && resumes_up(device))
                        .build(),
                    TransitionBuilder::new(Command::DownStop, DeviceState::Down)
                        .when(|device, event| {
                            via_own_address(device, event) && resumes_down(device)
                        })
                        .build(),
                    TransitionBuilder::new(Command::Up, DeviceState::Up)
                        .when(|device, event| {
                            via_group_or_central(device, event) && resumes_up(device)
                        })
                        .build(),
                    TransitionBuilder::new(Command::Down, DeviceState::Down)
                        .when(|device, event| {
                            via_group_or_central(device, event) && resumes_down(device)
                        })
                        .build(),
                ])
                .transition(step(Command::UpStop, DeviceState::Up).build())
                .transition(step(Command::DownStop, DeviceState::Down).build())
                .build(),
        )
        .build()
}
