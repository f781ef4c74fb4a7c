//! Declarative transition tables.

use std::collections::HashMap;

use super::error::TableError;
use crate::core::{Action, Device, DeviceState, Guard, State};
use crate::protocol::{validate_payload, Address, Command, DeviceEvent, Payload, ProtocolError};

/// Builds the outgoing event for a device kind.
pub type EventBuilder =
    fn(&Device, Address, u8, Option<&Payload>) -> Result<DeviceEvent, ProtocolError>;

/// A rule mapping a command to a target state.
#[derive(Debug)]
pub struct Transition {
    pub command: Command,
    pub target: DeviceState,
    pub actions: Vec<Action>,
    pub guard: Option<Guard>,
}

impl Transition {
    /// Whether the guard (if any) currently admits this transition.
    pub fn is_allowed(&self, device: &Device, event: Option<&DeviceEvent>) -> bool {
        self.guard.as_ref().is_none_or(|g| g.check(device, event))
    }
}

/// How a state answers a generic "advance" request.
#[derive(Debug)]
pub enum DefaultTransition {
    /// Look the command up among the state's local transitions, then the global ones.
    Named(Command),
    /// Use this transition's command as-is.
    Single(Transition),
    /// Exactly one candidate must pass its guard; otherwise there is no default.
    Candidates(Vec<Transition>),
}

#[derive(Debug, Default)]
pub struct StateDefinition {
    pub entry: Vec<Action>,
    pub exit: Vec<Action>,
    pub default: Option<DefaultTransition>,
    /// Transitions only available while in this state.
    pub transitions: Vec<Transition>,
}

/// Immutable description of one device kind's state machine.
#[derive(Debug, Default)]
pub struct TransitionTable {
    /// Transitions available in every state.
    pub global: Vec<Transition>,
    pub states: HashMap<DeviceState, StateDefinition>,
    /// Kind-specific event construction; [`plain_event`] when absent.
    pub event_builder: Option<EventBuilder>,
}

impl TransitionTable {
    pub fn state(&self, state: DeviceState) -> Option<&StateDefinition> {
        self.states.get(&state)
    }

    /// Local transitions of `state` followed by the global ones.
    pub fn candidates(&self, state: DeviceState) -> impl Iterator<Item = &Transition> {
        self.state(state)
            .map(|def| def.transitions.as_slice())
            .unwrap_or_default()
            .iter()
            .chain(self.global.iter())
    }

    pub fn build_event(
        &self,
        device: &Device,
        address: Address,
        command: u8,
        payload: Option<&Payload>,
    ) -> Result<DeviceEvent, ProtocolError> {
        let build = self.event_builder.unwrap_or(plain_event);
        build(device, address, command, payload)
    }

    /// Check that every target state is defined and every named default resolves.
    pub fn validate(&self) -> Result<(), TableError> {
        let defined = |t: &Transition| {
            if self.states.contains_key(&t.target) {
                Ok(())
            } else {
                Err(TableError::MissingState {
                    state: t.target.name().to_string(),
                })
            }
        };

        for transition in &self.global {
            defined(transition)?;
        }

        for (state, def) in &self.states {
            for transition in &def.transitions {
                defined(transition)?;
            }
            match &def.default {
                Some(DefaultTransition::Named(command)) => {
                    if !self.candidates(*state).any(|t| t.command == *command) {
                        return Err(TableError::UnresolvableDefault {
                            state: state.name().to_string(),
                            command: command.name().to_string(),
                        });
                    }
                }
                Some(DefaultTransition::Single(transition)) => defined(transition)?,
                Some(DefaultTransition::Candidates(candidates)) => {
                    for transition in candidates {
                        defined(transition)?;
                    }
                }
                None => {}
            }
        }
        Ok(())
    }
}

/// Event construction for kinds without analog payloads: raw bytes only.
pub fn plain_event(
    device: &Device,
    address: Address,
    command: u8,
    payload: Option<&Payload>,
) -> Result<DeviceEvent, ProtocolError> {
    let data = match payload {
        None => None,
        Some(Payload::Raw(bytes)) => Some(validate_payload(bytes)?),
        Some(Payload::Analog(_)) => {
            return Err(ProtocolError::AnalogNotSupported {
                kind: device.kind().to_string(),
            })
        }
    };
    Ok(DeviceEvent::from_parts(address, command, data))
}
