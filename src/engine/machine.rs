//! Stateless interpreter of a transition table.

use std::str::FromStr;

use tracing::{debug, trace};

use super::sink::EventSink;
use crate::core::{Device, DeviceKind, DeviceState, State};
use crate::protocol::{Command, DeviceEvent, Payload, ProtocolError};
use crate::table::{DefaultTransition, Transition, TransitionTable};

/// Observable outcome of one executed transition.
#[derive(Clone, Debug, PartialEq)]
pub struct StateResult {
    pub state: DeviceState,
    pub previous: DeviceState,
    /// Device as it was right after the transition committed
    pub device: Device,
    pub event: DeviceEvent,
}

/// What the caller wants to send.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Command(Command),
    /// Raw code, sent as-is.
    Code(u8),
    /// Whatever the current state's default transition says.
    Default,
}

impl From<Command> for Intent {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}

impl FromStr for Intent {
    type Err = ProtocolError;

    /// `"default"` selects the default transition, anything else must be a command name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            name => name.parse().map(Self::Command),
        }
    }
}

/// Where and how a transmitted event is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransmitOptions {
    /// Slot in `device.addresses()` to send to; 0 is the own address.
    pub address_index: usize,
    /// Feed the event back into `receive` right away instead of waiting
    /// for the bus to echo it.
    pub apply_locally: bool,
}

impl Default for TransmitOptions {
    fn default() -> Self {
        Self {
            address_index: 0,
            apply_locally: true,
        }
    }
}

impl TransmitOptions {
    pub fn at(mut self, address_index: usize) -> Self {
        self.address_index = address_index;
        self
    }

    pub fn remote_only(mut self) -> Self {
        self.apply_locally = false;
        self
    }
}

/// Runs a [`TransitionTable`] against device records.
///
/// The machine holds no state of its own; every call is a function of the
/// table, the device and the event. Devices are mutated only by
/// [`execute`](Self::execute).
///
/// # Example
///
/// ```rust
/// use homebus::core::{Device, DeviceKind, DeviceState};
/// use homebus::engine::StateMachine;
/// use homebus::protocol::DeviceEvent;
///
/// let mut lamp = Device::new(DeviceKind::Switch, &[0]).unwrap();
/// let machine = StateMachine::for_kind(lamp.kind());
///
/// let result = machine.receive(&mut lamp, &DeviceEvent::new(0, "on").unwrap());
/// assert_eq!(result.map(|r| r.state), Some(DeviceState::On));
///
/// // unknown traffic is ignored
/// assert!(machine.receive(&mut lamp, &DeviceEvent::new(0, 13).unwrap()).is_none());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct StateMachine<'t> {
    table: &'t TransitionTable,
}

impl StateMachine<'static> {
    /// Machine for the built-in table of `kind`.
    pub fn for_kind(kind: DeviceKind) -> Self {
        Self::new(kind.table())
    }
}

impl<'t> StateMachine<'t> {
    pub fn new(table: &'t TransitionTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'t TransitionTable {
        self.table
    }

    /// Local transitions of the current state plus the global ones, filtered by guard.
    pub fn allowed_transitions(
        &self,
        device: &Device,
        event: Option<&DeviceEvent>,
    ) -> Vec<&'t Transition> {
        self.table
            .candidates(device.state)
            .filter(|t| t.is_allowed(device, event))
            .collect()
    }

    /// Allowed commands for each of the device's addresses, in address order.
    pub fn transition_keys(&self, device: &Device) -> Vec<Vec<Command>> {
        device
            .addresses()
            .iter()
            .map(|address| {
                let mut keys = Vec::new();
                for transition in self.table.candidates(device.state) {
                    let sample =
                        DeviceEvent::from_parts(*address, transition.command.code(), None);
                    if transition.is_allowed(device, Some(&sample))
                        && !keys.contains(&transition.command)
                    {
                        keys.push(transition.command);
                    }
                }
                keys
            })
            .collect()
    }

    /// Apply an incoming event. Returns `None` when the event is not for
    /// this device or no allowed transition matches its command.
    pub fn receive(&self, device: &mut Device, event: &DeviceEvent) -> Option<StateResult> {
        if !device.listens_on(event.address()) {
            trace!(address = %event.address(), "Ignoring event for foreign address");
            return None;
        }

        let transition = self
            .allowed_transitions(device, Some(event))
            .into_iter()
            .find(|t| t.command.code() == event.command());

        match transition {
            Some(transition) => Some(self.execute(device, transition, event)),
            None => {
                trace!(
                    event = %event,
                    state = device.state.name(),
                    "No transition matches event"
                );
                None
            }
        }
    }

    /// Run exit actions, transition actions and entry actions, in that
    /// order, then commit the target state.
    pub fn execute(
        &self,
        device: &mut Device,
        transition: &Transition,
        event: &DeviceEvent,
    ) -> StateResult {
        let previous = device.state;

        if let Some(definition) = self.table.state(previous) {
            for action in &definition.exit {
                action.run(device, event);
            }
        }
        for action in &transition.actions {
            action.run(device, event);
        }
        if let Some(definition) = self.table.state(transition.target) {
            for action in &definition.entry {
                action.run(device, event);
            }
        }
        device.state = transition.target;

        debug!(
            kind = %device.kind(),
            event = %event,
            from = previous.name(),
            to = transition.target.name(),
            "Executed transition"
        );

        StateResult {
            state: transition.target,
            previous,
            device: device.clone(),
            event: *event,
        }
    }

    /// Command the current state's default transition resolves to when
    /// sending to the address in slot `address_index`.
    ///
    /// Guards see a synthesized event at that address, so address-scoped
    /// tables can default differently per slot. A candidate list that leaves
    /// zero or several survivors resolves to `None`, the same as a state
    /// without a default.
    pub fn resolve_default(&self, device: &Device, address_index: usize) -> Option<Command> {
        let address = device.address(address_index)?;
        let admits = |t: &Transition| {
            let sample = DeviceEvent::from_parts(address, t.command.code(), None);
            t.is_allowed(device, Some(&sample))
        };

        let definition = self.table.state(device.state)?;
        match definition.default.as_ref()? {
            DefaultTransition::Named(command) => self
                .table
                .candidates(device.state)
                .find(|t| t.command == *command && admits(*t))
                .map(|t| t.command),
            DefaultTransition::Single(transition) => Some(transition.command),
            DefaultTransition::Candidates(candidates) => {
                let mut survivors = candidates.iter().filter(|t| admits(*t));
                match (survivors.next(), survivors.next()) {
                    (Some(only), None) => Some(only.command),
                    _ => None,
                }
            }
        }
    }

    /// Build an outgoing event, hand it to `sink`, and optionally apply it
    /// to the device right away.
    ///
    /// Returns `Ok(None)` when `Intent::Default` does not resolve. Invalid
    /// payloads or address slots are errors.
    pub fn transmit<S>(
        &self,
        sink: &S,
        device: &mut Device,
        intent: Intent,
        payload: Option<&Payload>,
        options: TransmitOptions,
    ) -> Result<Option<DeviceEvent>, ProtocolError>
    where
        S: EventSink + ?Sized,
    {
        let address =
            device
                .address(options.address_index)
                .ok_or(ProtocolError::UnknownAddressIndex {
                    index: options.address_index,
                    len: device.addresses().len(),
                })?;

        let command = match intent {
            Intent::Command(command) => command.code(),
            Intent::Code(code) => code,
            Intent::Default => match self.resolve_default(device, options.address_index) {
                Some(command) => command.code(),
                None => {
                    debug!(
                        kind = %device.kind(),
                        state = device.state.name(),
                        "No default transition to transmit"
                    );
                    return Ok(None);
                }
            },
        };

        let event = self.table.build_event(device, address, command, payload)?;
        debug!(event = %event, "Transmitting event");
        sink.send(&event);

        if options.apply_locally {
            self.receive(device, &event);
        }
        Ok(Some(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{StateBuilder, TableBuilder, TransitionBuilder};
    use crate::core::Auxiliary;
    use crate::engine::{NullSink, RecordingSink};
    use std::sync::{Arc, Mutex};

    fn event(address: i64, command: impl Into<crate::protocol::CommandSpec>) -> DeviceEvent {
        DeviceEvent::new(address, command).unwrap()
    }

    #[test]
    fn execute_runs_exit_transition_entry_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (exit_log, action_log, entry_log) = (log.clone(), log.clone(), log.clone());

        let table = TableBuilder::new()
            .state(
                DeviceState::Off,
                StateBuilder::new()
                    .on_exit(move |d: &mut Device, _: &DeviceEvent| {
                        exit_log.lock().unwrap().push(("exit", d.state))
                    })
                    .transition(
                        TransitionBuilder::new(Command::Toggle, DeviceState::On)
                            .action(move |d: &mut Device, _: &DeviceEvent| {
                                action_log.lock().unwrap().push(("action", d.state))
                            })
                            .build(),
                    )
                    .build(),
            )
            .state(
                DeviceState::On,
                StateBuilder::new()
                    .on_entry(move |d: &mut Device, _: &DeviceEvent| {
                        entry_log.lock().unwrap().push(("entry", d.state))
                    })
                    .build(),
            )
            .build();

        let machine = StateMachine::new(&table);
        let mut device = Device::new(DeviceKind::Switch, &[1]).unwrap();
        device.state = DeviceState::Off;

        let result = machine.receive(&mut device, &event(1, "toggle")).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                ("exit", DeviceState::Off),
                ("action", DeviceState::Off),
                ("entry", DeviceState::Off),
            ]
        );
        assert_eq!(result.previous, DeviceState::Off);
        assert_eq!(result.state, DeviceState::On);
        assert_eq!(result.device.state, DeviceState::On);
        assert_eq!(device.state, DeviceState::On);
    }

    #[test]
    fn receive_ignores_foreign_addresses() {
        let machine = StateMachine::for_kind(DeviceKind::Switch);
        let mut device = Device::new(DeviceKind::Switch, &[1]).unwrap();

        assert!(machine.receive(&mut device, &event(2, "on")).is_none());
        assert_eq!(device.state, DeviceState::Undefined);
    }

    #[test]
    fn allowed_transitions_respect_guards() {
        let machine = StateMachine::for_kind(DeviceKind::DirectionalGroup);
        let device = Device::new(DeviceKind::DirectionalGroup, &[1, 2, 3]).unwrap();

        let own: Vec<Command> = machine
            .allowed_transitions(&device, Some(&event(1, "up")))
            .iter()
            .map(|t| t.command)
            .collect();
        assert_eq!(own, vec![Command::UpStop, Command::DownStop]);

        let group: Vec<Command> = machine
            .allowed_transitions(&device, Some(&event(2, "up")))
            .iter()
            .map(|t| t.command)
            .collect();
        assert_eq!(group, vec![Command::Up, Command::Down, Command::Stop]);
    }

    #[test]
    fn transition_keys_per_address() {
        let machine = StateMachine::for_kind(DeviceKind::DirectionalGroup);
        let device = Device::new(DeviceKind::DirectionalGroup, &[1, 2, 3]).unwrap();

        let keys = machine.transition_keys(&device);
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0], vec![Command::UpStop, Command::DownStop]);
        assert_eq!(keys[1], vec![Command::Up, Command::Down, Command::Stop]);
        assert_eq!(keys[2], keys[1]);
    }

    #[test]
    fn transition_keys_for_switch_follow_state() {
        let machine = StateMachine::for_kind(DeviceKind::Switch);
        let mut device = Device::new(DeviceKind::Switch, &[4]).unwrap();

        assert_eq!(
            machine.transition_keys(&device),
            vec![vec![Command::On, Command::Off]]
        );
        device.state = DeviceState::On;
        assert_eq!(
            machine.transition_keys(&device),
            vec![vec![Command::Toggle, Command::On, Command::Off]]
        );
    }

    #[test]
    fn resolve_default_variants() {
        let table = TableBuilder::new()
            .global(TransitionBuilder::new(Command::Up, DeviceState::Up).build())
            .state(
                DeviceState::Undefined,
                StateBuilder::new()
                    .default_to(TransitionBuilder::new(Command::Stop, DeviceState::Stop).build())
                    .build(),
            )
            .state(
                DeviceState::Up,
                StateBuilder::new().default_named(Command::Down).build(),
            )
            .state(
                DeviceState::Stop,
                StateBuilder::new()
                    .default_among(vec![
                        TransitionBuilder::new(Command::Up, DeviceState::Up).build(),
                        TransitionBuilder::new(Command::Down, DeviceState::Down).build(),
                    ])
                    .build(),
            )
            .build();
        let machine = StateMachine::new(&table);
        let mut device = Device::new(DeviceKind::Directional, &[1]).unwrap();

        assert_eq!(machine.resolve_default(&device, 0), Some(Command::Stop));

        // named default without a matching transition
        device.state = DeviceState::Up;
        assert_eq!(machine.resolve_default(&device, 0), None);

        // two unguarded candidates are ambiguous
        device.state = DeviceState::Stop;
        assert_eq!(machine.resolve_default(&device, 0), None);

        // no definition at all
        device.state = DeviceState::On;
        assert_eq!(machine.resolve_default(&device, 0), None);
    }

    #[test]
    fn resolve_default_sees_target_address() {
        let table = TableBuilder::new()
            .global(
                TransitionBuilder::new(Command::On, DeviceState::On)
                    .when(|d: &Device, e: Option<&DeviceEvent>| {
                        e.is_some_and(|e| d.address_index(e.address()) == Some(1))
                    })
                    .build(),
            )
            .state(
                DeviceState::Undefined,
                StateBuilder::new().default_named(Command::On).build(),
            )
            .state(DeviceState::On, StateBuilder::new().build())
            .build();
        let machine = StateMachine::new(&table);
        let mut device = Device::new(DeviceKind::DirectionalGroup, &[1, 2, 3]).unwrap();

        assert_eq!(machine.resolve_default(&device, 0), None);
        assert_eq!(machine.resolve_default(&device, 1), Some(Command::On));

        let sent = machine
            .transmit(&NullSink, &mut device, Intent::Default, None, TransmitOptions::default())
            .unwrap();
        assert_eq!(sent, None);

        let sent = machine
            .transmit(
                &NullSink,
                &mut device,
                Intent::Default,
                None,
                TransmitOptions::default().at(1),
            )
            .unwrap();
        assert_eq!(sent, Some(event(2, "on")));
        assert_eq!(device.state, DeviceState::On);
    }

    #[test]
    fn transmit_sends_then_applies_locally() {
        let machine = StateMachine::for_kind(DeviceKind::Switch);
        let sink = RecordingSink::new();
        let mut device = Device::new(DeviceKind::Switch, &[6]).unwrap();

        let sent = machine
            .transmit(&sink, &mut device, Intent::Command(Command::On), None, TransmitOptions::default())
            .unwrap();

        assert_eq!(sent, Some(event(6, 3)));
        assert_eq!(sink.events(), vec![event(6, 3)]);
        assert_eq!(device.state, DeviceState::On);
    }

    #[test]
    fn transmit_remote_only_leaves_state() {
        let machine = StateMachine::for_kind(DeviceKind::Switch);
        let mut device = Device::new(DeviceKind::Switch, &[6]).unwrap();

        machine
            .transmit(
                &NullSink,
                &mut device,
                Intent::Command(Command::On),
                None,
                TransmitOptions::default().remote_only(),
            )
            .unwrap();
        assert_eq!(device.state, DeviceState::Undefined);
    }

    #[test]
    fn transmit_raw_code_with_payload() {
        let machine = StateMachine::for_kind(DeviceKind::Switch);
        let mut device = Device::new(DeviceKind::Switch, &[6]).unwrap();

        let sent = machine
            .transmit(
                &NullSink,
                &mut device,
                Intent::Code(13),
                Some(&Payload::Raw(vec![7, 9])),
                TransmitOptions::default(),
            )
            .unwrap()
            .unwrap();
        assert_eq!(sent.command(), 13);
        assert_eq!(sent.data(), Some([7, 9]));
        assert_eq!(device.state, DeviceState::Undefined);
    }

    #[test]
    fn transmit_rejects_unknown_address_slot() {
        let machine = StateMachine::for_kind(DeviceKind::Switch);
        let mut device = Device::new(DeviceKind::Switch, &[6]).unwrap();

        assert_eq!(
            machine.transmit(
                &NullSink,
                &mut device,
                Intent::Default,
                None,
                TransmitOptions::default().at(1),
            ),
            Err(ProtocolError::UnknownAddressIndex { index: 1, len: 1 })
        );
    }

    #[test]
    fn transmit_to_group_slot_moves_group() {
        let machine = StateMachine::for_kind(DeviceKind::DirectionalGroup);
        let mut device = Device::new(DeviceKind::DirectionalGroup, &[1, 2, 3]).unwrap();

        let sent = machine
            .transmit(
                &NullSink,
                &mut device,
                Intent::Command(Command::Down),
                None,
                TransmitOptions::default().at(2),
            )
            .unwrap();
        assert_eq!(sent, Some(event(3, "down")));
        assert_eq!(device.state, DeviceState::Down);
    }

    #[test]
    fn transmit_dimmer_analog_payload_sets_brightness() {
        let machine = StateMachine::for_kind(DeviceKind::Dimmer);
        let mut device = Device::new(DeviceKind::Dimmer, &[9]).unwrap();
        let payload = Payload::Analog(crate::protocol::AnalogPayload::new(0.4, 1.0, 0));

        machine
            .transmit(
                &NullSink,
                &mut device,
                Intent::Command(Command::On),
                Some(&payload),
                TransmitOptions::default(),
            )
            .unwrap();

        assert_eq!(device.state, DeviceState::On);
        match device.aux {
            Auxiliary::Dimmer { brightness, .. } => assert!((brightness - 0.4).abs() <= 1.0 / 255.0),
            ref other => panic!("Expected dimmer aux, got {:?}", other),
        }
    }

    #[test]
    fn intent_parses_default_sentinel() {
        assert_eq!("default".parse::<Intent>(), Ok(Intent::Default));
        assert_eq!("up-stop".parse::<Intent>(), Ok(Intent::Command(Command::UpStop)));
        assert!("sideways".parse::<Intent>().is_err());
    }
}
