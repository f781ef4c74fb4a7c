//! Bus handle: binds an outbound sink once and records what happens.

use chrono::Utc;

use super::machine::{Intent, StateMachine, StateResult, TransmitOptions};
use super::sink::EventSink;
use crate::core::{Device, HistoryEntry, StateHistory};
use crate::protocol::{DeviceEvent, Payload, ProtocolError};

/// Explicit handle to the bus.
///
/// Owns the sink that transmitted events go to and a history of every
/// transition applied through it. Each device is driven by the built-in
/// table for its kind.
///
/// # Example
///
/// ```rust
/// use homebus::core::{Device, DeviceKind, DeviceState};
/// use homebus::engine::{Bus, Intent, RecordingSink, TransmitOptions};
///
/// let mut bus = Bus::new(RecordingSink::new());
/// let mut blind = Device::new(DeviceKind::Directional, &[12]).unwrap();
///
/// let sent = bus
///     .transmit(&mut blind, Intent::Default, None, TransmitOptions::default())
///     .unwrap();
///
/// assert_eq!(sent.map(|e| e.command()), Some(3));
/// assert_eq!(blind.state, DeviceState::Up);
/// assert_eq!(bus.history().len(), 1);
/// ```
pub struct Bus<S: EventSink> {
    sink: S,
    history: StateHistory,
    history_limit: usize,
}

/// Entries a [`Bus`] keeps unless told otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 1024;

impl<S: EventSink> Bus<S> {
    pub fn new(sink: S) -> Self {
        Self::with_history_limit(sink, DEFAULT_HISTORY_LIMIT)
    }

    /// Keep only the newest `limit` transitions in the history.
    pub fn with_history_limit(sink: S, limit: usize) -> Self {
        Self {
            sink,
            history: StateHistory::new(),
            history_limit: limit,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// Hand the recorded history to the caller and start a fresh one.
    pub fn take_history(&mut self) -> StateHistory {
        std::mem::take(&mut self.history)
    }

    /// Apply an inbound event to `device`.
    pub fn receive(&mut self, device: &mut Device, event: &DeviceEvent) -> Option<StateResult> {
        let result = StateMachine::for_kind(device.kind()).receive(device, event)?;
        self.history.push(HistoryEntry {
            address: result.event.address(),
            command: result.event.command(),
            from: result.previous,
            to: result.state,
            timestamp: Utc::now(),
        });
        self.history.retain_last(self.history_limit);
        Some(result)
    }

    /// Transmit on behalf of `device`; see [`StateMachine::transmit`].
    pub fn transmit(
        &mut self,
        device: &mut Device,
        intent: Intent,
        payload: Option<&Payload>,
        options: TransmitOptions,
    ) -> Result<Option<DeviceEvent>, ProtocolError> {
        let machine = StateMachine::for_kind(device.kind());
        let sent = machine.transmit(
            &self.sink,
            device,
            intent,
            payload,
            TransmitOptions {
                apply_locally: false,
                ..options
            },
        )?;

        if let (Some(event), true) = (&sent, options.apply_locally) {
            self.receive(device, event);
        }
        Ok(sent)
    }
}
