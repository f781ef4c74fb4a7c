//! Outbound event sinks.

use std::cell::RefCell;

use crate::protocol::DeviceEvent;

/// One-way, fire-and-forget destination for transmitted events.
///
/// The bus driver (serial line, gateway, test harness) implements this.
/// Closures taking `&DeviceEvent` are sinks too.
pub trait EventSink {
    fn send(&self, event: &DeviceEvent);
}

impl<F> EventSink for F
where
    F: Fn(&DeviceEvent),
{
    fn send(&self, event: &DeviceEvent) {
        self(event)
    }
}

/// Discards every event. Useful for purely local state updates.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn send(&self, _event: &DeviceEvent) {}
}

/// Keeps every sent event in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<DeviceEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DeviceEvent> {
        self.events.borrow().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<DeviceEvent> {
        self.events.take()
    }
}

impl EventSink for RecordingSink {
    fn send(&self, event: &DeviceEvent) {
        self.events.borrow_mut().push(*event);
    }
}
