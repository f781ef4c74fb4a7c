//! Guard predicates and transition actions.
//!
//! Both are stored as boxed closures inside the static transition tables,
//! so they must be `Send + Sync` and capture nothing mutable.

use std::fmt;

use super::device::Device;
use crate::protocol::DeviceEvent;

/// Pure predicate deciding whether a transition is currently applicable.
///
/// The event is absent when the engine evaluates guards without concrete
/// traffic, e.g. while resolving a default transition.
///
/// # Example
///
/// ```rust
/// use homebus::core::{Device, DeviceKind, DeviceState, Guard};
///
/// let only_when_stopped = Guard::new(|d: &Device, _| d.state == DeviceState::Stop);
///
/// let mut blind = Device::new(DeviceKind::Directional, &[3]).unwrap();
/// assert!(!only_when_stopped.check(&blind, None));
/// blind.state = DeviceState::Stop;
/// assert!(only_when_stopped.check(&blind, None));
/// ```
pub struct Guard {
    predicate: Box<dyn Fn(&Device, Option<&DeviceEvent>) -> bool + Send + Sync>,
}

impl Guard {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Device, Option<&DeviceEvent>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the guard. Has no side effects.
    pub fn check(&self, device: &Device, event: Option<&DeviceEvent>) -> bool {
        (self.predicate)(device, event)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

/// Side effect run on exit from a state, during a transition, or on entry.
pub struct Action {
    effect: Box<dyn Fn(&mut Device, &DeviceEvent) + Send + Sync>,
}

impl Action {
    pub fn new<F>(effect: F) -> Self
    where
        F: Fn(&mut Device, &DeviceEvent) + Send + Sync + 'static,
    {
        Action {
            effect: Box::new(effect),
        }
    }

    pub fn run(&self, device: &mut Device, event: &DeviceEvent) {
        (self.effect)(device, event)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}
