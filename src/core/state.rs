//! Symbolic device states.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::state_enum;

/// Trait for symbolic states driven by a transition table.
///
/// States are plain values: cheap to copy, comparable, and serializable
/// under their wire-level name.
pub trait State:
    Copy + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Symbolic name, e.g. `"undefined"` or `"stop"`.
    fn name(&self) -> &'static str;
}

state_enum! {
    /// State of a bus device. Every device starts out `Undefined` until the
    /// first matching event is seen.
    #[derive(Default)]
    pub enum DeviceState {
        #[default]
        Undefined => "undefined",
        On => "on",
        Off => "off",
        Up => "up",
        Down => "down",
        Stop => "stop",
    }
}

impl DeviceState {
    /// Whether a motor is travelling in this state.
    pub fn is_moving(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(DeviceState::Undefined.name(), "undefined");
        assert_eq!(DeviceState::On.name(), "on");
        assert_eq!(DeviceState::Off.name(), "off");
        assert_eq!(DeviceState::Up.name(), "up");
        assert_eq!(DeviceState::Down.name(), "down");
        assert_eq!(DeviceState::Stop.name(), "stop");
    }

    #[test]
    fn default_is_undefined() {
        assert_eq!(DeviceState::default(), DeviceState::Undefined);
    }

    #[test]
    fn only_up_and_down_are_moving() {
        assert!(DeviceState::Up.is_moving());
        assert!(DeviceState::Down.is_moving());
        assert!(!DeviceState::Stop.is_moving());
        assert!(!DeviceState::Undefined.is_moving());
    }

    #[test]
    fn state_serializes_correctly() {
        let json = serde_json::to_string(&DeviceState::Stop).unwrap();
        assert_eq!(json, "\"stop\"");
        let deserialized: DeviceState = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, DeviceState::Stop);
    }
}
