//! Builders for transitions and state definitions.

use crate::core::{Action, Device, DeviceState, Guard};
use crate::protocol::{Command, DeviceEvent};
use crate::table::{DefaultTransition, StateDefinition, Transition};

/// Fluent construction of a [`Transition`].
///
/// # Example
///
/// ```rust
/// use homebus::builder::TransitionBuilder;
/// use homebus::core::DeviceState;
/// use homebus::protocol::Command;
///
/// let transition = TransitionBuilder::new(Command::Stop, DeviceState::Stop)
///     .when(|device, _| device.state.is_moving())
///     .build();
/// assert_eq!(transition.command, Command::Stop);
/// ```
pub struct TransitionBuilder {
    command: Command,
    target: DeviceState,
    actions: Vec<Action>,
    guard: Option<Guard>,
}

impl TransitionBuilder {
    pub fn new(command: Command, target: DeviceState) -> Self {
        Self {
            command,
            target,
            actions: Vec::new(),
            guard: None,
        }
    }

    /// Append an action, run between the exit and entry actions.
    pub fn action<F>(mut self, effect: F) -> Self
    where
        F: Fn(&mut Device, &DeviceEvent) + Send + Sync + 'static,
    {
        self.actions.push(Action::new(effect));
        self
    }

    /// Set the guard predicate. Replaces any earlier guard.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Device, Option<&DeviceEvent>) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    pub fn build(self) -> Transition {
        Transition {
            command: self.command,
            target: self.target,
            actions: self.actions,
            guard: self.guard,
        }
    }
}

/// Fluent construction of a [`StateDefinition`].
#[derive(Default)]
pub struct StateBuilder {
    definition: StateDefinition,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_entry<F>(mut self, effect: F) -> Self
    where
        F: Fn(&mut Device, &DeviceEvent) + Send + Sync + 'static,
    {
        self.definition.entry.push(Action::new(effect));
        self
    }

    pub fn on_exit<F>(mut self, effect: F) -> Self
    where
        F: Fn(&mut Device, &DeviceEvent) + Send + Sync + 'static,
    {
        self.definition.exit.push(Action::new(effect));
        self
    }

    /// Add a transition scoped to this state.
    pub fn transition(mut self, transition: Transition) -> Self {
        self.definition.transitions.push(transition);
        self
    }

    /// Default to the transition named by `command`.
    pub fn default_named(mut self, command: Command) -> Self {
        self.definition.default = Some(DefaultTransition::Named(command));
        self
    }

    /// Default to an explicit transition.
    pub fn default_to(mut self, transition: Transition) -> Self {
        self.definition.default = Some(DefaultTransition::Single(transition));
        self
    }

    /// Default to whichever candidate's guard passes.
    pub fn default_among(mut self, candidates: Vec<Transition>) -> Self {
        self.definition.default = Some(DefaultTransition::Candidates(candidates));
        self
    }

    pub fn build(self) -> StateDefinition {
        self.definition
    }
}
