//! Builder for transition tables.

use crate::core::DeviceState;
use crate::table::{EventBuilder, StateDefinition, Transition, TransitionTable};

/// Fluent construction of a [`TransitionTable`].
///
/// # Example
///
/// ```rust
/// use homebus::builder::{StateBuilder, TableBuilder, TransitionBuilder};
/// use homebus::core::DeviceState;
/// use homebus::protocol::Command;
///
/// let table = TableBuilder::new()
///     .global(TransitionBuilder::new(Command::On, DeviceState::On).build())
///     .state(DeviceState::Undefined, StateBuilder::new().default_named(Command::On).build())
///     .state(DeviceState::On, StateBuilder::new().build())
///     .build();
///
/// assert!(table.validate().is_ok());
/// ```
#[derive(Default)]
pub struct TableBuilder {
    table: TransitionTable,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transition available in every state.
    pub fn global(mut self, transition: Transition) -> Self {
        self.table.global.push(transition);
        self
    }

    /// Define a state. Redefining a state replaces it.
    pub fn state(mut self, state: DeviceState, definition: StateDefinition) -> Self {
        self.table.states.insert(state, definition);
        self
    }

    pub fn event_builder(mut self, builder: EventBuilder) -> Self {
        self.table.event_builder = Some(builder);
        self
    }

    pub fn build(self) -> TransitionTable {
        self.table
    }
}
