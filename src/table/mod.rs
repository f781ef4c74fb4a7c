//! Transition tables: per-kind, immutable descriptions of states,
//! transitions, guards, actions and default transitions.
//!
//! Tables are plain data. The [`engine`](crate::engine) interprets them
//! against a device record; nothing here holds device state.

mod error;
mod kinds;
mod transition;

pub use error::TableError;
pub use transition::{
    plain_event, DefaultTransition, EventBuilder, StateDefinition, Transition, TransitionTable,
};
