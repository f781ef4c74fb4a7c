//! Transition table validation errors.

use thiserror::Error;

/// Inconsistencies found by [`TransitionTable::validate`](super::TransitionTable::validate).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Transition targets state '{state}' which has no definition")]
    MissingState { state: String },

    #[error("Default of state '{state}' names '{command}', but no such transition exists")]
    UnresolvableDefault { state: String, command: String },
}
