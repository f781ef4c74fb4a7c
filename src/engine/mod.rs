//! State machine engine.
//!
//! [`StateMachine`] interprets a transition table against caller-owned
//! device records. [`Bus`] is the imperative shell around it: it owns the
//! outbound [`EventSink`] and records a [`StateHistory`](crate::core::StateHistory).
//!
//! Everything runs synchronously on the caller's thread. Callers must
//! deliver events for one device one at a time.

mod bus;
mod machine;
mod sink;

pub use bus::{Bus, DEFAULT_HISTORY_LIMIT};
pub use machine::{Intent, StateMachine, StateResult, TransmitOptions};
pub use sink::{EventSink, NullSink, RecordingSink};
