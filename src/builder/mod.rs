//! Declarative helpers for writing transition tables.
//!
//! Each transition, state and table reads as one fluent expression, which
//! keeps the per-kind tables close to a plain data listing.

pub mod macros;
pub mod table;
pub mod transition;

pub use table::TableBuilder;
pub use transition::{StateBuilder, TransitionBuilder};
