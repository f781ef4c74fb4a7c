//! Core device model.
//!
//! - Device records and their per-kind auxiliary fields
//! - Symbolic states via the `State` trait
//! - Guard predicates and actions used by transition tables
//! - Immutable transition history

mod device;
mod guard;
mod history;
mod state;

pub use device::{AddressRole, Auxiliary, Device, DeviceKind};
pub use guard::{Action, Guard};
pub use history::{HistoryEntry, StateHistory};
pub use state::{DeviceState, State};
