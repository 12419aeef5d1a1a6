//! Shared types and collaborator contracts for rouser
//!
//! This crate defines:
//! - The data model (TrackedItem, Preferences, Status)
//! - The notification delivery contract (Notifier)
//! - The running-set contract (RunningSet) consumed by the status engine

mod model;
mod notify;
mod running;

pub use model::*;
pub use notify::*;
pub use running::*;
