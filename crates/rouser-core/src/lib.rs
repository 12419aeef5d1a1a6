//! Status and notification scheduling engine for rouser
//!
//! This crate is the heart of rouser, containing:
//! - Status determination (running / incomplete / completed per item)
//! - Sleep-period math (overnight and same-day windows)
//! - The tick-driven notification scheduler (four rule checks with
//!   per-event dedup and a status-change callback)

mod memory;
mod scheduler;
mod sleep;
mod status;

pub use memory::*;
pub use scheduler::*;
pub use sleep::*;
pub use status::*;
