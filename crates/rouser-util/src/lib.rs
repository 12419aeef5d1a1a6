//! Shared utilities for rouser
//!
//! This crate provides:
//! - ID types (ItemId, SessionId)
//! - Time utilities (mock-aware clock, time-of-day parsing, duration formatting)
//! - Default paths for config, data, and log directories

mod ids;
mod paths;
mod time;

pub use ids::*;
pub use paths::*;
pub use time::*;
