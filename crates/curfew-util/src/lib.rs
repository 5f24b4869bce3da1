//! Shared utilities for curfew
//!
//! This crate provides:
//! - The group name type (GroupName)
//! - Wall-clock access with mock time support
//! - The error taxonomy shared by every crate
//! - Default paths for the hosts file roles, store, config and logs

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
