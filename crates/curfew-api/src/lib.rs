//! Policy document model for curfew
//!
//! This crate defines the data the rest of the workspace passes around:
//! - Selections (wildcard or a sorted set of concrete specs)
//! - Hour and day specs
//! - Groups and the policy document that holds them
//! - Listing views and confirmation answers

mod selection;
mod specs;
mod types;

pub use selection::*;
pub use specs::*;
pub use types::*;

/// Token that selects every hour or every day
pub const WILDCARD: &str = "*";
