//! Host integration trait interfaces for curfew
//!
//! This crate defines the seams between the engine and the machine it runs
//! on: resolver cache invalidation and interactive confirmation. It contains
//! no platform code itself.

mod capabilities;
mod mock;
mod traits;

pub use capabilities::*;
pub use mock::*;
pub use traits::*;
