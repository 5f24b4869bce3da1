//! Group policy engine for curfew
//!
//! This crate is the heart of curfew, containing:
//! - Schedule evaluation (is a group live at an instant)
//! - Group rule mutation with wildcard collapsing
//! - Synthesis of the blocked-domain section of the hosts file
//!
//! Nothing in here touches the filesystem or the clock; callers pass the
//! document and the instant in.

mod engine;
mod events;
mod schedule;
mod synth;

pub use engine::*;
pub use events::*;
pub use schedule::*;
pub use synth::*;
