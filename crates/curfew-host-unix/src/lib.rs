//! Unix host integration for curfew
//!
//! Provides:
//! - Hosts file lifecycle (bootstrap, render, atomic apply)
//! - Resolver cache flushing through whatever the system offers
//! - Terminal confirmation prompts
//! - Privilege check

mod confirm;
mod files;
mod flush;

pub use confirm::*;
pub use files::*;
pub use flush::*;

/// Whether the process runs with an effective uid of root.
pub fn is_privileged() -> bool {
    nix::unistd::geteuid().is_root()
}
