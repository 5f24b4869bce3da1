//! Resolver cache backends

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Control path for the nscd init script
pub const NSCD_INIT_SCRIPT: &str = "/etc/init.d/nscd";

/// Control path for systemd-resolved's client
pub const RESOLVECTL_PATHS: [&str; 2] = ["/usr/bin/resolvectl", "/bin/resolvectl"];

/// Control path for the macOS directory service cache tool
pub const DSCACHEUTIL_PATH: &str = "/usr/bin/dscacheutil";

/// Mechanism used to invalidate the resolver cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushBackend {
    /// `nscd` restarted through its init script
    Nscd,
    /// `resolvectl flush-caches`
    Resolved,
    /// `dscacheutil -flushcache`
    Dscacheutil,
    /// Nothing to flush
    None,
}

impl FlushBackend {
    /// First backend whose control path exists on this machine.
    pub fn detect() -> Self {
        Self::detect_with(|path| path.exists())
    }

    /// Detection against an arbitrary existence check.
    pub fn detect_with(exists: impl Fn(&Path) -> bool) -> Self {
        if exists(Path::new(NSCD_INIT_SCRIPT)) {
            FlushBackend::Nscd
        } else if RESOLVECTL_PATHS.iter().any(|p| exists(Path::new(p))) {
            FlushBackend::Resolved
        } else if exists(Path::new(DSCACHEUTIL_PATH)) {
            FlushBackend::Dscacheutil
        } else {
            FlushBackend::None
        }
    }

    /// Program and arguments to run, if any
    pub fn command(&self) -> Option<(&'static str, &'static [&'static str])> {
        match self {
            FlushBackend::Nscd => Some((NSCD_INIT_SCRIPT, &["restart"])),
            FlushBackend::Resolved => Some(("resolvectl", &["flush-caches"])),
            FlushBackend::Dscacheutil => Some((DSCACHEUTIL_PATH, &["-flushcache"])),
            FlushBackend::None => None,
        }
    }
}

impl fmt::Display for FlushBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlushBackend::Nscd => "nscd",
            FlushBackend::Resolved => "systemd-resolved",
            FlushBackend::Dscacheutil => "dscacheutil",
            FlushBackend::None => "none",
        })
    }
}
