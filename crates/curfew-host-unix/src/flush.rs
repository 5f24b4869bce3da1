//! Resolver cache flushing

use curfew_host_api::{CacheFlusher, FlushBackend, HostError, HostResult};
use std::process::{Command, Stdio};
use tracing::debug;

/// Flushes the resolver cache by running the backend's control command
#[derive(Debug, Clone, Copy)]
pub struct SystemCacheFlusher {
    backend: FlushBackend,
}

impl SystemCacheFlusher {
    pub fn new(backend: FlushBackend) -> Self {
        Self { backend }
    }

    /// Use the first backend present on this machine
    pub fn detect() -> Self {
        let backend = FlushBackend::detect();
        debug!(backend = %backend, "Detected resolver cache backend");
        Self::new(backend)
    }
}

impl CacheFlusher for SystemCacheFlusher {
    fn backend(&self) -> FlushBackend {
        self.backend
    }

    fn flush(&self) -> HostResult<()> {
        let Some((program, args)) = self.backend.command() else {
            debug!("No resolver cache to flush");
            return Ok(());
        };

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| HostError::FlushFailed {
                backend: self.backend,
                message: format!("could not run {}: {}", program, e),
            })?;

        if !output.status.success() {
            return Err(HostError::FlushFailed {
                backend: self.backend,
                message: format!(
                    "{} exited with {}: {}",
                    program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        debug!(backend = %self.backend, "Resolver cache flushed");
        Ok(())
    }
}
