//! Host integration traits

use curfew_api::Confirmation;
use curfew_util::CurfewError;
use std::path::PathBuf;
use thiserror::Error;

use crate::FlushBackend;

/// Errors from host integration operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Cache flush via {backend} failed: {message}")]
    FlushFailed {
        backend: FlushBackend,
        message: String,
    },

    #[error("Prompt failed: {0}")]
    PromptFailed(String),

    #[error("{}: {message}", path.display())]
    MissingFile { path: PathBuf, message: String },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HostError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<HostError> for CurfewError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::MissingFile { path, message } => CurfewError::missing(path, message),
            other => CurfewError::storage(other.to_string()),
        }
    }
}

pub type HostResult<T> = Result<T, HostError>;

/// Invalidates the operating system's name resolution cache
pub trait CacheFlusher: Send + Sync {
    /// Which mechanism this flusher drives
    fn backend(&self) -> FlushBackend;

    /// Flush the cache. Callers treat failure as a warning.
    fn flush(&self) -> HostResult<()>;
}

/// Asks the user to approve an operation
pub trait Confirmer {
    /// Show `preview` (if any), then ask `prompt` until a valid answer is given.
    fn confirm(&self, prompt: &str, preview: Option<&str>) -> HostResult<Confirmation>;
}
