//! Error types for curfew

use std::path::PathBuf;
use thiserror::Error;

use crate::GroupName;

/// Core error type for curfew operations
#[derive(Debug, Error)]
pub enum CurfewError {
    /// Malformed hour/day/domain spec or unrecognized confirmation input.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Group not found: {0}")]
    NotFound(GroupName),

    /// Policy document unreadable, unwritable or malformed.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Missing resource {}: {message}", path.display())]
    MissingResource { path: PathBuf, message: String },

    #[error("Aborted by user")]
    UserAbort,

    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

impl CurfewError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(group: &GroupName) -> Self {
        Self::NotFound(group.clone())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn missing(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::MissingResource {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn not_implemented(msg: impl Into<String>) -> Self {
        Self::NotImplemented(msg.into())
    }

    /// Whether the error halts the process.
    ///
    /// Validation and lookup failures are reported and the request is
    /// dropped; the store stays as it was.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}

pub type CurfewResult<T> = std::result::Result<T, CurfewError>;
