//! Persistence layer for curfew
//!
//! Provides:
//! - The store trait the command-line layer loads and saves through
//! - A JSON file store with all-or-nothing saves
//! - An in-memory store for tests

mod json;
mod memory;
mod traits;

pub use json::*;
pub use memory::*;
pub use traits::*;

use curfew_util::CurfewError;
use std::path::PathBuf;
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed policy document {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<StoreError> for CurfewError {
    fn from(e: StoreError) -> Self {
        CurfewError::storage(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
