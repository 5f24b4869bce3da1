//! In-memory store (for testing)

use curfew_api::PolicyDocument;
use std::sync::Mutex;

use crate::{PolicyStore, StoreResult};

/// Store that keeps the document in memory and counts saves
pub struct MemoryStore {
    document: Mutex<Option<PolicyDocument>>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    /// Empty store; the first load yields the initial document
    pub fn new() -> Self {
        Self {
            document: Mutex::new(None),
            saves: Mutex::new(0),
        }
    }

    pub fn with_document(document: PolicyDocument) -> Self {
        Self {
            document: Mutex::new(Some(document)),
            saves: Mutex::new(0),
        }
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyStore for MemoryStore {
    fn load(&self) -> StoreResult<PolicyDocument> {
        let mut document = self.document.lock().unwrap_or_else(|e| e.into_inner());
        Ok(document.get_or_insert_with(PolicyDocument::initial).clone())
    }

    fn save(&self, document: &PolicyDocument) -> StoreResult<()> {
        *self.document.lock().unwrap_or_else(|e| e.into_inner()) = Some(document.clone());
        *self.saves.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory store".to_string()
    }
}
