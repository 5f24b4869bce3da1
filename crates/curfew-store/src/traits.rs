//! Store trait definitions

use curfew_api::PolicyDocument;

use crate::StoreResult;

/// Durable home of the policy document
pub trait PolicyStore: Send + Sync {
    /// Load the document, initializing it on first use
    fn load(&self) -> StoreResult<PolicyDocument>;

    /// Replace the stored document
    fn save(&self, document: &PolicyDocument) -> StoreResult<()>;

    /// Human-readable location, used in messages
    fn describe(&self) -> String;
}
