//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{FactCheckId, FactCheckRecord, Resolution};

/// Trait for storing and retrieving fact-check records
///
/// Implemented by the infrastructure layer (checkmate-store). Every
/// operation runs as its own transaction: it either commits in full or
/// leaves the store untouched.
pub trait ClaimStore {
    /// Error type for store operations
    type Error;

    /// Insert a new pending record for `claim` and return its id
    fn create(&self, claim: &str) -> Result<FactCheckId, Self::Error>;

    /// Move a pending record to its terminal state
    ///
    /// Reports a not-found error, without writing anything, when `id` is
    /// unknown.
    fn update(&self, id: FactCheckId, resolution: &Resolution) -> Result<(), Self::Error>;

    /// Get a record by id
    fn get_by_id(&self, id: FactCheckId) -> Result<Option<FactCheckRecord>, Self::Error>;

    /// Most recently created records first
    fn list_recent(&self, limit: usize) -> Result<Vec<FactCheckRecord>, Self::Error>;
}
