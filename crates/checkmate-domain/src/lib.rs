//! Checkmate Domain Layer
//!
//! This crate contains the core vocabulary of the fact-checking service.
//! It has no external dependencies and defines the record model, the
//! verdict vocabulary and the trait interfaces the other layers implement.
//!
//! ## Key Concepts
//!
//! - **FactCheckRecord**: A submitted claim and, once resolved, its verdict
//! - **CheckStatus**: Lifecycle (pending → completed | error), transitions once
//! - **Verdict**: The fixed display vocabulary every model answer collapses to
//! - **ClaimStore**: The persistence boundary, implemented by `checkmate-store`
//! - **Credentials**: Provider API keys, loaded once and passed explicitly

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod credentials;
pub mod record;
pub mod traits;
pub mod verdict;

// Re-exports for convenience
pub use credentials::{CredentialError, Credentials};
pub use record::{CheckStatus, FactCheckId, FactCheckRecord, Resolution, ERROR_RESULT};
pub use traits::ClaimStore;
pub use verdict::Verdict;
