//! Error types for verification

use checkmate_domain::FactCheckId;
use std::time::Duration;
use thiserror::Error;

/// Faults that end a verification session in the error state
///
/// These never escape [`VerificationEngine::verify`](crate::VerificationEngine::verify);
/// they are turned into an error outcome whose analysis is the fault message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VerifyFault {
    /// The model call failed at the network or HTTP level
    #[error("Model request failed: {0}")]
    Transport(String),

    /// The conversation reached a state the protocol does not allow
    #[error("Malformed model conversation: {0}")]
    Protocol(String),

    /// A model or search call did not finish in time
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        /// What was being waited on
        operation: &'static str,
        /// The limit that expired
        after: Duration,
    },
}

/// Errors from the check pipeline
///
/// Engine faults are not errors here: they produce a record with status
/// `error`. Only the persistence boundary can fail the pipeline.
#[derive(Error, Debug)]
pub enum CheckError {
    /// The claim was empty or whitespace
    #[error("No claim provided")]
    EmptyClaim,

    /// The pending record could not be created
    #[error("Failed to save claim: {0}")]
    Create(String),

    /// The terminal write failed
    #[error("Failed to update fact check {id}: {message}")]
    Update {
        /// Record that stayed pending
        id: FactCheckId,
        /// Store error message
        message: String,
    },

    /// A read from the store failed
    #[error("Store error: {0}")]
    Store(String),
}
