//! Unified error handling for the access-control ledger.
//!
//! Every operation fails synchronously with one of these typed variants;
//! the core never retries internally. Retry policy, if any, belongs to the
//! caller.

use thiserror::Error;

/// Errors surfaced by ledger operations.
#[derive(Error, Debug)]
pub enum AccessLedgerError {
    /// A malformed argument: empty resource name or description, or a
    /// requested level of zero.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A resource, request, or permission id that was never allocated.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller lacks the standing required for the operation.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Attempt to process a request whose terminal transition already ran.
    #[error("Access request {0} has already been processed")]
    AlreadyProcessed(u64),

    /// Attempt to revoke a permission that is already inactive.
    #[error("Permission {0} has already been revoked")]
    AlreadyRevoked(u64),

    /// Failure in the sled-backed persistence collaborator.
    #[error("Storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Filesystem failure outside the record store, e.g. reading a config
    /// file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for ledger operations.
pub type AccessLedgerResult<T> = Result<T, AccessLedgerError>;
