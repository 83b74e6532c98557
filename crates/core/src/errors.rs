//! Core error types for the WalletKeeper ledger.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! (from SQLite, the filesystem, etc.) are converted to these types by the
//! storage layer.

use chrono::ParseError as ChronoParseError;
use std::num::ParseIntError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ledger core.
///
/// Storage-specific errors are wrapped in string form to keep this type
/// storage-agnostic. Note that the money-movement helpers (transfer,
/// contribute, allocate) report insufficient funds through an `Ok(false)`
/// return value, not through this type; only a direct overdrafting
/// transaction is rejected as an error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Ledger operation failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Storage-agnostic error type for key-value backend operations.
///
/// The storage crate converts backend-specific failures (SQLite, I/O) into
/// this format. Malformed *content* never surfaces here — the repository
/// sanitizes it on read — only medium-level failures do.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open or create the backing store.
    #[error("Failed to open store: {0}")]
    OpenFailed(String),

    /// A read from the backing store failed.
    #[error("Store read failed: {0}")]
    ReadFailed(String),

    /// A write to the backing store failed.
    #[error("Store write failed: {0}")]
    WriteFailed(String),

    /// An atomic multi-key write could not be committed.
    #[error("Store transaction failed: {0}")]
    TransactionFailed(String),

    /// Internal/unexpected storage error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

/// Failures of ledger operations: references to entities that do not exist,
/// or a transaction that would overdraw its wallet. These fail fast, before
/// any mutation.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Wallet '{0}' does not exist")]
    UnknownWallet(String),

    #[error("Wallet '{wallet_id}' holds {balance} but {required} is required")]
    InsufficientFunds {
        wallet_id: String,
        balance: i64,
        required: i64,
    },

    #[error("Goal '{0}' does not exist")]
    UnknownGoal(String),

    #[error("Fixed cost '{0}' does not exist")]
    UnknownFixedCost(String),

    #[error("Income project '{0}' does not exist")]
    UnknownProject(String),

    #[error("Income project '{0}' was already collected")]
    ProjectAlreadyCollected(String),
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse number: {0}")]
    NumberParse(#[from] ParseIntError),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Database(DatabaseError::Internal(err.to_string()))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
