//! Error types for the ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// The same game appears twice among the games being settled
    #[error("Duplicate game: {0}")]
    DuplicateGame(String),

    /// Two result rows share a participant name
    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(String),

    /// Amounts too large to add up
    #[error("Amount overflow: {0}")]
    Overflow(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
