//! Error types for settlement engine

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug)]
pub enum Error {
    /// Ledger error
    #[error("Ledger error: {0}")]
    Ledger(#[from] ledger_core::Error),

    /// Balances do not sum to zero
    #[error("Unbalanced ledger: balances sum to {sum}, expected 0.00")]
    UnbalancedLedger {
        /// Actual sum, rounded to cents
        sum: Decimal,
    },

    /// Proxy group names a participant with no balance entry
    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),

    /// Proxy group names a participant whose balance is exactly zero
    #[error("Cannot proxy participant with zero balance: {0}")]
    ZeroBalanceProxy(String),

    /// Proxy group is not exactly two distinct names
    #[error("Malformed proxy spec: {0}")]
    MalformedProxySpec(String),

    /// Two proxy groups fold away the same participant
    #[error("Participant proxied more than once: {0}")]
    DuplicateProxySource(String),

    /// Netting finished with one side still holding balances
    #[error(
        "Unsettled residual: {creditors} creditor(s) and {debtors} debtor(s) left after netting"
    )]
    UnsettledResidual {
        /// Creditors still queued
        creditors: usize,
        /// Debtors still queued
        debtors: usize,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
