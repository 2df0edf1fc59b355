//! Error types for the EPC token ledger.
//!
//! All errors use the `EPC_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Validation errors
//! - 2xx: Balance errors
//! - 3xx: Lookup errors
//! - 4xx: Duplicate errors
//! - 5xx: Serialization errors
//! - 6xx: Invariant errors
//! - 9xx: Storage / internal errors
//!
//! Concurrency aborts are **not** errors: they are reported through the
//! commit outcome so callers can tell a business rejection from a retryable
//! conflict.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AccountId, PriceId, TxId};

/// Central error enum for all ledger operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// Amount is zero or negative.
    #[error("EPC_ERR_100: Amount must be positive, got {amount}")]
    InvalidAmount { amount: Decimal },

    /// Amount carries more decimal places than the ledger accepts.
    #[error("EPC_ERR_101: Amount {amount} exceeds {max_scale} decimal places")]
    AmountPrecision { amount: Decimal, max_scale: u32 },

    /// A price field is zero or negative, or too precise.
    #[error("EPC_ERR_102: Invalid {field}: {value}")]
    InvalidPrice { field: &'static str, value: Decimal },

    /// Transfer source and destination are the same account.
    #[error("EPC_ERR_103: Cannot transfer to self: {account}")]
    SelfTransfer { account: AccountId },

    /// A required identifier is empty.
    #[error("EPC_ERR_104: {kind} must not be empty")]
    EmptyIdentifier { kind: &'static str },

    /// A raw state key does not belong to any known category.
    #[error("EPC_ERR_105: Invalid state key: {0}")]
    InvalidKey(String),

    /// Configuration is invalid.
    #[error("EPC_ERR_106: Configuration error: {0}")]
    InvalidConfig(String),

    /// Arithmetic would leave the representable decimal range.
    #[error("EPC_ERR_107: Amount overflow in {context}")]
    AmountOverflow { context: &'static str },

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// Not enough available (unlocked) balance.
    #[error(
        "EPC_ERR_200: Insufficient funds for {account}: requested {requested}, available {available}"
    )]
    InsufficientFunds {
        account: AccountId,
        requested: Decimal,
        available: Decimal,
    },

    /// Not enough locked balance to release.
    #[error(
        "EPC_ERR_201: Insufficient locked balance for {account}: requested {requested}, locked {locked}"
    )]
    InsufficientLock {
        account: AccountId,
        requested: Decimal,
        locked: Decimal,
    },

    // =================================================================
    // Lookup Errors (3xx)
    // =================================================================
    /// No price has ever been recorded.
    #[error("EPC_ERR_300: Latest price not set")]
    LatestPriceNotSet,

    /// No record exists under the given price id.
    #[error("EPC_ERR_301: Price not found: {0}")]
    PriceNotFound(PriceId),

    /// No audit entry exists under the given transaction id.
    #[error("EPC_ERR_302: Transaction not found: {0}")]
    TransactionNotFound(TxId),

    // =================================================================
    // Duplicate Errors (4xx)
    // =================================================================
    /// A record that must be created exactly once already exists.
    #[error("EPC_ERR_400: Already initialized: {key}")]
    AlreadyInitialized { key: String },

    // =================================================================
    // Serialization Errors (5xx)
    // =================================================================
    /// Stored bytes do not decode to the expected record shape.
    #[error("EPC_ERR_500: Serialization error at {key}: {reason}")]
    Serialization { key: String, reason: String },

    // =================================================================
    // Invariant Errors (6xx)
    // =================================================================
    /// Supply accounting no longer adds up. Critical data corruption alert.
    #[error("EPC_ERR_600: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // Storage / Internal (9xx)
    // =================================================================
    /// The versioned store backend failed.
    #[error("EPC_ERR_900: Storage error: {0}")]
    Storage(String),

    /// A write or context lookup was attempted on a read-only transaction.
    #[error("EPC_ERR_901: Transaction is read-only")]
    ReadOnlyTransaction,

    /// Unrecoverable internal error.
    #[error("EPC_ERR_999: Internal error: {0}")]
    Internal(String),
}

/// Coarse error taxonomy shared with callers of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    InsufficientFunds,
    InsufficientLock,
    NotFound,
    Duplicate,
    Serialization,
    Invariant,
    Storage,
}

impl LedgerError {
    /// Map this error onto the caller-facing taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount { .. }
            | Self::AmountPrecision { .. }
            | Self::InvalidPrice { .. }
            | Self::SelfTransfer { .. }
            | Self::EmptyIdentifier { .. }
            | Self::InvalidKey(_)
            | Self::InvalidConfig(_)
            | Self::AmountOverflow { .. } => ErrorKind::Validation,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::InsufficientLock { .. } => ErrorKind::InsufficientLock,
            Self::LatestPriceNotSet | Self::PriceNotFound(_) | Self::TransactionNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::AlreadyInitialized { .. } => ErrorKind::Duplicate,
            Self::Serialization { .. } => ErrorKind::Serialization,
            Self::SupplyInvariantViolation { .. } => ErrorKind::Invariant,
            Self::Storage(_) | Self::ReadOnlyTransaction | Self::Internal(_) => ErrorKind::Storage,
        }
    }

    /// Whether the error was caused by the caller's input rather than by
    /// stored data or the backend.
    #[must_use]
    pub fn is_business_rejection(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation
                | ErrorKind::InsufficientFunds
                | ErrorKind::InsufficientLock
                | ErrorKind::NotFound
                | ErrorKind::Duplicate
        )
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, LedgerError>;
