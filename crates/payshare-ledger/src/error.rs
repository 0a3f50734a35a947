//! Ledger error types.

use payshare_core::error::AmountError;
use thiserror::Error;

/// Errors returned by ledger operations.
///
/// A failed operation never mutates the balance or the transaction log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Amount is zero, non-finite at the conversion boundary, or would
    /// overflow the balance.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Amount exceeds the coins not committed to investments.
    #[error("insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        /// Available coins at the time of the request.
        available: u64,
        /// Requested amount.
        requested: u64,
    },

    /// The stored state breaks a ledger invariant. The operation is aborted
    /// and the state left as found.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// No ledger is open for this creator.
    #[error("unknown creator: {0}")]
    UnknownCreator(String),

    /// A ledger is already open for this creator.
    #[error("ledger already exists: {0}")]
    AlreadyExists(String),
}

impl From<AmountError> for LedgerError {
    fn from(e: AmountError) -> Self {
        match e {
            AmountError::InvalidAmount(msg) => Self::InvalidAmount(msg),
        }
    }
}
