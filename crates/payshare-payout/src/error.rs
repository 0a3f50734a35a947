//! Payout error types.

use payshare_core::error::{AmountError, ParamsError};
use payshare_ledger::LedgerError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayoutError {
    #[error(transparent)] Ledger(#[from] LedgerError),
    #[error(transparent)] Params(#[from] ParamsError),
    #[error("config: {0}")] Config(String),
}

impl From<AmountError> for PayoutError {
    fn from(e: AmountError) -> Self {
        Self::Ledger(e.into())
    }
}

impl From<config::ConfigError> for PayoutError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
