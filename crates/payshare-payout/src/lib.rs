//! # payshare-payout — Reward payouts into creator ledgers.
//!
//! Composes the reward model from `payshare-core` with the ledger from
//! `payshare-ledger`, and loads the process-wide configuration.

pub mod config;
pub mod engine;
pub mod error;

pub use config::PayoutConfig;
pub use engine::{PayoutEngine, PayoutOutcome, PayoutPreview};
pub use error::PayoutError;
