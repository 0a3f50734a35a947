//! # payshare-ledger — Per-creator coin ledger.
//!
//! Tracks each creator's total, invested and borrowed coins together with
//! an append-only transaction log. Every operation validates and mutates
//! as one step; a rejected operation changes nothing.
//!
//! # Modules
//!
//! - [`error`] — `LedgerError` enum
//! - [`ledger`] — `BalanceLedger`, the single-creator aggregate
//! - [`book`] — `LedgerBook`, per-creator locking over many ledgers

pub mod book;
pub mod error;
pub mod ledger;

pub use book::{LedgerBook, LedgerHandle};
pub use error::LedgerError;
pub use ledger::{BalanceLedger, Receipt};
