//! # payshare-core
//! Foundation types and pure computation for creator revenue sharing.
//!
//! Nothing in this crate holds mutable state. The ledger lives in
//! `payshare-ledger`, the payout composition in `payshare-payout`.

pub mod constants;
pub mod currency;
pub mod error;
pub mod persona;
pub mod quote;
pub mod reward;
pub mod traits;
pub mod types;

pub use currency::CurrencyConverter;
pub use reward::{RewardCalculator, RewardParams};
pub use traits::RewardModel;
pub use types::{Balance, CreatorId, MetricSet, RewardResult, Transaction, TransactionId, TransactionKind};
