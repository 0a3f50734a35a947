//! Core data types: metrics, reward results, balances, transactions.
//!
//! Coin quantities are whole coins held as `u64`. Reference-currency values
//! and scoring signals are `f64`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque creator identifier. How identifiers are issued is up to the caller.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CreatorId(String);

impl CreatorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CreatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CreatorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CreatorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Quality and trust signals for one reward computation.
///
/// Bounds are soft: the calculator clamps every field to its documented
/// range before combining, so callers may pass raw upstream values.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct MetricSet {
    /// Fraud model verdict: 0 = blocked, 1 = clean.
    pub fraud_gate: f64,
    /// Market health multiplier, `[0, 1.2]`.
    pub market_health: f64,
    /// Content category weight, `[0, 1.2]`.
    pub category_weight: f64,
    /// Content quality model score, `[0, 1]`.
    pub content_quality: f64,
    /// Interaction quality model score, `[0, 1]`.
    pub interaction_quality: f64,
    /// Same-day engagement, normalized to `[0, 1]`.
    pub immediate_engagement: f64,
    /// Seven-day engagement, normalized to `[0, 1]`.
    pub weekly_engagement: f64,
}

impl Default for MetricSet {
    /// A neutral, clean account: every signal at mid-range.
    fn default() -> Self {
        Self {
            fraud_gate: 1.0,
            market_health: 1.0,
            category_weight: 1.0,
            content_quality: 0.5,
            interaction_quality: 0.5,
            immediate_engagement: 0.5,
            weekly_engagement: 0.5,
        }
    }
}

/// Outcome of a reward computation.
///
/// The intermediate sub-scores are carried for display; only
/// `reward_fraction` is used downstream.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct RewardResult {
    /// Base sub-score (market health and category weight).
    pub base: f64,
    /// AI-adjusted sub-score (content and interaction quality).
    pub ai_adjusted: f64,
    /// Temporal engagement multiplier.
    pub temporal: f64,
    /// `scaler * base * ai_adjusted * temporal`, before payout clamping.
    pub raw_score: f64,
    /// Share of revenue paid to the creator, `[0, 0.70]`.
    pub reward_fraction: f64,
    /// True iff the fraud gate forced the fraction to zero.
    pub gate_blocked: bool,
}

impl RewardResult {
    /// Reward fraction as a percentage (display helper).
    pub fn percent(&self) -> f64 {
        self.reward_fraction * 100.0
    }
}

/// Balance snapshot for one creator.
///
/// `available_coins` is derived on demand and never stored.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Balance {
    /// All coins held, including invested coins.
    pub total_coins: u64,
    /// Coins committed to investments.
    pub invested_coins: u64,
    /// Coins received through borrowing (informational, never netted off).
    pub borrowed_coins: u64,
}

impl Balance {
    /// A fresh balance with nothing invested or borrowed.
    pub fn new(total_coins: u64) -> Self {
        Self {
            total_coins,
            invested_coins: 0,
            borrowed_coins: 0,
        }
    }

    /// `total_coins - invested_coins`. Saturates at zero on a corrupted
    /// balance; check [`is_consistent`](Self::is_consistent) first where it matters.
    pub fn available_coins(&self) -> u64 {
        self.total_coins.saturating_sub(self.invested_coins)
    }

    /// `invested_coins <= total_coins`.
    pub fn is_consistent(&self) -> bool {
        self.invested_coins <= self.total_coins
    }
}

/// Kind of value movement recorded by a ledger operation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Earn,
    Reinvest,
    Withdraw,
    Purchase,
    Borrow,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 5] = [
        Self::Earn,
        Self::Reinvest,
        Self::Withdraw,
        Self::Purchase,
        Self::Borrow,
    ];

    /// Description used when the caller supplies none.
    pub fn default_description(&self) -> &'static str {
        match self {
            Self::Earn => "Earned coins",
            Self::Reinvest => "Reinvestment",
            Self::Withdraw => "Withdrawal",
            Self::Purchase => "Purchase",
            Self::Borrow => "Borrowed coins",
        }
    }

    /// Whether the operation spends available coins and must pass the
    /// availability check.
    pub fn draws_available(&self) -> bool {
        matches!(self, Self::Reinvest | Self::Withdraw | Self::Purchase)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Earn => "earn",
            Self::Reinvest => "reinvest",
            Self::Withdraw => "withdraw",
            Self::Purchase => "purchase",
            Self::Borrow => "borrow",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger-assigned transaction id. Monotonic per ledger, never reused.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx-{:08}", self.0)
    }
}

/// Immutable ledger log entry.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    /// Coins moved. Always positive.
    pub amount: u64,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}
