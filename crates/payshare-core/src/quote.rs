//! Advisory quotes for borrowing and withdrawing.
//!
//! Pure per-request arithmetic for display. Nothing here is enforced by the
//! ledger: `Borrow` has no upper bound, and withdrawal fees and minimums
//! belong to the payout rails.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BORROW_LIMIT_PERCENT, BORROW_RATE_TIERS, BORROW_TERM_MONTHS, BORROW_TOP_RATE_PERCENT,
    INSTANT_WITHDRAW_FEE, MIN_WITHDRAWAL, MONTHLY_WITHDRAW_BONUS,
};

/// Advisory borrowing limit: 30% of the current balance, rounded down.
pub fn borrow_limit(total_coins: u64) -> u64 {
    (total_coins as u128 * BORROW_LIMIT_PERCENT as u128 / 100) as u64
}

/// Monthly interest rate in percent for a loan of `amount` coins.
///
/// ```
/// use payshare_core::quote::monthly_rate_percent;
/// assert_eq!(monthly_rate_percent(100), 4.0);
/// assert_eq!(monthly_rate_percent(101), 4.5);
/// assert_eq!(monthly_rate_percent(5_000), 5.5);
/// ```
pub fn monthly_rate_percent(amount: u64) -> f64 {
    BORROW_RATE_TIERS
        .iter()
        .find(|(bound, _)| amount <= *bound)
        .map(|(_, rate)| *rate)
        .unwrap_or(BORROW_TOP_RATE_PERCENT)
}

/// Repayment terms for a prospective loan.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct BorrowQuote {
    pub amount: u64,
    pub limit: u64,
    pub within_limit: bool,
    pub monthly_rate_percent: f64,
    pub term_months: u64,
    /// `ceil(amount * (1 + rate) / term)`.
    pub monthly_payment: u64,
    /// `ceil(amount * (1 + rate * term))`.
    pub total_repayment: u64,
}

impl BorrowQuote {
    pub fn for_amount(amount: u64, total_coins: u64) -> Self {
        let limit = borrow_limit(total_coins);
        let rate_percent = monthly_rate_percent(amount);
        let rate = rate_percent / 100.0;
        let principal = amount as f64;
        let term = BORROW_TERM_MONTHS as f64;

        Self {
            amount,
            limit,
            within_limit: amount <= limit,
            monthly_rate_percent: rate_percent,
            term_months: BORROW_TERM_MONTHS,
            monthly_payment: ceil_coins(principal * (1.0 + rate) / term),
            total_repayment: ceil_coins(principal * (1.0 + rate * term)),
        }
    }

    /// Interest over the full term, in coins.
    pub fn total_interest(&self) -> u64 {
        self.total_repayment.saturating_sub(self.amount)
    }
}

/// Round up to whole coins, ignoring binary noise just above an integer.
fn ceil_coins(x: f64) -> u64 {
    let nearest = x.round();
    if (x - nearest).abs() <= 1e-9 {
        nearest as u64
    } else {
        x.ceil() as u64
    }
}

/// Payout schedule for a withdrawal.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawMode {
    /// Paid out immediately, minus a 2% fee.
    Instant,
    /// Paid with the monthly batch, plus a 1% bonus.
    Monthly,
}

/// What a creator receives for a withdrawal of `amount` reference units.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct WithdrawQuote {
    pub amount: f64,
    pub mode: WithdrawMode,
    pub fee: f64,
    pub bonus: f64,
    pub net: f64,
    pub meets_minimum: bool,
}

impl WithdrawQuote {
    pub fn for_amount(amount: f64, mode: WithdrawMode) -> Self {
        let (fee, bonus) = match mode {
            WithdrawMode::Instant => (amount * INSTANT_WITHDRAW_FEE, 0.0),
            WithdrawMode::Monthly => (0.0, amount * MONTHLY_WITHDRAW_BONUS),
        };
        Self {
            amount,
            mode,
            fee,
            bonus,
            net: amount - fee + bonus,
            meets_minimum: amount >= MIN_WITHDRAWAL,
        }
    }
}
