//! Single-creator balance ledger.
//!
//! [`BalanceLedger`] owns one creator's [`Balance`] and append-only
//! transaction log. Every operation computes the next balance first and
//! commits balance and log entry together, so a failed call leaves both
//! untouched.
//!
//! Not thread-safe: callers share a ledger through
//! [`LedgerBook`](crate::book::LedgerBook), which holds each ledger behind
//! its own mutex.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use payshare_core::types::{Balance, CreatorId, Transaction, TransactionId, TransactionKind};

use crate::error::LedgerError;

/// Result of a successful ledger operation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// The log entry appended by the operation.
    pub transaction: Transaction,
    /// Balance after the operation.
    pub balance: Balance,
}

/// One creator's balances and transaction history.
#[derive(Debug, Clone)]
pub struct BalanceLedger {
    creator: CreatorId,
    balance: Balance,
    /// Oldest first. Never rewritten.
    history: Vec<Transaction>,
    /// Id for the next appended transaction.
    next_id: u64,
}

impl BalanceLedger {
    /// Open a ledger with `initial_coins` and nothing invested or borrowed.
    pub fn new(creator: CreatorId, initial_coins: u64) -> Self {
        Self {
            creator,
            balance: Balance::new(initial_coins),
            history: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild a ledger from externally stored state.
    ///
    /// `history` may be in any order. Fails with
    /// [`LedgerError::InvariantViolation`] if the balance is inconsistent,
    /// an entry has a zero amount, or two entries share an id.
    pub fn restore(
        creator: CreatorId,
        balance: Balance,
        mut history: Vec<Transaction>,
    ) -> Result<Self, LedgerError> {
        check_balance(&balance)?;

        history.sort_by_key(|tx| tx.id);
        if let Some(tx) = history.iter().find(|tx| tx.amount == 0) {
            return Err(LedgerError::InvariantViolation(format!(
                "{} has zero amount",
                tx.id
            )));
        }
        if let Some(pair) = history.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(LedgerError::InvariantViolation(format!(
                "duplicate transaction id {}",
                pair[0].id
            )));
        }

        let next_id = match history.last() {
            None => 1,
            Some(tx) => tx.id.0.checked_add(1).ok_or_else(|| {
                LedgerError::InvariantViolation(format!("{} exhausts the id space", tx.id))
            })?,
        };
        debug!(
            creator = %creator,
            total = balance.total_coins,
            entries = history.len(),
            "ledger: restored"
        );
        Ok(Self {
            creator,
            balance,
            history,
            next_id,
        })
    }

    pub fn creator(&self) -> &CreatorId {
        &self.creator
    }

    /// Current balance snapshot.
    pub fn balance(&self) -> Balance {
        self.balance
    }

    pub fn total_coins(&self) -> u64 {
        self.balance.total_coins
    }

    pub fn available_coins(&self) -> u64 {
        self.balance.available_coins()
    }

    pub fn invested_coins(&self) -> u64 {
        self.balance.invested_coins
    }

    pub fn borrowed_coins(&self) -> u64 {
        self.balance.borrowed_coins
    }

    /// Transaction log, most recent first.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.history.iter().rev()
    }

    /// Owned copy of the log, most recent first.
    pub fn transactions_snapshot(&self) -> Vec<Transaction> {
        self.transactions().cloned().collect()
    }

    pub fn transaction_count(&self) -> usize {
        self.history.len()
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Credit `amount` coins.
    pub fn earn(&mut self, amount: u64, description: Option<&str>) -> Result<Receipt, LedgerError> {
        self.apply(TransactionKind::Earn, amount, description)
    }

    /// Commit `amount` available coins to investments. Total is unchanged.
    pub fn reinvest(&mut self, amount: u64, description: Option<&str>) -> Result<Receipt, LedgerError> {
        self.apply(TransactionKind::Reinvest, amount, description)
    }

    /// Pay `amount` available coins out of the account.
    pub fn withdraw(&mut self, amount: u64, description: Option<&str>) -> Result<Receipt, LedgerError> {
        self.apply(TransactionKind::Withdraw, amount, description)
    }

    /// Spend `amount` available coins on a service.
    pub fn purchase(&mut self, amount: u64, description: Option<&str>) -> Result<Receipt, LedgerError> {
        self.apply(TransactionKind::Purchase, amount, description)
    }

    /// Borrow `amount` coins. Credit limits are the caller's policy; the
    /// ledger only requires a positive amount.
    pub fn borrow(&mut self, amount: u64, description: Option<&str>) -> Result<Receipt, LedgerError> {
        self.apply(TransactionKind::Borrow, amount, description)
    }

    /// Run any operation by kind.
    pub fn apply(
        &mut self,
        kind: TransactionKind,
        amount: u64,
        description: Option<&str>,
    ) -> Result<Receipt, LedgerError> {
        check_balance(&self.balance)?;
        if amount == 0 {
            return Err(LedgerError::InvalidAmount(format!("{kind} amount must be positive")));
        }

        let next = match self.next_balance(kind, amount) {
            Ok(next) => next,
            Err(e) => {
                debug!(creator = %self.creator, %kind, amount, error = %e, "ledger: rejected");
                return Err(e);
            }
        };

        let Some(following_id) = self.next_id.checked_add(1) else {
            warn!(creator = %self.creator, next_id = self.next_id, "ledger: transaction ids exhausted");
            return Err(LedgerError::InvariantViolation("transaction ids exhausted".to_string()));
        };

        let transaction = Transaction {
            id: TransactionId(self.next_id),
            kind,
            amount,
            description: description
                .unwrap_or_else(|| kind.default_description())
                .to_string(),
            timestamp: Utc::now(),
        };

        // Commit.
        self.next_id = following_id;
        self.balance = next;
        self.history.push(transaction.clone());

        debug!(
            creator = %self.creator,
            id = %transaction.id,
            %kind,
            amount,
            total = next.total_coins,
            available = next.available_coins(),
            "ledger: applied"
        );
        Ok(Receipt {
            transaction,
            balance: next,
        })
    }

    /// Balance after applying `kind` for `amount`, without committing.
    fn next_balance(&self, kind: TransactionKind, amount: u64) -> Result<Balance, LedgerError> {
        let mut next = self.balance;
        if kind.draws_available() {
            let available = self.balance.available_coins();
            if amount > available {
                return Err(LedgerError::InsufficientBalance {
                    available,
                    requested: amount,
                });
            }
        }

        match kind {
            TransactionKind::Earn => {
                next.total_coins = add(next.total_coins, amount, "total")?;
            }
            TransactionKind::Reinvest => {
                next.invested_coins = add(next.invested_coins, amount, "invested")?;
            }
            TransactionKind::Withdraw | TransactionKind::Purchase => {
                next.total_coins -= amount;
            }
            TransactionKind::Borrow => {
                next.total_coins = add(next.total_coins, amount, "total")?;
                next.borrowed_coins = add(next.borrowed_coins, amount, "borrowed")?;
            }
        }
        Ok(next)
    }
}

fn add(current: u64, amount: u64, field: &str) -> Result<u64, LedgerError> {
    current
        .checked_add(amount)
        .ok_or_else(|| LedgerError::InvalidAmount(format!("{amount} overflows {field} coins")))
}

fn check_balance(balance: &Balance) -> Result<(), LedgerError> {
    if !balance.is_consistent() {
        warn!(
            total = balance.total_coins,
            invested = balance.invested_coins,
            "ledger: invested exceeds total"
        );
        return Err(LedgerError::InvariantViolation(format!(
            "invested {} exceeds total {}",
            balance.invested_coins, balance.total_coins
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ledger(initial: u64) -> BalanceLedger {
        BalanceLedger::new(CreatorId::new("creator-1"), initial)
    }

    fn tx(id: u64, kind: TransactionKind, amount: u64) -> Transaction {
        Transaction {
            id: TransactionId(id),
            kind,
            amount,
            description: kind.default_description().to_string(),
            timestamp: Utc::now(),
        }
    }

    // ------------------------------------------------------------------
    // Earn
    // ------------------------------------------------------------------

    #[test]
    fn earn_increases_total() {
        let mut l = ledger(1_000);
        let r = l.earn(250, Some("Weekly payout")).unwrap();
        assert_eq!(r.balance.total_coins, 1_250);
        assert_eq!(r.transaction.kind, TransactionKind::Earn);
        assert_eq!(r.transaction.description, "Weekly payout");
        assert_eq!(l.total_coins(), 1_250);
        assert_eq!(l.transaction_count(), 1);
    }

    #[test]
    fn earn_zero_is_invalid() {
        let mut l = ledger(1_000);
        assert!(matches!(l.earn(0, None), Err(LedgerError::InvalidAmount(_))));
        assert_eq!(l.transaction_count(), 0);
    }

    #[test]
    fn earn_overflow_is_invalid_and_unchanged() {
        let mut l = ledger(u64::MAX - 1);
        assert!(matches!(l.earn(2, None), Err(LedgerError::InvalidAmount(_))));
        assert_eq!(l.total_coins(), u64::MAX - 1);
        assert_eq!(l.transaction_count(), 0);
    }

    #[test]
    fn default_description_applies() {
        let mut l = ledger(1_000);
        let r = l.earn(1, None).unwrap();
        assert_eq!(r.transaction.description, "Earned coins");
    }

    // ------------------------------------------------------------------
    // Reinvest
    // ------------------------------------------------------------------

    #[test]
    fn reinvest_moves_available_to_invested() {
        let mut l = ledger(1_000);
        let r = l.reinvest(400, None).unwrap();
        assert_eq!(r.balance.total_coins, 1_000);
        assert_eq!(r.balance.invested_coins, 400);
        assert_eq!(r.balance.available_coins(), 600);
        assert_eq!(r.transaction.description, "Reinvestment");
    }

    #[test]
    fn reinvest_everything_available() {
        let mut l = ledger(1_000);
        l.reinvest(1_000, None).unwrap();
        assert_eq!(l.available_coins(), 0);
        assert!(matches!(
            l.reinvest(1, None),
            Err(LedgerError::InsufficientBalance { available: 0, requested: 1 })
        ));
    }

    #[test]
    fn reinvest_over_available_fails() {
        let mut l = ledger(1_000);
        l.reinvest(700, None).unwrap();
        let before = l.balance();
        let err = l.reinvest(301, None).unwrap_err();
        assert_eq!(err, LedgerError::InsufficientBalance { available: 300, requested: 301 });
        assert_eq!(l.balance(), before);
        assert_eq!(l.transaction_count(), 1);
    }

    // ------------------------------------------------------------------
    // Withdraw / Purchase
    // ------------------------------------------------------------------

    #[test]
    fn withdraw_decreases_total() {
        let mut l = ledger(1_000);
        let r = l.withdraw(300, None).unwrap();
        assert_eq!(r.balance.total_coins, 700);
        assert_eq!(r.transaction.kind, TransactionKind::Withdraw);
    }

    #[test]
    fn withdraw_cannot_touch_invested_coins() {
        let mut l = ledger(1_000);
        l.reinvest(800, None).unwrap();
        assert!(matches!(
            l.withdraw(201, None),
            Err(LedgerError::InsufficientBalance { available: 200, requested: 201 })
        ));
        l.withdraw(200, None).unwrap();
        assert_eq!(l.total_coins(), 800);
        assert_eq!(l.invested_coins(), 800);
        assert_eq!(l.available_coins(), 0);
    }

    #[test]
    fn purchase_matches_withdraw_effect() {
        let mut a = ledger(1_000);
        let mut b = ledger(1_000);
        a.withdraw(123, None).unwrap();
        let r = b.purchase(123, Some("Promote Video")).unwrap();
        assert_eq!(a.balance(), b.balance());
        assert_eq!(r.transaction.kind, TransactionKind::Purchase);
    }

    #[test]
    fn purchase_over_available_fails() {
        let mut l = ledger(50);
        assert!(matches!(
            l.purchase(51, None),
            Err(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(l.total_coins(), 50);
    }

    #[test]
    fn zero_amounts_are_invalid_for_every_kind() {
        for kind in TransactionKind::ALL {
            let mut l = ledger(1_000);
            assert!(matches!(l.apply(kind, 0, None), Err(LedgerError::InvalidAmount(_))));
            assert_eq!(l.transaction_count(), 0);
        }
    }

    // ------------------------------------------------------------------
    // Borrow
    // ------------------------------------------------------------------

    #[test]
    fn borrow_increases_total_and_borrowed() {
        let mut l = ledger(1_000);
        let r = l.borrow(100, None).unwrap();
        assert_eq!(r.balance.total_coins, 1_100);
        assert_eq!(r.balance.borrowed_coins, 100);
        assert_eq!(l.transaction_count(), 1);
        assert_eq!(r.transaction.kind, TransactionKind::Borrow);
        assert_eq!(r.transaction.amount, 100);
    }

    #[test]
    fn borrow_has_no_upper_bound() {
        let mut l = ledger(10);
        l.borrow(1_000_000, None).unwrap();
        assert_eq!(l.borrowed_coins(), 1_000_000);
    }

    #[test]
    fn borrow_from_empty_account() {
        let mut l = ledger(0);
        l.borrow(5, None).unwrap();
        assert_eq!(l.available_coins(), 5);
    }

    // ------------------------------------------------------------------
    // Log
    // ------------------------------------------------------------------

    #[test]
    fn log_is_most_recent_first_with_monotonic_ids() {
        let mut l = ledger(1_000);
        l.earn(10, None).unwrap();
        l.reinvest(20, None).unwrap();
        l.withdraw(30, None).unwrap();
        let kinds: Vec<_> = l.transactions().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            [TransactionKind::Withdraw, TransactionKind::Reinvest, TransactionKind::Earn]
        );
        let ids: Vec<_> = l.transactions().map(|t| t.id.0).collect();
        assert_eq!(ids, [3, 2, 1]);
    }

    #[test]
    fn failed_ops_do_not_consume_ids() {
        let mut l = ledger(10);
        l.withdraw(11, None).unwrap_err();
        let r = l.earn(1, None).unwrap();
        assert_eq!(r.transaction.id, TransactionId(1));
    }

    // ------------------------------------------------------------------
    // Restore
    // ------------------------------------------------------------------

    #[test]
    fn restore_continues_id_sequence() {
        let history = vec![
            tx(2, TransactionKind::Withdraw, 5),
            tx(1, TransactionKind::Earn, 10),
        ];
        let balance = Balance { total_coins: 105, invested_coins: 0, borrowed_coins: 0 };
        let mut l = BalanceLedger::restore(CreatorId::new("c"), balance, history).unwrap();
        assert_eq!(l.transactions().next().unwrap().id, TransactionId(2));
        let r = l.earn(1, None).unwrap();
        assert_eq!(r.transaction.id, TransactionId(3));
    }

    #[test]
    fn restore_rejects_corrupted_balance() {
        let balance = Balance { total_coins: 10, invested_coins: 20, borrowed_coins: 0 };
        assert!(matches!(
            BalanceLedger::restore(CreatorId::new("c"), balance, vec![]),
            Err(LedgerError::InvariantViolation(_))
        ));
    }

    #[test]
    fn restore_rejects_duplicate_ids() {
        let history = vec![tx(4, TransactionKind::Earn, 1), tx(4, TransactionKind::Borrow, 1)];
        assert!(matches!(
            BalanceLedger::restore(CreatorId::new("c"), Balance::new(2), history),
            Err(LedgerError::InvariantViolation(_))
        ));
    }

    #[test]
    fn restore_rejects_history_at_max_id() {
        let history = vec![tx(u64::MAX, TransactionKind::Earn, 1)];
        assert!(matches!(
            BalanceLedger::restore(CreatorId::new("c"), Balance::new(1), history),
            Err(LedgerError::InvariantViolation(_))
        ));
    }

    #[test]
    fn exhausted_ids_reject_without_reuse() {
        let history = vec![tx(u64::MAX - 1, TransactionKind::Earn, 10)];
        let mut l = BalanceLedger::restore(CreatorId::new("c"), Balance::new(10), history).unwrap();
        let err = l.earn(1, None).unwrap_err();
        assert!(matches!(err, LedgerError::InvariantViolation(_)));
        assert_eq!(l.transaction_count(), 1);
        assert_eq!(l.total_coins(), 10);
    }

    #[test]
    fn restore_rejects_zero_amount_entry() {
        let history = vec![tx(1, TransactionKind::Earn, 0)];
        assert!(matches!(
            BalanceLedger::restore(CreatorId::new("c"), Balance::new(0), history),
            Err(LedgerError::InvariantViolation(_))
        ));
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    fn op() -> impl Strategy<Value = (TransactionKind, u64)> {
        (
            prop::sample::select(TransactionKind::ALL.to_vec()),
            0u64..2_000,
        )
    }

    proptest! {
        #[test]
        fn invariants_hold_after_any_sequence(
            initial in 0u64..5_000,
            ops in prop::collection::vec(op(), 0..64),
        ) {
            let mut l = ledger(initial);
            for (kind, amount) in ops {
                let before = l.balance();
                let count = l.transaction_count();
                match l.apply(kind, amount, None) {
                    Ok(r) => {
                        prop_assert_eq!(l.transaction_count(), count + 1);
                        prop_assert_eq!(r.balance, l.balance());
                    }
                    Err(_) => {
                        prop_assert_eq!(l.balance(), before);
                        prop_assert_eq!(l.transaction_count(), count);
                    }
                }
                let b = l.balance();
                prop_assert!(b.invested_coins <= b.total_coins);
                prop_assert_eq!(b.available_coins(), b.total_coins - b.invested_coins);
            }
        }

        #[test]
        fn total_is_conserved_by_log(
            initial in 0u64..5_000,
            ops in prop::collection::vec(op(), 0..64),
        ) {
            let mut l = ledger(initial);
            for (kind, amount) in ops {
                let _ = l.apply(kind, amount, None);
            }
            let mut total = initial as i128;
            let mut invested = 0i128;
            let mut borrowed = 0i128;
            for t in l.transactions() {
                let a = t.amount as i128;
                match t.kind {
                    TransactionKind::Earn => total += a,
                    TransactionKind::Reinvest => invested += a,
                    TransactionKind::Withdraw | TransactionKind::Purchase => total -= a,
                    TransactionKind::Borrow => { total += a; borrowed += a; }
                }
            }
            let b = l.balance();
            prop_assert_eq!(b.total_coins as i128, total);
            prop_assert_eq!(b.invested_coins as i128, invested);
            prop_assert_eq!(b.borrowed_coins as i128, borrowed);
        }

        #[test]
        fn overdraw_always_rejected(
            initial in 0u64..5_000,
            extra in 1u64..1_000,
            kind in prop::sample::select(vec![
                TransactionKind::Reinvest,
                TransactionKind::Withdraw,
                TransactionKind::Purchase,
            ]),
        ) {
            let mut l = ledger(initial);
            let err = l.apply(kind, initial + extra, None).unwrap_err();
            let is_insufficient = matches!(err, LedgerError::InsufficientBalance { .. });
            prop_assert!(is_insufficient);
            prop_assert_eq!(l.balance(), Balance::new(initial));
            prop_assert_eq!(l.transaction_count(), 0);
        }
    }
}
