//! Shared helpers for integration tests.

use payshare_core::types::{Balance, CreatorId, MetricSet, Transaction, TransactionKind};
use payshare_ledger::LedgerBook;

/// Creator id from a short index.
pub fn creator(n: usize) -> CreatorId {
    CreatorId::new(format!("creator-{n}"))
}

/// Book with `count` creators, each opened with `initial` coins.
pub fn book_with_creators(count: usize, initial: u64) -> LedgerBook {
    let book = LedgerBook::new();
    for n in 0..count {
        book.open(creator(n), initial)
            .unwrap_or_else(|e| panic!("open creator-{n}: {e}"));
    }
    book
}

/// Metric set with every input at its maximum and the gate open.
pub fn max_metrics() -> MetricSet {
    MetricSet {
        fraud_gate: 1.0,
        market_health: 1.2,
        category_weight: 1.2,
        content_quality: 1.0,
        interaction_quality: 1.0,
        immediate_engagement: 1.0,
        weekly_engagement: 1.0,
    }
}

/// Same metrics with the fraud gate closed.
pub fn blocked(metrics: MetricSet) -> MetricSet {
    MetricSet {
        fraud_gate: 0.0,
        ..metrics
    }
}

/// Replay a transaction log, oldest first, on top of `initial` coins.
///
/// Returns the balance the log implies, for comparison with the ledger's
/// stored balance.
pub fn replay(initial: u64, log: &[Transaction]) -> Balance {
    let mut b = Balance::new(initial);
    for tx in log {
        match tx.kind {
            TransactionKind::Earn => b.total_coins += tx.amount,
            TransactionKind::Reinvest => b.invested_coins += tx.amount,
            TransactionKind::Withdraw | TransactionKind::Purchase => b.total_coins -= tx.amount,
            TransactionKind::Borrow => {
                b.total_coins += tx.amount;
                b.borrowed_coins += tx.amount;
            }
        }
    }
    b
}
