//! End-to-end flows: score, pay out, spend, restore.

use payshare_core::persona::Persona;
use payshare_core::types::{MetricSet, TransactionKind};
use payshare_core::{RewardCalculator, RewardModel};
use payshare_ledger::{LedgerBook, LedgerError};
use payshare_payout::{PayoutConfig, PayoutEngine, PayoutError};
use payshare_tests::helpers::{blocked, book_with_creators, creator, max_metrics, replay};

// ---------------------------------------------------------------------------
// Reward model
// ---------------------------------------------------------------------------

#[test]
fn personas_rank_in_expected_order() {
    let calc = RewardCalculator::default();
    let fractions: Vec<f64> = Persona::ALL
        .iter()
        .map(|p| calc.compute(&p.metrics()).reward_fraction)
        .collect();
    assert!(fractions.windows(2).all(|w| w[0] > w[1]), "{fractions:?}");
    assert_eq!(fractions[3], 0.0);
}

#[test]
fn maximum_inputs_pay_the_ceiling() {
    let r = RewardCalculator::default().compute(&max_metrics());
    assert!((r.reward_fraction - 0.70).abs() < 1e-9);
}

#[test]
fn closed_gate_overrides_every_other_input() {
    let r = RewardCalculator::default().compute(&blocked(max_metrics()));
    assert!(r.gate_blocked);
    assert_eq!(r.reward_fraction, 0.0);
}

// ---------------------------------------------------------------------------
// Payout into ledgers
// ---------------------------------------------------------------------------

#[test]
fn payout_then_spend_keeps_log_and_balance_in_sync() {
    let book = book_with_creators(1, 12_547);
    let c = creator(0);
    let engine = PayoutEngine::default();

    let out = engine
        .payout(&book, &c, 50.0, &Persona::LessPopularHighQuality.metrics())
        .unwrap();
    assert_eq!(out.credited_coins, 2_074);

    book.reinvest(&c, 4_000, None).unwrap();
    book.borrow(&c, 1_000, Some("Loan")).unwrap();
    book.purchase(&c, 500, None).unwrap();
    book.withdraw(&c, 2_000, None).unwrap();

    let balance = book.balance(&c).unwrap();
    assert_eq!(balance.total_coins, 12_547 + 2_074 + 1_000 - 500 - 2_000);
    assert_eq!(balance.invested_coins, 4_000);
    assert_eq!(balance.borrowed_coins, 1_000);
    assert_eq!(balance.available_coins(), balance.total_coins - 4_000);

    let mut log = book.transactions(&c).unwrap();
    assert_eq!(log.len(), 5);
    assert_eq!(log[0].kind, TransactionKind::Withdraw);
    assert_eq!(log[0].description, "Withdrawal");
    assert_eq!(log[4].kind, TransactionKind::Earn);
    assert!(log[4].description.starts_with("Creator reward payout ("));

    log.reverse();
    assert_eq!(replay(12_547, &log), balance);
}

#[test]
fn reinvested_coins_cannot_be_withdrawn() {
    let book = book_with_creators(1, 1_000);
    let c = creator(0);
    book.reinvest(&c, 900, None).unwrap();
    let err = book.withdraw(&c, 200, None).unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientBalance {
            available: 100,
            requested: 200
        }
    );
    assert_eq!(book.transactions(&c).unwrap().len(), 1);
}

#[test]
fn malicious_persona_earns_nothing_across_many_payouts() {
    let book = book_with_creators(1, 0);
    let c = creator(0);
    let engine = PayoutEngine::default();
    for gross in [1.0, 100.0, 1_000_000.0] {
        let out = engine.payout(&book, &c, gross, &Persona::Malicious.metrics()).unwrap();
        assert_eq!(out.credited_coins, 0);
    }
    assert!(book.transactions(&c).unwrap().is_empty());
    assert_eq!(book.balance(&c).unwrap().total_coins, 0);
}

#[test]
fn invalid_gross_leaves_ledger_untouched() {
    let book = book_with_creators(1, 10);
    let c = creator(0);
    let engine = PayoutEngine::default();
    for gross in [-5.0, f64::NAN, f64::INFINITY] {
        let err = engine.payout(&book, &c, gross, &MetricSet::default()).unwrap_err();
        assert!(matches!(err, PayoutError::Ledger(LedgerError::InvalidAmount(_))), "{err:?}");
    }
    assert!(book.transactions(&c).unwrap().is_empty());
}

#[test]
fn config_file_drives_engine() {
    use std::io::Write;

    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        "coins_per_unit = 1000\ninitial_coins = 0\n[reward]\npayout_floor = 0.0"
    )
    .unwrap();
    let config = PayoutConfig::from_file(file.path()).unwrap();
    let engine = PayoutEngine::from_config(&config).unwrap();

    let book = LedgerBook::new();
    book.open(creator(7), config.initial_coins).unwrap();
    let out = engine
        .payout(&book, &creator(7), 10.0, &Persona::LessPopularLowQuality.metrics())
        .unwrap();
    // 10 units * 0.1222 * 1000 coins per unit.
    assert_eq!(out.credited_coins, out.preview.coins);
    assert!(out.credited_coins >= 1_221 && out.credited_coins <= 1_222);
}

// ---------------------------------------------------------------------------
// Restore
// ---------------------------------------------------------------------------

#[test]
fn restored_ledger_continues_where_it_left_off() {
    let book = book_with_creators(1, 500);
    let c = creator(0);
    book.earn(&c, 100, None).unwrap();
    book.reinvest(&c, 50, None).unwrap();
    let balance = book.balance(&c).unwrap();
    let log = book.transactions(&c).unwrap();

    let restored = LedgerBook::new();
    restored.restore(c.clone(), balance, log.clone()).unwrap();
    assert_eq!(restored.balance(&c).unwrap(), balance);
    assert_eq!(restored.transactions(&c).unwrap(), log);

    let receipt = restored.withdraw(&c, 10, None).unwrap();
    assert!(receipt.transaction.id > log[0].id);
}

#[test]
fn restore_into_occupied_slot_fails() {
    let book = book_with_creators(1, 0);
    let err = book
        .restore(creator(0), payshare_core::types::Balance::new(0), vec![])
        .unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyExists(_)));
}
