//! Keyed collection of per-creator ledgers.
//!
//! Each creator's [`BalanceLedger`] sits behind its own `parking_lot::Mutex`.
//! A call looks up the creator, clones the `Arc`, releases the map shard and
//! then holds the creator's lock for the whole validate-then-mutate step.
//! Two requests for the same creator are serialized; requests for different
//! creators never wait on each other's lock.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info};

use payshare_core::types::{Balance, CreatorId, Transaction, TransactionKind};

use crate::error::LedgerError;
use crate::ledger::{BalanceLedger, Receipt};

/// Shared handle to one creator's ledger.
pub type LedgerHandle = Arc<Mutex<BalanceLedger>>;

/// All open ledgers, keyed by creator.
#[derive(Debug, Default)]
pub struct LedgerBook {
    ledgers: DashMap<CreatorId, LedgerHandle>,
}

impl LedgerBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a ledger for `creator` with `initial_coins`.
    pub fn open(&self, creator: CreatorId, initial_coins: u64) -> Result<LedgerHandle, LedgerError> {
        match self.ledgers.entry(creator) {
            Entry::Occupied(e) => Err(LedgerError::AlreadyExists(e.key().to_string())),
            Entry::Vacant(e) => {
                info!(creator = %e.key(), initial_coins, "book: ledger opened");
                let handle = Arc::new(Mutex::new(BalanceLedger::new(e.key().clone(), initial_coins)));
                e.insert(Arc::clone(&handle));
                Ok(handle)
            }
        }
    }

    /// The existing ledger for `creator`, or a new one with `initial_coins`.
    pub fn open_or_get(&self, creator: CreatorId, initial_coins: u64) -> LedgerHandle {
        let key = creator.clone();
        let handle = self.ledgers.entry(creator).or_insert_with(|| {
            info!(creator = %key, initial_coins, "book: ledger opened");
            Arc::new(Mutex::new(BalanceLedger::new(key, initial_coins)))
        });
        Arc::clone(handle.value())
    }

    /// Install a ledger rebuilt from external storage.
    pub fn restore(
        &self,
        creator: CreatorId,
        balance: Balance,
        history: Vec<Transaction>,
    ) -> Result<LedgerHandle, LedgerError> {
        match self.ledgers.entry(creator) {
            Entry::Occupied(e) => Err(LedgerError::AlreadyExists(e.key().to_string())),
            Entry::Vacant(e) => {
                let ledger = BalanceLedger::restore(e.key().clone(), balance, history)?;
                let handle = Arc::new(Mutex::new(ledger));
                e.insert(Arc::clone(&handle));
                Ok(handle)
            }
        }
    }

    /// Handle to `creator`'s ledger. The map shard is released on return.
    pub fn handle(&self, creator: &CreatorId) -> Result<LedgerHandle, LedgerError> {
        self.ledgers
            .get(creator)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| LedgerError::UnknownCreator(creator.to_string()))
    }

    pub fn contains(&self, creator: &CreatorId) -> bool {
        self.ledgers.contains_key(creator)
    }

    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }

    /// All creators with an open ledger, sorted.
    pub fn creators(&self) -> Vec<CreatorId> {
        let mut ids: Vec<CreatorId> = self.ledgers.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Run `f` with exclusive access to `creator`'s ledger.
    ///
    /// The per-creator mutex is not reentrant: `f` must not call back into
    /// this book for the same creator, or it deadlocks. Other creators are
    /// fine, each has its own lock.
    pub fn with_ledger<R>(
        &self,
        creator: &CreatorId,
        f: impl FnOnce(&mut BalanceLedger) -> R,
    ) -> Result<R, LedgerError> {
        let handle = self.handle(creator)?;
        let mut ledger = handle.lock();
        Ok(f(&mut ledger))
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    pub fn apply(
        &self,
        creator: &CreatorId,
        kind: TransactionKind,
        amount: u64,
        description: Option<&str>,
    ) -> Result<Receipt, LedgerError> {
        let result = self.with_ledger(creator, |ledger| ledger.apply(kind, amount, description))?;
        if let Err(e) = &result {
            debug!(creator = %creator, %kind, amount, error = %e, "book: operation failed");
        }
        result
    }

    pub fn earn(&self, creator: &CreatorId, amount: u64, description: Option<&str>) -> Result<Receipt, LedgerError> {
        self.apply(creator, TransactionKind::Earn, amount, description)
    }

    pub fn reinvest(&self, creator: &CreatorId, amount: u64, description: Option<&str>) -> Result<Receipt, LedgerError> {
        self.apply(creator, TransactionKind::Reinvest, amount, description)
    }

    pub fn withdraw(&self, creator: &CreatorId, amount: u64, description: Option<&str>) -> Result<Receipt, LedgerError> {
        self.apply(creator, TransactionKind::Withdraw, amount, description)
    }

    pub fn purchase(&self, creator: &CreatorId, amount: u64, description: Option<&str>) -> Result<Receipt, LedgerError> {
        self.apply(creator, TransactionKind::Purchase, amount, description)
    }

    pub fn borrow(&self, creator: &CreatorId, amount: u64, description: Option<&str>) -> Result<Receipt, LedgerError> {
        self.apply(creator, TransactionKind::Borrow, amount, description)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn balance(&self, creator: &CreatorId) -> Result<Balance, LedgerError> {
        self.with_ledger(creator, |ledger| ledger.balance())
    }

    /// Transaction log, most recent first.
    pub fn transactions(&self, creator: &CreatorId) -> Result<Vec<Transaction>, LedgerError> {
        self.with_ledger(creator, |ledger| ledger.transactions_snapshot())
    }
}
