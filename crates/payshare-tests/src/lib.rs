//! Integration test suite for Payshare.
//!
//! Exercises the reward model, the ledger book and the payout engine
//! together, including concurrent access and randomized operation
//! sequences that try to break the balance invariants.

pub mod helpers;
