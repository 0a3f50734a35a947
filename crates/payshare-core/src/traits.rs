//! Trait interfaces between Payshare crates.
//!
//! - [`RewardModel`] — metric set to reward fraction (`RewardCalculator` implements)

use crate::types::{MetricSet, RewardResult};

/// Pure mapping from quality and trust signals to a reward.
///
/// Implementations must be total: every metric set yields a result, and a
/// gate-blocked result carries `reward_fraction == 0.0`. The payout engine
/// is generic over this trait so alternative models can be swapped in.
pub trait RewardModel: Send + Sync {
    fn compute(&self, metrics: &MetricSet) -> RewardResult;
}

/// Fixed-fraction model for tests and dry runs.
///
/// Returns the same fraction for every clean metric set. The fraud gate
/// blocks exactly as it does for [`crate::RewardCalculator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatRewardModel {
    pub fraction: f64,
}

impl RewardModel for FlatRewardModel {
    fn compute(&self, metrics: &MetricSet) -> RewardResult {
        let gate_blocked = crate::reward::is_gate_blocked(metrics.fraud_gate);
        RewardResult {
            base: 1.0,
            ai_adjusted: 1.0,
            temporal: 1.0,
            raw_score: self.fraction,
            reward_fraction: if gate_blocked { 0.0 } else { self.fraction },
            gate_blocked,
        }
    }
}
