//! Creator reward scoring.
//!
//! The reward fraction is the product of three sub-scores and a global
//! scaler, clamped to the payout band:
//!
//! - base = 0.5 × market health + 0.5 × category weight
//! - ai_adjusted = 0.5 × content quality + 0.5 × interaction quality
//! - temporal = 0.5 + 0.5 × (0.3 × immediate + 0.7 × weekly engagement)
//! - raw = [`REWARD_SCALER`] × base × ai_adjusted × temporal
//!
//! A clean account earns `clamp(raw, 0.10, 0.70)`. A zero fraud gate forces
//! the fraction to exactly 0, which no other input can reach.
//!
//! Computation never fails. Every input is clamped to its documented range
//! first, and non-finite inputs count as the bottom of their range.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CATEGORY_WEIGHT_MAX, ENGAGEMENT_MAX, EPSILON, FRAUD_GATE_MAX, MARKET_HEALTH_MAX, QUALITY_MAX,
    REWARD_CEILING, REWARD_FLOOR, REWARD_SCALER, TEMPORAL_FLOOR, W_CATEGORY_WEIGHT, W_CONTENT_QUALITY,
    W_IMMEDIATE_ENGAGEMENT, W_INTERACTION_QUALITY, W_MARKET_HEALTH, W_WEEKLY_ENGAGEMENT,
};
use crate::error::ParamsError;
use crate::traits::RewardModel;
use crate::types::{MetricSet, RewardResult};

/// Clamp `x` into `[lo, hi]`. NaN and infinities map to `lo`.
fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if !x.is_finite() {
        return lo;
    }
    x.max(lo).min(hi)
}

/// Clamp to the payout band, snapping values within [`EPSILON`] of either
/// bound onto the bound.
fn clamp_payout(raw: f64, floor: f64, ceiling: f64) -> f64 {
    if raw.is_nan() || raw <= floor + EPSILON {
        floor
    } else if raw >= ceiling - EPSILON {
        ceiling
    } else {
        raw
    }
}

/// Tunable weights and bounds of the reward formula.
///
/// [`Default`] reproduces the production formula. Construct a
/// [`RewardCalculator`] through [`RewardCalculator::new`] so the parameters
/// are validated once.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct RewardParams {
    pub w_market_health: f64,
    pub w_category_weight: f64,
    pub base_min: f64,
    pub base_max: f64,

    pub w_content_quality: f64,
    pub w_interaction_quality: f64,
    pub quality_min: f64,
    pub quality_max: f64,

    pub w_immediate_engagement: f64,
    pub w_weekly_engagement: f64,
    pub temporal_min: f64,
    pub temporal_max: f64,

    pub scaler: f64,
    pub payout_floor: f64,
    pub payout_ceiling: f64,
}

impl Default for RewardParams {
    fn default() -> Self {
        Self {
            w_market_health: W_MARKET_HEALTH,
            w_category_weight: W_CATEGORY_WEIGHT,
            base_min: 0.0,
            base_max: MARKET_HEALTH_MAX,
            w_content_quality: W_CONTENT_QUALITY,
            w_interaction_quality: W_INTERACTION_QUALITY,
            quality_min: 0.0,
            quality_max: QUALITY_MAX,
            w_immediate_engagement: W_IMMEDIATE_ENGAGEMENT,
            w_weekly_engagement: W_WEEKLY_ENGAGEMENT,
            temporal_min: TEMPORAL_FLOOR,
            temporal_max: 1.0,
            scaler: REWARD_SCALER,
            payout_floor: REWARD_FLOOR,
            payout_ceiling: REWARD_CEILING,
        }
    }
}

impl RewardParams {
    /// Check that every value is finite, weights are non-negative, ranges
    /// are ordered and the payout band lies within `[0, 1]`.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let values = [
            ("w_market_health", self.w_market_health),
            ("w_category_weight", self.w_category_weight),
            ("base_min", self.base_min),
            ("base_max", self.base_max),
            ("w_content_quality", self.w_content_quality),
            ("w_interaction_quality", self.w_interaction_quality),
            ("quality_min", self.quality_min),
            ("quality_max", self.quality_max),
            ("w_immediate_engagement", self.w_immediate_engagement),
            ("w_weekly_engagement", self.w_weekly_engagement),
            ("temporal_min", self.temporal_min),
            ("temporal_max", self.temporal_max),
            ("scaler", self.scaler),
            ("payout_floor", self.payout_floor),
            ("payout_ceiling", self.payout_ceiling),
        ];
        if let Some((name, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ParamsError::NonFinite(name));
        }

        let weights = [
            ("w_market_health", self.w_market_health),
            ("w_category_weight", self.w_category_weight),
            ("w_content_quality", self.w_content_quality),
            ("w_interaction_quality", self.w_interaction_quality),
            ("w_immediate_engagement", self.w_immediate_engagement),
            ("w_weekly_engagement", self.w_weekly_engagement),
        ];
        if let Some((name, _)) = weights.iter().find(|(_, w)| *w < 0.0) {
            return Err(ParamsError::NegativeWeight(name));
        }

        let ranges = [
            ("base", self.base_min, self.base_max),
            ("quality", self.quality_min, self.quality_max),
            ("temporal", self.temporal_min, self.temporal_max),
            ("payout", self.payout_floor, self.payout_ceiling),
        ];
        for (name, min, max) in ranges {
            if min > max {
                return Err(ParamsError::InvertedRange {
                    name,
                    min: min.to_string(),
                    max: max.to_string(),
                });
            }
        }

        if self.payout_floor < 0.0 {
            return Err(ParamsError::NegativeFloor(self.payout_floor.to_string()));
        }
        if self.payout_ceiling > 1.0 {
            return Err(ParamsError::CeilingTooHigh(self.payout_ceiling.to_string()));
        }
        if self.scaler <= 0.0 {
            return Err(ParamsError::NonPositiveScaler(self.scaler.to_string()));
        }
        Ok(())
    }
}

/// The production reward model.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct RewardCalculator {
    params: RewardParams,
}

impl RewardCalculator {
    /// Build a calculator from validated parameters.
    pub fn new(params: RewardParams) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &RewardParams {
        &self.params
    }

    /// Market and category sub-score.
    pub fn base_score(&self, m: &MetricSet) -> f64 {
        let p = &self.params;
        let market = clamp(m.market_health, 0.0, MARKET_HEALTH_MAX);
        let category = clamp(m.category_weight, 0.0, CATEGORY_WEIGHT_MAX);
        clamp(
            p.w_market_health * market + p.w_category_weight * category,
            p.base_min,
            p.base_max,
        )
    }

    /// Content and interaction quality sub-score.
    pub fn ai_adjusted_score(&self, m: &MetricSet) -> f64 {
        let p = &self.params;
        let content = clamp(m.content_quality, 0.0, QUALITY_MAX);
        let interaction = clamp(m.interaction_quality, 0.0, QUALITY_MAX);
        clamp(
            p.w_content_quality * content + p.w_interaction_quality * interaction,
            p.quality_min,
            p.quality_max,
        )
    }

    /// Engagement multiplier, `0.5` with no engagement up to `1.0`.
    pub fn temporal_score(&self, m: &MetricSet) -> f64 {
        let p = &self.params;
        let immediate = clamp(m.immediate_engagement, 0.0, ENGAGEMENT_MAX);
        let weekly = clamp(m.weekly_engagement, 0.0, ENGAGEMENT_MAX);
        let blend = p.w_immediate_engagement * immediate + p.w_weekly_engagement * weekly;
        clamp(TEMPORAL_FLOOR + TEMPORAL_FLOOR * blend, p.temporal_min, p.temporal_max)
    }

    /// Compute the reward for one metric set.
    ///
    /// ```
    /// use payshare_core::{MetricSet, RewardCalculator};
    ///
    /// let calc = RewardCalculator::default();
    /// let best = MetricSet {
    ///     fraud_gate: 1.0,
    ///     market_health: 1.2,
    ///     category_weight: 1.2,
    ///     content_quality: 1.0,
    ///     interaction_quality: 1.0,
    ///     immediate_engagement: 1.0,
    ///     weekly_engagement: 1.0,
    /// };
    /// assert_eq!(calc.compute(&best).reward_fraction, 0.70);
    ///
    /// let blocked = MetricSet { fraud_gate: 0.0, ..best };
    /// let r = calc.compute(&blocked);
    /// assert!(r.gate_blocked);
    /// assert_eq!(r.reward_fraction, 0.0);
    /// ```
    pub fn compute(&self, metrics: &MetricSet) -> RewardResult {
        let base = self.base_score(metrics);
        let ai_adjusted = self.ai_adjusted_score(metrics);
        let temporal = self.temporal_score(metrics);
        let raw_score = self.params.scaler * base * ai_adjusted * temporal;

        let gate_blocked = is_gate_blocked(metrics.fraud_gate);
        let reward_fraction = if gate_blocked {
            0.0
        } else {
            clamp_payout(raw_score, self.params.payout_floor, self.params.payout_ceiling)
        };

        RewardResult {
            base,
            ai_adjusted,
            temporal,
            raw_score,
            reward_fraction,
            gate_blocked,
        }
    }
}

/// The gate is clamped to `[0, 1]` like every other input, then blocks at 0
/// (within [`EPSILON`]). Soft gates in `(0, 1]` pass; negative and non-finite
/// signals land on 0 and block.
pub(crate) fn is_gate_blocked(gate: f64) -> bool {
    clamp(gate, 0.0, FRAUD_GATE_MAX) <= EPSILON
}

impl RewardModel for RewardCalculator {
    fn compute(&self, metrics: &MetricSet) -> RewardResult {
        RewardCalculator::compute(self, metrics)
    }
}
