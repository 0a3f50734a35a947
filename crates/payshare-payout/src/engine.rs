//! Payout engine: reward scoring composed with the coin ledger.
//!
//! Flow for one payout:
//! 1. score the metric set with the configured [`RewardModel`],
//! 2. creator share = gross revenue × reward fraction (reference currency),
//! 3. convert the share to whole coins, rounding down,
//! 4. credit the coins through `Earn`.
//!
//! A gate-blocked score or a share worth less than one coin credits nothing
//! and is not an error. The engine holds only immutable configuration.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use payshare_core::types::{CreatorId, MetricSet, RewardResult};
use payshare_core::{CurrencyConverter, RewardCalculator, RewardModel};
use payshare_ledger::{BalanceLedger, LedgerBook, LedgerError, Receipt};

use crate::config::PayoutConfig;
use crate::error::PayoutError;

/// Scored payout before any ledger is touched.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PayoutPreview {
    pub reward: RewardResult,
    /// Gross revenue in reference units.
    pub gross_revenue: f64,
    /// `gross_revenue * reward_fraction` in reference units.
    pub creator_share: f64,
    /// Share converted to whole coins.
    pub coins: u64,
}

/// Result of a payout.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PayoutOutcome {
    pub preview: PayoutPreview,
    /// Coins actually credited. Zero when blocked or below one coin.
    pub credited_coins: u64,
    /// Ledger receipt when coins were credited.
    pub receipt: Option<Receipt>,
}

/// Composition root for reward payouts.
#[derive(Debug, Clone)]
pub struct PayoutEngine<M = RewardCalculator> {
    model: M,
    converter: CurrencyConverter,
}

impl Default for PayoutEngine {
    fn default() -> Self {
        Self::new(RewardCalculator::default(), CurrencyConverter::default())
    }
}

impl PayoutEngine {
    /// Build the production engine from validated configuration.
    pub fn from_config(config: &PayoutConfig) -> Result<Self, PayoutError> {
        config.validate()?;
        Ok(Self::new(config.calculator()?, config.converter()?))
    }
}

impl<M: RewardModel> PayoutEngine<M> {
    pub fn new(model: M, converter: CurrencyConverter) -> Self {
        Self { model, converter }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn converter(&self) -> CurrencyConverter {
        self.converter
    }

    /// Score and convert without touching any ledger.
    pub fn preview(&self, gross_revenue: f64, metrics: &MetricSet) -> Result<PayoutPreview, PayoutError> {
        // Validates the gross amount: negative or non-finite fails here.
        self.converter.whole_coins(gross_revenue)?;

        let reward = self.model.compute(metrics);
        let creator_share = gross_revenue * reward.reward_fraction;
        let coins = self.converter.whole_coins(creator_share)?;

        Ok(PayoutPreview {
            reward,
            gross_revenue,
            creator_share,
            coins,
        })
    }

    /// Credit the payout to a ledger the caller already holds exclusively.
    pub fn credit(
        &self,
        ledger: &mut BalanceLedger,
        gross_revenue: f64,
        metrics: &MetricSet,
    ) -> Result<PayoutOutcome, PayoutError> {
        let preview = self.preview(gross_revenue, metrics)?;
        let creator = ledger.creator().clone();
        self.settle(&creator, preview, |coins, description| ledger.earn(coins, Some(description)))
    }

    /// Credit the payout to `creator`'s ledger in `book`.
    pub fn payout(
        &self,
        book: &LedgerBook,
        creator: &CreatorId,
        gross_revenue: f64,
        metrics: &MetricSet,
    ) -> Result<PayoutOutcome, PayoutError> {
        if !book.contains(creator) {
            return Err(LedgerError::UnknownCreator(creator.to_string()).into());
        }
        let preview = self.preview(gross_revenue, metrics)?;
        self.settle(creator, preview, |coins, description| {
            book.earn(creator, coins, Some(description))
        })
    }

    fn settle(
        &self,
        creator: &CreatorId,
        preview: PayoutPreview,
        earn: impl FnOnce(u64, &str) -> Result<Receipt, LedgerError>,
    ) -> Result<PayoutOutcome, PayoutError> {
        if preview.reward.gate_blocked || preview.coins == 0 {
            info!(
                creator = %creator,
                gate_blocked = preview.reward.gate_blocked,
                gross = preview.gross_revenue,
                "payout: nothing to credit"
            );
            return Ok(PayoutOutcome {
                preview,
                credited_coins: 0,
                receipt: None,
            });
        }

        let description = payout_description(&preview);
        let receipt = earn(preview.coins, &description)?;
        debug!(
            creator = %creator,
            fraction = preview.reward.reward_fraction,
            coins = preview.coins,
            id = %receipt.transaction.id,
            "payout: credited"
        );
        Ok(PayoutOutcome {
            preview,
            credited_coins: preview.coins,
            receipt: Some(receipt),
        })
    }
}

/// Earn description. The gross amount is in reference units with no
/// currency symbol; the reference currency is a deployment choice.
fn payout_description(preview: &PayoutPreview) -> String {
    format!(
        "Creator reward payout ({:.1}% of {:.2})",
        preview.reward.percent(),
        preview.gross_revenue
    )
}
