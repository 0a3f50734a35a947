//! Fixed-rate conversion between coins and the reference currency.
//!
//! The rate is fixed when the converter is built and never changes. With the
//! default of 100 coins per unit, `to_reference(12_547) == 125.47`.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use crate::constants::{COINS_PER_REFERENCE_UNIT, EPSILON};
use crate::error::AmountError;

/// Converts coin quantities to and from reference-currency amounts.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrencyConverter {
    coins_per_unit: NonZeroU64,
}

const DEFAULT_RATE: NonZeroU64 = match NonZeroU64::new(COINS_PER_REFERENCE_UNIT) {
    Some(rate) => rate,
    None => panic!("COINS_PER_REFERENCE_UNIT must be non-zero"),
};

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self { coins_per_unit: DEFAULT_RATE }
    }
}

impl CurrencyConverter {
    pub fn new(coins_per_unit: NonZeroU64) -> Self {
        Self { coins_per_unit }
    }

    pub fn coins_per_unit(&self) -> u64 {
        self.coins_per_unit.get()
    }

    /// Value of `coins` in the reference currency.
    ///
    /// ```
    /// use payshare_core::CurrencyConverter;
    /// let fx = CurrencyConverter::default();
    /// assert_eq!(fx.to_reference(12_547), 125.47);
    /// ```
    pub fn to_reference(&self, coins: u64) -> f64 {
        coins as f64 / self.coins_per_unit.get() as f64
    }

    /// Coins (possibly fractional) worth `amount` reference units.
    pub fn from_reference(&self, amount: f64) -> f64 {
        amount * self.coins_per_unit.get() as f64
    }

    /// Whole coins worth `amount` reference units, rounded down.
    ///
    /// Products that land a hair below an integer through binary rounding
    /// (`0.29 * 100 = 28.999…`) count as that integer. Fails for negative,
    /// non-finite, or out-of-range amounts.
    ///
    /// ```
    /// use payshare_core::CurrencyConverter;
    /// let fx = CurrencyConverter::default();
    /// assert_eq!(fx.whole_coins(0.29).unwrap(), 29);
    /// assert_eq!(fx.whole_coins(20.755).unwrap(), 2_075);
    /// assert!(fx.whole_coins(f64::NAN).is_err());
    /// ```
    pub fn whole_coins(&self, amount: f64) -> Result<u64, AmountError> {
        if !amount.is_finite() {
            return Err(AmountError::InvalidAmount(format!("non-finite reference amount {amount}")));
        }
        if amount < 0.0 {
            return Err(AmountError::InvalidAmount(format!("negative reference amount {amount}")));
        }
        let exact = self.from_reference(amount);
        let nearest = exact.round();
        let tolerance = EPSILON.max(exact * 1e-15);
        let coins = if (exact - nearest).abs() <= tolerance { nearest } else { exact.floor() };
        if coins >= u64::MAX as f64 {
            return Err(AmountError::InvalidAmount(format!("reference amount {amount} overflows coin range")));
        }
        Ok(coins as u64)
    }
}
