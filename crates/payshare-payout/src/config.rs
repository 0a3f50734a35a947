//! Payout configuration.
//!
//! [`PayoutConfig`] is assembled once at start-up from, in increasing
//! priority: built-in defaults, a TOML file, and `PAYSHARE_*` environment
//! variables (`PAYSHARE_COINS_PER_UNIT=100`, nested keys with a double
//! underscore: `PAYSHARE_REWARD__PAYOUT_FLOOR=0.05`). The result is
//! validated and then treated as immutable.

use std::num::NonZeroU64;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};

use payshare_core::constants::{COINS_PER_REFERENCE_UNIT, DEFAULT_INITIAL_COINS};
use payshare_core::error::ParamsError;
use payshare_core::{CurrencyConverter, RewardCalculator, RewardParams};

use crate::error::PayoutError;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "PAYSHARE";

/// Configuration for a payout engine instance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PayoutConfig {
    /// Coins per reference-currency unit.
    pub coins_per_unit: u64,
    /// Starting balance for newly opened ledgers.
    pub initial_coins: u64,
    /// Log level filter string (e.g. "info", "payshare_ledger=debug").
    pub log_level: String,
    /// Log output format, "text" or "json".
    pub log_format: String,
    /// Reward formula parameters.
    pub reward: RewardParams,
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            coins_per_unit: COINS_PER_REFERENCE_UNIT,
            initial_coins: DEFAULT_INITIAL_COINS,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            reward: RewardParams::default(),
        }
    }
}

impl PayoutConfig {
    /// Default config file location: `<config_dir>/payshare/payshare.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("payshare").join("payshare.toml"))
    }

    /// Load defaults, then `path` (or the default file if it exists), then
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, PayoutError> {
        Self::load_with_env(path, None)
    }

    /// [`load`](Self::load) with the environment layer read from `vars`
    /// instead of the process environment when `vars` is `Some`.
    fn load_with_env(path: Option<&Path>, vars: Option<Map<String, String>>) -> Result<Self, PayoutError> {
        let mut builder = Config::builder();
        match path {
            Some(p) => builder = builder.add_source(File::from(p).required(true)),
            None => {
                if let Some(p) = Self::default_path() {
                    builder = builder.add_source(File::from(p).required(false));
                }
            }
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(vars),
        );
        Self::finish(builder.build()?)
    }

    /// Load from a single TOML file on top of the defaults. No environment.
    pub fn from_file(path: &Path) -> Result<Self, PayoutError> {
        let cfg = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(true))
            .build()?;
        Self::finish(cfg)
    }

    /// Parse TOML text on top of the defaults. No environment.
    pub fn from_toml_str(toml: &str) -> Result<Self, PayoutError> {
        let cfg = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Self::finish(cfg)
    }

    fn finish(cfg: Config) -> Result<Self, PayoutError> {
        let parsed: PayoutConfig = cfg.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Reject a zero conversion rate, bad reward parameters and unknown
    /// log formats.
    pub fn validate(&self) -> Result<(), PayoutError> {
        if self.coins_per_unit == 0 {
            return Err(ParamsError::ZeroRate.into());
        }
        self.reward.validate()?;
        if !matches!(self.log_format.as_str(), "text" | "json") {
            return Err(PayoutError::Config(format!(
                "unknown log format: {}",
                self.log_format
            )));
        }
        Ok(())
    }

    pub fn converter(&self) -> Result<CurrencyConverter, PayoutError> {
        NonZeroU64::new(self.coins_per_unit)
            .map(CurrencyConverter::new)
            .ok_or_else(|| ParamsError::ZeroRate.into())
    }

    pub fn calculator(&self) -> Result<RewardCalculator, PayoutError> {
        Ok(RewardCalculator::new(self.reward)?)
    }
}
