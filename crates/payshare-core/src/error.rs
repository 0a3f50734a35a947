//! Error types shared across Payshare crates.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("invalid amount: {0}")] InvalidAmount(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("non-finite parameter: {0}")] NonFinite(&'static str),
    #[error("negative weight: {0}")] NegativeWeight(&'static str),
    #[error("inverted range for {name}: min {min} > max {max}")] InvertedRange { name: &'static str, min: String, max: String },
    #[error("negative payout floor: {0}")] NegativeFloor(String),
    #[error("payout ceiling {0} exceeds 1.0")] CeilingTooHigh(String),
    #[error("non-positive scaler: {0}")] NonPositiveScaler(String),
    #[error("zero coins per reference unit")] ZeroRate,
}
