//! Scoring and ledger constants. Coin values are whole coins (`u64`),
//! reference-currency values are `f64` units (dollars in the default setup).

/// Coins per one unit of the reference currency (100 coins = 1 unit).
pub const COINS_PER_REFERENCE_UNIT: u64 = 100;

/// Tolerance for floating-point comparisons in clamping and validation.
pub const EPSILON: f64 = 1e-9;

/// Starting balance handed to a freshly opened demo account.
pub const DEFAULT_INITIAL_COINS: u64 = 12_547;

// ---------------------------------------------------------------------------
// Input ranges
// ---------------------------------------------------------------------------

/// Upper bound of `fraud_gate`. Values are clamped to `[0, 1]`.
pub const FRAUD_GATE_MAX: f64 = 1.0;

/// Upper bound of `market_health`.
pub const MARKET_HEALTH_MAX: f64 = 1.2;

/// Upper bound of `category_weight`.
pub const CATEGORY_WEIGHT_MAX: f64 = 1.2;

/// Upper bound of `content_quality` and `interaction_quality`.
pub const QUALITY_MAX: f64 = 1.0;

/// Upper bound of `immediate_engagement` and `weekly_engagement`.
pub const ENGAGEMENT_MAX: f64 = 1.0;

// ---------------------------------------------------------------------------
// Reward formula
// ---------------------------------------------------------------------------

/// Weight of market health in the base sub-score.
pub const W_MARKET_HEALTH: f64 = 0.5;
/// Weight of category weight in the base sub-score.
pub const W_CATEGORY_WEIGHT: f64 = 0.5;
/// Weight of content quality in the AI-adjusted sub-score.
pub const W_CONTENT_QUALITY: f64 = 0.5;
/// Weight of interaction quality in the AI-adjusted sub-score.
pub const W_INTERACTION_QUALITY: f64 = 0.5;
/// Weight of same-day engagement inside the temporal blend.
pub const W_IMMEDIATE_ENGAGEMENT: f64 = 0.3;
/// Weight of seven-day engagement inside the temporal blend.
pub const W_WEEKLY_ENGAGEMENT: f64 = 0.7;

/// Temporal multiplier with zero engagement. Full engagement reaches 1.0.
pub const TEMPORAL_FLOOR: f64 = 0.5;

/// Minimum reward fraction for any account that passes the fraud gate.
pub const REWARD_FLOOR: f64 = 0.10;

/// Maximum reward fraction.
pub const REWARD_CEILING: f64 = 0.70;

/// Global scaler: with base = 1.2, ai_adjusted = 1.0 and temporal = 1.0
/// the raw product lands exactly on [`REWARD_CEILING`].
///
/// ```
/// use payshare_core::constants::{REWARD_CEILING, REWARD_SCALER};
/// assert!((REWARD_SCALER * 1.2 - REWARD_CEILING).abs() < 1e-12);
/// assert!((REWARD_SCALER - 0.5833).abs() < 1e-4);
/// ```
pub const REWARD_SCALER: f64 = REWARD_CEILING / MARKET_HEALTH_MAX;

// ---------------------------------------------------------------------------
// Advisory quotes
// ---------------------------------------------------------------------------

/// Share of the current balance offered as a borrowing limit, in percent.
pub const BORROW_LIMIT_PERCENT: u64 = 30;

/// Repayment term of a loan, in months.
pub const BORROW_TERM_MONTHS: u64 = 6;

/// Monthly interest rate tiers as `(max_amount_inclusive, percent)`.
/// Amounts above the last bound use [`BORROW_TOP_RATE_PERCENT`].
pub const BORROW_RATE_TIERS: [(u64, f64); 3] = [(100, 4.0), (500, 4.5), (1_000, 5.0)];

/// Monthly interest rate for loans above every tier bound.
pub const BORROW_TOP_RATE_PERCENT: f64 = 5.5;

/// Fee charged on instant withdrawals (2%).
pub const INSTANT_WITHDRAW_FEE: f64 = 0.02;

/// Bonus paid on monthly scheduled withdrawals (1%).
pub const MONTHLY_WITHDRAW_BONUS: f64 = 0.01;

/// Smallest withdrawal accepted by the payout rails, in reference units.
pub const MIN_WITHDRAWAL: f64 = 20.0;
