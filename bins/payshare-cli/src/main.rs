//! payshare — Command-line front end for creator reward scoring.
//!
//! Scores metric sets, runs reward payouts into an in-memory ledger and
//! prints borrow and withdrawal quotes. Configuration is loaded once at
//! start-up (defaults, TOML file, `PAYSHARE_*` environment).

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use payshare_core::persona::Persona;
use payshare_core::quote::{BorrowQuote, WithdrawMode, WithdrawQuote};
use payshare_core::types::{CreatorId, MetricSet};
use payshare_ledger::LedgerBook;
use payshare_payout::{PayoutConfig, PayoutEngine};

#[derive(Parser)]
#[command(name = "payshare")]
#[command(version, about = "Creator revenue-share scoring and coin ledger.")]
struct Cli {
    /// Config file (TOML). Defaults to <config_dir>/payshare/payshare.toml.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level filter, overrides the config file.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format ("text" or "json"), overrides the config file.
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single metric set.
    Score(ScoreArgs),
    /// Score every reference persona.
    Personas {
        /// Gross revenue used for the take-home column.
        #[arg(short, long, default_value = "50")]
        gross: f64,
    },
    /// Run payouts into a fresh ledger and print the result.
    Simulate(SimulateArgs),
    /// Quote a loan against a balance.
    QuoteBorrow {
        /// Requested amount in coins.
        #[arg(short, long)]
        amount: u64,
        /// Total coin balance. Defaults to the configured initial balance.
        #[arg(short, long)]
        balance: Option<u64>,
    },
    /// Quote a withdrawal of reference-currency units.
    QuoteWithdraw {
        #[arg(short, long)]
        amount: f64,
        /// "instant" or "monthly".
        #[arg(short, long, default_value = "instant", value_parser = parse_mode)]
        mode: WithdrawMode,
    },
}

#[derive(Args)]
struct ScoreArgs {
    /// Start from a reference persona instead of the defaults.
    #[arg(short, long)]
    persona: Option<Persona>,
    #[arg(long)]
    fraud_gate: Option<f64>,
    #[arg(long)]
    market_health: Option<f64>,
    #[arg(long)]
    category_weight: Option<f64>,
    #[arg(long)]
    content_quality: Option<f64>,
    #[arg(long)]
    interaction_quality: Option<f64>,
    #[arg(long)]
    immediate_engagement: Option<f64>,
    #[arg(long)]
    weekly_engagement: Option<f64>,
}

impl ScoreArgs {
    fn metrics(&self) -> MetricSet {
        let mut m = self.persona.map(|p| p.metrics()).unwrap_or_default();
        let overrides = [
            (&mut m.fraud_gate, self.fraud_gate),
            (&mut m.market_health, self.market_health),
            (&mut m.category_weight, self.category_weight),
            (&mut m.content_quality, self.content_quality),
            (&mut m.interaction_quality, self.interaction_quality),
            (&mut m.immediate_engagement, self.immediate_engagement),
            (&mut m.weekly_engagement, self.weekly_engagement),
        ];
        for (slot, value) in overrides {
            if let Some(v) = value {
                *slot = v;
            }
        }
        m
    }
}

#[derive(Args)]
struct SimulateArgs {
    #[arg(long, default_value = "creator-1")]
    creator: String,
    /// Gross revenue per payout, in reference units.
    #[arg(short, long, default_value = "50")]
    gross: f64,
    /// Personas to pay out, in order. Repeat or comma-separate.
    #[arg(short, long, value_delimiter = ',', default_value = "less-popular-high-quality")]
    persona: Vec<Persona>,
    /// Starting balance. Defaults to the configured initial balance.
    #[arg(long)]
    initial: Option<u64>,
    /// Coins to reinvest after the payouts.
    #[arg(long)]
    reinvest: Option<u64>,
    /// Coins to borrow after the payouts.
    #[arg(long)]
    borrow: Option<u64>,
    /// Coins to spend on a purchase after the payouts.
    #[arg(long)]
    purchase: Option<u64>,
    /// Coins to withdraw after the payouts.
    #[arg(long)]
    withdraw: Option<u64>,
}

fn parse_mode(s: &str) -> Result<WithdrawMode, String> {
    match s {
        "instant" => Ok(WithdrawMode::Instant),
        "monthly" => Ok(WithdrawMode::Monthly),
        other => Err(format!("unknown withdraw mode '{other}', expected instant or monthly")),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = PayoutConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format.clone() {
        config.log_format = format;
    }
    config.validate().context("invalid configuration")?;

    init_logging(&config.log_level, &config.log_format);
    tracing::debug!(coins_per_unit = config.coins_per_unit, "cli: configuration loaded");

    let engine = PayoutEngine::from_config(&config).context("failed to build payout engine")?;

    match cli.command {
        Commands::Score(args) => cmd_score(&engine, &args, cli.json),
        Commands::Personas { gross } => cmd_personas(&engine, gross, cli.json),
        Commands::Simulate(args) => cmd_simulate(&engine, &config, &args, cli.json),
        Commands::QuoteBorrow { amount, balance } => {
            cmd_quote_borrow(amount, balance.unwrap_or(config.initial_coins), cli.json)
        }
        Commands::QuoteWithdraw { amount, mode } => cmd_quote_withdraw(amount, mode, cli.json),
    }
}

fn cmd_score(engine: &PayoutEngine, args: &ScoreArgs, as_json: bool) -> Result<()> {
    let metrics = args.metrics();
    let result = engine.model().compute(&metrics);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&json!({ "metrics": metrics, "result": result }))?);
        return Ok(());
    }

    println!("Base score:        {:.4}", result.base);
    println!("AI-adjusted score: {:.4}", result.ai_adjusted);
    println!("Temporal score:    {:.4}", result.temporal);
    println!("Raw score:         {:.4}", result.raw_score);
    if result.gate_blocked {
        println!("Reward:            0.0% (blocked by fraud gate)");
    } else {
        println!("Reward:            {:.1}%", result.percent());
    }
    Ok(())
}

fn cmd_personas(engine: &PayoutEngine, gross: f64, as_json: bool) -> Result<()> {
    let mut rows = Vec::with_capacity(Persona::ALL.len());
    for persona in Persona::ALL {
        let preview = engine
            .preview(gross, &persona.metrics())
            .with_context(|| format!("failed to score persona {persona}"))?;
        rows.push((persona, preview));
    }

    if as_json {
        let out: Vec<_> = rows
            .iter()
            .map(|(p, preview)| json!({ "persona": p, "label": p.label(), "preview": preview }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{:<28} {:>8} {:>12} {:>10}", "Persona", "Reward", "Take-home", "Coins");
    for (persona, preview) in &rows {
        println!(
            "{:<28} {:>7.1}% {:>12} {:>10}",
            persona.label(),
            preview.reward.percent(),
            format!("${:.2}", preview.creator_share),
            preview.coins
        );
    }
    Ok(())
}

fn cmd_simulate(engine: &PayoutEngine, config: &PayoutConfig, args: &SimulateArgs, as_json: bool) -> Result<()> {
    if args.persona.is_empty() {
        bail!("at least one persona is required");
    }

    let book = LedgerBook::new();
    let creator = CreatorId::new(args.creator.as_str());
    book.open(creator.clone(), args.initial.unwrap_or(config.initial_coins))
        .context("failed to open ledger")?;

    let mut payouts = Vec::with_capacity(args.persona.len());
    for persona in &args.persona {
        let outcome = engine
            .payout(&book, &creator, args.gross, &persona.metrics())
            .with_context(|| format!("payout for persona {persona} failed"))?;
        payouts.push(outcome);
    }

    if let Some(amount) = args.reinvest {
        book.reinvest(&creator, amount, None).context("reinvest failed")?;
    }
    if let Some(amount) = args.borrow {
        book.borrow(&creator, amount, None).context("borrow failed")?;
    }
    if let Some(amount) = args.purchase {
        book.purchase(&creator, amount, None).context("purchase failed")?;
    }
    if let Some(amount) = args.withdraw {
        book.withdraw(&creator, amount, None).context("withdraw failed")?;
    }

    let balance = book.balance(&creator)?;
    let history = book.transactions(&creator)?;

    if as_json {
        let out = json!({
            "creator": creator,
            "payouts": payouts,
            "balance": balance,
            "available_coins": balance.available_coins(),
            "transactions": history,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for outcome in &payouts {
        println!(
            "payout: {:.1}% of ${:.2} -> {} coins",
            outcome.preview.reward.percent(),
            outcome.preview.gross_revenue,
            outcome.credited_coins
        );
    }
    println!();
    println!("Creator:    {creator}");
    println!("Total:      {} coins", balance.total_coins);
    println!("Available:  {} coins", balance.available_coins());
    println!("Invested:   {} coins", balance.invested_coins);
    println!("Borrowed:   {} coins", balance.borrowed_coins);
    println!();
    println!("Transactions (most recent first):");
    for tx in &history {
        println!(
            "  {}  {}  {:<9} {:>10}  {}",
            tx.id,
            tx.timestamp.format("%Y-%m-%d %H:%M:%S"),
            tx.kind.as_str(),
            tx.amount,
            tx.description
        );
    }
    Ok(())
}

fn cmd_quote_borrow(amount: u64, total_coins: u64, as_json: bool) -> Result<()> {
    let quote = BorrowQuote::for_amount(amount, total_coins);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
        return Ok(());
    }

    println!("Amount:           {} coins", quote.amount);
    println!("Borrow limit:     {} coins", quote.limit);
    if !quote.within_limit {
        println!("                  (amount exceeds the limit)");
    }
    println!("Monthly rate:     {:.1}%", quote.monthly_rate_percent);
    println!("Term:             {} months", quote.term_months);
    println!("Monthly payment:  {} coins", quote.monthly_payment);
    println!("Total repayment:  {} coins", quote.total_repayment);
    println!("Total interest:   {} coins", quote.total_interest());
    Ok(())
}

fn cmd_quote_withdraw(amount: f64, mode: WithdrawMode, as_json: bool) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        bail!("withdrawal amount must be a non-negative number");
    }
    let quote = WithdrawQuote::for_amount(amount, mode);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
        return Ok(());
    }

    println!("Amount:   ${:.2}", quote.amount);
    match quote.mode {
        WithdrawMode::Instant => println!("Fee:      ${:.2}", quote.fee),
        WithdrawMode::Monthly => println!("Bonus:    ${:.2}", quote.bonus),
    }
    println!("You get:  ${:.2}", quote.net);
    if !quote.meets_minimum {
        println!("Below the minimum withdrawal.");
    }
    Ok(())
}

fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    // Logs go to stderr so command output stays parseable.
    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .init();
    }
}
