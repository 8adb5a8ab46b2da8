//! Command-line parsing for the revenue leakage calculator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the calculation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::ProcessorId;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "leak", version, about = "Payment-processing revenue leakage and savings calculator")]
pub struct Cli {
    /// JSON schedule table to use instead of the built-in one (overrides LEAKAGE_SCHEDULES).
    #[arg(long, global = true, value_name = "JSON")]
    pub schedules: Option<PathBuf>,

    /// Log filter, e.g. `info` or `leakage_calc=debug` (overrides LEAKAGE_LOG).
    #[arg(long, global = true, value_name = "FILTER")]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare one business profile against the reference provider.
    Compare(CompareArgs),
    /// Answer one JSON calculation request (file or stdin) with a JSON response.
    Handle(HandleArgs),
    /// Print the active fee schedule table.
    Schedules(SchedulesArgs),
    /// Sweep savings across an MRR range.
    Sweep(SweepArgs),
}

/// Business profile flags shared by `compare` and `sweep`.
#[derive(Debug, Args, Clone)]
pub struct ProfileArgs {
    /// Cross-border share of volume (%).
    #[arg(long = "international", default_value_t = 0.0, allow_negative_numbers = true)]
    pub international_percent: f64,

    /// Share of customers needing EU tax handling (%).
    #[arg(long = "eu", default_value_t = 0.0, allow_negative_numbers = true)]
    pub eu_percent: f64,

    /// Share of charge attempts that fail (%).
    #[arg(long = "failed", default_value_t = 0.0, allow_negative_numbers = true)]
    pub failed_payment_rate: f64,
}

#[derive(Debug, Parser, Clone)]
pub struct CompareArgs {
    /// Monthly recurring revenue.
    #[arg(long, allow_negative_numbers = true)]
    pub mrr: f64,

    /// Current payment processor (stripe, paypal, paddle, lemon).
    #[arg(short = 'p', long)]
    pub processor: String,

    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Print the JSON response instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Skip the bar chart.
    #[arg(long)]
    pub no_chart: bool,

    /// Bar chart width (columns).
    #[arg(long, default_value_t = 40)]
    pub width: usize,
}

#[derive(Debug, Parser, Clone)]
pub struct HandleArgs {
    /// Request body file; reads stdin when omitted.
    #[arg(long, value_name = "JSON")]
    pub input: Option<PathBuf>,

    /// Pretty-print the response.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct SchedulesArgs {
    /// Print the table as JSON (usable as a --schedules file).
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct SweepArgs {
    /// Processor(s) to sweep; all when omitted.
    #[arg(short = 'p', long = "processor", value_enum)]
    pub processors: Vec<ProcessorId>,

    /// Lowest MRR in the sweep.
    #[arg(long, default_value_t = 1_000.0)]
    pub mrr_min: f64,

    /// Highest MRR in the sweep.
    #[arg(long, default_value_t = 1_000_000.0)]
    pub mrr_max: f64,

    /// Number of log-spaced MRR points (at most 10000).
    #[arg(long, default_value_t = 7)]
    pub steps: usize,

    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Export rows to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}
