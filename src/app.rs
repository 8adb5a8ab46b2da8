//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and reads configuration
//! - initializes logging
//! - builds and validates the schedule registry (once, before any request)
//! - dispatches to the subcommand

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, CompareArgs, HandleArgs, SchedulesArgs, SweepArgs};
use crate::config::{AppConfig, DEFAULT_LOG_FILTER};
use crate::engine::Calculator;
use crate::error::{AppError, EXIT_USAGE};
use crate::handler;
use crate::normalize::{RawProfile, normalize};
use crate::registry::FeeScheduleRegistry;
use crate::report::{format_comparison, format_schedules, format_sweep, render_bars};
use crate::sweep::{SweepSpec, run_sweep, write_sweep_csv};

/// Entry point for the `leak` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    let config = AppConfig::from_env().with_overrides(cli.schedules.clone(), cli.log.clone());
    init_logging(&config.log_filter);

    let calculator = startup(&config)?;

    match cli.command {
        Command::Compare(args) => handle_compare(&calculator, &args),
        Command::Handle(args) => handle_request(&calculator, &args),
        Command::Schedules(args) => handle_schedules(&calculator, &args),
        Command::Sweep(args) => handle_sweep(&calculator, &args),
    }
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A subscriber may already be installed (tests); keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Build the registry, run its self-check, and freeze it behind an `Arc`.
///
/// Nothing is served when this fails.
pub fn startup(config: &AppConfig) -> Result<Calculator, AppError> {
    let registry = match &config.schedules_path {
        Some(path) => FeeScheduleRegistry::from_json_file(path),
        None => FeeScheduleRegistry::builtin(),
    }
    .map_err(|err| {
        error!(error = %err, "refusing to start: schedule table failed validation");
        AppError::from(err)
    })?;

    Ok(Calculator::new(Arc::new(registry)))
}

fn handle_compare(calculator: &Calculator, args: &CompareArgs) -> Result<(), AppError> {
    let raw = RawProfile::from_parts(
        args.mrr,
        &args.processor,
        args.profile.international_percent,
        args.profile.eu_percent,
        args.profile.failed_payment_rate,
    );

    if args.json {
        let body = serde_json::json!({
            "mrr": raw.mrr,
            "processor": raw.processor,
            "international_percent": raw.international_percent,
            "eu_percent": raw.eu_percent,
            "failed_payment_rate": raw.failed_payment_rate,
        });
        let response = handler::handle_value(calculator, body);
        println!("{}", to_json(&response, true)?);
        return Ok(());
    }

    let profile = normalize(&raw)?
        .ok_or_else(|| AppError::new(EXIT_USAGE, "MRR must be a number greater than zero."))?;
    let result = calculator.calculate(&profile);

    println!("{}", format_comparison(&profile, &result));
    if !args.no_chart {
        println!("{}", render_bars(&result, args.width));
    }
    Ok(())
}

fn handle_request(calculator: &Calculator, args: &HandleArgs) -> Result<(), AppError> {
    let body = read_request(args.input.as_deref())?;
    let response = handler::handle_json(calculator, &body);
    println!("{}", to_json(&response, args.pretty)?);
    Ok(())
}

fn handle_schedules(calculator: &Calculator, args: &SchedulesArgs) -> Result<(), AppError> {
    let registry = calculator.registry();
    if args.json {
        println!("{}", to_json(&registry.to_table(), true)?);
    } else {
        print!("{}", format_schedules(registry));
    }
    Ok(())
}

fn handle_sweep(calculator: &Calculator, args: &SweepArgs) -> Result<(), AppError> {
    let spec = SweepSpec {
        processors: args.processors.clone(),
        mrr_min: args.mrr_min,
        mrr_max: args.mrr_max,
        steps: args.steps,
        international_percent: args.profile.international_percent,
        eu_percent: args.profile.eu_percent,
        failed_payment_rate: args.profile.failed_payment_rate,
    };
    let rows = run_sweep(calculator, &spec)?;
    print!("{}", format_sweep(&rows));

    if let Some(path) = &args.export {
        write_sweep_csv(path, &rows)?;
    }
    Ok(())
}

/// Read a request body from a file, or from stdin when no path is given.
pub fn read_request(input: Option<&Path>) -> Result<String, AppError> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to read request '{}': {e}", path.display()))),
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to read request from stdin: {e}")))?;
            Ok(body)
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, AppError> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    out.map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to serialize JSON: {e}")))
}
