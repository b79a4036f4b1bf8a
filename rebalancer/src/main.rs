//! CLI entry point for the cashfill rebalancer.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use cashfill::Price;
use cashfill_rebalancer::config::Config;
use cashfill_rebalancer::plan::{self, RunOptions};
use cashfill_rebalancer::target::TargetSpec;

#[derive(Parser)]
#[command(name = "rebalancer")]
#[command(about = "Spend available cash toward target portfolio weights")]
#[command(version)]
struct Cli {
    /// Path to config.toml
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the units to buy with the available cash
    Plan {
        /// Path to weights.json
        weights: PathBuf,

        /// Simulated deposit in dollars, added to cash and equity
        #[arg(long, default_value_t = 0.0)]
        deposit: f64,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the current account snapshot
    Snapshot {
        /// Simulated deposit in dollars, added to cash and equity
        #[arg(long, default_value_t = 0.0)]
        deposit: f64,
    },

    /// Validate a weights file against the account's holdings
    Check {
        /// Path to weights.json
        weights: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };
    let tolerance = config.allocation.weight_sum_tolerance;

    let result = match cli.command {
        Command::Plan {
            weights,
            deposit,
            json,
        } => {
            let spec = load_weights(&weights, tolerance);
            let opts = RunOptions {
                weights_file: weights.display().to_string(),
                deposit: parse_deposit(deposit),
                json,
            };
            plan::run(&config, &spec, &opts)
        }
        Command::Snapshot { deposit } => plan::show_snapshot(&config, parse_deposit(deposit)),
        Command::Check { weights } => {
            let spec = load_weights(&weights, tolerance);
            plan::run_check(&config, &spec)
        }
    };

    if let Err(e) = result {
        match e.exit_code() {
            2 => eprintln!("Invalid input: {e}"),
            _ => eprintln!("Error: {e}"),
        }
        process::exit(e.exit_code());
    }
}

fn load_weights(path: &std::path::Path, tolerance: f64) -> TargetSpec {
    match TargetSpec::load(path, tolerance) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading weights: {e}");
            process::exit(e.exit_code());
        }
    }
}

fn parse_deposit(amount: f64) -> Price {
    match Price::from_decimal(amount) {
        Some(p) if p.0 >= 0 => p,
        _ => {
            eprintln!("Invalid deposit: {amount}");
            process::exit(2);
        }
    }
}
