//! Plan orchestrator: snapshot → allocate → report.
//!
//! Nothing here places orders; the output is the list of units to buy.

use cashfill::{AccountSnapshot, AllocationEngine, AllocationResult, Price, WeightReport};
use cashfill_broker::{AccountProvider, Deposit, FileProvider};
use log::{info, warn};
use serde::Serialize;

use crate::audit::{self, AuditLog};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::target::TargetSpec;

/// Options for a plan run.
pub struct RunOptions {
    pub weights_file: String,
    /// Extra simulated deposit on top of the configured one
    pub deposit: Price,
    pub json: bool,
}

/// Everything a plan run produced.
#[derive(Debug, Clone)]
pub struct Plan {
    pub snapshot: AccountSnapshot,
    pub result: AllocationResult,
    pub report: WeightReport,
}

/// Snapshot provider from config, with the configured and extra deposits applied.
pub fn provider(config: &Config, extra_deposit: Price) -> Deposit<FileProvider> {
    Deposit::new(
        FileProvider::new(&config.account.snapshot),
        config.deposit() + extra_deposit,
    )
}

/// Allocation engine with the configured fill bound.
pub fn engine(config: &Config) -> AllocationEngine {
    AllocationEngine::with_max_budget(config.allocation.max_budget_cents)
}

/// Fetch the snapshot and allocate its cash, recording each step in `audit`.
pub fn compute_plan(
    provider: &dyn AccountProvider,
    spec: &TargetSpec,
    engine: &AllocationEngine,
    audit: &mut AuditLog,
) -> Result<Plan> {
    let snapshot = provider.account_snapshot()?;
    audit::log_snapshot(audit, &snapshot)?;
    info!(
        "snapshot: {} holdings, cash {}, equity {}",
        snapshot.holdings.len(),
        snapshot.cash,
        snapshot.total_equity
    );

    let weights = spec.as_weights();
    let result = match engine.allocate_snapshot(&snapshot, &weights) {
        Ok(result) => result,
        Err(e) => {
            warn!("allocation rejected: {e}");
            audit::log_rejected(audit, &e)?;
            return Err(e.into());
        }
    };
    audit::log_allocation(audit, &result)?;

    let over = result.over_represented();
    if !over.is_empty() {
        info!(
            "over-represented (no proportional buy): {}",
            over.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", ")
        );
    }

    let report = WeightReport::new(
        snapshot.total_equity,
        &snapshot.holdings,
        &weights,
        &result,
    )?;

    Ok(Plan {
        snapshot,
        result,
        report,
    })
}

/// Execute a full plan run and print the result.
pub fn run(config: &Config, spec: &TargetSpec, opts: &RunOptions) -> Result<()> {
    let mut audit = AuditLog::open(&config.audit_path())?;
    audit::log_run_started(&mut audit, &opts.weights_file, &config.account.snapshot)?;

    let provider = provider(config, opts.deposit);
    if provider.amount().is_positive() {
        info!("planning with simulated deposit of {}", provider.amount());
    }

    let plan = compute_plan(&provider, spec, &engine(config), &mut audit)?;

    if opts.json {
        println!("{}", plan_json(&plan)?);
    } else {
        display_snapshot(&plan.snapshot);
        println!();
        print!("{}", plan.report);
        println!(
            "Tracking error after buying: {:.2} pp",
            plan.report.tracking_error_pct()
        );
    }
    Ok(())
}

/// Print the account data the provider returns.
pub fn show_snapshot(config: &Config, extra_deposit: Price) -> Result<()> {
    let snapshot = provider(config, extra_deposit).account_snapshot()?;
    display_snapshot(&snapshot);
    Ok(())
}

/// Validate a weights file against the snapshot's tickers without allocating.
pub fn run_check(config: &Config, spec: &TargetSpec) -> Result<()> {
    let snapshot = provider(config, Price::ZERO).account_snapshot()?;
    spec.check_against(&snapshot)?;
    println!(
        "OK: {} targets match {} holdings (weights sum to {:.6})",
        spec.targets.len(),
        snapshot.holdings.len(),
        spec.total()
    );
    Ok(())
}

// === Output ===

#[derive(Serialize)]
struct PlanOutput<'a> {
    cash: f64,
    equity: f64,
    orders: Vec<OrderRow<'a>>,
    remaining_cash: f64,
    tracking_error_pct: f64,
}

#[derive(Serialize)]
struct OrderRow<'a> {
    symbol: &'a str,
    held_units: u64,
    new_units: u64,
    proportional_units: u64,
    fill_units: u64,
    over_represented: bool,
    weight_pct: f64,
    target_pct: f64,
}

/// Machine-readable plan.
pub fn plan_json(plan: &Plan) -> Result<String> {
    let orders = plan
        .report
        .entries
        .iter()
        .map(|(ticker, entry)| {
            let phase = plan
                .result
                .breakdown
                .get(ticker)
                .copied()
                .unwrap_or_default();
            OrderRow {
                symbol: ticker.as_str(),
                held_units: entry.held_units,
                new_units: entry.additional_units,
                proportional_units: phase.proportional_units,
                fill_units: phase.fill_units,
                over_represented: phase.over_represented,
                weight_pct: entry.actual_weight_pct,
                target_pct: entry.target_weight_pct,
            }
        })
        .collect();

    let output = PlanOutput {
        cash: plan.snapshot.cash.as_decimal(),
        equity: plan.snapshot.total_equity.as_decimal(),
        orders,
        remaining_cash: plan.result.remaining_cash.as_decimal(),
        tracking_error_pct: plan.report.tracking_error_pct(),
    };
    serde_json::to_string_pretty(&output).map_err(Error::Output)
}

fn display_snapshot(snapshot: &AccountSnapshot) {
    println!(
        "Account: {} equity, {} cash",
        snapshot.total_equity, snapshot.cash
    );
    if snapshot.holdings.is_empty() {
        println!("No positions.");
        return;
    }

    let equity = snapshot.total_equity.0;
    println!("CURRENT PORTFOLIO:");
    for h in &snapshot.holdings {
        let value = h.market_value();
        let weight = match value {
            Some(v) if equity > 0 => v.0 as f64 / equity as f64,
            _ => 0.0,
        };
        println!(
            "  {:10} {:>6} @ {:>10} = {:>12}  ({:.1}%)",
            h.ticker,
            h.held_units,
            h.unit_price.to_string(),
            value.map_or_else(|| "overflow".to_string(), |v| v.to_string()),
            weight * 100.0,
        );
    }
}
