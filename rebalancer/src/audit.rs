//! JSONL audit trail logging.
//!
//! Each rebalancer run appends events to an audit.jsonl file,
//! one JSON object per line.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use cashfill::{AccountSnapshot, AllocationError, AllocationResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;

/// An audit event written to the JSONL trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only audit logger.
pub struct AuditLog {
    writer: BufWriter<std::fs::File>,
}

impl AuditLog {
    /// Open (or create) the audit log file for appending.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Log an event with arbitrary JSON data.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let entry = AuditEvent {
            event,
            ts: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Log a simple event with no additional data.
    pub fn log_simple(&mut self, event: &'static str) -> Result<()> {
        self.log(event, serde_json::json!({}))
    }
}

/// Convenience: log a run start event.
pub fn log_run_started(audit: &mut AuditLog, weights_file: &str, snapshot: &str) -> Result<()> {
    audit.log(
        "run_started",
        serde_json::json!({
            "weights_file": weights_file,
            "snapshot": snapshot,
        }),
    )
}

/// Convenience: log the account data the plan is based on.
pub fn log_snapshot(audit: &mut AuditLog, snapshot: &AccountSnapshot) -> Result<()> {
    let holdings: Vec<_> = snapshot
        .holdings
        .iter()
        .map(|h| {
            serde_json::json!({
                "symbol": h.ticker.as_str(),
                "qty": h.held_units,
                "price": h.unit_price.as_decimal(),
            })
        })
        .collect();

    audit.log(
        "snapshot_fetched",
        serde_json::json!({
            "holdings": holdings,
            "cash": snapshot.cash.as_decimal(),
            "equity": snapshot.total_equity.as_decimal(),
        }),
    )
}

/// Convenience: log a computed allocation.
pub fn log_allocation(audit: &mut AuditLog, result: &AllocationResult) -> Result<()> {
    audit.log(
        "allocation_computed",
        serde_json::json!({
            "units": result.additional_units,
            "breakdown": result.breakdown,
            "remaining_cash": result.remaining_cash.as_decimal(),
        }),
    )
}

/// Convenience: log a rejected allocation.
pub fn log_rejected(audit: &mut AuditLog, err: &AllocationError) -> Result<()> {
    audit.log(
        "allocation_rejected",
        serde_json::json!({ "reason": err.to_string() }),
    )
}
