//! TOML configuration loading and validation.

use std::path::{Path, PathBuf};

use cashfill::{DEFAULT_MAX_BUDGET, Price};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub account: AccountConfig,
    #[serde(default)]
    pub allocation: AllocationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    /// Path to the JSON account snapshot.
    pub snapshot: String,
    /// Simulated deposit added to every snapshot, in dollars.
    #[serde(default)]
    pub deposit: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllocationConfig {
    #[serde(default = "default_max_budget")]
    pub max_budget_cents: u64,
    #[serde(default = "default_tolerance")]
    pub weight_sum_tolerance: f64,
}

fn default_max_budget() -> u64 {
    DEFAULT_MAX_BUDGET
}
fn default_tolerance() -> f64 {
    1e-4
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            max_budget_cents: default_max_budget(),
            weight_sum_tolerance: default_tolerance(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
}

fn default_log_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "audit.jsonl".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            audit_file: default_audit_file(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate from a TOML string.
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        if self.account.snapshot.is_empty() {
            return Err(Error::Config("account snapshot path must not be empty".into()));
        }
        if !self.account.deposit.is_finite() || self.account.deposit < 0.0 {
            return Err(Error::Config("deposit must be a non-negative amount".into()));
        }
        let max = self.allocation.max_budget_cents;
        if max == 0 || max > u64::from(u32::MAX) {
            return Err(Error::Config(format!(
                "max_budget_cents must be in 1..={}, got {max}",
                u32::MAX
            )));
        }
        let tol = self.allocation.weight_sum_tolerance;
        if !(0.0..1.0).contains(&tol) {
            return Err(Error::Config(format!(
                "weight_sum_tolerance must be in [0.0, 1.0), got {tol}"
            )));
        }
        Ok(())
    }

    /// Configured deposit in cents.
    pub fn deposit(&self) -> Price {
        Price::from_decimal(self.account.deposit).unwrap_or(Price::ZERO)
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> PathBuf {
        Path::new(&self.logging.dir).join(&self.logging.audit_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_toml() -> &'static str {
        r#"
[account]
snapshot = "account.json"
deposit = 3500.00

[allocation]
max_budget_cents = 5000000
weight_sum_tolerance = 0.001

[logging]
dir = "./logs"
audit_file = "audit.jsonl"
"#
    }

    #[test]
    fn parse_example_config() {
        let config = Config::from_toml(example_toml()).unwrap();
        assert_eq!(config.account.snapshot, "account.json");
        assert_eq!(config.deposit(), Price(3_500_00));
        assert_eq!(config.allocation.max_budget_cents, 5_000_000);
        assert_eq!(config.allocation.weight_sum_tolerance, 0.001);
    }

    #[test]
    fn defaults_for_optional_sections() {
        let config = Config::from_toml("[account]\nsnapshot = \"a.json\"\n").unwrap();
        assert_eq!(config.deposit(), Price::ZERO);
        assert_eq!(config.allocation.max_budget_cents, DEFAULT_MAX_BUDGET);
        assert_eq!(config.allocation.weight_sum_tolerance, 1e-4);
        assert_eq!(config.logging.audit_file, "audit.jsonl");
    }

    #[test]
    fn missing_account_section() {
        assert!(matches!(
            Config::from_toml("[allocation]\n"),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn validate_catches_zero_budget() {
        let toml = example_toml().replace("5000000", "0");
        assert!(matches!(Config::from_toml(&toml), Err(Error::Config(_))));
    }

    #[test]
    fn validate_catches_budget_over_slot_width() {
        let toml = example_toml().replace("5000000", "4294967296");
        assert!(matches!(Config::from_toml(&toml), Err(Error::Config(_))));
    }

    #[test]
    fn validate_catches_bad_tolerance() {
        let toml = example_toml().replace("0.001", "1.5");
        assert!(matches!(Config::from_toml(&toml), Err(Error::Config(_))));
    }

    #[test]
    fn validate_catches_negative_deposit() {
        let toml = example_toml().replace("3500.00", "-1.0");
        assert!(matches!(Config::from_toml(&toml), Err(Error::Config(_))));
    }

    #[test]
    fn audit_path() {
        let config = Config::from_toml(example_toml()).unwrap();
        assert_eq!(config.audit_path(), PathBuf::from("./logs/audit.jsonl"));
    }
}
