//! Error types for the rebalancer.

use std::path::PathBuf;

use cashfill::AllocationError;
use cashfill_broker::ProviderError;

/// All errors that can occur during rebalancer operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("weights file error: {0}")]
    Target(String),

    #[error("failed to read weights file {path}: {source}")]
    TargetRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse weights JSON: {0}")]
    TargetParse(#[from] serde_json::Error),

    #[error("account data error: {0}")]
    Provider(#[from] ProviderError),

    #[error("allocation failed: {0}")]
    Allocation(#[from] AllocationError),

    #[error("failed to render plan: {0}")]
    Output(#[source] serde_json::Error),

    #[error("audit log error: {0}")]
    Audit(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Process exit code: 2 for invalid input (weights or allocation),
    /// 1 for everything else, including failing to read a file.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Target(_) | Error::TargetParse(_) | Error::Allocation(_) => 2,
            _ => 1,
        }
    }
}
