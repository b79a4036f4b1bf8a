//! Provider error types.

use std::path::PathBuf;

/// Errors that can occur while fetching an account snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid snapshot: {0}")]
    Invalid(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}
