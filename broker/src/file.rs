//! JSON snapshot file provider.

use std::path::{Path, PathBuf};

use cashfill::AccountSnapshot;
use log::debug;

use crate::AccountProvider;
use crate::error::ProviderError;
use crate::types::SnapshotRecord;

/// Reads the account snapshot from a JSON file on every call.
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AccountProvider for FileProvider {
    fn account_snapshot(&self) -> Result<AccountSnapshot, ProviderError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| ProviderError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        let snapshot = SnapshotRecord::from_json(&contents)?.into_snapshot()?;
        debug!(
            "loaded snapshot from {}: {} positions, cash {}",
            self.path.display(),
            snapshot.holdings.len(),
            snapshot.cash
        );
        Ok(snapshot)
    }
}
