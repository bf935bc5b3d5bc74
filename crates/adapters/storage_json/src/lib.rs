//! # capbridge-adapter-storage-json
//!
//! JSON-file persistence adapter — stores the exposure ledger snapshot as a
//! single pretty-printed JSON document.
//!
//! ## Responsibilities
//! - Implement the [`ExposureStore`] port defined in `capbridge-app`
//! - Write atomically: snapshot goes to a sibling staging file first, then a
//!   rename replaces the previous document, so a crash mid-write never leaves
//!   a truncated ledger behind
//!
//! ## Dependency rule
//! Depends on `capbridge-app` (for port traits) and `capbridge-domain` (for
//! domain types). The `app` and `domain` crates must never reference this
//! adapter.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use capbridge_app::ports::ExposureStore;
use capbridge_domain::error::LedgerError;

/// Exposure store backed by one JSON file on disk.
pub struct JsonExposureStore {
    path: PathBuf,
}

impl JsonExposureStore {
    /// Create a store writing to `path`. The file does not need to exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing JSON document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

impl ExposureStore for JsonExposureStore {
    async fn load(&self) -> Result<BTreeMap<String, bool>, LedgerError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no ledger file yet, starting empty");
                return Ok(BTreeMap::new());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn save(&self, snapshot: &BTreeMap<String, bool>) -> Result<(), LedgerError> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let staging = self.staging_path();
        tokio::fs::write(&staging, &bytes).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        tracing::debug!(path = %self.path.display(), entries = snapshot.len(), "ledger saved");
        Ok(())
    }
}
