//! Exposure store port — persistence sink for the exposure ledger.

use std::collections::BTreeMap;
use std::future::Future;

use capbridge_domain::error::LedgerError;

/// Persists the exposure ledger snapshot.
///
/// The snapshot is always read and written as one full JSON object whose
/// keys are device identifiers and whose values are booleans; an absent key
/// means "undecided".
pub trait ExposureStore: Send + Sync {
    /// Load the persisted snapshot. A missing snapshot loads as empty.
    fn load(&self) -> impl Future<Output = Result<BTreeMap<String, bool>, LedgerError>> + Send;

    /// Atomically replace the persisted snapshot with `snapshot`.
    fn save(
        &self,
        snapshot: &BTreeMap<String, bool>,
    ) -> impl Future<Output = Result<(), LedgerError>> + Send;
}
