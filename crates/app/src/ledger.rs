//! Exposure ledger — dirty-tracked, persisted per-device exposure decisions.
//!
//! Maps device identifier → "should be exposed". An absent entry means
//! "undecided". The ledger composes a plain ordered map with an explicit
//! dirty bit; a save flushes the entire snapshot through the
//! [`ExposureStore`] port and is skipped entirely when nothing changed.

use std::collections::BTreeMap;

use capbridge_domain::error::LedgerError;

use crate::ports::ExposureStore;

/// Persisted mapping from device identifier to exposure decision.
pub struct ExposureLedger<S> {
    entries: BTreeMap<String, bool>,
    dirty: bool,
    store: S,
}

impl<S: ExposureStore> ExposureLedger<S> {
    /// Load the ledger from its store.
    ///
    /// The ledger is clean immediately after a load, regardless of content.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the store cannot be read.
    #[tracing::instrument(skip(store))]
    pub async fn load(store: S) -> Result<Self, LedgerError> {
        let entries = store.load().await?;
        tracing::debug!(entries = entries.len(), "exposure ledger loaded");
        Ok(Self {
            entries,
            dirty: false,
            store,
        })
    }

    /// Exposure decision for a device, if one was recorded.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<bool> {
        self.entries.get(id).copied()
    }

    /// Whether any decision was recorded for the device.
    #[must_use]
    pub fn has(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Record an exposure decision.
    ///
    /// Setting a value equal to the stored one leaves the dirty bit
    /// untouched, so repeated no-op calls never cause persistence writes.
    pub fn set(&mut self, id: &str, exposed: bool) {
        if self.entries.get(id) == Some(&exposed) {
            return;
        }
        self.entries.insert(id.to_string(), exposed);
        self.dirty = true;
    }

    /// Forget the decision for a device. Deleting an absent key is a no-op.
    pub fn delete(&mut self, id: &str) {
        if self.entries.remove(id).is_some() {
            self.dirty = true;
        }
    }

    /// Apply one decision to every existing key, then save once.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the store cannot be written.
    pub async fn set_all(&mut self, exposed: bool) -> Result<(), LedgerError> {
        for value in self.entries.values_mut() {
            if *value != exposed {
                *value = exposed;
                self.dirty = true;
            }
        }
        self.save().await
    }

    /// Flush the full snapshot to the store if anything changed.
    ///
    /// A clean ledger performs no external write. A successful save clears
    /// the dirty bit.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the store cannot be written.
    #[tracing::instrument(skip(self))]
    pub async fn save(&mut self) -> Result<(), LedgerError> {
        if !self.dirty {
            return Ok(());
        }
        self.store.save(&self.entries).await?;
        self.dirty = false;
        tracing::debug!(entries = self.entries.len(), "exposure ledger saved");
        Ok(())
    }

    /// Whether there are unsaved mutations.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The in-memory snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &BTreeMap<String, bool> {
        &self.entries
    }
}
