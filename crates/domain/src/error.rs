//! Common error types used across the workspace.
//!
//! Each failure class gets its own typed error; [`BridgeError`] is the
//! umbrella the application layer returns, with `#[from]` conversions so
//! call sites can use `?` across layers.

/// Umbrella error for bridge operations.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A read was requested for a capability with no current value.
    #[error(transparent)]
    MissingValue(#[from] MissingValueError),

    /// No capability map applies to the device.
    #[error(transparent)]
    NotMapped(#[from] NotMappedError),

    /// A sub-feature could not be constructed.
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    /// Exposure ledger persistence failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The device rejected a value write.
    #[error(transparent)]
    Device(#[from] DeviceWriteError),
}

/// A read was requested for a capability the device reports no value for.
///
/// This must be surfaced to the target protocol as a failed read, never
/// silently defaulted.
#[derive(Debug, thiserror::Error)]
#[error("no current value for capability `{capability}`")]
pub struct MissingValueError {
    /// Full capability name (`base` or `base.group`).
    pub capability: String,
}

/// No capability map covers the device's class.
#[derive(Debug, thiserror::Error)]
#[error("device `{device}` is not covered by any capability map")]
pub struct NotMappedError {
    /// Source-platform device identifier.
    pub device: String,
}

/// A sub-feature (service, controller) could not be constructed.
#[derive(Debug, thiserror::Error)]
#[error("failed to construct {what}: {reason}")]
pub struct ConstructionError {
    /// What was being constructed.
    pub what: &'static str,
    /// Why it failed.
    pub reason: String,
}

/// Exposure ledger persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Reading or writing the snapshot file failed.
    #[error("ledger storage error")]
    Io(#[from] std::io::Error),
    /// The snapshot was not a valid JSON object of booleans.
    #[error("ledger snapshot is malformed")]
    Format(#[from] serde_json::Error),
}

/// The device refused or errored on a value write.
#[derive(Debug, thiserror::Error)]
#[error("device rejected write to `{capability}`: {reason}")]
pub struct DeviceWriteError {
    /// Full capability name the write targeted.
    pub capability: String,
    /// Device-reported reason.
    pub reason: String,
}
