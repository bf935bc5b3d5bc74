//! # capbridge-app
//!
//! Application layer — the capability-mapping engine and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - [`ports::DeviceGateway`] — the source platform's device collaborator
//!   - [`ports::ExposureStore`] — persistence sink for the exposure ledger
//! - Partition device capabilities into groups ([`grouper`])
//! - Track and persist per-device exposure decisions ([`ledger`])
//! - Construct target accessories from capability maps ([`binder`], [`map`])
//! - Propagate values bidirectionally with debounce ([`debounce`])
//! - Own per-device lifecycle state ([`handle`])
//! - Model the target protocol's accessory/service/characteristic surface
//!   at its interface boundary ([`accessory`])
//!
//! ## Dependency rule
//! Depends on `capbridge-domain` only (plus `tokio::sync`/`tokio::time`
//! primitives). Never imports adapter crates. Adapters depend on *this*
//! crate, not the reverse.

pub mod accessory;
pub mod binder;
pub mod debounce;
pub mod grouper;
pub mod handle;
pub mod ledger;
pub mod map;
pub mod ports;
