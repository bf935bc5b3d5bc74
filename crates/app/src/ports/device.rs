//! Device port — the source platform's device collaborator.
//!
//! A gateway wraps one live device of the source automation platform. The
//! binder only ever talks to devices through this trait, so the engine can
//! be exercised against simulated devices in tests and demos.

use std::time::Duration;

use capbridge_domain::device::DeviceClass;
use capbridge_domain::error::DeviceWriteError;
use capbridge_domain::value::Value;

use crate::debounce::Subscription;

/// Callback invoked with each (debounced) capability value change.
pub type ValueCallback = Box<dyn Fn(Value) + Send + Sync>;

/// A live device exposed by the source platform.
///
/// The trait is dyn-compatible on purpose: gateways are stored as
/// `Arc<dyn DeviceGateway>` inside characteristic read/write handlers.
#[async_trait::async_trait]
pub trait DeviceGateway: Send + Sync {
    /// Opaque identifier, stable across restarts.
    fn id(&self) -> &str;

    /// Human-readable display name.
    fn name(&self) -> &str;

    /// Coarse device classification, used to match capability maps.
    fn class(&self) -> DeviceClass;

    /// The device's full raw capability name set.
    fn capabilities(&self) -> Vec<String>;

    /// Capabilities surfaced by the device's UI component list.
    ///
    /// A capability can exist without being user-visible; only visible
    /// capabilities take part in grouping.
    fn visible_capabilities(&self) -> Vec<String>;

    /// Current raw value of a capability, if the device reports one.
    fn capability_value(&self, capability: &str) -> Option<Value>;

    /// Ask the device to accept a new capability value.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceWriteError`] when the device refuses the write. The
    /// binder logs and suppresses such rejections.
    async fn request_capability_value(
        &self,
        capability: &str,
        value: Value,
    ) -> Result<(), DeviceWriteError>;

    /// Subscribe to the capability's value-change stream.
    ///
    /// The adapter debounces deliveries by `debounce` (zero means every
    /// change is delivered immediately) before invoking `callback`. The
    /// returned [`Subscription`] stops all deliveries when cancelled,
    /// including a pending debounce timer.
    fn on_capability_value(
        &self,
        capability: &str,
        debounce: Duration,
        callback: ValueCallback,
    ) -> Subscription;
}
