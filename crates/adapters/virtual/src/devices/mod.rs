//! Simulated devices backing the virtual integration.
//!
//! Every device shares the same in-memory gateway implementation: a value
//! table plus a broadcast stream of capability changes. Accepted writes are
//! echoed back on the change stream, like a physical device reporting the
//! state it settled on.

pub mod button;
pub mod light;
pub mod sensor;
pub mod socket;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;

use capbridge_app::debounce::{Debouncer, Subscription};
use capbridge_app::ports::{DeviceGateway, ValueCallback};
use capbridge_domain::device::DeviceClass;
use capbridge_domain::error::DeviceWriteError;
use capbridge_domain::value::Value;

/// A simulated device with a fixed capability set.
pub struct VirtualDevice {
    id: String,
    name: String,
    class: DeviceClass,
    capabilities: Vec<String>,
    visible: Vec<String>,
    values: Mutex<HashMap<String, Value>>,
    changes: broadcast::Sender<(String, Value)>,
}

impl VirtualDevice {
    /// Start describing a device.
    #[must_use]
    pub fn builder(id: &str, name: &str, class: DeviceClass) -> VirtualDeviceBuilder {
        VirtualDeviceBuilder {
            id: id.to_string(),
            name: name.to_string(),
            class,
            capabilities: Vec::new(),
            visible: Vec::new(),
            values: HashMap::new(),
        }
    }

    /// Overwrite a capability value and announce the change, simulating a
    /// state change on the physical device.
    pub fn set_capability(&self, capability: &str, value: Value) {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(capability.to_string(), value.clone());
        let _ = self.changes.send((capability.to_string(), value));
    }

    /// Announce a capability event without storing a value. Used by trigger
    /// capabilities such as button presses.
    pub fn pulse_capability(&self, capability: &str, value: Value) {
        let _ = self.changes.send((capability.to_string(), value));
    }
}

#[async_trait::async_trait]
impl DeviceGateway for VirtualDevice {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn class(&self) -> DeviceClass {
        self.class.clone()
    }

    fn capabilities(&self) -> Vec<String> {
        self.capabilities.clone()
    }

    fn visible_capabilities(&self) -> Vec<String> {
        self.visible.clone()
    }

    fn capability_value(&self, capability: &str) -> Option<Value> {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(capability)
            .cloned()
    }

    async fn request_capability_value(
        &self,
        capability: &str,
        value: Value,
    ) -> Result<(), DeviceWriteError> {
        if !self.capabilities.iter().any(|c| c == capability) {
            return Err(DeviceWriteError {
                capability: capability.to_string(),
                reason: "unknown capability".to_string(),
            });
        }
        self.set_capability(capability, value);
        Ok(())
    }

    fn on_capability_value(
        &self,
        capability: &str,
        debounce: Duration,
        callback: ValueCallback,
    ) -> Subscription {
        let debouncer = Debouncer::from_interval(debounce, callback);
        let mut receiver = self.changes.subscribe();
        let wanted = capability.to_string();
        let feeder = debouncer.clone();
        let task = tokio::spawn(async move {
            while let Ok((name, value)) = receiver.recv().await {
                if name == wanted {
                    feeder.call(value);
                }
            }
        });
        Subscription::new(task, debouncer)
    }
}

/// Builder listing a device's capabilities in registration order.
pub struct VirtualDeviceBuilder {
    id: String,
    name: String,
    class: DeviceClass,
    capabilities: Vec<String>,
    visible: Vec<String>,
    values: HashMap<String, Value>,
}

impl VirtualDeviceBuilder {
    /// Add a visible capability with an initial value.
    #[must_use]
    pub fn capability(mut self, name: &str, initial: Value) -> Self {
        self.capabilities.push(name.to_string());
        self.visible.push(name.to_string());
        self.values.insert(name.to_string(), initial);
        self
    }

    /// Add a capability hidden from the exposed surface but still writable.
    #[must_use]
    pub fn hidden_capability(mut self, name: &str, initial: Value) -> Self {
        self.capabilities.push(name.to_string());
        self.values.insert(name.to_string(), initial);
        self
    }

    /// Add a visible capability that only ever fires events and holds no
    /// current value.
    #[must_use]
    pub fn trigger_capability(mut self, name: &str) -> Self {
        self.capabilities.push(name.to_string());
        self.visible.push(name.to_string());
        self
    }

    #[must_use]
    pub fn build(self) -> Arc<VirtualDevice> {
        let (changes, _) = broadcast::channel(16);
        Arc::new(VirtualDevice {
            id: self.id,
            name: self.name,
            class: self.class,
            capabilities: self.capabilities,
            visible: self.visible,
            values: Mutex::new(self.values),
            changes,
        })
    }
}
