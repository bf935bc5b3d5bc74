//! Mapped-device handle — per-device aggregate owning the constructed
//! accessory and its live subscriptions.
//!
//! The handle freezes the device's class and capability-name set at
//! construction; the device-watch collaborator compares a live device
//! against that snapshot to decide when to tear down and rebuild. The
//! binder itself never re-binds an existing handle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use capbridge_domain::device::DeviceClass;
use capbridge_domain::value::Value;

use crate::accessory::Accessory;
use crate::debounce::Subscription;
use crate::map::CapabilityMap;
use crate::ports::DeviceGateway;

/// Aggregate of one device and the capability maps that apply to it.
pub struct MappedDeviceHandle {
    device: Arc<dyn DeviceGateway>,
    maps: Vec<Arc<CapabilityMap>>,
    accessory: Option<Accessory>,
    subscriptions: Vec<Subscription>,
    class: DeviceClass,
    capability_snapshot: Vec<String>,
    cache: Arc<Mutex<HashMap<String, Value>>>,
}

impl MappedDeviceHandle {
    /// Create a handle, freezing the device's class and capability set.
    #[must_use]
    pub fn new(device: Arc<dyn DeviceGateway>) -> Self {
        let class = device.class();
        let mut capability_snapshot = device.capabilities();
        capability_snapshot.sort_unstable();
        Self {
            device,
            maps: Vec::new(),
            accessory: None,
            subscriptions: Vec::new(),
            class,
            capability_snapshot,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Append a capability map; maps bind in registration order.
    pub fn push_map(&mut self, map: Arc<CapabilityMap>) {
        self.maps.push(map);
    }

    /// The registered maps, in registration order.
    #[must_use]
    pub fn maps(&self) -> &[Arc<CapabilityMap>] {
        &self.maps
    }

    /// The wrapped device.
    #[must_use]
    pub fn device(&self) -> &Arc<dyn DeviceGateway> {
        &self.device
    }

    /// The constructed accessory, if [`bind`](crate::binder::bind) ran.
    #[must_use]
    pub fn accessory(&self) -> Option<&Accessory> {
        self.accessory.as_ref()
    }

    /// Device class frozen at construction.
    #[must_use]
    pub fn class(&self) -> &DeviceClass {
        &self.class
    }

    /// Local cached copy of a capability's device-side value.
    #[must_use]
    pub fn cached_value(&self, capability: &str) -> Option<Value> {
        self.cache
            .lock()
            .expect("capability cache lock")
            .get(capability)
            .cloned()
    }

    /// Whether the live device no longer matches the frozen snapshot.
    ///
    /// A drifted handle must be cleaned up and rebuilt by the caller.
    #[must_use]
    pub fn drifted(&self, class: &DeviceClass, capabilities: &[String]) -> bool {
        if *class != self.class {
            return true;
        }
        let mut sorted = capabilities.to_vec();
        sorted.sort_unstable();
        sorted != self.capability_snapshot
    }

    /// Tear down every active subscription and background controller.
    ///
    /// Pending debounce timers are cancelled, not merely ignored: no
    /// callback fires after this returns. Must be called before the handle
    /// is discarded.
    pub fn cleanup(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.cancel();
        }
        if let Some(accessory) = &self.accessory {
            for service in accessory.services() {
                service.detach_adaptive_lighting();
            }
        }
    }

    pub(crate) fn install(&mut self, accessory: Accessory, subscriptions: Vec<Subscription>) {
        self.accessory = Some(accessory);
        self.subscriptions = subscriptions;
    }

    pub(crate) fn cache(&self) -> Arc<Mutex<HashMap<String, Value>>> {
        Arc::clone(&self.cache)
    }
}
