//! Capability-to-characteristic binder — constructs the target accessory
//! for a device from its capability maps and wires the sync bridge.
//!
//! Failures local to one capability or sub-feature never abort binding of
//! the rest of the device; only accessory-level setup errors propagate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use capbridge_domain::characteristic::CharacteristicType;
use capbridge_domain::error::{BridgeError, MissingValueError, NotMappedError};
use capbridge_domain::value::Value;

use crate::accessory::adaptive::AdaptiveLightingController;
use crate::accessory::{Accessory, Characteristic, Service};
use crate::debounce::{Debouncer, Subscription};
use crate::grouper::CapabilityGroups;
use crate::handle::MappedDeviceHandle;
use crate::map::{Binding, BindingRole, CapabilityMap, ServiceEvent, Transform, UpdateEvent};
use crate::ports::{DeviceGateway, ValueCallback};

type ValueCache = Arc<Mutex<HashMap<String, Value>>>;

/// Construct (or return the already constructed) accessory for a handle.
///
/// Idempotent: a handle that already holds an accessory gets it back
/// unchanged — no duplicate services or listeners are ever created.
///
/// # Errors
///
/// Returns [`NotMappedError`] when no capability map was registered on the
/// handle.
#[tracing::instrument(skip(handle), fields(device = handle.device().id()))]
pub fn bind(handle: &mut MappedDeviceHandle) -> Result<Accessory, BridgeError> {
    if let Some(existing) = handle.accessory() {
        return Ok(existing.clone());
    }
    let device = Arc::clone(handle.device());
    if handle.maps().is_empty() {
        return Err(NotMappedError {
            device: device.id().to_string(),
        }
        .into());
    }

    let accessory = Accessory::new(device.id(), device.name());
    let visible = device.visible_capabilities();
    let groups = CapabilityGroups::from_visible(&visible);
    let flattened = groups.flatten();
    let capabilities = device.capabilities();
    let cache = handle.cache();
    let maps: Vec<Arc<CapabilityMap>> = handle.maps().to_vec();

    let mut subscriptions = Vec::new();
    for map in &maps {
        let group_set = if map.group { &groups } else { &flattened };
        bind_map(
            map,
            &device,
            &capabilities,
            &accessory,
            group_set,
            &cache,
            &mut subscriptions,
        );
    }

    tracing::debug!(
        services = accessory.services().len(),
        subscriptions = subscriptions.len(),
        "accessory constructed"
    );
    handle.install(accessory.clone(), subscriptions);
    Ok(accessory)
}

fn bind_map(
    map: &CapabilityMap,
    device: &Arc<dyn DeviceGateway>,
    capabilities: &[String],
    accessory: &Accessory,
    groups: &CapabilityGroups,
    cache: &ValueCache,
    subscriptions: &mut Vec<Subscription>,
) {
    let mut constructed: Vec<Service> = Vec::new();
    for (group_key, bases) in groups.iter() {
        // Resolved lazily so groups with no bindable capability create
        // no service at all.
        let mut service: Option<Service> = None;
        for base in bases {
            let Some((role, bindings)) = map.bindings_for(base) else {
                continue;
            };
            let full = CapabilityGroups::full_name(group_key, base);
            let verbatim = capabilities.iter().any(|c| c == &full);
            let svc = service.get_or_insert_with(|| {
                let svc = resolve_service(map, device, accessory, group_key);
                constructed.push(svc.clone());
                svc
            });
            for binding in bindings {
                bind_one(role, binding, &full, verbatim, device, svc, map, cache, subscriptions);
            }
        }
    }

    if map.adaptive_lighting {
        for service in constructed {
            attach_adaptive_lighting(&service);
        }
    }
}

/// Fetch or create the map's service for a group, running the lifecycle
/// hook exactly once at creation.
fn resolve_service(
    map: &CapabilityMap,
    device: &Arc<dyn DeviceGateway>,
    accessory: &Accessory,
    group_key: &str,
) -> Service {
    let created = accessory.find_service(map.service, group_key).is_none();
    let service = accessory.service(map.service, group_key);
    if created {
        if let Some(hook) = &map.on_service {
            hook(&ServiceEvent {
                service: service.clone(),
                device: Arc::clone(device),
            });
        }
    }
    service
}

#[allow(clippy::too_many_arguments)]
fn bind_one(
    role: BindingRole,
    binding: &Binding,
    full: &str,
    verbatim: bool,
    device: &Arc<dyn DeviceGateway>,
    service: &Service,
    map: &CapabilityMap,
    cache: &ValueCache,
    subscriptions: &mut Vec<Subscription>,
) {
    let characteristics: Vec<_> = binding
        .characteristics
        .iter()
        .map(|ty| service.characteristic(*ty))
        .collect();

    for characteristic in &characteristics {
        if role != BindingRole::Trigger {
            if let Some(get) = binding.get.clone() {
                install_read_handler(characteristic, get, full, verbatim, device);
            }
            if let Some(set) = binding.set.clone() {
                subscriptions.push(install_write_handler(
                    characteristic,
                    set,
                    binding,
                    full,
                    verbatim,
                    device,
                    cache,
                ));
            }
        }
        if let Some(hook) = map.on_update.clone() {
            let event_characteristic = characteristic.clone();
            let event_service = service.clone();
            let event_device = Arc::clone(device);
            let capability = full.to_string();
            characteristic.on_change(move |old, new| {
                hook(&UpdateEvent {
                    characteristic: event_characteristic.clone(),
                    old_value: old.clone(),
                    new_value: new.clone(),
                    service: event_service.clone(),
                    device: Arc::clone(&event_device),
                    capability: capability.clone(),
                });
            });
        }
    }

    if let Some(get) = binding.get.clone() {
        subscriptions.push(subscribe_device_changes(
            binding,
            get,
            full,
            verbatim,
            device,
            characteristics,
            cache,
        ));
    }
}

/// Read path: fetch the device's raw value, fail on a missing value,
/// transform via the getter. Validation happens in [`Characteristic::read`].
fn install_read_handler(
    characteristic: &Characteristic,
    get: Transform,
    full: &str,
    verbatim: bool,
    device: &Arc<dyn DeviceGateway>,
) {
    let device = Arc::clone(device);
    let capability = full.to_string();
    characteristic.on_read(move || {
        let device = Arc::clone(&device);
        let capability = capability.clone();
        let get = get.clone();
        async move {
            let raw = device
                .capability_value(&capability)
                .ok_or_else(|| MissingValueError {
                    capability: capability.clone(),
                })?;
            get.apply(verbatim, &raw)
                .ok_or_else(|| MissingValueError { capability }.into())
        }
    });
}

/// Write path: debounced per the binding; the device write is
/// fire-and-forget, rejections are logged and suppressed, and the local
/// cache optimistically takes the attempted value.
///
/// All writes for the capability funnel through one forwarding task, so
/// they reach the device in submission order.
fn install_write_handler(
    characteristic: &Characteristic,
    set: Transform,
    binding: &Binding,
    full: &str,
    verbatim: bool,
    device: &Arc<dyn DeviceGateway>,
    cache: &ValueCache,
) -> Subscription {
    let cache = Arc::clone(cache);
    let capability = full.to_string();

    let (queue, mut pending) = tokio::sync::mpsc::unbounded_channel::<Value>();
    let writer_device = Arc::clone(device);
    let writer_capability = capability.clone();
    let forwarder = tokio::spawn(async move {
        while let Some(device_value) = pending.recv().await {
            if let Err(err) = writer_device
                .request_capability_value(&writer_capability, device_value)
                .await
            {
                tracing::warn!(
                    capability = %writer_capability,
                    error = %err,
                    "device rejected write"
                );
            }
        }
    });

    let debouncer = Debouncer::from_interval(binding.debounce, move |value: Value| {
        let Some(device_value) = set.apply(verbatim, &value) else {
            return;
        };
        cache
            .lock()
            .expect("capability cache lock")
            .insert(capability.clone(), device_value.clone());
        // The receiver only goes away on cleanup; late writes are dropped.
        let _ = queue.send(device_value);
    });
    let write_debouncer = debouncer.clone();
    characteristic.on_write(move |value| {
        write_debouncer.call(value);
        async {}
    });
    Subscription::new(forwarder, debouncer)
}

/// Device → target path: each (debounced) raw value runs the getter for
/// every characteristic bound to the capability; the `None` sentinel skips
/// a characteristic, otherwise the validated value is pushed and the local
/// cache updated.
fn subscribe_device_changes(
    binding: &Binding,
    get: Transform,
    full: &str,
    verbatim: bool,
    device: &Arc<dyn DeviceGateway>,
    characteristics: Vec<Characteristic>,
    cache: &ValueCache,
) -> Subscription {
    let cache = Arc::clone(cache);
    let capability = full.to_string();
    let callback: ValueCallback = Box::new(move |raw: Value| {
        let mut pushed = false;
        for characteristic in &characteristics {
            if let Some(value) = get.apply(verbatim, &raw) {
                characteristic.update_value(&value);
                pushed = true;
            }
        }
        if pushed {
            cache
                .lock()
                .expect("capability cache lock")
                .insert(capability.clone(), raw.clone());
        }
    });
    device.on_capability_value(full, binding.debounce, callback)
}

fn attach_adaptive_lighting(service: &Service) {
    let has_brightness = service
        .find_characteristic(CharacteristicType::Brightness)
        .is_some();
    let has_color_temperature = service
        .find_characteristic(CharacteristicType::ColorTemperature)
        .is_some();
    if !(has_brightness && has_color_temperature) {
        tracing::debug!(
            service = %service.kind(),
            "adaptive lighting skipped; brightness or color temperature missing"
        );
        return;
    }
    match AdaptiveLightingController::attach(service) {
        Ok(controller) => service.set_adaptive_lighting(controller),
        Err(err) => tracing::warn!(error = %err, "adaptive lighting construction failed"),
    }
}
