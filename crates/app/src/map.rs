//! Capability maps — declarative descriptions of how device capabilities
//! correspond to target services and characteristics.
//!
//! Maps are authored per device class by an external catalog and consumed
//! here. Binding lists are ordered `Vec`s on purpose: the binder's
//! iteration order is part of the contract, not an accident of hash maps.

use std::sync::Arc;
use std::time::Duration;

use capbridge_domain::characteristic::CharacteristicType;
use capbridge_domain::device::DeviceClass;
use capbridge_domain::service::ServiceType;
use capbridge_domain::value::Value;

use crate::accessory::{Characteristic, Service};
use crate::ports::DeviceGateway;

/// Value transform between device capability space and characteristic space.
///
/// Returns `None` as the designated "no value" sentinel: the bridge skips
/// the update (one-way mappings, values not currently meaningful).
pub type TransformFn = dyn Fn(&Value) -> Option<Value> + Send + Sync;

/// A getter or setter with an optional synonym fallback.
///
/// The primary variant applies when the computed capability name is found
/// verbatim among the device's own capabilities; the fallback handles
/// devices that expose a synonym name instead.
#[derive(Clone)]
pub struct Transform {
    primary: Arc<TransformFn>,
    fallback: Option<Arc<TransformFn>>,
}

impl Transform {
    /// Single-variant transform.
    pub fn new(f: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static) -> Self {
        Self {
            primary: Arc::new(f),
            fallback: None,
        }
    }

    /// Transform with a synonym fallback variant.
    pub fn with_fallback(
        primary: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static,
        fallback: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            primary: Arc::new(primary),
            fallback: Some(Arc::new(fallback)),
        }
    }

    /// Apply the variant selected by `verbatim` (primary when the
    /// capability name matched verbatim, or when no fallback exists).
    #[must_use]
    pub fn apply(&self, verbatim: bool, value: &Value) -> Option<Value> {
        match (&self.fallback, verbatim) {
            (Some(fallback), false) => fallback(value),
            _ => (self.primary)(value),
        }
    }
}

/// How a capability participates in a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingRole {
    /// Core capability of the service.
    Required,
    /// Bound when present, ignored otherwise.
    Optional,
    /// Event source only — no read/write handlers are installed.
    Trigger,
}

/// One capability → characteristic(s) binding.
#[derive(Clone)]
pub struct Binding {
    /// Characteristic types to create for the capability.
    pub characteristics: Vec<CharacteristicType>,
    /// Raw device value → characteristic value.
    pub get: Option<Transform>,
    /// Characteristic value → device value.
    pub set: Option<Transform>,
    /// Debounce interval for both sync directions. Zero (the default)
    /// means leading-edge: every update propagates immediately.
    pub debounce: Duration,
}

impl Binding {
    /// Binding creating a single characteristic.
    #[must_use]
    pub fn new(characteristic: CharacteristicType) -> Self {
        Self {
            characteristics: vec![characteristic],
            get: None,
            set: None,
            debounce: Duration::ZERO,
        }
    }

    /// Binding creating several characteristics fed by the same capability.
    #[must_use]
    pub fn many(characteristics: Vec<CharacteristicType>) -> Self {
        Self {
            characteristics,
            get: None,
            set: None,
            debounce: Duration::ZERO,
        }
    }

    /// Install a getter.
    #[must_use]
    pub fn get(mut self, f: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static) -> Self {
        self.get = Some(Transform::new(f));
        self
    }

    /// Install a getter with a synonym fallback.
    #[must_use]
    pub fn get_with_fallback(
        mut self,
        primary: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static,
        fallback: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        self.get = Some(Transform::with_fallback(primary, fallback));
        self
    }

    /// Install a setter.
    #[must_use]
    pub fn set(mut self, f: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static) -> Self {
        self.set = Some(Transform::new(f));
        self
    }

    /// Install a setter with a synonym fallback.
    #[must_use]
    pub fn set_with_fallback(
        mut self,
        primary: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static,
        fallback: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        self.set = Some(Transform::with_fallback(primary, fallback));
        self
    }

    /// Set the debounce interval.
    #[must_use]
    pub fn debounce(mut self, interval: Duration) -> Self {
        self.debounce = interval;
        self
    }
}

/// Context handed to the service lifecycle hook.
pub struct ServiceEvent {
    pub service: Service,
    pub device: Arc<dyn DeviceGateway>,
}

/// Context handed to the value-change hook.
pub struct UpdateEvent {
    pub characteristic: Characteristic,
    pub old_value: Value,
    pub new_value: Value,
    pub service: Service,
    pub device: Arc<dyn DeviceGateway>,
    /// Full capability name (`base` or `base.group`).
    pub capability: String,
}

/// Hook invoked once per constructed service.
pub type ServiceHook = Arc<dyn Fn(&ServiceEvent) + Send + Sync>;

/// Hook invoked on every bound characteristic value transition.
pub type UpdateHook = Arc<dyn Fn(&UpdateEvent) + Send + Sync>;

/// Declarative map from capability names to target characteristics for one
/// device class.
#[derive(Clone)]
pub struct CapabilityMap {
    /// Device classes this map applies to.
    pub classes: Vec<DeviceClass>,
    /// Whether each capability group gets its own service instance
    /// (`true`) or groups are flattened into one (`false`).
    pub group: bool,
    /// Target service type to construct.
    pub service: ServiceType,
    /// Attach an adaptive-lighting controller when possible.
    pub adaptive_lighting: bool,
    required: Vec<(String, Vec<Binding>)>,
    optional: Vec<(String, Vec<Binding>)>,
    triggers: Vec<(String, Vec<Binding>)>,
    pub on_service: Option<ServiceHook>,
    pub on_update: Option<UpdateHook>,
}

impl CapabilityMap {
    /// Start building a map targeting `service`.
    #[must_use]
    pub fn builder(service: ServiceType) -> CapabilityMapBuilder {
        CapabilityMapBuilder {
            map: Self {
                classes: Vec::new(),
                group: false,
                service,
                adaptive_lighting: false,
                required: Vec::new(),
                optional: Vec::new(),
                triggers: Vec::new(),
                on_service: None,
                on_update: None,
            },
        }
    }

    /// Whether this map applies to the given device class.
    #[must_use]
    pub fn applies_to(&self, class: &DeviceClass) -> bool {
        self.classes.contains(class)
    }

    /// Bindings for a base capability, honouring the required → optional →
    /// triggers priority; only the first match counts.
    #[must_use]
    pub fn bindings_for(&self, base: &str) -> Option<(BindingRole, &[Binding])> {
        let lists = [
            (BindingRole::Required, &self.required),
            (BindingRole::Optional, &self.optional),
            (BindingRole::Trigger, &self.triggers),
        ];
        for (role, list) in lists {
            if let Some((_, bindings)) = list.iter().find(|(name, _)| name == base) {
                return Some((role, bindings.as_slice()));
            }
        }
        None
    }
}

/// Builder for [`CapabilityMap`].
pub struct CapabilityMapBuilder {
    map: CapabilityMap,
}

impl CapabilityMapBuilder {
    /// Add a device class this map applies to.
    #[must_use]
    pub fn class(mut self, class: DeviceClass) -> Self {
        self.map.classes.push(class);
        self
    }

    /// Give each capability group its own service instance.
    #[must_use]
    pub fn grouped(mut self) -> Self {
        self.map.group = true;
        self
    }

    /// Request an adaptive-lighting controller for constructed services.
    #[must_use]
    pub fn adaptive_lighting(mut self) -> Self {
        self.map.adaptive_lighting = true;
        self
    }

    /// Add a required binding for a base capability.
    #[must_use]
    pub fn required(mut self, capability: &str, binding: Binding) -> Self {
        push_binding(&mut self.map.required, capability, binding);
        self
    }

    /// Add an optional binding for a base capability.
    #[must_use]
    pub fn optional(mut self, capability: &str, binding: Binding) -> Self {
        push_binding(&mut self.map.optional, capability, binding);
        self
    }

    /// Add a trigger binding for a base capability.
    #[must_use]
    pub fn trigger(mut self, capability: &str, binding: Binding) -> Self {
        push_binding(&mut self.map.triggers, capability, binding);
        self
    }

    /// Install the once-per-constructed-service hook.
    #[must_use]
    pub fn on_service(mut self, hook: impl Fn(&ServiceEvent) + Send + Sync + 'static) -> Self {
        self.map.on_service = Some(Arc::new(hook));
        self
    }

    /// Install the per-value-change hook.
    #[must_use]
    pub fn on_update(mut self, hook: impl Fn(&UpdateEvent) + Send + Sync + 'static) -> Self {
        self.map.on_update = Some(Arc::new(hook));
        self
    }

    /// Finish the map.
    #[must_use]
    pub fn build(self) -> CapabilityMap {
        self.map
    }
}

fn push_binding(list: &mut Vec<(String, Vec<Binding>)>, capability: &str, binding: Binding) {
    match list.iter_mut().find(|(name, _)| name == capability) {
        Some((_, bindings)) => bindings.push(binding),
        None => list.push((capability.to_string(), vec![binding])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_honour_priority_order_for_duplicate_capabilities() {
        let map = CapabilityMap::builder(ServiceType::Switch)
            .class(DeviceClass::Socket)
            .optional("onoff", Binding::new(CharacteristicType::OutletInUse))
            .required("onoff", Binding::new(CharacteristicType::On))
            .build();

        let (role, bindings) = map.bindings_for("onoff").unwrap();
        assert_eq!(role, BindingRole::Required);
        assert_eq!(bindings[0].characteristics, vec![CharacteristicType::On]);
    }

    #[test]
    fn should_return_none_for_unbound_capability() {
        let map = CapabilityMap::builder(ServiceType::Switch)
            .required("onoff", Binding::new(CharacteristicType::On))
            .build();
        assert!(map.bindings_for("dim").is_none());
    }

    #[test]
    fn should_collect_multiple_bindings_for_one_capability() {
        let map = CapabilityMap::builder(ServiceType::Outlet)
            .required("onoff", Binding::new(CharacteristicType::On))
            .required("onoff", Binding::new(CharacteristicType::OutletInUse))
            .build();

        let (_, bindings) = map.bindings_for("onoff").unwrap();
        assert_eq!(bindings.len(), 2);
    }

    #[test]
    fn should_match_device_classes() {
        let map = CapabilityMap::builder(ServiceType::Lightbulb)
            .class(DeviceClass::Light)
            .build();
        assert!(map.applies_to(&DeviceClass::Light));
        assert!(!map.applies_to(&DeviceClass::Socket));
    }

    #[test]
    fn should_select_primary_transform_when_verbatim() {
        let transform = Transform::with_fallback(
            |v| v.as_f64().map(|f| Value::Float(f * 2.0)),
            |v| v.as_f64().map(|f| Value::Float(f * 10.0)),
        );
        assert_eq!(
            transform.apply(true, &Value::Float(1.0)),
            Some(Value::Float(2.0))
        );
        assert_eq!(
            transform.apply(false, &Value::Float(1.0)),
            Some(Value::Float(10.0))
        );
    }

    #[test]
    fn should_fall_back_to_primary_when_no_fallback_supplied() {
        let transform = Transform::new(|v| Some(v.clone()));
        assert_eq!(
            transform.apply(false, &Value::Int(3)),
            Some(Value::Int(3))
        );
    }

    #[test]
    fn should_default_debounce_to_zero() {
        let binding = Binding::new(CharacteristicType::On);
        assert!(binding.debounce.is_zero());
    }
}
