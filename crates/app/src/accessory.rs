//! In-process model of the target protocol's accessory surface.
//!
//! An [`Accessory`] is the top-level object representing one bridged
//! device; it is composed of [`Service`]s, which group [`Characteristic`]s.
//! Handles are cheap clones over shared state so the binder can hand them
//! to read/write handlers and change listeners.
//!
//! Locks are held only for field access, never across a handler call, so
//! listeners may freely read characteristics.

pub mod adaptive;

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use capbridge_domain::characteristic::CharacteristicType;
use capbridge_domain::error::BridgeError;
use capbridge_domain::service::ServiceType;
use capbridge_domain::value::Value;

use adaptive::AdaptiveLightingController;

/// Boxed future returned by read/write handlers.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Handler invoked when the target protocol reads a characteristic.
pub type ReadHandler = Arc<dyn Fn() -> BoxFuture<Result<Value, BridgeError>> + Send + Sync>;

/// Handler invoked when the target protocol writes a characteristic.
pub type WriteHandler = Arc<dyn Fn(Value) -> BoxFuture<()> + Send + Sync>;

/// Listener invoked with `(old, new)` on every characteristic update.
pub type ChangeListener = Arc<dyn Fn(&Value, &Value) + Send + Sync>;

struct CharacteristicInner {
    value: Value,
    read: Option<ReadHandler>,
    write: Option<WriteHandler>,
    change: Vec<ChangeListener>,
}

/// A typed value slot supporting read, write, and change notification.
#[derive(Clone)]
pub struct Characteristic {
    kind: CharacteristicType,
    inner: Arc<Mutex<CharacteristicInner>>,
}

impl Characteristic {
    fn new(kind: CharacteristicType) -> Self {
        Self {
            kind,
            inner: Arc::new(Mutex::new(CharacteristicInner {
                value: kind.default_value(),
                read: None,
                write: None,
                change: Vec::new(),
            })),
        }
    }

    /// The characteristic's type.
    #[must_use]
    pub fn kind(&self) -> CharacteristicType {
        self.kind
    }

    /// Current (last pushed or written) value.
    #[must_use]
    pub fn value(&self) -> Value {
        self.inner.lock().expect("characteristic lock").value.clone()
    }

    /// Clamp/coerce a value to this characteristic's legal range.
    #[must_use]
    pub fn validate(&self, value: &Value) -> Value {
        self.kind.clamp(value)
    }

    /// Install the read handler. Replaces any previous handler.
    pub fn on_read<F, Fut>(&self, handler: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, BridgeError>> + Send + 'static,
    {
        let handler: ReadHandler = Arc::new(move || Box::pin(handler()));
        self.inner.lock().expect("characteristic lock").read = Some(handler);
    }

    /// Install the write handler. Replaces any previous handler.
    pub fn on_write<F, Fut>(&self, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: WriteHandler = Arc::new(move |value| Box::pin(handler(value)));
        self.inner.lock().expect("characteristic lock").write = Some(handler);
    }

    /// Attach a change listener fired on every update, old → new.
    pub fn on_change(&self, listener: impl Fn(&Value, &Value) + Send + Sync + 'static) {
        self.inner
            .lock()
            .expect("characteristic lock")
            .change
            .push(Arc::new(listener));
    }

    /// Read the current value through the read handler.
    ///
    /// The handler result is validated before it is returned and stored.
    /// Without a handler the stored value is returned as-is.
    ///
    /// # Errors
    ///
    /// Propagates the handler's error, typically
    /// [`MissingValueError`](capbridge_domain::error::MissingValueError)
    /// when the device reports no value for the mapped capability.
    pub async fn read(&self) -> Result<Value, BridgeError> {
        let handler = self
            .inner
            .lock()
            .expect("characteristic lock")
            .read
            .clone();
        match handler {
            Some(handler) => {
                let value = self.validate(&handler().await?);
                self.inner.lock().expect("characteristic lock").value = value.clone();
                Ok(value)
            }
            None => Ok(self.value()),
        }
    }

    /// Write a value through the write handler, then update and notify.
    ///
    /// The value is validated first; the (possibly clamped) value is what
    /// reaches the handler and the change listeners.
    pub async fn write(&self, value: &Value) {
        let value = self.validate(value);
        let handler = self
            .inner
            .lock()
            .expect("characteristic lock")
            .write
            .clone();
        if let Some(handler) = handler {
            handler(value.clone()).await;
        }
        self.update_value(&value);
    }

    /// Push a new value into the characteristic and fire change listeners.
    ///
    /// Listeners fire on every update, even when the value is unchanged —
    /// trigger characteristics (e.g. switch events) repeat values.
    pub fn update_value(&self, value: &Value) {
        let value = self.validate(value);
        let (old, listeners) = {
            let mut inner = self.inner.lock().expect("characteristic lock");
            let old = std::mem::replace(&mut inner.value, value.clone());
            (old, inner.change.clone())
        };
        for listener in listeners {
            listener(&old, &value);
        }
    }
}

struct ServiceInner {
    characteristics: Vec<Characteristic>,
    adaptive: Option<AdaptiveLightingController>,
}

/// A typed grouping of characteristics representing one functional unit.
#[derive(Clone)]
pub struct Service {
    kind: ServiceType,
    discriminator: String,
    inner: Arc<Mutex<ServiceInner>>,
}

impl Service {
    fn new(kind: ServiceType, discriminator: &str) -> Self {
        Self {
            kind,
            discriminator: discriminator.to_string(),
            inner: Arc::new(Mutex::new(ServiceInner {
                characteristics: Vec::new(),
                adaptive: None,
            })),
        }
    }

    /// The service's type.
    #[must_use]
    pub fn kind(&self) -> ServiceType {
        self.kind
    }

    /// Instance discriminator distinguishing same-typed services.
    #[must_use]
    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// Fetch or create the characteristic of the given type.
    #[must_use]
    pub fn characteristic(&self, kind: CharacteristicType) -> Characteristic {
        let mut inner = self.inner.lock().expect("service lock");
        if let Some(existing) = inner.characteristics.iter().find(|c| c.kind() == kind) {
            return existing.clone();
        }
        let created = Characteristic::new(kind);
        inner.characteristics.push(created.clone());
        created
    }

    /// Look up an existing characteristic without creating one.
    #[must_use]
    pub fn find_characteristic(&self, kind: CharacteristicType) -> Option<Characteristic> {
        self.inner
            .lock()
            .expect("service lock")
            .characteristics
            .iter()
            .find(|c| c.kind() == kind)
            .cloned()
    }

    /// Characteristic types currently present, in creation order.
    #[must_use]
    pub fn characteristic_kinds(&self) -> Vec<CharacteristicType> {
        self.inner
            .lock()
            .expect("service lock")
            .characteristics
            .iter()
            .map(Characteristic::kind)
            .collect()
    }

    /// Hand ownership of an adaptive-lighting controller to this service.
    pub fn set_adaptive_lighting(&self, controller: AdaptiveLightingController) {
        self.inner.lock().expect("service lock").adaptive = Some(controller);
    }

    /// Whether an adaptive-lighting controller is attached.
    #[must_use]
    pub fn has_adaptive_lighting(&self) -> bool {
        self.inner.lock().expect("service lock").adaptive.is_some()
    }

    /// Detach and stop the adaptive-lighting controller, if any.
    pub fn detach_adaptive_lighting(&self) {
        self.inner.lock().expect("service lock").adaptive.take();
    }
}

struct AccessoryShared {
    id: String,
    name: String,
    services: Mutex<Vec<Service>>,
}

/// The top-level target-protocol object for one bridged device.
#[derive(Clone)]
pub struct Accessory {
    shared: Arc<AccessoryShared>,
}

impl Accessory {
    /// Create an accessory with a stable identifier and display name.
    #[must_use]
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            shared: Arc::new(AccessoryShared {
                id: id.to_string(),
                name: name.to_string(),
                services: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Stable identifier (the source device's identifier).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.shared.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Fetch or create the service with the given type and discriminator.
    #[must_use]
    pub fn service(&self, kind: ServiceType, discriminator: &str) -> Service {
        let mut services = self.shared.services.lock().expect("accessory lock");
        if let Some(existing) = services
            .iter()
            .find(|s| s.kind() == kind && s.discriminator() == discriminator)
        {
            return existing.clone();
        }
        let created = Service::new(kind, discriminator);
        services.push(created.clone());
        created
    }

    /// Look up an existing service without creating one.
    #[must_use]
    pub fn find_service(&self, kind: ServiceType, discriminator: &str) -> Option<Service> {
        self.shared
            .services
            .lock()
            .expect("accessory lock")
            .iter()
            .find(|s| s.kind() == kind && s.discriminator() == discriminator)
            .cloned()
    }

    /// All services, in creation order.
    #[must_use]
    pub fn services(&self) -> Vec<Service> {
        self.shared
            .services
            .lock()
            .expect("accessory lock")
            .clone()
    }
}
