//! Demo button — stateless wireless button.

use std::sync::Arc;

use capbridge_domain::device::DeviceClass;
use capbridge_domain::value::Value;

use super::VirtualDevice;

/// A wireless button whose `button` capability fires on each press and never
/// holds a current value.
#[must_use]
pub fn demo_button() -> Arc<VirtualDevice> {
    VirtualDevice::builder("virtual-button", "Demo Button", DeviceClass::Button)
        .trigger_capability("button")
        .build()
}

/// Simulate a press.
pub fn press(button: &VirtualDevice) {
    button.pulse_capability("button", Value::Bool(true));
}
