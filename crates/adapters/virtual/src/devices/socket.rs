//! Demo socket — dual outlet with a grouped USB channel.

use std::sync::Arc;

use capbridge_domain::device::DeviceClass;
use capbridge_domain::value::Value;

use super::VirtualDevice;

/// A wall socket with a mains outlet and a separately switchable USB outlet.
///
/// The `onoff.usb` capability puts the USB channel in its own capability
/// group, so grouped maps expose it as a second service.
#[must_use]
pub fn demo_socket() -> Arc<VirtualDevice> {
    VirtualDevice::builder("virtual-socket", "Demo Socket", DeviceClass::Socket)
        .capability("onoff", Value::Bool(false))
        .capability("onoff.usb", Value::Bool(false))
        .hidden_capability("measure_power", Value::Float(0.0))
        .build()
}
