//! Demo climate sensor — temperature, humidity, and a battery.

use std::sync::Arc;

use capbridge_domain::device::DeviceClass;
use capbridge_domain::value::Value;

use super::VirtualDevice;

/// A battery-powered climate sensor holding plausible indoor readings.
#[must_use]
pub fn demo_climate() -> Arc<VirtualDevice> {
    VirtualDevice::builder("virtual-climate", "Demo Climate", DeviceClass::Sensor)
        .capability("measure_temperature", Value::Float(21.5))
        .capability("measure_humidity", Value::Float(48.0))
        .capability("measure_battery", Value::Float(87.0))
        .build()
}
