//! Demo light — dimmable color light with color temperature.

use std::sync::Arc;

use capbridge_domain::device::DeviceClass;
use capbridge_domain::value::Value;

use super::VirtualDevice;

/// A dimmable color light, initially off at full brightness.
///
/// Capability values follow the platform conventions: `dim`, `light_hue`,
/// `light_saturation`, and `light_temperature` are all normalized to
/// `0.0..=1.0`.
#[must_use]
pub fn demo_light() -> Arc<VirtualDevice> {
    VirtualDevice::builder("virtual-light", "Demo Light", DeviceClass::Light)
        .capability("onoff", Value::Bool(false))
        .capability("dim", Value::Float(1.0))
        .capability("light_hue", Value::Float(0.0))
        .capability("light_saturation", Value::Float(0.0))
        .capability("light_temperature", Value::Float(0.5))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use capbridge_app::ports::DeviceGateway;

    #[test]
    fn should_start_off_at_full_brightness() {
        let light = demo_light();
        assert_eq!(light.capability_value("onoff"), Some(Value::Bool(false)));
        assert_eq!(light.capability_value("dim"), Some(Value::Float(1.0)));
    }

    #[test]
    fn should_expose_all_color_capabilities() {
        let light = demo_light();
        assert_eq!(
            light.visible_capabilities(),
            vec![
                "onoff",
                "dim",
                "light_hue",
                "light_saturation",
                "light_temperature"
            ]
        );
    }
}
