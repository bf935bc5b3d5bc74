//! Built-in capability map catalog.
//!
//! Each map translates platform capability conventions (normalized
//! `0.0..=1.0` floats for dim, hue, saturation, and color temperature) into
//! the ranges the exposed characteristics expect.

use std::sync::Arc;
use std::time::Duration;

use capbridge_app::map::{Binding, CapabilityMap};
use capbridge_domain::characteristic::CharacteristicType;
use capbridge_domain::device::DeviceClass;
use capbridge_domain::service::ServiceType;
use capbridge_domain::value::Value;

/// Battery percentage at or below which a low-battery warning is raised.
const LOW_BATTERY_PCT: f64 = 20.0;

/// Color temperature range in mireds matching the exposed characteristic.
const MIREDS_MIN: f64 = 140.0;
const MIREDS_SPAN: f64 = 360.0;

/// All built-in maps.
#[must_use]
pub fn builtin() -> Vec<Arc<CapabilityMap>> {
    vec![
        Arc::new(light_map()),
        Arc::new(socket_map()),
        Arc::new(temperature_map()),
        Arc::new(humidity_map()),
        Arc::new(battery_map()),
        Arc::new(button_map()),
    ]
}

/// Built-in maps applying to a device class, in catalog order.
#[must_use]
pub fn maps_for(class: &DeviceClass) -> Vec<Arc<CapabilityMap>> {
    builtin()
        .into_iter()
        .filter(|map| map.applies_to(class))
        .collect()
}

fn light_map() -> CapabilityMap {
    CapabilityMap::builder(ServiceType::Lightbulb)
        .class(DeviceClass::Light)
        .adaptive_lighting()
        .required(
            "onoff",
            Binding::new(CharacteristicType::On)
                .get(|v| v.as_bool().map(Value::Bool))
                .set(|v| v.as_bool().map(Value::Bool)),
        )
        .optional(
            "dim",
            Binding::new(CharacteristicType::Brightness)
                .get(|v| v.as_f64().map(|f| int_value(f * 100.0)))
                .set(|v| v.as_f64().map(|pct| Value::Float(pct / 100.0))),
        )
        .optional(
            "light_hue",
            Binding::new(CharacteristicType::Hue)
                .get(|v| v.as_f64().map(|f| Value::Float(f * 360.0)))
                .set(|v| v.as_f64().map(|deg| Value::Float(deg / 360.0))),
        )
        .optional(
            "light_saturation",
            Binding::new(CharacteristicType::Saturation)
                .get(|v| v.as_f64().map(|f| Value::Float(f * 100.0)))
                .set(|v| v.as_f64().map(|pct| Value::Float(pct / 100.0))),
        )
        .optional(
            "light_temperature",
            Binding::new(CharacteristicType::ColorTemperature)
                .get(|v| v.as_f64().map(|f| int_value(MIREDS_MIN + f * MIREDS_SPAN)))
                .set(|v| v.as_f64().map(|m| Value::Float((m - MIREDS_MIN) / MIREDS_SPAN)))
                .debounce(Duration::from_millis(300)),
        )
        .build()
}

fn socket_map() -> CapabilityMap {
    CapabilityMap::builder(ServiceType::Outlet)
        .class(DeviceClass::Socket)
        .grouped()
        .required(
            "onoff",
            Binding::many(vec![
                CharacteristicType::On,
                CharacteristicType::OutletInUse,
            ])
            .get(|v| v.as_bool().map(Value::Bool))
            .set(|v| v.as_bool().map(Value::Bool)),
        )
        .build()
}

fn temperature_map() -> CapabilityMap {
    CapabilityMap::builder(ServiceType::TemperatureSensor)
        .class(DeviceClass::Sensor)
        .class(DeviceClass::Thermostat)
        .required(
            "measure_temperature",
            Binding::new(CharacteristicType::CurrentTemperature)
                .get(|v| v.as_f64().map(Value::Float)),
        )
        .build()
}

fn humidity_map() -> CapabilityMap {
    CapabilityMap::builder(ServiceType::HumiditySensor)
        .class(DeviceClass::Sensor)
        .class(DeviceClass::Thermostat)
        .required(
            "measure_humidity",
            Binding::new(CharacteristicType::CurrentRelativeHumidity)
                .get(|v| v.as_f64().map(Value::Float)),
        )
        .build()
}

fn battery_map() -> CapabilityMap {
    CapabilityMap::builder(ServiceType::Battery)
        .class(DeviceClass::Sensor)
        .class(DeviceClass::Button)
        .required(
            "measure_battery",
            Binding::new(CharacteristicType::BatteryLevel).get(|v| v.as_f64().map(int_value)),
        )
        .required(
            "measure_battery",
            Binding::new(CharacteristicType::StatusLowBattery).get(|v| {
                v.as_f64()
                    .map(|pct| Value::Int(i64::from(pct <= LOW_BATTERY_PCT)))
            }),
        )
        .build()
}

fn button_map() -> CapabilityMap {
    CapabilityMap::builder(ServiceType::StatelessProgrammableSwitch)
        .class(DeviceClass::Button)
        .trigger(
            "button",
            // Every press maps to a single press event.
            Binding::new(CharacteristicType::ProgrammableSwitchEvent).get(|_| Some(Value::Int(0))),
        )
        .build()
}

fn int_value(f: f64) -> Value {
    #[allow(clippy::cast_possible_truncation)]
    let rounded = f.round() as i64;
    Value::Int(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use capbridge_app::map::BindingRole;

    fn get(map: &CapabilityMap, base: &str, raw: Value) -> Option<Value> {
        let (_, bindings) = map.bindings_for(base).unwrap();
        bindings[0].get.as_ref().unwrap().apply(true, &raw)
    }

    fn set(map: &CapabilityMap, base: &str, exposed: Value) -> Option<Value> {
        let (_, bindings) = map.bindings_for(base).unwrap();
        bindings[0].set.as_ref().unwrap().apply(true, &exposed)
    }

    #[test]
    fn should_cover_every_mapped_class() {
        for class in [
            DeviceClass::Light,
            DeviceClass::Socket,
            DeviceClass::Sensor,
            DeviceClass::Button,
        ] {
            assert!(!maps_for(&class).is_empty());
        }
        assert!(maps_for(&DeviceClass::Other("doorbell".to_string())).is_empty());
    }

    #[test]
    fn should_scale_dim_to_percent() {
        let map = light_map();
        assert_eq!(get(&map, "dim", Value::Float(0.4)), Some(Value::Int(40)));
        assert_eq!(set(&map, "dim", Value::Int(75)), Some(Value::Float(0.75)));
    }

    #[test]
    fn should_scale_hue_to_degrees() {
        let map = light_map();
        assert_eq!(
            get(&map, "light_hue", Value::Float(0.5)),
            Some(Value::Float(180.0))
        );
        assert_eq!(
            set(&map, "light_hue", Value::Float(90.0)),
            Some(Value::Float(0.25))
        );
    }

    #[test]
    fn should_scale_color_temperature_to_mireds() {
        let map = light_map();
        assert_eq!(
            get(&map, "light_temperature", Value::Float(0.0)),
            Some(Value::Int(140))
        );
        assert_eq!(
            get(&map, "light_temperature", Value::Float(1.0)),
            Some(Value::Int(500))
        );
        assert_eq!(
            set(&map, "light_temperature", Value::Int(320)),
            Some(Value::Float(0.5))
        );
    }

    #[test]
    fn should_debounce_color_temperature_writes() {
        let map = light_map();
        let (_, bindings) = map.bindings_for("light_temperature").unwrap();
        assert_eq!(bindings[0].debounce, Duration::from_millis(300));
    }

    #[test]
    fn should_mirror_socket_power_into_both_characteristics() {
        let map = socket_map();
        assert!(map.group);
        let (role, bindings) = map.bindings_for("onoff").unwrap();
        assert_eq!(role, BindingRole::Required);
        assert_eq!(
            bindings[0].characteristics,
            vec![CharacteristicType::On, CharacteristicType::OutletInUse]
        );
    }

    #[test]
    fn should_flag_low_battery_at_threshold() {
        let map = battery_map();
        let (_, bindings) = map.bindings_for("measure_battery").unwrap();
        assert_eq!(bindings.len(), 2);
        let low = bindings[1].get.as_ref().unwrap();
        assert_eq!(low.apply(true, &Value::Float(20.0)), Some(Value::Int(1)));
        assert_eq!(low.apply(true, &Value::Float(21.0)), Some(Value::Int(0)));
    }

    #[test]
    fn should_emit_single_press_for_button_events() {
        let map = button_map();
        let (role, bindings) = map.bindings_for("button").unwrap();
        assert_eq!(role, BindingRole::Trigger);
        assert_eq!(
            bindings[0].get.as_ref().unwrap().apply(true, &Value::Bool(true)),
            Some(Value::Int(0))
        );
    }

    #[test]
    fn should_enable_adaptive_lighting_only_for_lights() {
        assert!(light_map().adaptive_lighting);
        assert!(!socket_map().adaptive_lighting);
    }
}
