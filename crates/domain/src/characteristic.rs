//! Characteristic type catalog — typed value slots of the target protocol.
//!
//! Every characteristic type carries a value [`Format`] with its legal range.
//! [`CharacteristicType::clamp`] implements the protocol's `validate`
//! contract: coerce an incoming value to the format and clamp it into range.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A characteristic type known to the target protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacteristicType {
    /// Power state of a light or switch (boolean).
    On,
    /// Light brightness, percent.
    Brightness,
    /// Light hue, degrees.
    Hue,
    /// Light saturation, percent.
    Saturation,
    /// Color temperature in mireds.
    ColorTemperature,
    /// Whether an outlet currently draws power.
    OutletInUse,
    /// Ambient temperature in degrees Celsius.
    CurrentTemperature,
    /// Relative humidity, percent.
    CurrentRelativeHumidity,
    /// Motion sensor trip state.
    MotionDetected,
    /// Contact sensor state (0 = closed, 1 = open).
    ContactSensorState,
    /// Stateless switch event (0 = single, 1 = double, 2 = long press).
    ProgrammableSwitchEvent,
    /// Battery charge, percent.
    BatteryLevel,
    /// Low battery indicator (0 = normal, 1 = low).
    StatusLowBattery,
}

/// Value format of a characteristic, with its legal range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    Bool,
    Int { min: i64, max: i64 },
    Float { min: f64, max: f64 },
}

impl CharacteristicType {
    /// The value format this characteristic accepts.
    #[must_use]
    pub fn format(self) -> Format {
        match self {
            Self::On | Self::OutletInUse | Self::MotionDetected => Format::Bool,
            Self::Brightness | Self::BatteryLevel => Format::Int { min: 0, max: 100 },
            Self::Hue => Format::Float {
                min: 0.0,
                max: 360.0,
            },
            Self::Saturation | Self::CurrentRelativeHumidity => Format::Float {
                min: 0.0,
                max: 100.0,
            },
            Self::ColorTemperature => Format::Int { min: 140, max: 500 },
            Self::CurrentTemperature => Format::Float {
                min: -270.0,
                max: 100.0,
            },
            Self::ContactSensorState | Self::StatusLowBattery => Format::Int { min: 0, max: 1 },
            Self::ProgrammableSwitchEvent => Format::Int { min: 0, max: 2 },
        }
    }

    /// The neutral value a freshly created characteristic starts with.
    #[must_use]
    pub fn default_value(self) -> Value {
        match self.format() {
            Format::Bool => Value::Bool(false),
            Format::Int { min, .. } => Value::Int(min),
            Format::Float { min, .. } => Value::Float(min),
        }
    }

    /// Coerce `value` to this characteristic's format and clamp it into the
    /// legal range (the target protocol's `validate` operation).
    ///
    /// Values that cannot be coerced (e.g. a string where a number is
    /// expected) fall back to [`default_value`](Self::default_value).
    #[must_use]
    pub fn clamp(self, value: &Value) -> Value {
        match self.format() {
            Format::Bool => value
                .as_bool()
                .map_or_else(|| self.default_value(), Value::Bool),
            Format::Int { min, max } => value
                .as_i64()
                .map_or_else(|| self.default_value(), |i| Value::Int(i.clamp(min, max))),
            Format::Float { min, max } => value
                .as_f64()
                .map_or_else(|| self.default_value(), |f| Value::Float(f.clamp(min, max))),
        }
    }
}

impl std::fmt::Display for CharacteristicType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::On => "On",
            Self::Brightness => "Brightness",
            Self::Hue => "Hue",
            Self::Saturation => "Saturation",
            Self::ColorTemperature => "ColorTemperature",
            Self::OutletInUse => "OutletInUse",
            Self::CurrentTemperature => "CurrentTemperature",
            Self::CurrentRelativeHumidity => "CurrentRelativeHumidity",
            Self::MotionDetected => "MotionDetected",
            Self::ContactSensorState => "ContactSensorState",
            Self::ProgrammableSwitchEvent => "ProgrammableSwitchEvent",
            Self::BatteryLevel => "BatteryLevel",
            Self::StatusLowBattery => "StatusLowBattery",
        };
        f.write_str(name)
    }
}
