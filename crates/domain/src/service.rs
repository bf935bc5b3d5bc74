//! Service type catalog — functional units of the target protocol.

use serde::{Deserialize, Serialize};

/// A service type known to the target protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    Lightbulb,
    Switch,
    Outlet,
    TemperatureSensor,
    HumiditySensor,
    MotionSensor,
    ContactSensor,
    StatelessProgrammableSwitch,
    Battery,
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Lightbulb => "Lightbulb",
            Self::Switch => "Switch",
            Self::Outlet => "Outlet",
            Self::TemperatureSensor => "TemperatureSensor",
            Self::HumiditySensor => "HumiditySensor",
            Self::MotionSensor => "MotionSensor",
            Self::ContactSensor => "ContactSensor",
            Self::StatelessProgrammableSwitch => "StatelessProgrammableSwitch",
            Self::Battery => "Battery",
        };
        f.write_str(name)
    }
}
