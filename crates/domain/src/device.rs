//! Device class tags — the source platform's coarse device classification.
//!
//! Capability maps declare which classes they apply to; a single device may
//! match several maps (e.g. a light that is also a plain switch).

use serde::{Deserialize, Serialize};

/// Source-platform device class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Light,
    Socket,
    Sensor,
    Button,
    Thermostat,
    /// Any class the built-in catalog has no dedicated tag for.
    #[serde(untagged)]
    Other(String),
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Socket => f.write_str("socket"),
            Self::Sensor => f.write_str("sensor"),
            Self::Button => f.write_str("button"),
            Self::Thermostat => f.write_str("thermostat"),
            Self::Other(s) => f.write_str(s),
        }
    }
}
