//! # capbridge-adapter-virtual
//!
//! Virtual/demo integration that provides simulated devices for testing and
//! demonstration purposes, plus the built-in capability map catalog used to
//! expose them.
//!
//! ## Provided devices
//!
//! | Device | Id | Behaviour |
//! |--------|----|-----------|
//! | Demo Light | `virtual-light` | Dimmable color light with color temperature |
//! | Demo Socket | `virtual-socket` | Dual outlet with a grouped `onoff.usb` channel |
//! | Demo Climate | `virtual-climate` | Temperature/humidity sensor with a battery |
//! | Demo Button | `virtual-button` | Stateless wireless button |
//!
//! ## Dependency rule
//!
//! Depends on `capbridge-app` (port traits) and `capbridge-domain` only.

pub mod devices;
pub mod maps;

use std::sync::Arc;

use devices::VirtualDevice;

/// One simulated device of every supported class.
#[must_use]
pub fn demo_devices() -> Vec<Arc<VirtualDevice>> {
    vec![
        devices::light::demo_light(),
        devices::socket::demo_socket(),
        devices::sensor::demo_climate(),
        devices::button::demo_button(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use capbridge_app::ports::DeviceGateway;

    #[test]
    fn should_provide_one_device_per_class() {
        let devices = demo_devices();
        assert_eq!(devices.len(), 4);

        let classes: Vec<_> = devices.iter().map(|d| d.class()).collect();
        let unique: std::collections::BTreeSet<_> =
            classes.iter().map(ToString::to_string).collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn should_map_every_demo_device() {
        for device in demo_devices() {
            assert!(
                !maps::maps_for(&device.class()).is_empty(),
                "no map for {}",
                device.id()
            );
        }
    }
}
