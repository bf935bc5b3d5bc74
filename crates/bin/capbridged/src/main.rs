//! # capbridged — capability bridge daemon
//!
//! Composition root that wires all adapters together and runs the bridge.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Load the exposure ledger from its JSON store
//! - Collect devices from the enabled integrations
//! - Pick capability maps per device class and bind each exposed device
//! - Handle graceful shutdown (SIGINT), tearing down every handle
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no bridge logic belongs here.

mod config;

use std::sync::Arc;

use capbridge_adapter_storage_json::JsonExposureStore;
use capbridge_app::binder;
use capbridge_app::handle::MappedDeviceHandle;
use capbridge_app::ledger::ExposureLedger;
use capbridge_app::ports::{DeviceGateway, ExposureStore};

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .init();

    let store = JsonExposureStore::new(&config.ledger.path);
    let mut ledger = ExposureLedger::load(store).await?;

    let mut devices: Vec<Arc<dyn DeviceGateway>> = Vec::new();
    if config.integrations.virtual_enabled {
        for device in capbridge_adapter_virtual::demo_devices() {
            devices.push(device);
        }
    }

    let mut handles = bind_devices(&devices, &mut ledger, config.bridge.expose_new_devices);
    ledger.save().await?;

    tracing::info!(exposed = handles.len(), "bridge running");
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");

    for handle in &mut handles {
        handle.cleanup();
    }
    ledger.save().await?;
    Ok(())
}

/// Bind every device the ledger exposes, recording exposure decisions for
/// devices seen for the first time.
fn bind_devices<S: ExposureStore>(
    devices: &[Arc<dyn DeviceGateway>],
    ledger: &mut ExposureLedger<S>,
    expose_new: bool,
) -> Vec<MappedDeviceHandle> {
    let mut handles = Vec::new();
    for device in devices {
        let maps = capbridge_adapter_virtual::maps::maps_for(&device.class());
        if maps.is_empty() {
            tracing::warn!(
                device = device.id(),
                class = %device.class(),
                "no capability map for device class, skipping"
            );
            continue;
        }
        if !ledger.has(device.id()) {
            ledger.set(device.id(), expose_new);
        }
        if ledger.get(device.id()) != Some(true) {
            tracing::info!(device = device.id(), "device hidden by exposure ledger");
            continue;
        }

        let mut handle = MappedDeviceHandle::new(Arc::clone(device));
        for map in maps {
            handle.push_map(map);
        }
        match binder::bind(&mut handle) {
            Ok(accessory) => {
                tracing::info!(
                    device = device.id(),
                    name = accessory.name(),
                    services = accessory.services().len(),
                    "device exposed"
                );
                handles.push(handle);
            }
            Err(err) => {
                tracing::error!(device = device.id(), error = %err, "failed to bind device");
            }
        }
    }
    handles
}
