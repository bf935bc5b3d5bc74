//! Port definitions — traits that adapters implement.

pub mod device;
pub mod store;

pub use device::{DeviceGateway, ValueCallback};
pub use store::ExposureStore;
