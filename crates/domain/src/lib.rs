//! # capbridge-domain
//!
//! Pure domain model for the capbridge accessory bridge.
//!
//! ## Responsibilities
//! - Define the capability [`Value`](value::Value) type exchanged with source devices
//! - Define the target-protocol catalogs: [`CharacteristicType`](characteristic::CharacteristicType)
//!   (with value formats and legal ranges) and [`ServiceType`](service::ServiceType)
//! - Define [`DeviceClass`](device::DeviceClass) tags used to match capability maps
//! - Define the shared error taxonomy
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod characteristic;
pub mod device;
pub mod error;
pub mod service;
pub mod value;
