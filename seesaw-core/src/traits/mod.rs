//! Capability traits
//!
//! These traits define the interface between the polling loop, the
//! Seesaw sub-drivers and the application consuming them.

pub mod binary_sensor;
pub mod light;
pub mod tickable;

pub use binary_sensor::BinarySensor;
pub use light::AddressableLight;
pub use tickable::Tickable;
