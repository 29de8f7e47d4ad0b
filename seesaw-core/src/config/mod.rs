//! Configuration types
//!
//! Typed configuration for one Seesaw chip and its sub-devices. Every
//! struct validates itself before a driver is built from it, so the
//! driver can treat pin ranges and buffer sizes as preconditions.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
