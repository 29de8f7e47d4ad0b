//! Board-agnostic core types for the Seesaw driver
//!
//! This crate contains everything that does not depend on a bus or chip:
//!
//! - Configuration types and their construction-time validation
//! - Pixel colors and the channel-order lookup table
//! - Capability traits (tickable, addressable light, binary sensor)
//! - The polling scheduler that drives tickables at a fixed cadence

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod color;
pub mod config;
pub mod scheduler;
pub mod traits;
