//! Hardware driver implementations
//!
//! This crate provides the Adafruit Seesaw driver built on the traits
//! defined in seesaw-core and seesaw-hal:
//!
//! - Device core (soft reset, capability probe, polling tick)
//! - GPIO binary sensors (input / input pull-up, edge notification)
//! - NeoPixel light (buffered, coalesced flushes)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to later modules
mod fmt;

pub mod seesaw;
