//! Seesaw Hardware Abstraction Layer
//!
//! This crate defines the bus transport the Seesaw driver talks through.
//! Board support code implements [`I2cBus`] directly, or wraps any
//! `embedded-hal` 1.0 I2C peripheral in [`HalI2c`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  seesaw-drivers (device, GPIO, pixels)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  seesaw-hal (this crate - I2cBus)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  embedded-hal I2C (esp-hal, rp, stm32)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The transport owns bus arbitration: one transaction at a time. The
//! driver assumes calls reaching it are already serialized.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod i2c;

pub use i2c::{HalI2c, I2cBus, TransportError};
