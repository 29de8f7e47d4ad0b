//! Adafruit Seesaw I/O expander
//!
//! A Seesaw is a small microcontroller running Adafruit firmware that
//! exposes GPIO, NeoPixel and other peripherals as I2C registers. The
//! [`SeesawDevice`] owns the chip's bus handle and the sub-drivers bound
//! to it, and drives them from a periodic tick:
//!
//! ```text
//! SeesawDevice ──owns──► SeesawBus (address, I2C, delay)
//!      │
//!      ├─► GpioBinarySensor (pin 4)   reads GPIO_BULK each tick
//!      ├─► GpioBinarySensor (pin 5)
//!      └─► NeoPixelStrip (pin 3)      flushes the buffer when dirty
//! ```
//!
//! Sub-drivers never hold a reference to the device; the device lends
//! them its bus while ticking.

pub mod bus;
pub mod device;
pub mod gpio;
pub mod neopixel;
pub mod registers;

#[cfg(test)]
pub(crate) mod mock;

pub use bus::SeesawBus;
pub use device::{
    Capabilities, DeviceState, InitError, ProbeFailure, ProductInfo, SeesawDevice, SeesawError,
    MAX_SUB_DRIVERS,
};
pub use gpio::{GpioBinarySensor, SensorId, StateCallback};
pub use neopixel::{LightView, NeoPixelStrip};
pub use registers::HardwareId;

/// Setup progress of a sub-driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupState {
    /// Not configured on the chip yet; retried on the next tick
    Pending,
    /// Configured and running
    Configured,
    /// The chip firmware lacks the module this sub-driver needs
    Unsupported,
}
