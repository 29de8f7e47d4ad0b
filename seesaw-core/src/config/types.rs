//! Configuration enums, limits and errors

use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::{ColorMode, ColorOrder};

/// Highest GPIO number addressable through the 32-bit bulk registers
pub const MAX_PIN: u8 = 31;

/// Maximum LEDs per strip
pub const MAX_LEDS: usize = 64;

/// Maximum binary sensors per chip
pub const MAX_BINARY_SENSORS: usize = 16;

/// Configuration errors, raised while building a device and never at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Bus address outside the 7-bit non-reserved range (0x08-0x77)
    InvalidAddress(u8),
    /// Poll interval must be non-zero
    ZeroPollInterval,
    /// Pin number above [`MAX_PIN`]
    PinOutOfRange(u8),
    /// Light declared with zero LEDs
    NoLeds,
    /// Light larger than [`MAX_LEDS`]
    TooManyLeds(u16),
    /// Color mode channel count does not match the color order
    ChannelMismatch {
        order: ColorOrder,
        mode: ColorMode,
    },
    /// Two sub-devices claim the same pin
    PinInUse(u8),
    /// More binary sensors than [`MAX_BINARY_SENSORS`]
    TooManySensors,
    /// The chip has a single NeoPixel module
    LightAlreadyAttached,
    /// Unrecognized pin mode name
    UnknownPinMode,
    /// Unrecognized color order name
    UnknownColorOrder,
}

/// GPIO input mode
///
/// Discriminants match the Seesaw configuration enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum PinMode {
    /// Floating input
    Input = 0,
    /// Input with the internal pull-up enabled (buttons to ground)
    #[default]
    InputPullup = 1,
}

impl PinMode {
    /// Configuration name
    pub const fn as_str(self) -> &'static str {
        match self {
            PinMode::Input => "INPUT",
            PinMode::InputPullup => "INPUT_PULLUP",
        }
    }
}

impl FromStr for PinMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("INPUT") {
            Ok(PinMode::Input)
        } else if s.eq_ignore_ascii_case("INPUT_PULLUP") {
            Ok(PinMode::InputPullup)
        } else {
            Err(ConfigError::UnknownPinMode)
        }
    }
}

/// Validate a chip pin number
pub fn check_pin(pin: u8) -> Result<(), ConfigError> {
    if pin > MAX_PIN {
        Err(ConfigError::PinOutOfRange(pin))
    } else {
        Ok(())
    }
}
