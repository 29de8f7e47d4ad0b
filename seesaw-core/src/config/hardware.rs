//! Hardware configuration types
//!
//! These types describe one Seesaw chip on the bus and the GPIO inputs
//! and NeoPixel strip attached to it.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::{check_pin, ConfigError, PinMode, MAX_BINARY_SENSORS, MAX_LEDS};
use crate::color::{ColorMode, ColorOrder};

/// Default bus address (NeoKey 1x4, NeoSlider)
pub const DEFAULT_ADDRESS: u8 = 0x30;

/// Default poll interval in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 20;

/// Default NeoPixel pin (NeoKey 1x4)
pub const DEFAULT_NEOPIXEL_PIN: u8 = 3;

/// Chip-level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    /// 7-bit bus address
    pub address: u8,
    /// Issue a software reset before probing
    pub software_reset: bool,
    /// Poll interval in milliseconds
    pub poll_interval_ms: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            software_reset: true,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl DeviceConfig {
    /// Create a config for a chip at `address` with default settings
    pub const fn new(address: u8) -> Self {
        Self {
            address,
            software_reset: true,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    /// Enable or disable the software reset at initialization
    pub const fn with_software_reset(mut self, reset: bool) -> Self {
        self.software_reset = reset;
        self
    }

    /// Set the poll interval
    pub const fn with_poll_interval_ms(mut self, interval_ms: u32) -> Self {
        self.poll_interval_ms = interval_ms;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0x08..=0x77).contains(&self.address) {
            return Err(ConfigError::InvalidAddress(self.address));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }
}

/// GPIO binary sensor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinarySensorConfig {
    /// Chip GPIO number (0-31)
    pub pin: u8,
    /// Input mode
    pub pin_mode: PinMode,
    /// Report `true` when the pin reads low
    pub inverted: bool,
}

impl BinarySensorConfig {
    /// Create a config with the NeoKey defaults: pull-up, active-low
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            pin_mode: PinMode::InputPullup,
            inverted: true,
        }
    }

    /// Set the input mode
    pub const fn with_pin_mode(mut self, mode: PinMode) -> Self {
        self.pin_mode = mode;
        self
    }

    /// Set the inversion flag
    pub const fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Bit mask of this pin in the bulk GPIO registers
    pub const fn pin_mask(&self) -> u32 {
        1u32 << (self.pin & 0x1F)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_pin(self.pin)
    }
}

/// NeoPixel strip configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NeoPixelConfig {
    /// Chip pin the strip data line is wired to
    pub pin: u8,
    /// Number of LEDs
    pub num_leds: u16,
    /// Channel order on the wire
    pub color_order: ColorOrder,
    /// Channels the light is driven with
    pub color_mode: ColorMode,
}

impl NeoPixelConfig {
    /// Create a config for `num_leds` GRB LEDs on the default pin
    pub const fn new(num_leds: u16) -> Self {
        Self {
            pin: DEFAULT_NEOPIXEL_PIN,
            num_leds,
            color_order: ColorOrder::Grb,
            color_mode: ColorMode::Rgb,
        }
    }

    /// Set the data pin
    pub const fn with_pin(mut self, pin: u8) -> Self {
        self.pin = pin;
        self
    }

    /// Set the color order, adopting the color mode it implies
    pub const fn with_color_order(mut self, order: ColorOrder) -> Self {
        self.color_order = order;
        self.color_mode = order.mode();
        self
    }

    /// Override the color mode
    ///
    /// Must agree with the color order's channel count.
    pub const fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    /// Bytes per pixel on the wire
    pub const fn bytes_per_pixel(&self) -> usize {
        self.color_order.bytes_per_pixel()
    }

    /// Total pixel buffer length in bytes
    pub const fn buffer_len(&self) -> usize {
        self.num_leds as usize * self.bytes_per_pixel()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_pin(self.pin)?;
        if self.num_leds == 0 {
            return Err(ConfigError::NoLeds);
        }
        if self.num_leds as usize > MAX_LEDS {
            return Err(ConfigError::TooManyLeds(self.num_leds));
        }
        if self.color_mode.channels() != self.color_order.bytes_per_pixel() {
            return Err(ConfigError::ChannelMismatch {
                order: self.color_order,
                mode: self.color_mode,
            });
        }
        Ok(())
    }
}

/// Complete configuration of one Seesaw chip
///
/// Sub-devices are listed in registration order, which is the order they
/// are ticked in.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeesawConfig {
    /// Chip settings
    pub device: DeviceConfig,
    /// GPIO binary sensors
    pub binary_sensors: Vec<BinarySensorConfig, MAX_BINARY_SENSORS>,
    /// NeoPixel strip, if any
    pub light: Option<NeoPixelConfig>,
}

impl SeesawConfig {
    /// Create a configuration with no sub-devices
    pub fn new(device: DeviceConfig) -> Self {
        Self {
            device,
            binary_sensors: Vec::new(),
            light: None,
        }
    }

    /// Add a binary sensor
    pub fn add_binary_sensor(&mut self, sensor: BinarySensorConfig) -> Result<(), ConfigError> {
        self.binary_sensors
            .push(sensor)
            .map_err(|_| ConfigError::TooManySensors)
    }

    /// Set the light
    pub fn set_light(&mut self, light: NeoPixelConfig) -> Result<(), ConfigError> {
        if self.light.is_some() {
            return Err(ConfigError::LightAlreadyAttached);
        }
        self.light = Some(light);
        Ok(())
    }

    /// Find the binary sensor on `pin`
    pub fn find_sensor(&self, pin: u8) -> Option<&BinarySensorConfig> {
        self.binary_sensors.iter().find(|s| s.pin == pin)
    }

    /// Validate the chip settings, every sub-device and pin assignment
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.device.validate()?;

        let mut used = 0u32;
        for sensor in &self.binary_sensors {
            sensor.validate()?;
            if used & sensor.pin_mask() != 0 {
                return Err(ConfigError::PinInUse(sensor.pin));
            }
            used |= sensor.pin_mask();
        }

        if let Some(light) = &self.light {
            light.validate()?;
            if used & (1u32 << light.pin) != 0 {
                return Err(ConfigError::PinInUse(light.pin));
            }
        }

        Ok(())
    }
}
