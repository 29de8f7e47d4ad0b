//! GPIO binary sensor
//!
//! Reports the level of one chip pin, publishing the first reading and
//! every change after it.

use embedded_hal::delay::DelayNs;
use seesaw_core::config::BinarySensorConfig;
use seesaw_core::traits::BinarySensor;
use seesaw_hal::{I2cBus, TransportError};

use super::bus::SeesawBus;
use super::device::Capabilities;
use super::registers::module;
use super::SetupState;

/// Handle to a binary sensor registered on a [`SeesawDevice`](super::SeesawDevice)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorId(pub(crate) u8);

impl SensorId {
    /// Registration slot on the device
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Called with the new level whenever a sensor publishes
pub type StateCallback = fn(SensorId, bool);

/// Binary sensor on one Seesaw GPIO
pub struct GpioBinarySensor {
    id: SensorId,
    config: BinarySensorConfig,
    setup: SetupState,
    state: Option<bool>,
    on_change: Option<StateCallback>,
}

impl GpioBinarySensor {
    pub(crate) fn new(id: SensorId, config: BinarySensorConfig) -> Self {
        Self {
            id,
            config,
            setup: SetupState::Pending,
            state: None,
            on_change: None,
        }
    }

    pub fn id(&self) -> SensorId {
        self.id
    }

    pub fn config(&self) -> &BinarySensorConfig {
        &self.config
    }

    pub fn pin(&self) -> u8 {
        self.config.pin
    }

    pub fn setup_state(&self) -> SetupState {
        self.setup
    }

    pub(crate) fn set_callback(&mut self, callback: StateCallback) {
        self.on_change = Some(callback);
    }

    pub(crate) fn reset_setup(&mut self) {
        self.setup = SetupState::Pending;
    }

    /// Put the pin into its input mode
    pub(crate) fn configure<B: I2cBus, D: DelayNs>(
        &mut self,
        bus: &mut SeesawBus<B, D>,
        capabilities: Capabilities,
    ) -> Result<(), TransportError> {
        if !capabilities.has(module::GPIO) {
            if self.setup != SetupState::Unsupported {
                warn!(
                    "seesaw@{:#x}: no GPIO module, sensor on pin {} disabled",
                    bus.address(),
                    self.config.pin
                );
            }
            self.setup = SetupState::Unsupported;
            return Ok(());
        }

        bus.set_input_mode(self.config.pin_mask(), self.config.pin_mode)?;
        self.setup = SetupState::Configured;
        debug!(
            "seesaw@{:#x}: pin {} configured as {}",
            bus.address(),
            self.config.pin,
            self.config.pin_mode.as_str()
        );
        Ok(())
    }

    /// Read the pin once, finishing setup first if it is still pending
    pub(crate) fn tick<B: I2cBus, D: DelayNs>(
        &mut self,
        bus: &mut SeesawBus<B, D>,
        capabilities: Capabilities,
    ) -> Result<(), TransportError> {
        if self.setup == SetupState::Pending {
            self.configure(bus, capabilities)?;
        }
        if self.setup != SetupState::Configured {
            return Ok(());
        }

        let levels = bus.digital_read_bulk()?;
        self.process(levels);
        Ok(())
    }

    /// Feed one bulk GPIO sample
    ///
    /// Returns the level when it was published: on the first sample and
    /// on every change.
    pub(crate) fn process(&mut self, levels: u32) -> Option<bool> {
        let level = (levels & self.config.pin_mask() != 0) ^ self.config.inverted;
        if self.state == Some(level) {
            return None;
        }

        self.state = Some(level);
        debug!("binary sensor on pin {}: {}", self.config.pin, level);
        if let Some(callback) = self.on_change {
            callback(self.id, level);
        }
        Some(level)
    }
}

impl BinarySensor for GpioBinarySensor {
    fn state(&self) -> Option<bool> {
        self.state
    }
}
