//! Seesaw device core
//!
//! Owns the chip's bus handle and its sub-drivers. Initialization resets
//! and probes the chip, then configures each sub-driver; the periodic
//! tick reads sensors and flushes the light, isolating failures per
//! sub-driver so one NACK never takes its siblings down.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use seesaw_core::config::{
    BinarySensorConfig, ConfigError, DeviceConfig, NeoPixelConfig, SeesawConfig,
    MAX_BINARY_SENSORS,
};
use seesaw_core::traits::Tickable;
use seesaw_hal::{I2cBus, TransportError};

use super::bus::SeesawBus;
use super::gpio::{GpioBinarySensor, SensorId, StateCallback};
use super::neopixel::{LightView, NeoPixelStrip};
use super::registers::{module, status, HardwareId};

/// Sub-drivers per device: every binary sensor plus the light
pub const MAX_SUB_DRIVERS: usize = MAX_BINARY_SENSORS + 1;

/// Device lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// `initialize` has not run
    #[default]
    Uninitialized,
    /// Probe passed and every sub-driver completed its last tick
    Ready,
    /// Probe passed but a sub-driver failed its last tick, its setup or
    /// a direct light flush
    Degraded,
    /// Probe failed; sub-drivers are idle until `initialize` succeeds
    Failed,
}

impl DeviceState {
    /// Check if sub-drivers may talk to the chip
    pub const fn is_operational(self) -> bool {
        matches!(self, DeviceState::Ready | DeviceState::Degraded)
    }
}

/// Modules compiled into the chip firmware, from the OPTIONS register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capabilities(u32);

impl Capabilities {
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Check if the module at base address `module` is present
    pub const fn has(self, module: u8) -> bool {
        module < 32 && self.0 & (1 << module) != 0
    }
}

/// Product and date code from the VERSION register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProductInfo {
    /// Adafruit product number
    pub product_code: u16,
    /// Firmware build date code
    pub date_code: u16,
}

impl ProductInfo {
    pub const fn from_version(version: u32) -> Self {
        Self {
            product_code: (version >> 16) as u16,
            date_code: version as u16,
        }
    }
}

/// Why the chip probe failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeFailure {
    /// The chip did not answer
    Bus(TransportError),
    /// HW_ID is not a known Seesaw chip
    UnknownHardwareId(u8),
}

/// Initialization errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    ProbeFailed(ProbeFailure),
}

/// Runtime errors surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SeesawError {
    /// Bus transaction failed; retry later
    Transport(TransportError),
    /// The device is not initialized or its probe failed
    NotReady,
    /// The chip firmware lacks the module needed
    Unsupported,
}

impl From<TransportError> for SeesawError {
    fn from(e: TransportError) -> Self {
        SeesawError::Transport(e)
    }
}

enum SubDriver {
    Sensor(GpioBinarySensor),
    Light(NeoPixelStrip),
}

impl SubDriver {
    fn name(&self) -> &'static str {
        match self {
            SubDriver::Sensor(_) => "binary sensor",
            SubDriver::Light(_) => "neopixel",
        }
    }

    fn pin(&self) -> u8 {
        match self {
            SubDriver::Sensor(s) => s.pin(),
            SubDriver::Light(l) => l.config().pin,
        }
    }

    fn reset_setup(&mut self) {
        match self {
            SubDriver::Sensor(s) => s.reset_setup(),
            SubDriver::Light(l) => l.reset_setup(),
        }
    }

    fn configure<B: I2cBus, D: DelayNs>(
        &mut self,
        bus: &mut SeesawBus<B, D>,
        capabilities: Capabilities,
    ) -> Result<(), TransportError> {
        match self {
            SubDriver::Sensor(s) => s.configure(bus, capabilities),
            SubDriver::Light(l) => l.configure(bus, capabilities),
        }
    }

    fn tick<B: I2cBus, D: DelayNs>(
        &mut self,
        bus: &mut SeesawBus<B, D>,
        capabilities: Capabilities,
    ) -> Result<(), TransportError> {
        match self {
            SubDriver::Sensor(s) => s.tick(bus, capabilities),
            SubDriver::Light(l) => l.tick(bus, capabilities),
        }
    }
}

/// One Seesaw chip and the sub-drivers bound to it
pub struct SeesawDevice<B, D> {
    bus: SeesawBus<B, D>,
    config: DeviceConfig,
    state: DeviceState,
    hardware_id: Option<HardwareId>,
    product: Option<ProductInfo>,
    capabilities: Capabilities,
    /// Registration order is tick order
    children: Vec<SubDriver, MAX_SUB_DRIVERS>,
    sensor_count: usize,
    used_pins: u32,
}

impl<B: I2cBus, D: DelayNs> SeesawDevice<B, D> {
    /// Create a device with no sub-drivers
    ///
    /// # Arguments
    /// * `bus` - I2C transport the chip sits on
    /// * `delay` - Blocking delay for register reads and reset settling
    /// * `config` - Chip settings
    pub fn new(bus: B, delay: D, config: DeviceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            bus: SeesawBus::new(bus, delay, config.address),
            config,
            state: DeviceState::Uninitialized,
            hardware_id: None,
            product: None,
            capabilities: Capabilities::default(),
            children: Vec::new(),
            sensor_count: 0,
            used_pins: 0,
        })
    }

    /// Create a device with every sub-driver in `config`, in order
    pub fn from_config(bus: B, delay: D, config: &SeesawConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut device = Self::new(bus, delay, config.device)?;
        for sensor in &config.binary_sensors {
            device.add_binary_sensor(*sensor)?;
        }
        if let Some(light) = config.light {
            device.add_light(light)?;
        }
        Ok(device)
    }

    /// Register a binary sensor
    ///
    /// Sensors added after initialization are configured on the next tick.
    pub fn add_binary_sensor(&mut self, config: BinarySensorConfig) -> Result<SensorId, ConfigError> {
        config.validate()?;
        if self.sensor_count >= MAX_BINARY_SENSORS {
            return Err(ConfigError::TooManySensors);
        }
        self.claim_pin(config.pin)?;

        let id = SensorId(self.children.len() as u8);
        self.children
            .push(SubDriver::Sensor(GpioBinarySensor::new(id, config)))
            .map_err(|_| ConfigError::TooManySensors)?;
        self.sensor_count += 1;
        Ok(id)
    }

    /// Attach the light; a chip drives at most one
    pub fn add_light(&mut self, config: NeoPixelConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if self.strip().is_some() {
            return Err(ConfigError::LightAlreadyAttached);
        }
        self.claim_pin(config.pin)?;

        self.children
            .push(SubDriver::Light(NeoPixelStrip::new(config)))
            .map_err(|_| ConfigError::LightAlreadyAttached)
    }

    fn claim_pin(&mut self, pin: u8) -> Result<(), ConfigError> {
        let mask = 1u32 << pin;
        if self.used_pins & mask != 0 {
            return Err(ConfigError::PinInUse(pin));
        }
        self.used_pins |= mask;
        Ok(())
    }

    /// Call `callback` whenever sensor `id` publishes
    ///
    /// Returns `false` if `id` is not a sensor on this device.
    pub fn on_state_change(&mut self, id: SensorId, callback: StateCallback) -> bool {
        match self.children.get_mut(id.index()) {
            Some(SubDriver::Sensor(sensor)) => {
                sensor.set_callback(callback);
                true
            }
            _ => false,
        }
    }

    /// Reset and probe the chip, then configure every sub-driver
    ///
    /// A failed reset is logged and ignored. A failed probe leaves the
    /// device [`Failed`](DeviceState::Failed). Sub-drivers whose setup
    /// fails stay pending and are retried each tick; the device is then
    /// [`Degraded`](DeviceState::Degraded) but initialization succeeds.
    ///
    /// Calling this again repeats the whole sequence.
    pub fn initialize(&mut self) -> Result<(), InitError> {
        let address = self.bus.address();
        info!("seesaw@{:#x}: initializing", address);

        if self.config.software_reset {
            if let Err(e) = self.bus.software_reset() {
                warn!("seesaw@{:#x}: software reset failed: {:?}", address, e);
            }
        }

        if let Err(failure) = self.probe() {
            self.state = DeviceState::Failed;
            error!("seesaw@{:#x}: probe failed: {:?}", address, failure);
            return Err(InitError::ProbeFailed(failure));
        }

        let mut failures = 0usize;
        for child in self.children.iter_mut() {
            child.reset_setup();
            if let Err(e) = child.configure(&mut self.bus, self.capabilities) {
                warn!(
                    "seesaw@{:#x}: {} on pin {} setup failed: {:?}",
                    address,
                    child.name(),
                    child.pin(),
                    e
                );
                failures += 1;
            }
        }

        self.state = if failures == 0 {
            DeviceState::Ready
        } else {
            DeviceState::Degraded
        };
        info!(
            "seesaw@{:#x}: {} sub-drivers, state {:?}",
            address,
            self.children.len(),
            self.state
        );
        Ok(())
    }

    fn probe(&mut self) -> Result<(), ProbeFailure> {
        let raw_id = self
            .bus
            .read_u8(module::STATUS, status::HW_ID)
            .map_err(ProbeFailure::Bus)?;
        let hardware_id =
            HardwareId::try_from(raw_id).map_err(ProbeFailure::UnknownHardwareId)?;

        let options = self
            .bus
            .read_u32(module::STATUS, status::OPTIONS)
            .map_err(ProbeFailure::Bus)?;
        let version = self
            .bus
            .read_u32(module::STATUS, status::VERSION)
            .map_err(ProbeFailure::Bus)?;

        let product = ProductInfo::from_version(version);
        self.hardware_id = Some(hardware_id);
        self.capabilities = Capabilities::from_bits(options);
        self.product = Some(product);

        info!(
            "seesaw@{:#x}: {} product {} date {}, options {:#x}",
            self.bus.address(),
            hardware_id.name(),
            product.product_code,
            product.date_code,
            options
        );
        Ok(())
    }

    /// Tick every sub-driver once, in registration order
    ///
    /// Does nothing until initialization succeeds. Each sub-driver gets
    /// one attempt; failures are logged and decide the device state.
    pub fn poll_tick(&mut self) {
        if !self.state.is_operational() {
            return;
        }

        let address = self.bus.address();
        let mut failures = 0usize;
        for child in self.children.iter_mut() {
            if let Err(e) = child.tick(&mut self.bus, self.capabilities) {
                warn!(
                    "seesaw@{:#x}: {} on pin {} tick failed: {:?}",
                    address,
                    child.name(),
                    child.pin(),
                    e
                );
                failures += 1;
            }
        }

        match (self.state, failures) {
            (DeviceState::Ready, f) if f > 0 => {
                warn!("seesaw@{:#x}: degraded, {} failures", address, f);
                self.state = DeviceState::Degraded;
            }
            (DeviceState::Degraded, 0) => {
                info!("seesaw@{:#x}: recovered", address);
                self.state = DeviceState::Ready;
            }
            _ => {}
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn address(&self) -> u8 {
        self.bus.address()
    }

    /// Chip identified by the last successful probe
    pub fn hardware_id(&self) -> Option<HardwareId> {
        self.hardware_id
    }

    pub fn product(&self) -> Option<ProductInfo> {
        self.product
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Binary sensor registered as `id`
    pub fn sensor(&self, id: SensorId) -> Option<&GpioBinarySensor> {
        match self.children.get(id.index()) {
            Some(SubDriver::Sensor(sensor)) => Some(sensor),
            _ => None,
        }
    }

    /// Every binary sensor, in registration order
    pub fn sensors(&self) -> impl Iterator<Item = &GpioBinarySensor> {
        self.children.iter().filter_map(|child| match child {
            SubDriver::Sensor(sensor) => Some(sensor),
            SubDriver::Light(_) => None,
        })
    }

    /// Attached light's buffer, without bus access
    pub fn strip(&self) -> Option<&NeoPixelStrip> {
        self.children.iter().find_map(|child| match child {
            SubDriver::Light(strip) => Some(strip),
            SubDriver::Sensor(_) => None,
        })
    }

    /// Attached light, able to flush immediately
    pub fn light(&mut self) -> Option<LightView<'_, B, D>> {
        let capabilities = self.capabilities;
        let strip = self.children.iter_mut().find_map(|child| match child {
            SubDriver::Light(strip) => Some(strip),
            SubDriver::Sensor(_) => None,
        })?;

        Some(LightView {
            strip,
            bus: &mut self.bus,
            capabilities,
            state: &mut self.state,
        })
    }

    /// Release the transport and delay
    pub fn release(self) -> (B, D) {
        self.bus.release()
    }

    #[cfg(test)]
    pub(crate) fn bus_mut(&mut self) -> &mut B {
        self.bus.transport_mut()
    }

    #[cfg(test)]
    pub(crate) fn delay_ref(&self) -> &D {
        self.bus.delay_ref()
    }
}

impl<B: I2cBus, D: DelayNs> Tickable for SeesawDevice<B, D> {
    fn tick(&mut self) {
        self.poll_tick();
    }

    fn interval_ms(&self) -> u32 {
        self.config.poll_interval_ms
    }
}
