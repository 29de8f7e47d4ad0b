//! Register-level access to one Seesaw chip
//!
//! A register read selects the register with a two-byte write, waits for
//! the firmware to prepare the response, then reads it back in a separate
//! transaction.

use embedded_hal::delay::DelayNs;
use seesaw_core::config::PinMode;
use seesaw_hal::{I2cBus, TransportError};

use super::registers::{
    gpio, module, status, NEOPIXEL_CHUNK_LEN, READ_DELAY_US, RESET_DELAY_MS, RESET_MAGIC,
};

/// Largest data payload of a single register write (buffer offset plus one chunk)
pub const MAX_WRITE_DATA: usize = 2 + NEOPIXEL_CHUNK_LEN;

/// Bus handle bound to one chip address
pub struct SeesawBus<B, D> {
    bus: B,
    delay: D,
    address: u8,
}

impl<B: I2cBus, D: DelayNs> SeesawBus<B, D> {
    /// Create a handle for the chip at `address`
    ///
    /// # Arguments
    /// * `bus` - I2C transport
    /// * `delay` - Blocking delay used for read turnaround and reset settling
    /// * `address` - 7-bit chip address
    pub fn new(bus: B, delay: D, address: u8) -> Self {
        Self {
            bus,
            delay,
            address,
        }
    }

    /// Chip address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the transport and delay
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    /// Write `data` to a register
    ///
    /// # Arguments
    /// * `module` - Module base address
    /// * `function` - Function register within the module
    /// * `data` - Payload, at most [`MAX_WRITE_DATA`] bytes
    pub fn write_register(
        &mut self,
        module: u8,
        function: u8,
        data: &[u8],
    ) -> Result<(), TransportError> {
        if data.len() > MAX_WRITE_DATA {
            return Err(TransportError::Other);
        }

        let mut frame = [0u8; 2 + MAX_WRITE_DATA];
        frame[0] = module;
        frame[1] = function;
        frame[2..2 + data.len()].copy_from_slice(data);

        self.bus
            .write(self.address, &frame[..2 + data.len()])
            .map_err(Into::into)
    }

    /// Read a register into `buf`
    pub fn read_register(
        &mut self,
        module: u8,
        function: u8,
        buf: &mut [u8],
    ) -> Result<(), TransportError> {
        self.bus
            .write(self.address, &[module, function])
            .map_err(Into::into)?;
        self.delay.delay_us(READ_DELAY_US);
        self.bus.read(self.address, buf).map_err(Into::into)
    }

    /// Read a one-byte register
    pub fn read_u8(&mut self, module: u8, function: u8) -> Result<u8, TransportError> {
        let mut buf = [0u8; 1];
        self.read_register(module, function, &mut buf)?;
        Ok(buf[0])
    }

    /// Read a big-endian 32-bit register
    pub fn read_u32(&mut self, module: u8, function: u8) -> Result<u32, TransportError> {
        let mut buf = [0u8; 4];
        self.read_register(module, function, &mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Write a big-endian 32-bit register
    pub fn write_u32(&mut self, module: u8, function: u8, value: u32) -> Result<(), TransportError> {
        self.write_register(module, function, &value.to_be_bytes())
    }

    /// Reset the chip and wait for it to come back
    ///
    /// The settle delay runs even when the reset write fails.
    pub fn software_reset(&mut self) -> Result<(), TransportError> {
        let result = self.write_register(module::STATUS, status::SWRST, &[RESET_MAGIC]);
        self.delay.delay_ms(RESET_DELAY_MS);
        result
    }

    /// Configure every pin in `mask` as an input
    pub fn set_input_mode(&mut self, mask: u32, mode: PinMode) -> Result<(), TransportError> {
        self.write_u32(module::GPIO, gpio::DIRCLR_BULK, mask)?;
        match mode {
            PinMode::Input => self.write_u32(module::GPIO, gpio::PULLENCLR, mask),
            PinMode::InputPullup => {
                self.write_u32(module::GPIO, gpio::PULLENSET, mask)?;
                // Output latch high selects the pull-up over the pull-down
                self.write_u32(module::GPIO, gpio::BULK_SET, mask)
            }
        }
    }

    /// Read the level of every GPIO, bit N for pin N
    pub fn digital_read_bulk(&mut self) -> Result<u32, TransportError> {
        self.read_u32(module::GPIO, gpio::BULK)
    }

    #[cfg(test)]
    pub(crate) fn transport_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    #[cfg(test)]
    pub(crate) fn delay_ref(&self) -> &D {
        &self.delay
    }
}
