//! Scripted Seesaw chip for unit tests

use std::collections::HashMap;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use seesaw_hal::{I2cBus, TransportError};

use super::registers::{gpio, module, status};

/// OPTIONS value of a NeoKey 1x4: status, GPIO and NeoPixel modules
pub const NEOKEY_OPTIONS: u32 =
    (1 << module::STATUS) | (1 << module::GPIO) | (1 << module::NEOPIXEL);

/// Mock chip recording every successful write
pub struct MockBus {
    /// Address the chip answers on
    pub address: u8,
    /// Every acknowledged write, register header included
    pub writes: Vec<Vec<u8>>,
    /// NACK everything
    pub offline: bool,
    registers: HashMap<(u8, u8), Vec<u8>>,
    selected: Option<(u8, u8)>,
    nack_reads: usize,
    nack_writes: Vec<(u8, u8)>,
}

impl MockBus {
    /// ATtiny817 NeoKey at 0x30 with every key released
    pub fn neokey() -> Self {
        let mut bus = Self {
            address: 0x30,
            writes: Vec::new(),
            offline: false,
            registers: HashMap::new(),
            selected: None,
            nack_reads: 0,
            nack_writes: Vec::new(),
        };
        bus.set_register(module::STATUS, status::HW_ID, &[0x87]);
        bus.set_register(module::STATUS, status::OPTIONS, &NEOKEY_OPTIONS.to_be_bytes());
        // Product 4980, date code 0x2A41
        bus.set_register(module::STATUS, status::VERSION, &[0x13, 0x74, 0x2A, 0x41]);
        bus.set_gpio(u32::MAX);
        bus
    }

    /// Script the value returned when `module`/`function` is read
    pub fn set_register(&mut self, module: u8, function: u8, value: &[u8]) {
        self.registers.insert((module, function), value.to_vec());
    }

    /// Script the bulk GPIO levels
    pub fn set_gpio(&mut self, bits: u32) {
        self.set_register(module::GPIO, gpio::BULK, &bits.to_be_bytes());
    }

    /// NACK the next `count` reads
    pub fn nack_next_reads(&mut self, count: usize) {
        self.nack_reads = count;
    }

    /// NACK the next write to `module`/`function`
    pub fn nack_next_write(&mut self, module: u8, function: u8) {
        self.nack_writes.push((module, function));
    }

    /// Payloads (header stripped) of every write to `module`/`function`
    pub fn writes_to(&self, module: u8, function: u8) -> Vec<&[u8]> {
        self.writes
            .iter()
            .filter(|w| w.len() >= 2 && w[0] == module && w[1] == function)
            .map(|w| &w[2..])
            .collect()
    }

    /// Writes to any register of `module`
    pub fn module_writes(&self, module: u8) -> usize {
        self.writes.iter().filter(|w| w.first() == Some(&module)).count()
    }
}

impl I2cBus for MockBus {
    type Error = TransportError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        if self.offline || address != self.address {
            return Err(TransportError::Nack);
        }
        if data.len() >= 2 {
            let register = (data[0], data[1]);
            if let Some(pos) = self.nack_writes.iter().position(|r| *r == register) {
                self.nack_writes.remove(pos);
                return Err(TransportError::Nack);
            }
            self.selected = Some(register);
        }
        self.writes.push(data.to_vec());
        Ok(())
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        if self.offline || address != self.address {
            return Err(TransportError::Nack);
        }
        if self.nack_reads > 0 {
            self.nack_reads -= 1;
            return Err(TransportError::Nack);
        }
        let value = self
            .selected
            .and_then(|register| self.registers.get(&register))
            .ok_or(TransportError::Nack)?;
        if value.len() < buf.len() {
            return Err(TransportError::ShortRead);
        }
        buf.copy_from_slice(&value[..buf.len()]);
        Ok(())
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.write(address, write_data)?;
        self.read(address, read_buf)
    }
}

/// Delay that returns immediately and accumulates the requested time
#[derive(Debug, Default)]
pub struct NoopDelay {
    pub elapsed_ns: u64,
}

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += ns as u64;
    }
}
