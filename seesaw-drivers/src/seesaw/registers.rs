//! Seesaw register map
//!
//! Every register is addressed by a module base byte followed by a
//! function byte. Multi-byte values travel big-endian. Only the registers
//! this driver touches are listed.

/// Module base addresses
pub mod module {
    pub const STATUS: u8 = 0x00;
    pub const GPIO: u8 = 0x01;
    pub const NEOPIXEL: u8 = 0x0E;
}

/// Status module functions
pub mod status {
    /// Hardware ID (1 byte)
    pub const HW_ID: u8 = 0x01;
    /// Product code (high half) and date code (low half)
    pub const VERSION: u8 = 0x02;
    /// Bitmask of compiled-in modules, bit N set for module base N
    pub const OPTIONS: u8 = 0x03;
    /// Software reset, any write triggers it
    pub const SWRST: u8 = 0x7F;
}

/// GPIO module functions, all taking 32-bit pin masks
pub mod gpio {
    /// Set pins to input
    pub const DIRCLR_BULK: u8 = 0x03;
    /// Read all pin levels
    pub const BULK: u8 = 0x04;
    /// Drive pins high (selects pull-up when the pull is enabled)
    pub const BULK_SET: u8 = 0x05;
    /// Enable pull resistors
    pub const PULLENSET: u8 = 0x0B;
    /// Disable pull resistors
    pub const PULLENCLR: u8 = 0x0C;
}

/// NeoPixel module functions
pub mod neopixel {
    /// Output pin (1 byte)
    pub const PIN: u8 = 0x01;
    /// Data rate (1 byte)
    pub const SPEED: u8 = 0x02;
    /// Pixel buffer length in bytes (2 bytes)
    pub const BUF_LENGTH: u8 = 0x03;
    /// Pixel buffer: 2-byte offset followed by data
    pub const BUF: u8 = 0x04;
    /// Latch the buffer onto the LEDs
    pub const SHOW: u8 = 0x05;

    /// 800 kHz data rate
    pub const SPEED_800KHZ: u8 = 0x01;
}

/// Delay between selecting a register and reading it back, in microseconds
pub const READ_DELAY_US: u32 = 250;

/// Time the chip needs to come back after a software reset, in milliseconds
pub const RESET_DELAY_MS: u32 = 10;

/// Value written to [`status::SWRST`]
pub const RESET_MAGIC: u8 = 0xFF;

/// Maximum pixel data bytes per buffer write
pub const NEOPIXEL_CHUNK_LEN: usize = 30;

/// Chips known to run Seesaw firmware, keyed by HW_ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum HardwareId {
    Samd09 = 0x55,
    Attiny806 = 0x84,
    Attiny807 = 0x85,
    Attiny816 = 0x86,
    Attiny817 = 0x87,
    Attiny1616 = 0x88,
    Attiny1617 = 0x89,
}

impl HardwareId {
    /// Chip name
    pub const fn name(self) -> &'static str {
        match self {
            HardwareId::Samd09 => "SAMD09",
            HardwareId::Attiny806 => "ATtiny806",
            HardwareId::Attiny807 => "ATtiny807",
            HardwareId::Attiny816 => "ATtiny816",
            HardwareId::Attiny817 => "ATtiny817",
            HardwareId::Attiny1616 => "ATtiny1616",
            HardwareId::Attiny1617 => "ATtiny1617",
        }
    }
}

impl TryFrom<u8> for HardwareId {
    type Error = u8;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0x55 => Ok(HardwareId::Samd09),
            0x84 => Ok(HardwareId::Attiny806),
            0x85 => Ok(HardwareId::Attiny807),
            0x86 => Ok(HardwareId::Attiny816),
            0x87 => Ok(HardwareId::Attiny817),
            0x88 => Ok(HardwareId::Attiny1616),
            0x89 => Ok(HardwareId::Attiny1617),
            other => Err(other),
        }
    }
}
