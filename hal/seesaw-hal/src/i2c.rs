//! I2C bus abstractions
//!
//! Provides the transport trait the Seesaw driver is written against and
//! the error taxonomy every transport maps into.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c, NoAcknowledgeSource};

/// Transport-level failure of a single bus transaction
///
/// Every variant is recoverable: the caller retries on its next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Peripheral did not acknowledge its address or a data byte
    Nack,
    /// Transaction did not complete within the bus timeout
    Timeout,
    /// Fewer bytes were returned than requested
    ShortRead,
    /// Another master won arbitration
    ArbitrationLost,
    /// Bus error (misplaced START/STOP)
    Bus,
    /// Data overrun in the peripheral
    Overrun,
    /// Other error
    Other,
}

impl TransportError {
    /// Map an `embedded-hal` error kind onto the transport taxonomy
    pub fn from_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NoAcknowledge(_) => TransportError::Nack,
            ErrorKind::ArbitrationLoss => TransportError::ArbitrationLost,
            ErrorKind::Bus => TransportError::Bus,
            ErrorKind::Overrun => TransportError::Overrun,
            _ => TransportError::Other,
        }
    }
}

impl From<ErrorKind> for TransportError {
    fn from(kind: ErrorKind) -> Self {
        Self::from_kind(kind)
    }
}

impl From<TransportError> for ErrorKind {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Nack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown),
            TransportError::ArbitrationLost => ErrorKind::ArbitrationLoss,
            TransportError::Bus => ErrorKind::Bus,
            TransportError::Overrun => ErrorKind::Overrun,
            TransportError::Timeout | TransportError::ShortRead | TransportError::Other => {
                ErrorKind::Other
            }
        }
    }
}

/// I2C bus master
///
/// Provides basic I2C read/write operations for communicating with
/// peripheral devices. Implementations must bound every call with a
/// timeout and return promptly.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error: Into<TransportError>;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into, filled completely on success
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (typically register address)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read(address, buf)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        (**self).write_read(address, write_data, read_buf)
    }
}

/// Adapter exposing an `embedded-hal` 1.0 I2C peripheral as an [`I2cBus`]
///
/// Use `embedded-hal-bus` (or the chip HAL's shared-bus wrapper) when
/// several devices sit on the same bus.
pub struct HalI2c<I> {
    inner: I,
}

impl<I: I2c> HalI2c<I> {
    /// Wrap an I2C peripheral
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    /// Release the wrapped peripheral
    pub fn release(self) -> I {
        self.inner
    }
}

impl<I: I2c> I2cBus for HalI2c<I> {
    type Error = TransportError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.inner
            .write(address, data)
            .map_err(|e| TransportError::from_kind(e.kind()))
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.inner
            .read(address, buf)
            .map_err(|e| TransportError::from_kind(e.kind()))
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.inner
            .write_read(address, write_data, read_buf)
            .map_err(|e| TransportError::from_kind(e.kind()))
    }
}
