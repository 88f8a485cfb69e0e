//! I2C interface trait
//!
//! This module defines the blocking I2C master interface that platform
//! implementations must provide. The gauge polls its peripherals from a
//! single loop, so the blocking form is sufficient.

use crate::platform::Result;

/// I2C bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I2cConfig {
    /// Bus frequency in Hz
    pub frequency: u32,
    /// Transaction timeout in microseconds
    pub timeout_us: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            frequency: 400_000,
            timeout_us: 1_000_000,
        }
    }
}

/// Blocking I2C master interface trait
///
/// Addresses are 7-bit. All operations are complete transactions with a
/// final STOP condition.
pub trait I2cInterface {
    /// Write bytes to a device
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c(I2cError::Nack)` if the device does not
    /// acknowledge, `I2cError::Timeout` if the bus stalls.
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()>;

    /// Read bytes from a device
    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()>;

    /// Write then read without releasing the bus in between
    ///
    /// The usual register-read shape: write the register pointer, repeated
    /// START, read the register contents.
    fn write_read(&mut self, addr: u8, data: &[u8], buffer: &mut [u8]) -> Result<()>;
}
