//! RP2350 I2C implementation
//!
//! This module provides blocking I2C support for RP2350 using the
//! `rp235x-hal` crate. The wrapper is generic over the embedded-hal blocking
//! traits so it accepts any configured `rp235x_hal::I2C` instance.

use crate::platform::{
    error::{I2cError, PlatformError},
    traits::I2cInterface,
    Result,
};
use embedded_hal::blocking::i2c::{Read, Write, WriteRead};

/// RP2350 I2C implementation
///
/// Wraps a configured `rp235x-hal` I2C peripheral to implement the blocking
/// `I2cInterface` trait.
///
/// # Example
///
/// ```ignore
/// let i2c = hal::I2C::i2c0(
///     pac.I2C0,
///     pins.gpio4.reconfigure(), // SDA
///     pins.gpio5.reconfigure(), // SCL
///     400.kHz(),
///     &mut pac.RESETS,
///     &clocks.system_clock,
/// );
/// let mut i2c = Rp2350I2c::new(i2c);
/// ```
pub struct Rp2350I2c<T> {
    i2c: T,
}

impl<T> Rp2350I2c<T> {
    /// Create a new RP2350 I2C instance
    pub fn new(i2c: T) -> Self {
        Self { i2c }
    }

    /// Release the wrapped HAL peripheral
    pub fn free(self) -> T {
        self.i2c
    }
}

impl<T, E> I2cInterface for Rp2350I2c<T>
where
    T: Write<Error = E> + Read<Error = E> + WriteRead<Error = E>,
{
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        // An aborted write is almost always an absent or wedged device
        self.i2c
            .write(addr, data)
            .map_err(|_| PlatformError::I2c(I2cError::Nack))
    }

    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        self.i2c
            .read(addr, buffer)
            .map_err(|_| PlatformError::I2c(I2cError::BusError))
    }

    fn write_read(&mut self, addr: u8, data: &[u8], buffer: &mut [u8]) -> Result<()> {
        self.i2c
            .write_read(addr, data, buffer)
            .map_err(|_| PlatformError::I2c(I2cError::BusError))
    }
}
