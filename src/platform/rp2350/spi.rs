//! RP2350 SPI implementation
//!
//! This module provides blocking SPI support for RP2350 using the
//! `rp235x-hal` crate.

use crate::platform::{
    error::{PlatformError, SpiError},
    traits::SpiInterface,
    Result,
};
use embedded_hal::blocking::spi::{Transfer, Write};

/// RP2350 SPI implementation
///
/// Wraps a configured `rp235x-hal` SPI bus to implement the blocking
/// `SpiInterface` trait. Chip select stays with the caller.
pub struct Rp2350Spi<T> {
    spi: T,
}

impl<T> Rp2350Spi<T> {
    /// Create a new RP2350 SPI instance
    pub fn new(spi: T) -> Self {
        Self { spi }
    }

    /// Release the wrapped HAL peripheral
    pub fn free(self) -> T {
        self.spi
    }
}

impl<T, E> SpiInterface for Rp2350Spi<T>
where
    T: Write<u8, Error = E> + Transfer<u8, Error = E>,
{
    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.spi
            .write(data)
            .map_err(|_| PlatformError::Spi(SpiError::TransferFailed))
    }

    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<()> {
        self.spi
            .transfer(data)
            .map(|_| ())
            .map_err(|_| PlatformError::Spi(SpiError::TransferFailed))
    }
}
