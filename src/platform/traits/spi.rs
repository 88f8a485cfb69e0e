//! SPI interface trait
//!
//! This module defines the blocking SPI bus interface that platform
//! implementations must provide. Chip select is managed by the caller
//! (the SD card stack composes the bus with a CS pin itself).

use crate::platform::Result;

/// SPI clock mode (CPOL/CPHA)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpiMode {
    /// CPOL = 0, CPHA = 0
    #[default]
    Mode0,
    /// CPOL = 0, CPHA = 1
    Mode1,
    /// CPOL = 1, CPHA = 0
    Mode2,
    /// CPOL = 1, CPHA = 1
    Mode3,
}

/// SPI bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiConfig {
    /// Bus frequency in Hz
    pub frequency: u32,
    /// Clock polarity and phase
    pub mode: SpiMode,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 400_000,
            mode: SpiMode::Mode0,
        }
    }
}

/// Blocking SPI bus interface trait
pub trait SpiInterface {
    /// Write bytes, discarding the bytes clocked in
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Full-duplex transfer: clock out `data`, overwrite it with the bytes
    /// clocked in
    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<()>;
}
