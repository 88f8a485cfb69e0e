//! Root platform trait
//!
//! This module defines the root Platform trait that aggregates all peripheral
//! interfaces.

use super::{GpioInterface, GpioMode, I2cConfig, I2cInterface, SpiConfig, SpiInterface, TimerInterface};
use crate::platform::Result;

/// Root platform trait
///
/// This trait aggregates the platform-specific peripheral interfaces and
/// provides platform initialization.
///
/// Platform implementations provide concrete types for each peripheral
/// interface via associated types, so drivers dispatch at compile time.
pub trait Platform: Sized {
    /// GPIO peripheral type
    type Gpio: GpioInterface;

    /// I2C peripheral type
    type I2c: I2cInterface;

    /// SPI peripheral type
    type Spi: SpiInterface;

    /// Timer peripheral type
    type Timer: TimerInterface;

    /// Initialize the platform
    ///
    /// Performs platform-specific initialization (clock configuration,
    /// peripheral reset).
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InitializationFailed` if initialization fails.
    fn init() -> Result<Self>;

    /// Get system clock frequency in Hz
    fn system_clock_hz(&self) -> u32;

    /// Create a GPIO peripheral instance
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ResourceUnavailable` if the pin is already in
    /// use or the pin number is invalid.
    fn create_gpio(&mut self, pin: u8, mode: GpioMode) -> Result<Self::Gpio>;

    /// Create an I2C peripheral instance
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ResourceUnavailable` if the I2C bus is already
    /// in use or the bus ID is invalid.
    fn create_i2c(&mut self, i2c_id: u8, config: I2cConfig) -> Result<Self::I2c>;

    /// Create an SPI peripheral instance
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ResourceUnavailable` if the SPI bus is already
    /// in use or the bus ID is invalid.
    fn create_spi(&mut self, spi_id: u8, config: SpiConfig) -> Result<Self::Spi>;

    /// Get timer instance
    fn timer(&self) -> &Self::Timer;

    /// Get mutable timer instance
    fn timer_mut(&mut self) -> &mut Self::Timer;
}
