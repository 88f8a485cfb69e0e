//! Mock Platform implementation for testing

use crate::platform::{
    error::PlatformError,
    traits::{GpioMode, I2cConfig, Platform, SpiConfig},
    Result,
};

use super::{MockGpio, MockI2c, MockSpi, MockTimer};
use std::vec::Vec;

/// Mock Platform implementation
///
/// Provides mock peripheral implementations for hardware-free testing, with
/// the same resource accounting as the real board (a pin or bus can only be
/// claimed once).
///
/// # Example
///
/// ```
/// use pico_gauge::platform::mock::MockPlatform;
/// use pico_gauge::platform::traits::{GpioInterface, GpioMode, Platform};
///
/// let mut platform = MockPlatform::new();
/// let mut led = platform.create_gpio(25, GpioMode::OutputPushPull).unwrap();
/// led.set_high().unwrap();
/// ```
#[derive(Debug)]
pub struct MockPlatform {
    timer: MockTimer,
    i2c_allocated: Vec<u8>,
    spi_allocated: Vec<u8>,
    gpio_allocated: Vec<u8>,
}

impl MockPlatform {
    /// Create a new mock platform
    pub fn new() -> Self {
        Self {
            timer: MockTimer::new(),
            i2c_allocated: Vec::new(),
            spi_allocated: Vec::new(),
            gpio_allocated: Vec::new(),
        }
    }

    /// Maximum number of I2C peripherals
    pub const MAX_I2CS: u8 = 2;

    /// Maximum number of SPI peripherals
    pub const MAX_SPIS: u8 = 2;

    /// Maximum GPIO pin number
    pub const MAX_GPIO: u8 = 29;
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for MockPlatform {
    type Gpio = MockGpio;
    type I2c = MockI2c;
    type Spi = MockSpi;
    type Timer = MockTimer;

    fn init() -> Result<Self> {
        Ok(Self::new())
    }

    fn system_clock_hz(&self) -> u32 {
        150_000_000 // Simulated 150 MHz system clock
    }

    fn create_gpio(&mut self, pin: u8, mode: GpioMode) -> Result<Self::Gpio> {
        if pin > Self::MAX_GPIO {
            return Err(PlatformError::ResourceUnavailable);
        }
        if self.gpio_allocated.contains(&pin) {
            return Err(PlatformError::ResourceUnavailable);
        }
        self.gpio_allocated.push(pin);
        Ok(MockGpio::new(mode))
    }

    fn create_i2c(&mut self, i2c_id: u8, config: I2cConfig) -> Result<Self::I2c> {
        if i2c_id >= Self::MAX_I2CS || self.i2c_allocated.contains(&i2c_id) {
            return Err(PlatformError::ResourceUnavailable);
        }
        self.i2c_allocated.push(i2c_id);
        Ok(MockI2c::new(config))
    }

    fn create_spi(&mut self, spi_id: u8, config: SpiConfig) -> Result<Self::Spi> {
        if spi_id >= Self::MAX_SPIS || self.spi_allocated.contains(&spi_id) {
            return Err(PlatformError::ResourceUnavailable);
        }
        self.spi_allocated.push(spi_id);
        Ok(MockSpi::new(config))
    }

    fn timer(&self) -> &Self::Timer {
        &self.timer
    }

    fn timer_mut(&mut self) -> &mut Self::Timer {
        &mut self.timer
    }
}
