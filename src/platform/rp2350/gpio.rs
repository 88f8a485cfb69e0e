//! RP2350 GPIO implementation
//!
//! This module provides GPIO support for RP2350 using the `rp235x-hal` crate.

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};
use rp235x_hal::gpio::{FunctionSioInput, FunctionSioOutput, Pin, PinId, PullType};

/// RP2350 GPIO implementation
///
/// Wraps the `rp235x-hal` GPIO pin to implement the `GpioInterface` trait.
pub struct Rp2350Gpio<I: PinId, F: rp235x_hal::gpio::Function, P: PullType> {
    pin: Pin<I, F, P>,
    mode: GpioMode,
}

impl<I: PinId, F: rp235x_hal::gpio::Function, P: PullType> Rp2350Gpio<I, F, P> {
    /// Create a new RP2350 GPIO instance
    ///
    /// # Arguments
    ///
    /// * `pin` - The HAL GPIO pin, already configured for the right function
    /// * `mode` - GPIO mode matching the pin configuration
    pub fn new(pin: Pin<I, F, P>, mode: GpioMode) -> Self {
        Self { pin, mode }
    }

    /// Release the wrapped HAL pin
    pub fn free(self) -> Pin<I, F, P> {
        self.pin
    }
}

// Implementation for output pins
impl<I: PinId, P: PullType> GpioInterface for Rp2350Gpio<I, FunctionSioOutput, P> {
    fn set_high(&mut self) -> Result<()> {
        use embedded_hal::digital::v2::OutputPin;
        self.pin
            .set_high()
            .map_err(|_| PlatformError::Gpio(GpioError::HardwareError))
    }

    fn set_low(&mut self) -> Result<()> {
        use embedded_hal::digital::v2::OutputPin;
        self.pin
            .set_low()
            .map_err(|_| PlatformError::Gpio(GpioError::HardwareError))
    }

    fn toggle(&mut self) -> Result<()> {
        use embedded_hal::digital::v2::ToggleableOutputPin;
        self.pin
            .toggle()
            .map_err(|_| PlatformError::Gpio(GpioError::HardwareError))
    }

    fn read(&self) -> bool {
        use embedded_hal::digital::v2::StatefulOutputPin;
        self.pin.is_set_high().unwrap_or(false)
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}

// Implementation for input pins
impl<I: PinId, P: PullType> GpioInterface for Rp2350Gpio<I, FunctionSioInput, P> {
    fn set_high(&mut self) -> Result<()> {
        Err(PlatformError::Gpio(GpioError::InvalidMode))
    }

    fn set_low(&mut self) -> Result<()> {
        Err(PlatformError::Gpio(GpioError::InvalidMode))
    }

    fn toggle(&mut self) -> Result<()> {
        Err(PlatformError::Gpio(GpioError::InvalidMode))
    }

    fn read(&self) -> bool {
        use embedded_hal::digital::v2::InputPin;
        self.pin.is_high().unwrap_or(false)
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}
