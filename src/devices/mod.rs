//! Device drivers
//!
//! This module contains device drivers that use platform abstraction traits,
//! so every driver runs unchanged against the mock peripherals on the host.
//!
//! ## Modules
//!
//! - `ds3231`: DS3231 battery-backed RTC driver (I2C)
//! - `hcsr04`: HC-SR04 ultrasonic ranging driver (trigger/echo GPIO)
//! - `traits`: Device trait definitions (Rtc, RangingSensor)
//! - `mock`: Scriptable devices for host tests

pub mod ds3231;
pub mod hcsr04;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
