//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the gauge firmware. All
//! platform-specific code must be isolated to this module; drivers and core
//! logic only see the traits.

pub mod error;
pub mod traits;

// Platform implementations (feature-gated)
#[cfg(feature = "pico2_w")]
pub mod rp2350;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{GpioInterface, I2cInterface, Platform, SpiInterface, TimerInterface};
