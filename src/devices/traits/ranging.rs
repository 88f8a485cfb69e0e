//! Ranging sensor trait and error types

use crate::platform::PlatformError;

/// Ranging error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum RangingError {
    /// Trigger or echo pin fault
    Pin,
    /// The echo never started: nothing in range or sensor absent
    NoEcho,
    /// The echo line was asserted before the ping, or never released
    EchoStuck,
}

impl From<PlatformError> for RangingError {
    fn from(_: PlatformError) -> Self {
        RangingError::Pin
    }
}

/// Distance sensor taking one measurement per call
pub trait RangingSensor {
    /// Measure the distance to the nearest target in centimeters
    fn measure_cm(&mut self) -> Result<f32, RangingError>;
}
