//! RTC trait and error types
//!
//! Device-independent interface for battery-backed calendar clocks with a
//! one-shot alarm. The alarm asserts a falling edge on a dedicated interrupt
//! line when the clock matches the programmed instant; `clear_alarm`
//! acknowledges it so the line releases.

use crate::platform::PlatformError;
use chrono::NaiveDateTime;

/// RTC error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum RtcError {
    /// I2C communication with the clock failed
    Bus,
    /// The clock registers decode to no valid calendar instant
    InvalidTime,
    /// The requested alarm instant cannot be represented by the device
    InvalidAlarm,
}

impl From<PlatformError> for RtcError {
    fn from(_: PlatformError) -> Self {
        RtcError::Bus
    }
}

/// Battery-backed calendar clock with a one-shot alarm
pub trait Rtc {
    /// Read the current calendar time (second resolution)
    fn now(&mut self) -> Result<NaiveDateTime, RtcError>;

    /// Program the alarm to fire at `at`
    ///
    /// Replaces any previously programmed alarm. The device asserts its
    /// interrupt line when the clock reaches `at`.
    fn set_alarm(&mut self, at: &NaiveDateTime) -> Result<(), RtcError>;

    /// Acknowledge a fired alarm so the interrupt line releases
    fn clear_alarm(&mut self) -> Result<(), RtcError>;

    /// Whether the alarm has fired and is still unacknowledged
    fn alarm_pending(&mut self) -> Result<bool, RtcError>;
}
