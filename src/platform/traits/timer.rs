//! Timer interface trait
//!
//! Monotonic microsecond time plus blocking delays. The HC-SR04 driver
//! measures echo pulse widths with `now_us`, so implementations must not
//! let the counter go backwards.

use crate::platform::Result;

/// Timer interface trait
pub trait TimerInterface {
    /// Block for `us` microseconds
    fn delay_us(&mut self, us: u32) -> Result<()>;

    /// Block for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) -> Result<()> {
        self.delay_us(ms.saturating_mul(1000))
    }

    /// Monotonic microseconds since boot
    fn now_us(&self) -> u64;

    /// Monotonic milliseconds since boot
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}
