//! Device trait definitions
//!
//! Device-independent interfaces consumed by the wake-cycle logic.

pub mod ranging;
pub mod rtc;

pub use ranging::{RangingError, RangingSensor};
pub use rtc::{Rtc, RtcError};
