//! Wake flag shared between interrupt and main-loop context
//!
//! The alarm interrupt handler does nothing but call [`WakeFlag::signal`];
//! the main loop consumes the flag with [`WakeFlag::take`] between sleep
//! periods. This is the only state the two contexts share.

use core::sync::atomic::{AtomicBool, Ordering};

/// One-bit wake signal
///
/// `const`-constructible so it can live in a `static` reachable from the
/// interrupt handler.
#[derive(Debug, Default)]
pub struct WakeFlag(AtomicBool);

impl WakeFlag {
    /// Create a new, clear flag
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Set the flag (interrupt context)
    pub fn signal(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Consume the flag: returns `true` at most once per signal
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    /// Peek without consuming (used to decide whether to sleep)
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_consumes_the_signal() {
        let flag = WakeFlag::new();
        assert!(!flag.take());

        flag.signal();
        assert!(flag.is_set());
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn signals_do_not_accumulate() {
        let flag = WakeFlag::new();
        flag.signal();
        flag.signal();
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn static_construction() {
        static FLAG: WakeFlag = WakeFlag::new();
        FLAG.signal();
        assert!(FLAG.take());
    }
}
