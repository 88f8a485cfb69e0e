//! HC-SR04 ultrasonic ranging driver
//!
//! Drives the trigger line, times the echo pulse by polling, and converts
//! the round-trip time to centimeters. Written against the platform GPIO and
//! timer traits so the pulse timing logic is testable with a scripted echo.
//!
//! The sensor protocol: a 10 µs high pulse on the trigger pin starts a ping;
//! the echo pin goes high for the duration of the ultrasonic round trip, or
//! for ~38 ms when nothing reflects. At ~29 µs per centimeter of sound
//! travel, distance is echo width divided by 58.

use crate::devices::traits::{RangingError, RangingSensor};
use crate::platform::traits::{GpioInterface, TimerInterface};

/// Width of the trigger pulse
const TRIGGER_PULSE_US: u32 = 10;

/// How long the sensor may take to start the echo after a trigger
const ECHO_START_TIMEOUT_US: u64 = 30_000;

/// Longest echo the sensor produces (the no-target response is ~38 ms)
const ECHO_TIMEOUT_US: u64 = 38_000;

/// Echo polling granularity
const POLL_STEP_US: u32 = 5;

/// Microseconds of round trip per centimeter of distance
const US_PER_CM: f32 = 58.0;

/// HC-SR04 driver
///
/// # Example
///
/// ```ignore
/// let mut sensor = Hcsr04::new(trigger_gpio, echo_gpio, timer);
/// let distance_cm = sensor.measure_cm()?;
/// ```
pub struct Hcsr04<TRIG, ECHO, T>
where
    TRIG: GpioInterface,
    ECHO: GpioInterface,
    T: TimerInterface,
{
    trigger: TRIG,
    echo: ECHO,
    timer: T,
}

impl<TRIG, ECHO, T> Hcsr04<TRIG, ECHO, T>
where
    TRIG: GpioInterface,
    ECHO: GpioInterface,
    T: TimerInterface,
{
    /// Create a new driver from a trigger output, an echo input and a timer
    pub fn new(trigger: TRIG, echo: ECHO, timer: T) -> Self {
        Self {
            trigger,
            echo,
            timer,
        }
    }
}

impl<TRIG, ECHO, T> RangingSensor for Hcsr04<TRIG, ECHO, T>
where
    TRIG: GpioInterface,
    ECHO: GpioInterface,
    T: TimerInterface,
{
    fn measure_cm(&mut self) -> Result<f32, RangingError> {
        // A high echo line here means the previous ping never completed
        if self.echo.read() {
            return Err(RangingError::EchoStuck);
        }

        self.trigger.set_low()?;
        self.timer.delay_us(2)?;
        self.trigger.set_high()?;
        self.timer.delay_us(TRIGGER_PULSE_US)?;
        self.trigger.set_low()?;

        // Wait for the echo to start
        let triggered_at = self.timer.now_us();
        while !self.echo.read() {
            if self.timer.now_us().wrapping_sub(triggered_at) > ECHO_START_TIMEOUT_US {
                return Err(RangingError::NoEcho);
            }
            self.timer.delay_us(POLL_STEP_US)?;
        }

        // Measure the echo width
        let rise = self.timer.now_us();
        while self.echo.read() {
            if self.timer.now_us().wrapping_sub(rise) > ECHO_TIMEOUT_US {
                return Err(RangingError::EchoStuck);
            }
            self.timer.delay_us(POLL_STEP_US)?;
        }
        let width_us = self.timer.now_us().wrapping_sub(rise);

        Ok(width_us as f32 / US_PER_CM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockGpio;
    use crate::platform::Result;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Shared simulated clock for the scripted echo
    #[derive(Clone)]
    struct SimClock(Rc<RefCell<u64>>);

    impl SimClock {
        fn new() -> Self {
            SimClock(Rc::new(RefCell::new(0)))
        }
    }

    struct SimTimer(SimClock);

    impl TimerInterface for SimTimer {
        fn delay_us(&mut self, us: u32) -> Result<()> {
            *self.0 .0.borrow_mut() += us as u64;
            Ok(())
        }

        fn now_us(&self) -> u64 {
            *self.0 .0.borrow()
        }
    }

    /// Echo pin that is high exactly while the clock is inside [rise, fall)
    struct SimEcho {
        clock: SimClock,
        rise: u64,
        fall: u64,
    }

    impl GpioInterface for SimEcho {
        fn set_high(&mut self) -> Result<()> {
            unreachable!("echo pin is input-only")
        }

        fn set_low(&mut self) -> Result<()> {
            unreachable!("echo pin is input-only")
        }

        fn toggle(&mut self) -> Result<()> {
            unreachable!("echo pin is input-only")
        }

        fn read(&self) -> bool {
            let now = *self.clock.0.borrow();
            (self.rise..self.fall).contains(&now)
        }

        fn mode(&self) -> crate::platform::traits::GpioMode {
            crate::platform::traits::GpioMode::Input
        }
    }

    fn sensor_with_echo(rise: u64, fall: u64) -> Hcsr04<MockGpio, SimEcho, SimTimer> {
        let clock = SimClock::new();
        Hcsr04::new(
            MockGpio::new_output(),
            SimEcho {
                clock: clock.clone(),
                rise,
                fall,
            },
            SimTimer(clock),
        )
    }

    #[test]
    fn measures_echo_width() {
        // Echo: rises 500 us after boot, 5800 us wide -> 100 cm
        let mut sensor = sensor_with_echo(500, 500 + 5800);
        let distance = sensor.measure_cm().unwrap();

        // Polling quantizes the edges by up to POLL_STEP_US each
        assert!((distance - 100.0).abs() < 0.5, "got {distance}");
    }

    #[test]
    fn short_echo_is_close_range() {
        // 174 us wide -> 3 cm
        let mut sensor = sensor_with_echo(200, 200 + 174);
        let distance = sensor.measure_cm().unwrap();
        assert!((distance - 3.0).abs() < 0.5, "got {distance}");
    }

    #[test]
    fn missing_echo_times_out() {
        let mut sensor = sensor_with_echo(u64::MAX, u64::MAX);
        assert_eq!(sensor.measure_cm(), Err(RangingError::NoEcho));
    }

    #[test]
    fn stuck_echo_detected_before_trigger() {
        let mut sensor = sensor_with_echo(0, u64::MAX);
        assert_eq!(sensor.measure_cm(), Err(RangingError::EchoStuck));
    }

    #[test]
    fn endless_echo_times_out() {
        let mut sensor = sensor_with_echo(100, u64::MAX);
        assert_eq!(sensor.measure_cm(), Err(RangingError::EchoStuck));
    }

    #[test]
    fn trigger_pulse_drives_the_pin() {
        let mut sensor = sensor_with_echo(100, 200);
        sensor.measure_cm().unwrap();
        // low (already low), high, low again
        assert_eq!(sensor.trigger.transitions(), 2);
    }
}
