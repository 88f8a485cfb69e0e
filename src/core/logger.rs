//! Wake-cycle orchestration
//!
//! [`DataLogger`] ties the clock, the ranging sensor, the log storage and
//! the status LED into the once-per-minute wake cycle. It is a two-state
//! machine: `Running` services wake signals, `Fatal` blinks the LED and
//! never logs again. The firmware loop calls [`DataLogger::poll`] forever;
//! tests call it cycle by cycle.

use crate::core::config;
use crate::core::record::{self, Record};
use crate::core::wake::WakeFlag;
use crate::devices::traits::{RangingSensor, Rtc};
use crate::platform::traits::{GpioInterface, TimerInterface};
use crate::storage::LogStorage;
use crate::{log_error, log_info, log_warn};
use chrono::{NaiveDateTime, TimeDelta, Timelike};

/// Unrecoverable startup failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum FatalError {
    /// The RTC did not respond or could not be armed
    ClockUnavailable,
    /// The log volume could not be mounted or the log file created
    StorageUnavailable,
}

/// Logger state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum State {
    /// Normal operation: sleep, wake, sample, log
    Running,
    /// Terminal visual-alarm state; only the blink pattern advances
    Fatal(FatalError),
}

/// What one `poll` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum CycleOutcome {
    /// No wake signal pending
    Idle,
    /// A wake cycle ran and appended its record
    Logged,
    /// A wake cycle ran but appended nothing
    Skipped,
    /// Fatal state: blink pattern advanced one half-period
    Blinked,
}

/// The wake/sample/log/sleep cycle
pub struct DataLogger<C, R, S, L, T>
where
    C: Rtc,
    R: RangingSensor,
    S: LogStorage,
    L: GpioInterface,
    T: TimerInterface,
{
    rtc: C,
    sensor: R,
    storage: S,
    led: L,
    timer: T,
    state: State,
    records_logged: u32,
}

impl<C, R, S, L, T> DataLogger<C, R, S, L, T>
where
    C: Rtc,
    R: RangingSensor,
    S: LogStorage,
    L: GpioInterface,
    T: TimerInterface,
{
    /// Create a logger; nothing touches the hardware until [`start`](Self::start)
    pub fn new(rtc: C, sensor: R, storage: S, led: L, timer: T) -> Self {
        Self {
            rtc,
            sensor,
            storage,
            led,
            timer,
            state: State::Running,
            records_logged: 0,
        }
    }

    /// Probe the clock, mount the storage and arm the first wake
    ///
    /// The first alarm lands on the next minute boundary: the current
    /// reading truncated to the minute, plus one minute. On failure the
    /// logger transitions to [`State::Fatal`] and stays there.
    pub fn start(&mut self) -> Result<(), FatalError> {
        let now = match self.rtc.now() {
            Ok(now) => now,
            Err(e) => {
                log_error!("rtc init failed: {:?}", e);
                return Err(self.fail(FatalError::ClockUnavailable));
            }
        };
        log_info!("clock reads {}", record::format_timestamp(&now).as_str());

        if let Err(e) = self.storage.initialize() {
            log_error!("storage init failed: {:?}", e);
            return Err(self.fail(FatalError::StorageUnavailable));
        }
        log_info!("log volume ready, file {}", config::LOG_FILENAME);

        let first = next_minute_boundary(&now);
        if let Err(e) = self
            .rtc
            .clear_alarm()
            .and_then(|()| self.rtc.set_alarm(&first))
        {
            log_error!("alarm arm failed: {:?}", e);
            return Err(self.fail(FatalError::ClockUnavailable));
        }
        log_info!("first wake at {}", record::format_timestamp(&first).as_str());
        Ok(())
    }

    /// Advance the machine one step
    ///
    /// In `Running`, consumes a pending wake signal and runs one full wake
    /// cycle, or returns immediately when there is none (the caller decides
    /// whether to sleep). In `Fatal`, advances the blink pattern one
    /// half-period. Never blocks beyond one cycle.
    pub fn poll(&mut self, flag: &WakeFlag) -> CycleOutcome {
        match self.state {
            State::Fatal(_) => {
                let _ = self.led.toggle();
                let _ = self.timer.delay_ms(config::FATAL_BLINK_HALF_PERIOD_MS);
                CycleOutcome::Blinked
            }
            State::Running => {
                if flag.take() {
                    self.service_wake(flag)
                } else {
                    CycleOutcome::Idle
                }
            }
        }
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Records appended since startup
    pub fn records_logged(&self) -> u32 {
        self.records_logged
    }

    /// Storage access (test inspection)
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutable storage access (test scripting)
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Clock access (test scripting)
    pub fn rtc_mut(&mut self) -> &mut C {
        &mut self.rtc
    }

    /// Sensor access (test scripting)
    pub fn sensor_mut(&mut self) -> &mut R {
        &mut self.sensor
    }

    /// Status LED access (test inspection)
    pub fn led(&self) -> &L {
        &self.led
    }

    fn fail(&mut self, reason: FatalError) -> FatalError {
        self.state = State::Fatal(reason);
        // Start the blink pattern from a known level
        let _ = self.led.set_low();
        reason
    }

    fn service_wake(&mut self, flag: &WakeFlag) -> CycleOutcome {
        let now = match self.rtc.now() {
            Ok(now) => now,
            Err(e) => {
                log_error!("rtc read failed: {:?}", e);
                // The alarm was not acknowledged and the line is still
                // asserted; re-raise the flag so the next poll retries
                // instead of sleeping forever.
                flag.signal();
                return CycleOutcome::Skipped;
            }
        };

        // Acknowledge and re-arm one minute from this reading. A cycle that
        // runs long enough for the seconds to tick over shifts the schedule;
        // the record carries the true capture time either way.
        let next = now + TimeDelta::minutes(1);
        if let Err(e) = self
            .rtc
            .clear_alarm()
            .and_then(|()| self.rtc.set_alarm(&next))
        {
            log_error!("alarm re-arm failed: {:?}", e);
        }

        let mut sum = 0.0f32;
        let mut good = 0u32;
        for i in 0..config::SAMPLES_PER_CYCLE {
            if i > 0 {
                let _ = self.timer.delay_ms(config::SAMPLE_GAP_MS);
            }
            match self.sensor.measure_cm() {
                Ok(cm) => {
                    sum += cm;
                    good += 1;
                }
                Err(e) => log_warn!("sample {} failed: {:?}", i, e),
            }
        }
        if good == 0 {
            log_error!("no usable samples this cycle");
            return CycleOutcome::Skipped;
        }

        let record = Record {
            timestamp: now,
            distance_cm: sum / good as f32,
        };
        let line = record.format_line();
        match self.storage.append(&line) {
            Ok(()) => {
                self.records_logged += 1;
                log_info!("logged: {}", line.as_str());
                CycleOutcome::Logged
            }
            Err(e) => {
                log_error!("append failed, record dropped: {:?}", e);
                CycleOutcome::Skipped
            }
        }
    }
}

/// The next whole minute after `now`
///
/// A reading of 12:00:59 arms 12:01:00; a reading of exactly 12:01:00 arms
/// 12:02:00 (the boundary being crossed is already in the past).
pub fn next_minute_boundary(now: &NaiveDateTime) -> NaiveDateTime {
    let top = now
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(*now);
    top + TimeDelta::minutes(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::mock::{MockRanging, MockRtc};
    use crate::platform::mock::{MockGpio, MockTimer};
    use crate::storage::MockStorage;
    use chrono::NaiveDate;

    type TestLogger = DataLogger<MockRtc, MockRanging, MockStorage, MockGpio, MockTimer>;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn logger(start: NaiveDateTime) -> TestLogger {
        DataLogger::new(
            MockRtc::new(start),
            MockRanging::new(100.0),
            MockStorage::new(),
            MockGpio::new_output(),
            MockTimer::new(),
        )
    }

    #[test]
    fn next_minute_boundary_truncates() {
        assert_eq!(next_minute_boundary(&at(12, 0, 59)), at(12, 1, 0));
        assert_eq!(next_minute_boundary(&at(12, 0, 1)), at(12, 1, 0));
        assert_eq!(next_minute_boundary(&at(12, 1, 0)), at(12, 2, 0));
        assert_eq!(next_minute_boundary(&at(23, 59, 30)), at(0, 0, 0) + TimeDelta::days(1));
    }

    #[test]
    fn start_arms_first_boundary() {
        let mut app = logger(at(12, 0, 59));
        app.start().unwrap();

        assert_eq!(app.state(), State::Running);
        assert_eq!(app.rtc_mut().alarm(), Some(at(12, 1, 0)));
    }

    #[test]
    fn clock_failure_is_fatal() {
        let mut app = logger(at(12, 0, 0));
        app.rtc_mut().set_fail(true);

        assert_eq!(app.start(), Err(FatalError::ClockUnavailable));
        assert_eq!(app.state(), State::Fatal(FatalError::ClockUnavailable));
    }

    #[test]
    fn fatal_state_blinks_and_never_logs() {
        let mut app = logger(at(12, 0, 0));
        app.storage.fail_initialize();
        assert_eq!(app.start(), Err(FatalError::StorageUnavailable));

        let flag = WakeFlag::new();
        let before = app.led().read();
        flag.signal();
        assert_eq!(app.poll(&flag), CycleOutcome::Blinked);
        assert_ne!(app.led().read(), before);
        assert_eq!(app.poll(&flag), CycleOutcome::Blinked);
        assert_eq!(app.led().read(), before);

        assert_eq!(app.records_logged(), 0);
        assert!(app.storage().lines().is_empty());
    }

    #[test]
    fn idle_poll_does_nothing() {
        let mut app = logger(at(12, 0, 30));
        app.start().unwrap();

        let flag = WakeFlag::new();
        assert_eq!(app.poll(&flag), CycleOutcome::Idle);
        assert_eq!(app.records_logged(), 0);
    }

    #[test]
    fn wake_cycle_logs_once_and_rearms() {
        let mut app = logger(at(12, 0, 59));
        app.start().unwrap();

        let flag = WakeFlag::new();
        app.rtc_mut().fire_alarm();
        flag.signal();

        assert_eq!(app.poll(&flag), CycleOutcome::Logged);
        assert_eq!(app.records_logged(), 1);
        assert_eq!(app.storage().records(), &["2026-08-05T12:01:00, 100.00"]);
        assert_eq!(app.rtc_mut().alarm(), Some(at(12, 2, 0)));

        // The signal was consumed; nothing further happens
        assert_eq!(app.poll(&flag), CycleOutcome::Idle);
    }

    #[test]
    fn rearm_follows_clock_read() {
        let mut app = logger(at(12, 0, 59));
        app.start().unwrap();

        let flag = WakeFlag::new();
        app.rtc_mut().fire_alarm();
        // Processing delay: the read happens two seconds after the alarm
        app.rtc_mut().advance(TimeDelta::seconds(2));
        flag.signal();

        assert_eq!(app.poll(&flag), CycleOutcome::Logged);
        // Drift preserved: re-armed from the read, not the old deadline
        assert_eq!(app.rtc_mut().alarm(), Some(at(12, 2, 2)));
    }

    #[test]
    fn averaged_distance_is_mean_of_samples() {
        let mut app = logger(at(12, 0, 59));
        app.start().unwrap();

        for reading in [10.0, 20.0, 30.0, 40.0, 50.0] {
            app.sensor_mut().queue(Ok(reading));
        }

        let flag = WakeFlag::new();
        app.rtc_mut().fire_alarm();
        flag.signal();
        assert_eq!(app.poll(&flag), CycleOutcome::Logged);

        assert_eq!(app.storage().records(), &["2026-08-05T12:01:00, 30.00"]);
        assert_eq!(app.sensor_mut().measurements(), config::SAMPLES_PER_CYCLE);
    }

    #[test]
    fn failed_samples_are_left_out_of_the_mean() {
        use crate::devices::traits::RangingError;

        let mut app = logger(at(12, 0, 59));
        app.start().unwrap();

        app.sensor_mut().queue(Ok(10.0));
        app.sensor_mut().queue(Err(RangingError::NoEcho));
        app.sensor_mut().queue(Ok(20.0));
        app.sensor_mut().queue(Err(RangingError::NoEcho));
        app.sensor_mut().queue(Ok(30.0));

        let flag = WakeFlag::new();
        app.rtc_mut().fire_alarm();
        flag.signal();
        assert_eq!(app.poll(&flag), CycleOutcome::Logged);
        assert_eq!(app.storage().records(), &["2026-08-05T12:01:00, 20.00"]);
    }

    #[test]
    fn all_samples_failing_skips_the_record() {
        use crate::devices::traits::RangingError;

        let mut app = logger(at(12, 0, 59));
        app.start().unwrap();

        for _ in 0..config::SAMPLES_PER_CYCLE {
            app.sensor_mut().queue(Err(RangingError::NoEcho));
        }

        let flag = WakeFlag::new();
        app.rtc_mut().fire_alarm();
        flag.signal();
        assert_eq!(app.poll(&flag), CycleOutcome::Skipped);
        assert!(app.storage().records().is_empty());
        // The alarm is still re-armed
        assert_eq!(app.rtc_mut().alarm(), Some(at(12, 2, 0)));
    }

    #[test]
    fn append_failure_skips_but_cycle_continues() {
        let mut app = logger(at(12, 0, 59));
        app.start().unwrap();

        let flag = WakeFlag::new();

        app.storage.fail_next_append();
        app.rtc_mut().fire_alarm();
        flag.signal();
        assert_eq!(app.poll(&flag), CycleOutcome::Skipped);
        assert_eq!(app.state(), State::Running);
        assert_eq!(app.rtc_mut().alarm(), Some(at(12, 2, 0)));

        // Next cycle logs normally, no duplicate for the lost minute
        app.rtc_mut().fire_alarm();
        flag.signal();
        assert_eq!(app.poll(&flag), CycleOutcome::Logged);
        assert_eq!(app.storage().records(), &["2026-08-05T12:02:00, 100.00"]);
    }

    #[test]
    fn rtc_read_failure_retries_on_next_poll() {
        let mut app = logger(at(12, 0, 59));
        app.start().unwrap();

        let flag = WakeFlag::new();
        app.rtc_mut().fire_alarm();
        flag.signal();

        app.rtc_mut().set_fail(true);
        assert_eq!(app.poll(&flag), CycleOutcome::Skipped);
        // The flag was re-raised so the loop does not sleep through it
        assert!(flag.is_set());
        assert_eq!(app.state(), State::Running);

        app.rtc_mut().set_fail(false);
        assert_eq!(app.poll(&flag), CycleOutcome::Logged);
    }
}
