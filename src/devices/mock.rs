//! Mock devices for testing
//!
//! Scriptable RTC and ranging sensor implementing the device traits, used by
//! the wake-cycle tests to drive whole cycles without hardware.

use crate::devices::traits::{RangingError, RangingSensor, Rtc, RtcError};
use chrono::{NaiveDateTime, TimeDelta};
use std::collections::VecDeque;

/// Mock RTC
///
/// Holds a settable calendar time and the programmed alarm. Tests advance
/// time and fire the alarm explicitly.
#[derive(Debug)]
pub struct MockRtc {
    now: NaiveDateTime,
    alarm: Option<NaiveDateTime>,
    alarm_flag: bool,
    fail: bool,
}

impl MockRtc {
    /// Create a mock clock reading `start`
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: start,
            alarm: None,
            alarm_flag: false,
            fail: false,
        }
    }

    /// Move the clock forward
    pub fn advance(&mut self, delta: TimeDelta) {
        self.now += delta;
    }

    /// Jump the clock to the programmed alarm instant and raise the flag
    ///
    /// No-op when no alarm is armed.
    pub fn fire_alarm(&mut self) {
        if let Some(alarm) = self.alarm {
            self.now = alarm;
            self.alarm_flag = true;
        }
    }

    /// The currently programmed alarm, if any
    pub fn alarm(&self) -> Option<NaiveDateTime> {
        self.alarm
    }

    /// Make every subsequent operation fail with `RtcError::Bus`
    pub fn set_fail(&mut self, fail: bool) {
        self.fail = fail;
    }

    fn check(&self) -> Result<(), RtcError> {
        if self.fail {
            Err(RtcError::Bus)
        } else {
            Ok(())
        }
    }
}

impl Rtc for MockRtc {
    fn now(&mut self) -> Result<NaiveDateTime, RtcError> {
        self.check()?;
        Ok(self.now)
    }

    fn set_alarm(&mut self, at: &NaiveDateTime) -> Result<(), RtcError> {
        self.check()?;
        self.alarm = Some(*at);
        Ok(())
    }

    fn clear_alarm(&mut self) -> Result<(), RtcError> {
        self.check()?;
        self.alarm_flag = false;
        Ok(())
    }

    fn alarm_pending(&mut self) -> Result<bool, RtcError> {
        self.check()?;
        Ok(self.alarm_flag)
    }
}

/// Mock ranging sensor
///
/// Serves queued readings in order; an empty queue serves `fallback`.
#[derive(Debug)]
pub struct MockRanging {
    readings: VecDeque<Result<f32, RangingError>>,
    fallback: f32,
    measurements: u32,
}

impl MockRanging {
    /// Create a sensor that always reads `fallback` centimeters
    pub fn new(fallback: f32) -> Self {
        Self {
            readings: VecDeque::new(),
            fallback,
            measurements: 0,
        }
    }

    /// Queue one reading (or failure) to serve before the fallback
    pub fn queue(&mut self, reading: Result<f32, RangingError>) {
        self.readings.push_back(reading);
    }

    /// Total measurements requested so far
    pub fn measurements(&self) -> u32 {
        self.measurements
    }
}

impl RangingSensor for MockRanging {
    fn measure_cm(&mut self) -> Result<f32, RangingError> {
        self.measurements += 1;
        self.readings.pop_front().unwrap_or(Ok(self.fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn mock_rtc_alarm_cycle() {
        let start = NaiveDate::from_ymd_opt(2026, 8, 5)
            .unwrap()
            .and_hms_opt(12, 0, 59)
            .unwrap();
        let mut rtc = MockRtc::new(start);
        assert!(!rtc.alarm_pending().unwrap());

        let at = start + TimeDelta::seconds(1);
        rtc.set_alarm(&at).unwrap();
        rtc.fire_alarm();

        assert!(rtc.alarm_pending().unwrap());
        assert_eq!(rtc.now().unwrap(), at);

        rtc.clear_alarm().unwrap();
        assert!(!rtc.alarm_pending().unwrap());
    }

    #[test]
    fn mock_ranging_serves_queue_then_fallback() {
        let mut sensor = MockRanging::new(100.0);
        sensor.queue(Ok(10.0));
        sensor.queue(Err(RangingError::NoEcho));

        assert_eq!(sensor.measure_cm(), Ok(10.0));
        assert_eq!(sensor.measure_cm(), Err(RangingError::NoEcho));
        assert_eq!(sensor.measure_cm(), Ok(100.0));
        assert_eq!(sensor.measurements(), 3);
    }
}
