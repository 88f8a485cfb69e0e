//! DS3231 RTC driver
//!
//! Register-level driver for the Maxim DS3231 battery-backed RTC, written
//! against the platform `I2cInterface` so it runs under test on the mock bus.
//!
//! The gauge uses alarm 1 in exact date/hour/minute/second match mode with
//! the INT/SQW pin routed to interrupt output, so the wake line falls once
//! per programmed instant and stays low until the alarm flag is cleared.
//!
//! # Example
//!
//! ```
//! use pico_gauge::devices::ds3231::Ds3231;
//! use pico_gauge::platform::mock::MockI2c;
//!
//! let mut i2c = MockI2c::new(Default::default());
//! i2c.queue_response(&[0x00]); // status register
//! let mut rtc = Ds3231::new(i2c);
//! rtc.begin().unwrap();
//! ```

use crate::devices::traits::{Rtc, RtcError};
use crate::platform::traits::I2cInterface;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Fixed 7-bit bus address of the DS3231
pub const DS3231_ADDR: u8 = 0x68;

// Register map
const REG_TIME: u8 = 0x00;
const REG_ALARM1: u8 = 0x07;
const REG_CONTROL: u8 = 0x0E;
const REG_STATUS: u8 = 0x0F;

// Control register bits
const CONTROL_INTCN: u8 = 0x04;
const CONTROL_A1IE: u8 = 0x01;

// Status register bits
const STATUS_OSF: u8 = 0x80;
const STATUS_A2F: u8 = 0x02;
const STATUS_A1F: u8 = 0x01;

// The year registers cover one century
const YEAR_BASE: i32 = 2000;

/// DS3231 RTC driver
pub struct Ds3231<I: I2cInterface> {
    i2c: I,
}

impl<I: I2cInterface> Ds3231<I> {
    /// Create a new driver over a configured I2C bus
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Probe the device and configure the INT/SQW pin for alarm interrupts
    ///
    /// Routes the INT/SQW output to interrupt mode with both alarm interrupt
    /// enables off (arming happens via [`Rtc::set_alarm`]) and clears any
    /// stale alarm flags, so the interrupt line starts released.
    ///
    /// # Errors
    ///
    /// Returns `RtcError::Bus` if the device does not respond; the caller
    /// treats this as clock-unavailable.
    pub fn begin(&mut self) -> Result<(), RtcError> {
        let status = self.read_register(REG_STATUS)?;
        self.write_register(REG_CONTROL, CONTROL_INTCN)?;
        self.write_register(REG_STATUS, status & !(STATUS_A1F | STATUS_A2F))?;
        Ok(())
    }

    /// Whether the oscillator has stopped since the time was last set
    ///
    /// Set when the backup battery ran out; the clock reading is meaningless
    /// until [`set_time`](Self::set_time) is called.
    pub fn lost_power(&mut self) -> Result<bool, RtcError> {
        Ok(self.read_register(REG_STATUS)? & STATUS_OSF != 0)
    }

    /// Set the calendar time and restart the oscillator-stopped flag
    pub fn set_time(&mut self, t: &NaiveDateTime) -> Result<(), RtcError> {
        let year = t.year() - YEAR_BASE;
        if !(0..100).contains(&year) {
            return Err(RtcError::InvalidTime);
        }

        self.i2c
            .write(
                DS3231_ADDR,
                &[
                    REG_TIME,
                    bcd_encode(t.second() as u8),
                    bcd_encode(t.minute() as u8),
                    bcd_encode(t.hour() as u8),
                    t.weekday().number_from_sunday() as u8,
                    bcd_encode(t.day() as u8),
                    bcd_encode(t.month() as u8),
                    bcd_encode(year as u8),
                ],
            )?;

        // Writing the seconds register restarts a stopped oscillator;
        // acknowledge that by clearing OSF.
        let status = self.read_register(REG_STATUS)?;
        self.write_register(REG_STATUS, status & !STATUS_OSF)?;
        Ok(())
    }

    /// Release the wrapped bus
    pub fn free(self) -> I {
        self.i2c
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, RtcError> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(DS3231_ADDR, &[reg], &mut buf)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), RtcError> {
        self.i2c.write(DS3231_ADDR, &[reg, value])?;
        Ok(())
    }
}

impl<I: I2cInterface> Rtc for Ds3231<I> {
    fn now(&mut self) -> Result<NaiveDateTime, RtcError> {
        let mut regs = [0u8; 7];
        self.i2c.write_read(DS3231_ADDR, &[REG_TIME], &mut regs)?;

        let second = bcd_decode(regs[0] & 0x7F);
        let minute = bcd_decode(regs[1] & 0x7F);
        // 12-hour mode is never configured by this driver; mask covers 24h
        let hour = bcd_decode(regs[2] & 0x3F);
        let day = bcd_decode(regs[4] & 0x3F);
        let month = bcd_decode(regs[5] & 0x1F); // bit 7 is the century flag
        let year = YEAR_BASE + bcd_decode(regs[6]) as i32;

        NaiveDate::from_ymd_opt(year, month as u32, day as u32)
            .and_then(|d| d.and_hms_opt(hour as u32, minute as u32, second as u32))
            .ok_or(RtcError::InvalidTime)
    }

    fn set_alarm(&mut self, at: &NaiveDateTime) -> Result<(), RtcError> {
        // Alarm 1, exact match on seconds, minutes, hours and date
        // (A1M1..A1M4 = 0, DY/DT = 0).
        self.i2c
            .write(
                DS3231_ADDR,
                &[
                    REG_ALARM1,
                    bcd_encode(at.second() as u8),
                    bcd_encode(at.minute() as u8),
                    bcd_encode(at.hour() as u8),
                    bcd_encode(at.day() as u8),
                ],
            )?;
        self.write_register(REG_CONTROL, CONTROL_INTCN | CONTROL_A1IE)?;
        Ok(())
    }

    fn clear_alarm(&mut self) -> Result<(), RtcError> {
        let status = self.read_register(REG_STATUS)?;
        self.write_register(REG_STATUS, status & !STATUS_A1F)?;
        Ok(())
    }

    fn alarm_pending(&mut self) -> Result<bool, RtcError> {
        Ok(self.read_register(REG_STATUS)? & STATUS_A1F != 0)
    }
}

/// Encode a binary value (0-99) as packed BCD
fn bcd_encode(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Decode packed BCD into a binary value
fn bcd_decode(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{I2cTransaction, MockI2c};

    fn driver() -> Ds3231<MockI2c> {
        Ds3231::new(MockI2c::new(Default::default()))
    }

    #[test]
    fn bcd_round_trip() {
        for value in 0..100u8 {
            assert_eq!(bcd_decode(bcd_encode(value)), value);
        }
        assert_eq!(bcd_encode(59), 0x59);
        assert_eq!(bcd_decode(0x30), 30);
    }

    #[test]
    fn now_decodes_time_registers() {
        let mut rtc = driver();
        // 2026-08-05 12:59:30
        rtc.i2c
            .queue_response(&[0x30, 0x59, 0x12, 0x04, 0x05, 0x08, 0x26]);

        let now = rtc.now().unwrap();
        assert_eq!(
            now,
            NaiveDate::from_ymd_opt(2026, 8, 5)
                .unwrap()
                .and_hms_opt(12, 59, 30)
                .unwrap()
        );

        assert_eq!(
            rtc.i2c.transactions()[0],
            I2cTransaction::WriteRead {
                addr: DS3231_ADDR,
                write_data: vec![REG_TIME],
                read_len: 7,
            }
        );
    }

    #[test]
    fn now_rejects_garbage_registers() {
        let mut rtc = driver();
        // Month 0 does not decode to a date
        rtc.i2c
            .queue_response(&[0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x26]);
        assert_eq!(rtc.now(), Err(RtcError::InvalidTime));
    }

    #[test]
    fn set_alarm_writes_exact_match_registers() {
        let mut rtc = driver();
        let at = NaiveDate::from_ymd_opt(2026, 8, 5)
            .unwrap()
            .and_hms_opt(13, 0, 0)
            .unwrap();
        rtc.set_alarm(&at).unwrap();

        let log = rtc.i2c.transactions();
        assert_eq!(
            log[0],
            I2cTransaction::Write {
                addr: DS3231_ADDR,
                data: vec![REG_ALARM1, 0x00, 0x00, 0x13, 0x05],
            }
        );
        // Interrupt output enabled for alarm 1
        assert_eq!(
            log[1],
            I2cTransaction::Write {
                addr: DS3231_ADDR,
                data: vec![REG_CONTROL, CONTROL_INTCN | CONTROL_A1IE],
            }
        );
    }

    #[test]
    fn clear_alarm_clears_only_a1f() {
        let mut rtc = driver();
        // Status with OSF and A1F set
        rtc.i2c.queue_response(&[STATUS_OSF | STATUS_A1F]);
        rtc.clear_alarm().unwrap();

        assert_eq!(
            rtc.i2c.transactions()[1],
            I2cTransaction::Write {
                addr: DS3231_ADDR,
                data: vec![REG_STATUS, STATUS_OSF],
            }
        );
    }

    #[test]
    fn begin_fails_when_device_absent() {
        let mut rtc = driver();
        rtc.i2c.set_nack(true);
        assert_eq!(rtc.begin(), Err(RtcError::Bus));
    }

    #[test]
    fn begin_routes_int_pin_and_clears_stale_flags() {
        let mut rtc = driver();
        rtc.i2c.queue_response(&[STATUS_A1F | STATUS_A2F]);
        rtc.begin().unwrap();

        let log = rtc.i2c.transactions();
        assert_eq!(
            log[1],
            I2cTransaction::Write {
                addr: DS3231_ADDR,
                data: vec![REG_CONTROL, CONTROL_INTCN],
            }
        );
        assert_eq!(
            log[2],
            I2cTransaction::Write {
                addr: DS3231_ADDR,
                data: vec![REG_STATUS, 0x00],
            }
        );
    }

    #[test]
    fn lost_power_reads_osf() {
        let mut rtc = driver();
        rtc.i2c.queue_response(&[STATUS_OSF]);
        assert!(rtc.lost_power().unwrap());

        rtc.i2c.queue_response(&[0x00]);
        assert!(!rtc.lost_power().unwrap());
    }

    #[test]
    fn set_time_writes_all_registers_and_clears_osf() {
        let mut rtc = driver();
        // Wednesday 2026-08-05 06:07:08
        let t = NaiveDate::from_ymd_opt(2026, 8, 5)
            .unwrap()
            .and_hms_opt(6, 7, 8)
            .unwrap();
        rtc.i2c.queue_response(&[STATUS_OSF]);
        rtc.set_time(&t).unwrap();

        let log = rtc.i2c.transactions();
        assert_eq!(
            log[0],
            I2cTransaction::Write {
                addr: DS3231_ADDR,
                data: vec![REG_TIME, 0x08, 0x07, 0x06, 0x04, 0x05, 0x08, 0x26],
            }
        );
        assert_eq!(
            log[2],
            I2cTransaction::Write {
                addr: DS3231_ADDR,
                data: vec![REG_STATUS, 0x00],
            }
        );
    }

    #[test]
    fn set_time_rejects_out_of_century_years() {
        let mut rtc = driver();
        let t = NaiveDate::from_ymd_opt(1999, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(rtc.set_time(&t), Err(RtcError::InvalidTime));
    }
}
