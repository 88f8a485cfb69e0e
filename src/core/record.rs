//! Log record model
//!
//! One record per wake cycle: capture timestamp plus averaged distance.
//! The persisted format is a delimited text file with two header lines
//! followed by one line per record.

use chrono::{Datelike, NaiveDateTime, Timelike};
use core::fmt::Write;

/// First header line: column names
pub const HEADER_COLUMNS: &str = "timestamp, distance";

/// Second header line: unit hints
pub const HEADER_UNITS: &str = "YYYY-MM-DDThh:mm:ss, cm";

/// Upper bound for a rendered record line
///
/// 19 bytes of timestamp, separator, and room for a pathological float
/// rendering; ordinary distances use well under half of this.
pub const MAX_LINE_LEN: usize = 80;

/// Capacity for a rendered timestamp (`2026-08-05T12:01:00` is 19 bytes)
pub const TIMESTAMP_LEN: usize = 24;

/// Render a timestamp in the persisted format
pub fn format_timestamp(t: &NaiveDateTime) -> heapless::String<TIMESTAMP_LEN> {
    let mut out = heapless::String::new();
    // Cannot overflow TIMESTAMP_LEN, so the write never fails
    let _ = write!(
        out,
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        t.year(),
        t.month(),
        t.day(),
        t.hour(),
        t.minute(),
        t.second()
    );
    out
}

/// One log record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    /// Capture time (second resolution, from the RTC)
    pub timestamp: NaiveDateTime,
    /// Distance in centimeters, averaged over the cycle's samples
    pub distance_cm: f32,
}

impl Record {
    /// Render the record as one log line (without terminator)
    ///
    /// Format: `2026-08-05T12:01:00, 123.40`
    pub fn format_line(&self) -> heapless::String<MAX_LINE_LEN> {
        let mut line = heapless::String::new();
        let _ = write!(
            line,
            "{}, {:.2}",
            format_timestamp(&self.timestamp),
            self.distance_cm
        );
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn timestamp_format_is_exact() {
        assert_eq!(
            format_timestamp(&at(23, 59, 59)).as_str(),
            "2026-08-05T23:59:59"
        );
    }

    #[test]
    fn line_format_is_exact() {
        let record = Record {
            timestamp: at(12, 1, 0),
            distance_cm: 123.4,
        };
        assert_eq!(record.format_line().as_str(), "2026-08-05T12:01:00, 123.40");
    }

    #[test]
    fn single_digit_fields_are_zero_padded() {
        let record = Record {
            timestamp: NaiveDate::from_ymd_opt(2026, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap(),
            distance_cm: 7.0,
        };
        assert_eq!(record.format_line().as_str(), "2026-01-02T03:04:05, 7.00");
    }

    #[test]
    fn distance_rounds_to_two_decimals() {
        let record = Record {
            timestamp: at(0, 0, 0),
            distance_cm: 99.999,
        };
        assert_eq!(record.format_line().as_str(), "2026-08-05T00:00:00, 100.00");
    }

    #[test]
    fn header_matches_record_shape() {
        assert_eq!(HEADER_COLUMNS.split(", ").count(), 2);
        assert_eq!(HEADER_UNITS, "YYYY-MM-DDThh:mm:ss, cm");
    }
}
