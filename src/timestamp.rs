//! Canonical timestamps and time-of-day handling.
//!
//! The canonical timestamp is local wall-clock time written in an ISO-like
//! shape without a UTC marker, e.g. `2024-03-20T08:30:00.000`. It is the only
//! representation exchanged with the rest of an application; Jalali dates and
//! times of day are derived from it on demand.

use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calendar::{GregorianDate, JalaliDate, MAX_SUPPORTED_YEAR, MIN_SUPPORTED_YEAR};
use crate::error::CalendarError;

/// chrono format of the canonical timestamp
pub const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Naive layouts accepted besides RFC 3339, tried in order.
const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Hour and minute of a day
///
/// Each field steps independently and wraps within its own range: moving the
/// hour past 23 gives 0 and moving the minute below 0 gives 59, without
/// carrying into the other field or into the date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self { hour: 0, minute: 0 };

    pub fn new(hour: u32, minute: u32) -> Result<Self, CalendarError> {
        if hour > 23 || minute > 59 {
            return Err(CalendarError::InvalidTime { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    pub fn increment_hour(&mut self) {
        self.hour = (self.hour + 1) % 24;
    }

    pub fn decrement_hour(&mut self) {
        self.hour = (self.hour + 23) % 24;
    }

    pub fn increment_minute(&mut self) {
        self.step_minutes(1);
    }

    pub fn decrement_minute(&mut self) {
        self.step_minutes(-1);
    }

    /// Move the minute by `delta`, wrapping within 0..=59. The hour is untouched.
    ///
    /// # Examples
    /// ```
    /// # use bevy_jalali_picker::timestamp::TimeOfDay;
    /// let mut time = TimeOfDay::new(10, 55).unwrap();
    /// time.step_minutes(15);
    /// assert_eq!(time, TimeOfDay::new(10, 10).unwrap());
    /// ```
    pub fn step_minutes(&mut self, delta: i32) {
        self.minute = (self.minute as i32 + delta).rem_euclid(60) as u32;
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Compose a canonical timestamp from a Jalali date and a time of day.
///
/// Seconds and milliseconds are always zero.
///
/// # Examples
/// ```
/// # use bevy_jalali_picker::calendar::JalaliDate;
/// # use bevy_jalali_picker::timestamp::{to_timestamp, TimeOfDay};
/// let date = JalaliDate::new(1403, 1, 1).unwrap();
/// let time = TimeOfDay::new(8, 30).unwrap();
/// assert_eq!(to_timestamp(date, time).unwrap(), "2024-03-20T08:30:00.000");
/// ```
pub fn to_timestamp(date: JalaliDate, time: TimeOfDay) -> Result<String, CalendarError> {
    let day = NaiveDate::try_from(date.to_gregorian())?;
    let instant = day
        .and_hms_opt(time.hour, time.minute, 0)
        .ok_or(CalendarError::InvalidTime {
            hour: time.hour,
            minute: time.minute,
        })?;
    Ok(instant.format(CANONICAL_FORMAT).to_string())
}

/// Split a timestamp into a Jalali date and a time of day.
///
/// Besides the canonical form this accepts a missing fraction or seconds, a
/// space instead of `T`, a bare `YYYY-MM-DD` (midnight) and RFC 3339 strings.
/// An RFC 3339 offset (including `Z`) is dropped and the wall-clock fields are
/// kept as written.
pub fn from_timestamp(input: &str) -> Result<(JalaliDate, TimeOfDay), CalendarError> {
    let instant = parse_local(input.trim()).ok_or_else(|| CalendarError::UnparsableTimestamp {
        input: input.to_string(),
    })?;
    split(instant)
}

/// Like [`from_timestamp`], but falls back to the current local time when the
/// value is missing or cannot be used.
pub fn from_timestamp_or_today(input: Option<&str>) -> (JalaliDate, TimeOfDay) {
    match input.map(str::trim).filter(|s| !s.is_empty()) {
        None => now(),
        Some(value) => from_timestamp(value).unwrap_or_else(|error| {
            warn!(%error, "falling back to the current date");
            now()
        }),
    }
}

/// Today's Jalali date in local time.
pub fn today() -> JalaliDate {
    JalaliDate::from(Local::now().date_naive())
}

/// Current local date and time of day.
pub fn now() -> (JalaliDate, TimeOfDay) {
    let local = Local::now().naive_local();
    (
        JalaliDate::from(local.date()),
        TimeOfDay {
            hour: local.hour(),
            minute: local.minute(),
        },
    )
}

fn parse_local(input: &str) -> Option<NaiveDateTime> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Some(instant.naive_local());
    }
    LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn split(instant: NaiveDateTime) -> Result<(JalaliDate, TimeOfDay), CalendarError> {
    let date = GregorianDate::from(instant.date()).to_jalali();
    if !(MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR).contains(&date.year) {
        return Err(CalendarError::YearOutOfRange { year: date.year });
    }
    let time = TimeOfDay {
        hour: instant.hour(),
        minute: instant.minute(),
    };
    Ok((date, time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::month_length;

    fn jalali(year: i32, month: u32, day: u32) -> JalaliDate {
        JalaliDate::new(year, month, day).unwrap()
    }

    fn time(hour: u32, minute: u32) -> TimeOfDay {
        TimeOfDay::new(hour, minute).unwrap()
    }

    #[test]
    fn test_canonical_shape() {
        let stamp = to_timestamp(jalali(1403, 1, 1), time(0, 0)).unwrap();
        assert_eq!(stamp, "2024-03-20T00:00:00.000");
        assert!(!stamp.ends_with('Z'));

        let stamp = to_timestamp(jalali(1403, 12, 30), time(23, 59)).unwrap();
        assert_eq!(stamp, "2025-03-20T23:59:00.000");
    }

    #[test]
    fn test_round_trip_boundary_times() {
        let dates = [
            jalali(1, 1, 1),
            jalali(1402, 12, 29),
            jalali(1403, 12, 30),
            jalali(3000, 6, 31),
        ];
        for date in dates {
            for t in [time(0, 0), time(23, 59), time(12, 0), time(0, 59), time(23, 0)] {
                let stamp = to_timestamp(date, t).unwrap();
                assert_eq!(from_timestamp(&stamp), Ok((date, t)), "{stamp}");
            }
        }
    }

    #[test]
    fn test_round_trip_every_day_of_a_year() {
        for month in 1..=12 {
            for day in 1..=month_length(1403, month) {
                let date = jalali(1403, month, day);
                let t = time(day % 24, (month * 7) % 60);
                let stamp = to_timestamp(date, t).unwrap();
                assert_eq!(from_timestamp(&stamp).unwrap(), (date, t));
            }
        }
    }

    #[test]
    fn test_accepted_variants() {
        let expected = (jalali(1403, 1, 1), time(8, 30));
        for input in [
            "2024-03-20T08:30:00.000",
            "2024-03-20T08:30:00",
            "2024-03-20T08:30:45.123456",
            "2024-03-20T08:30",
            "2024-03-20 08:30:00",
            "2024-03-20 08:30",
            "  2024-03-20T08:30:00.000  ",
            "2024-03-20T08:30:00.000Z",
            "2024-03-20T08:30:00+03:30",
        ] {
            assert_eq!(from_timestamp(input), Ok(expected), "{input}");
        }
        assert_eq!(from_timestamp("2024-03-20"), Ok((jalali(1403, 1, 1), TimeOfDay::MIDNIGHT)));
    }

    #[test]
    fn test_rejects_garbage() {
        for input in ["", "yesterday", "2024-13-01T00:00:00", "2024-02-30", "20/03/2024"] {
            assert_eq!(
                from_timestamp(input),
                Err(CalendarError::UnparsableTimestamp {
                    input: input.to_string()
                })
            );
        }
    }

    #[test]
    fn test_rejects_years_outside_supported_range() {
        assert!(matches!(
            from_timestamp("0500-01-01T00:00:00"),
            Err(CalendarError::YearOutOfRange { year }) if year < MIN_SUPPORTED_YEAR
        ));
    }

    #[test]
    fn test_fallback_to_today() {
        let (date, _) = from_timestamp_or_today(Some("not a date"));
        let today = today();
        // Tolerate the test running across midnight.
        assert!(date == today || date.to_gregorian() < today.to_gregorian());

        let (date, _) = from_timestamp_or_today(None);
        assert!(JalaliDate::new(date.year, date.month, date.day).is_ok());

        let parsed = from_timestamp_or_today(Some("2024-03-20T08:30:00.000"));
        assert_eq!(parsed, (jalali(1403, 1, 1), time(8, 30)));
    }

    #[test]
    fn test_hour_wraps_without_date_change() {
        let date = jalali(1403, 1, 1);
        let mut t = time(23, 15);
        t.increment_hour();
        assert_eq!(t, time(0, 15));
        assert_eq!(to_timestamp(date, t).unwrap(), "2024-03-20T00:15:00.000");

        t.decrement_hour();
        assert_eq!(t, time(23, 15));
    }

    #[test]
    fn test_minute_wraps_without_hour_change() {
        let mut t = time(10, 0);
        t.decrement_minute();
        assert_eq!(t, time(10, 59));
        t.increment_minute();
        assert_eq!(t, time(10, 0));
        t.step_minutes(-125);
        assert_eq!(t, time(10, 55));
    }

    #[test]
    fn test_time_validation_and_display() {
        assert_eq!(TimeOfDay::new(24, 0), Err(CalendarError::InvalidTime { hour: 24, minute: 0 }));
        assert!(TimeOfDay::new(0, 60).is_err());
        assert_eq!(time(7, 5).to_string(), "07:05");
    }
}
