//! Errors reported at the validation boundary of the calendar.
//!
//! The conversion functions themselves are total over their documented domain
//! and never return these; they come from constructors, the timestamp parser
//! and the picker.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("month {month} is outside 1..=12")]
    InvalidMonth { month: u32 },
    #[error("day {day} does not exist in {year}/{month:02}")]
    InvalidDay { year: i32, month: u32, day: u32 },
    #[error("time {hour:02}:{minute:02} is not a valid time of day")]
    InvalidTime { hour: u32, minute: u32 },
    #[error("year {year} is outside the supported range")]
    YearOutOfRange { year: i32 },
    #[error("could not parse timestamp {input:?}")]
    UnparsableTimestamp { input: String },
}
