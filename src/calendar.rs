//! Jalali (Persian solar Hijri) and Gregorian calendar arithmetic.
//!
//! This module provides the leap-year rules, month-length tables and the two
//! day-count based converters between the calendars. Every function here is a
//! pure computation over small integers.
//!
//! The converters are total over the supported range (Jalali years
//! [`MIN_SUPPORTED_YEAR`]..=[`MAX_SUPPORTED_YEAR`]) and do not validate their
//! input: a day 32 or month 13 yields an unspecified (but non-panicking)
//! result. Validate at the boundary with [`JalaliDate::new`] instead.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// First Jalali year the conversion is validated for.
pub const MIN_SUPPORTED_YEAR: i32 = 1;
/// Last Jalali year the conversion is validated for.
pub const MAX_SUPPORTED_YEAR: i32 = 3000;

/// Remainders of `year mod 33` that mark a Jalali leap year.
///
/// This is the arithmetic 33-year cycle. It tracks the astronomical calendar
/// for the years in practical use but drifts away from it far from the present.
pub const LEAP_REMAINDERS: [i32; 8] = [1, 5, 9, 13, 17, 22, 26, 30];

/// Days before each Gregorian month in a common year.
const GREGORIAN_DAYS_BEFORE_MONTH: [i32; 12] =
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Month definition combining names and length
///
/// `leap_days` are added to `days` in a leap year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Month {
    /// Persian name
    pub name: &'static str,
    /// Latin transliteration
    pub latin: &'static str,
    /// The base number of days in this month
    pub days: u32,
    /// Additional days added to this month during leap years
    pub leap_days: u32,
}

impl Month {
    pub const fn new(name: &'static str, latin: &'static str, days: u32, leap_days: u32) -> Self {
        Self {
            name,
            latin,
            days,
            leap_days,
        }
    }

    /// Length of this month in a year with the given leap status.
    pub const fn length(&self, leap: bool) -> u32 {
        if leap {
            self.days + self.leap_days
        } else {
            self.days
        }
    }
}

/// The twelve Jalali months in order.
pub const JALALI_MONTHS: [Month; 12] = [
    Month::new("فروردین", "Farvardin", 31, 0),
    Month::new("اردیبهشت", "Ordibehesht", 31, 0),
    Month::new("خرداد", "Khordad", 31, 0),
    Month::new("تیر", "Tir", 31, 0),
    Month::new("مرداد", "Mordad", 31, 0),
    Month::new("شهریور", "Shahrivar", 31, 0),
    Month::new("مهر", "Mehr", 30, 0),
    Month::new("آبان", "Aban", 30, 0),
    Month::new("آذر", "Azar", 30, 0),
    Month::new("دی", "Dey", 30, 0),
    Month::new("بهمن", "Bahman", 30, 0),
    Month::new("اسفند", "Esfand", 29, 1),
];

/// Weekday names for a week starting on Saturday, as laid out in the picker.
pub const JALALI_WEEKDAYS: [&str; 7] = [
    "شنبه",
    "یکشنبه",
    "دوشنبه",
    "سه\u{200c}شنبه",
    "چهارشنبه",
    "پنجشنبه",
    "جمعه",
];

/// Common queries every calendar system answers
pub trait Calendar: Send + Sync {
    /// Whether `year` has an extra day
    fn is_leap_year(&self, year: i32) -> bool;

    /// Number of days in `month` of `year`, or 0 when `month` is outside 1..=12
    fn month_length(&self, year: i32, month: u32) -> u32;

    /// Display name of `month`
    fn month_name(&self, month: u32) -> Option<&'static str>;

    /// Number of days in `year`
    fn days_in_year(&self, year: i32) -> u32 {
        (1..=12).map(|month| self.month_length(year, month)).sum()
    }
}

/// The Jalali calendar with the arithmetic 33-year leap cycle
#[derive(Debug, Clone, Copy, Default)]
pub struct JalaliCalendar;

impl Calendar for JalaliCalendar {
    fn is_leap_year(&self, year: i32) -> bool {
        is_leap_jalali_year(year)
    }

    fn month_length(&self, year: i32, month: u32) -> u32 {
        month_length(year, month)
    }

    fn month_name(&self, month: u32) -> Option<&'static str> {
        jalali_month(month).map(|m| m.name)
    }
}

/// The proleptic Gregorian calendar
///
/// Month names are left to chrono's formatting (`%B`).
#[derive(Debug, Clone, Copy, Default)]
pub struct GregorianCalendar;

impl Calendar for GregorianCalendar {
    fn is_leap_year(&self, year: i32) -> bool {
        is_leap_gregorian_year(year)
    }

    fn month_length(&self, year: i32, month: u32) -> u32 {
        gregorian_month_length(year, month)
    }

    fn month_name(&self, month: u32) -> Option<&'static str> {
        const NAMES: [&str; 12] = [
            "January", "February", "March", "April", "May", "June", "July", "August", "September",
            "October", "November", "December",
        ];
        NAMES.get(month.checked_sub(1)? as usize).copied()
    }
}

/// Check whether a Jalali year is a leap year under the 33-year cycle.
///
/// # Examples
/// ```
/// # use bevy_jalali_picker::calendar::is_leap_jalali_year;
/// assert!(is_leap_jalali_year(1403));
/// assert!(!is_leap_jalali_year(1404));
/// ```
pub fn is_leap_jalali_year(year: i32) -> bool {
    LEAP_REMAINDERS.contains(&year.rem_euclid(33))
}

pub fn is_leap_gregorian_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Look up the month definition for a 1-based Jalali month.
pub fn jalali_month(month: u32) -> Option<&'static Month> {
    JALALI_MONTHS.get(month.checked_sub(1)? as usize)
}

/// Number of days in a Jalali month.
///
/// Months 1–6 have 31 days, 7–11 have 30, and Esfand has 30 in a leap year
/// and 29 otherwise. Returns 0 for a month outside 1..=12; callers validate
/// the month beforehand.
pub fn month_length(year: i32, month: u32) -> u32 {
    jalali_month(month)
        .map(|m| m.length(is_leap_jalali_year(year)))
        .unwrap_or(0)
}

/// Number of days in a Gregorian month, or 0 for a month outside 1..=12.
pub fn gregorian_month_length(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_gregorian_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn days_in_jalali_year(year: i32) -> u32 {
    JalaliCalendar.days_in_year(year)
}

/// A date in the proleptic Gregorian calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GregorianDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl GregorianDate {
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Day of the week as reported by chrono.
    ///
    /// Fails with [`CalendarError::InvalidDay`] when the fields do not name a
    /// real Gregorian date.
    pub fn weekday(&self) -> Result<Weekday, CalendarError> {
        NaiveDate::try_from(*self).map(|date| date.weekday())
    }

    pub fn to_jalali(self) -> JalaliDate {
        gregorian_to_jalali(self.year, self.month, self.day)
    }
}

impl fmt::Display for GregorianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for GregorianDate {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month(), date.day())
    }
}

impl TryFrom<GregorianDate> for NaiveDate {
    type Error = CalendarError;

    fn try_from(date: GregorianDate) -> Result<Self, Self::Error> {
        NaiveDate::from_ymd_opt(date.year, date.month, date.day).ok_or(CalendarError::InvalidDay {
            year: date.year,
            month: date.month,
            day: date.day,
        })
    }
}

/// A date in the Jalali calendar
///
/// Field order makes the derived ordering chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JalaliDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl JalaliDate {
    /// Create a validated Jalali date.
    ///
    /// # Examples
    /// ```
    /// # use bevy_jalali_picker::calendar::JalaliDate;
    /// assert!(JalaliDate::new(1403, 12, 30).is_ok());
    /// assert!(JalaliDate::new(1404, 12, 30).is_err());
    /// assert!(JalaliDate::new(1404, 13, 1).is_err());
    /// ```
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        if day == 0 || day > month_length(year, month) {
            return Err(CalendarError::InvalidDay { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    pub fn is_leap_year(&self) -> bool {
        is_leap_jalali_year(self.year)
    }

    pub fn days_in_month(&self) -> u32 {
        month_length(self.year, self.month)
    }

    pub fn month_name(&self) -> &'static str {
        jalali_month(self.month).map(|m| m.name).unwrap_or_default()
    }

    pub fn to_gregorian(self) -> GregorianDate {
        jalali_to_gregorian(self.year, self.month, self.day)
    }

    pub fn weekday(&self) -> Result<Weekday, CalendarError> {
        self.to_gregorian().weekday()
    }

    /// Index of the weekday in a Saturday-first week (Saturday = 0).
    pub fn weekday_from_saturday(&self) -> Result<u32, CalendarError> {
        self.weekday().map(|weekday| (weekday.num_days_from_sunday() + 1) % 7)
    }

    /// Formats the date with an optional custom format string.
    ///
    /// Supported placeholders: `%Y` year, `%m` zero-padded month, `%d`
    /// zero-padded day, `%B` Persian month name, `%b` transliterated month
    /// name, `%A` Persian weekday name (empty for an invalid date). Defaults
    /// to `%Y/%m/%d`.
    ///
    /// # Examples
    /// ```
    /// # use bevy_jalali_picker::calendar::JalaliDate;
    /// let date = JalaliDate::new(1403, 1, 1).unwrap();
    /// assert_eq!(date.format(None), "1403/01/01");
    /// assert_eq!(date.format(Some("%d %b %Y")), "01 Farvardin 1403");
    /// ```
    pub fn format(&self, format: Option<&str>) -> String {
        let Some(fmt) = format else {
            return self.to_string();
        };
        let month = jalali_month(self.month);
        let weekday = self
            .weekday_from_saturday()
            .ok()
            .and_then(|index| JALALI_WEEKDAYS.get(index as usize))
            .copied()
            .unwrap_or_default();
        fmt.replace("%Y", &self.year.to_string())
            .replace("%m", &format!("{:02}", self.month))
            .replace("%d", &format!("{:02}", self.day))
            .replace("%B", month.map(|m| m.name).unwrap_or_default())
            .replace("%b", month.map(|m| m.latin).unwrap_or_default())
            .replace("%A", weekday)
    }
}

impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

impl From<GregorianDate> for JalaliDate {
    fn from(date: GregorianDate) -> Self {
        date.to_jalali()
    }
}

impl From<JalaliDate> for GregorianDate {
    fn from(date: JalaliDate) -> Self {
        date.to_gregorian()
    }
}

impl From<NaiveDate> for JalaliDate {
    fn from(date: NaiveDate) -> Self {
        GregorianDate::from(date).to_jalali()
    }
}

/// Convert a Gregorian date to the Jalali calendar.
///
/// # Examples
/// ```
/// # use bevy_jalali_picker::calendar::{gregorian_to_jalali, JalaliDate};
/// assert_eq!(gregorian_to_jalali(2024, 3, 20), JalaliDate { year: 1403, month: 1, day: 1 });
/// ```
pub fn gregorian_to_jalali(gy: i32, gm: u32, gd: u32) -> JalaliDate {
    let days_before_month = gm
        .checked_sub(1)
        .and_then(|m| GREGORIAN_DAYS_BEFORE_MONTH.get(m as usize))
        .copied()
        .unwrap_or(0);
    // Leap days are counted up to the end of February of `gy`.
    let gy2 = if gm > 2 { gy + 1 } else { gy };
    let mut days = 355_666 + 365 * gy + (gy2 + 3) / 4 - (gy2 + 99) / 100 + (gy2 + 399) / 400
        + gd as i32
        + days_before_month;

    let mut jy = -1595 + 33 * (days / 12_053);
    days %= 12_053;
    jy += 4 * (days / 1461);
    days %= 1461;
    if days > 365 {
        jy += (days - 1) / 365;
        days = (days - 1) % 365;
    }

    let (month, day) = if days < 186 {
        (1 + days / 31, 1 + days % 31)
    } else {
        (7 + (days - 186) / 30, 1 + (days - 186) % 30)
    };
    JalaliDate {
        year: jy,
        month: month as u32,
        day: day as u32,
    }
}

/// Convert a Jalali date to the Gregorian calendar.
///
/// This is the exact inverse of [`gregorian_to_jalali`] for every valid
/// Jalali date in the supported range.
///
/// # Examples
/// ```
/// # use bevy_jalali_picker::calendar::{jalali_to_gregorian, GregorianDate};
/// assert_eq!(jalali_to_gregorian(1403, 1, 1), GregorianDate::new(2024, 3, 20));
/// ```
pub fn jalali_to_gregorian(jy: i32, jm: u32, jd: u32) -> GregorianDate {
    let jy = jy + 1595;
    let jm = jm as i32;
    let day_of_year_offset = if jm < 7 {
        (jm - 1) * 31
    } else {
        (jm - 7) * 30 + 186
    };
    let mut days = -355_668 + 365 * jy + (jy / 33) * 8 + (jy % 33 + 3) / 4
        + jd as i32
        + day_of_year_offset;

    let mut gy = 400 * (days / 146_097);
    days %= 146_097;
    if days > 36_524 {
        days -= 1;
        gy += 100 * (days / 36_524);
        days %= 36_524;
        if days >= 365 {
            days += 1;
        }
    }
    gy += 4 * (days / 1461);
    days %= 1461;
    if days > 365 {
        gy += (days - 1) / 365;
        days = (days - 1) % 365;
    }

    let mut gd = (days + 1) as u32;
    let mut gm = 1;
    while gm < 12 && gd > gregorian_month_length(gy, gm) {
        gd -= gregorian_month_length(gy, gm);
        gm += 1;
    }
    GregorianDate::new(gy, gm, gd)
}

/// Replace ASCII digits with Extended Arabic-Indic (Persian) digits.
///
/// # Examples
/// ```
/// # use bevy_jalali_picker::calendar::to_persian_digits;
/// assert_eq!(to_persian_digits("1403/01/01"), "۱۴۰۳/۰۱/۰۱");
/// ```
pub fn to_persian_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(digit) => char::from_u32(0x06F0 + digit).unwrap_or(c),
            None => c,
        })
        .collect()
}
