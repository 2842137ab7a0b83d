//! Month grid layout for the date picker.
//!
//! Weeks start on Saturday. A grid is a run of leading blank cells followed by
//! one cell per day; no trailing padding is added, so the last week row may be
//! shorter than seven cells.

use serde::{Deserialize, Serialize};

use crate::calendar::{jalali_to_gregorian, month_length};

/// Number of columns in a week row
pub const DAYS_PER_WEEK: usize = 7;

/// A single cell in a month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalendarCell {
    /// Padding before the first day of the month
    Blank,
    /// A 1-based day of the month
    Day(u32),
}

/// Layout of one Jalali month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Leading blank cells, always in 0..=6
    pub blanks: u32,
    /// Day cells, equal to the month length
    pub days: u32,
}

impl MonthGrid {
    /// All cells in display order: blanks first, then days.
    pub fn cells(&self) -> Vec<CalendarCell> {
        std::iter::repeat_n(CalendarCell::Blank, self.blanks as usize)
            .chain((1..=self.days).map(CalendarCell::Day))
            .collect()
    }

    /// Cells split into week rows. The final row is not padded.
    pub fn weeks(&self) -> Vec<Vec<CalendarCell>> {
        self.cells()
            .chunks(DAYS_PER_WEEK)
            .map(|week| week.to_vec())
            .collect()
    }

    /// Column (0 = Saturday) in which `day` is displayed.
    pub fn column_of(&self, day: u32) -> Option<usize> {
        if day == 0 || day > self.days {
            return None;
        }
        Some((self.blanks + day - 1) as usize % DAYS_PER_WEEK)
    }
}

/// Build the grid for a Jalali month.
///
/// # Examples
/// ```
/// # use bevy_jalali_picker::grid::build_grid;
/// // 1403/01/01 was a Wednesday: four blanks (Sat, Sun, Mon, Tue).
/// let grid = build_grid(1403, 1);
/// assert_eq!(grid.blanks, 4);
/// assert_eq!(grid.days, 31);
/// ```
pub fn build_grid(year: i32, month: u32) -> MonthGrid {
    let days = month_length(year, month);
    let first = jalali_to_gregorian(year, month, 1);
    // Years far past the supported range fall outside chrono; no blanks there.
    let blanks = first
        .weekday()
        .map(|weekday| (weekday.num_days_from_sunday() + 1) % DAYS_PER_WEEK as u32)
        .unwrap_or(0);
    MonthGrid {
        year,
        month,
        blanks,
        days,
    }
}

/// The month after `(year, month)`, rolling into the next year after Esfand.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// The month before `(year, month)`, rolling into the previous year before Farvardin.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::JalaliDate;

    #[test]
    fn test_grid_1403_farvardin() {
        let grid = build_grid(1403, 1);
        assert_eq!(grid.days, 31);
        assert_eq!(grid.blanks, 4);

        let cells = grid.cells();
        assert_eq!(cells.len(), 35);
        assert_eq!(&cells[..4], &[CalendarCell::Blank; 4]);
        assert_eq!(cells[4], CalendarCell::Day(1));
        assert_eq!(cells[34], CalendarCell::Day(31));
    }

    #[test]
    fn test_grid_completeness() {
        for year in [1, 1357, 1402, 1403, 1404, 2000, 3000] {
            for month in 1..=12 {
                let grid = build_grid(year, month);
                assert_eq!(grid.days, month_length(year, month));
                assert!(grid.blanks <= 6);
                let first = JalaliDate::new(year, month, 1).unwrap();
                assert_eq!(Ok(grid.blanks), first.weekday_from_saturday());
            }
        }
    }

    #[test]
    fn test_consecutive_months_align() {
        // The column after a month's last day is where the next month begins.
        let mut ym = (1400, 1);
        for _ in 0..60 {
            let grid = build_grid(ym.0, ym.1);
            let (ny, nm) = next_month(ym.0, ym.1);
            let next = build_grid(ny, nm);
            assert_eq!((grid.blanks + grid.days) % 7, next.blanks);
            ym = (ny, nm);
        }
    }

    #[test]
    fn test_weeks_without_trailing_padding() {
        let grid = build_grid(1403, 1);
        let weeks = grid.weeks();
        assert_eq!(weeks.len(), 5);
        assert!(weeks[..4].iter().all(|w| w.len() == 7));
        assert_eq!(weeks[4].len(), 7);

        let esfand = build_grid(1402, 12);
        let total = (esfand.blanks + esfand.days) as usize;
        let last = esfand.weeks().pop().unwrap();
        assert_eq!(last.len(), if total % 7 == 0 { 7 } else { total % 7 });
    }

    #[test]
    fn test_grid_for_invalid_month_is_empty() {
        let grid = build_grid(1403, 13);
        assert_eq!(grid.days, 0);
        assert!(grid.blanks <= 6);
        assert!(grid.weeks().iter().all(|w| w.iter().all(|c| *c == CalendarCell::Blank)));

        assert_eq!(build_grid(300_000, 1).blanks, 0);
    }

    #[test]
    fn test_column_of() {
        let grid = build_grid(1403, 1);
        assert_eq!(grid.column_of(1), Some(4));
        assert_eq!(grid.column_of(4), Some(0));
        assert_eq!(grid.column_of(0), None);
        assert_eq!(grid.column_of(32), None);
    }

    #[test]
    fn test_month_navigation() {
        assert_eq!(next_month(1403, 12), (1404, 1));
        assert_eq!(next_month(1403, 5), (1403, 6));
        assert_eq!(previous_month(1403, 1), (1402, 12));
        assert_eq!(previous_month(1403, 7), (1403, 6));
    }
}
