use chrono::{Datelike, Days, NaiveDate};
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;

use crate::cycle::is_working_day;
use crate::schedule::ShiftSchedule;

pub const DAYS_PER_WEEK: usize = 7;
pub const GRID_WEEKS: usize = 6;
/// Every month grid has exactly this many cells, Monday-first.
pub const GRID_CELLS: usize = DAYS_PER_WEEK * GRID_WEEKS;

/// The requested month cannot be laid out inside chrono's date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarError {
    OutOfRange { year: i32, month: u32 },
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::OutOfRange { year, month } => write!(
                f,
                "calendar for {year}-{month:02} is outside the supported date range"
            ),
        }
    }
}

impl std::error::Error for CalendarError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub is_working: bool,
    pub is_today: bool,
    pub in_target_month: bool,
}

/// A 6x7 month grid padded with the tail of the previous month and the head
/// of the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub leading_days: u32,
    pub trailing_days: u32,
    pub cells: Vec<CalendarCell>,
}

impl CalendarMonth {
    pub fn first_day(&self) -> NaiveDate {
        self.cells[self.leading_days as usize].date
    }

    /// Rows of the grid, Monday to Sunday.
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell]> + '_ {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    pub fn target_cells(&self) -> impl Iterator<Item = &CalendarCell> + '_ {
        self.cells.iter().filter(|cell| cell.in_target_month)
    }

    /// Number of working days inside the target month (padding excluded).
    pub fn working_days(&self) -> usize {
        self.target_cells().filter(|cell| cell.is_working).count()
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarCell> {
        self.cells.iter().find(|cell| cell.date == date)
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let dates: Vec<i32> = self.cells.iter().map(|c| date_to_i32(c.date)).collect();
        let weekdays: Vec<String> = self
            .cells
            .iter()
            .map(|c| c.date.weekday().to_string())
            .collect();
        let in_month: Vec<bool> = self.cells.iter().map(|c| c.in_target_month).collect();
        let working: Vec<bool> = self.cells.iter().map(|c| c.is_working).collect();
        let today: Vec<bool> = self.cells.iter().map(|c| c.is_today).collect();

        let columns = vec![
            Series::new(PlSmallStr::from_static("date"), dates)
                .cast(&DataType::Date)?
                .into_column(),
            Series::new(PlSmallStr::from_static("weekday"), weekdays).into_column(),
            Series::new(PlSmallStr::from_static("in_target_month"), in_month).into_column(),
            Series::new(PlSmallStr::from_static("is_working"), working).into_column(),
            Series::new(PlSmallStr::from_static("is_today"), today).into_column(),
        ];
        DataFrame::new(columns)
    }
}

fn date_to_i32(date: NaiveDate) -> i32 {
    // NaiveDate::default() is 1970-01-01
    (date - NaiveDate::default()).num_days() as i32
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    // day 1 of a representable month is always representable
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    match date.month() {
        2 if NaiveDate::from_ymd_opt(date.year(), 2, 29).is_some() => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// First day of the month after the one containing `date`, if representable.
pub fn next_month(date: NaiveDate) -> Option<NaiveDate> {
    let first = first_of_month(date);
    first.checked_add_days(Days::new(u64::from(days_in_month(first))))
}

/// First day of the month before the one containing `date`, if representable.
pub fn previous_month(date: NaiveDate) -> Option<NaiveDate> {
    first_of_month(date).pred_opt().map(first_of_month)
}

/// Build the month grid containing `anchor`.
///
/// `today` is supplied by the caller so the grid stays deterministic; the
/// matching cell gets `is_today` set. Fails only for the first and last
/// months chrono can represent, whose padding weeks fall outside its range.
pub fn build_calendar_month(
    schedule: &ShiftSchedule,
    anchor: NaiveDate,
    today: NaiveDate,
) -> Result<CalendarMonth, CalendarError> {
    let first = first_of_month(anchor);
    let out_of_range = CalendarError::OutOfRange {
        year: first.year(),
        month: first.month(),
    };
    let month_length = days_in_month(first);
    let leading_days = first.weekday().num_days_from_monday();
    let trailing_days = GRID_CELLS as u32 - month_length - leading_days;

    let grid_start = first
        .checked_sub_days(Days::new(u64::from(leading_days)))
        .ok_or(out_of_range)?;
    grid_start
        .checked_add_days(Days::new(GRID_CELLS as u64 - 1))
        .ok_or(out_of_range)?;

    let cells = std::iter::successors(Some(grid_start), |date| date.succ_opt())
        .take(GRID_CELLS)
        .map(|date| CalendarCell {
            date,
            is_working: is_working_day(schedule, date),
            is_today: date == today,
            in_target_month: date.year() == first.year() && date.month() == first.month(),
        })
        .collect();

    Ok(CalendarMonth {
        year: first.year(),
        month: first.month(),
        leading_days,
        trailing_days,
        cells,
    })
}

/// Build all twelve month grids of `year`, January first.
pub fn build_calendar_year(
    schedule: &ShiftSchedule,
    year: i32,
    today: NaiveDate,
) -> Result<Vec<CalendarMonth>, CalendarError> {
    (1..=12u32)
        .into_par_iter()
        .map(|month| {
            NaiveDate::from_ymd_opt(year, month, 1)
                .ok_or(CalendarError::OutOfRange { year, month })
                .and_then(|first| build_calendar_month(schedule, first, today))
        })
        .collect()
}
