use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// Smallest accepted number of consecutive working or resting days.
pub const MIN_BLOCK_DAYS: u32 = 1;
/// Largest accepted number of consecutive working or resting days.
pub const MAX_BLOCK_DAYS: u32 = 365;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    WorkDaysOutOfRange(i64),
    RestDaysOutOfRange(i64),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::WorkDaysOutOfRange(value) => write!(
                f,
                "work days must be between {MIN_BLOCK_DAYS} and {MAX_BLOCK_DAYS} (got {value})"
            ),
            ScheduleError::RestDaysOutOfRange(value) => write!(
                f,
                "rest days must be between {MIN_BLOCK_DAYS} and {MAX_BLOCK_DAYS} (got {value})"
            ),
        }
    }
}

impl std::error::Error for ScheduleError {}

/// A rotating shift: `work_days` on, `rest_days` off, repeating from `start_date`.
///
/// Values are validated on construction and immutable afterwards, so every
/// `ShiftSchedule` has a cycle length of at least two days.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ShiftScheduleRecord", into = "ShiftScheduleRecord")]
pub struct ShiftSchedule {
    start_date: NaiveDate,
    work_days: NonZeroU32,
    rest_days: NonZeroU32,
    name: Option<String>,
}

impl ShiftSchedule {
    pub fn new(start_date: NaiveDate, work_days: i64, rest_days: i64) -> Result<Self, ScheduleError> {
        let work_days =
            Self::block_length(work_days).ok_or(ScheduleError::WorkDaysOutOfRange(work_days))?;
        let rest_days =
            Self::block_length(rest_days).ok_or(ScheduleError::RestDaysOutOfRange(rest_days))?;
        Ok(Self {
            start_date,
            work_days,
            rest_days,
            name: None,
        })
    }

    /// Attach a display label. An empty label is the same as no label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = if name.is_empty() { None } else { Some(name) };
        self
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn work_days(&self) -> u32 {
        self.work_days.get()
    }

    pub fn rest_days(&self) -> u32 {
        self.rest_days.get()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn cycle_length(&self) -> NonZeroU32 {
        self.work_days.saturating_add(self.rest_days.get())
    }

    fn block_length(value: i64) -> Option<NonZeroU32> {
        if !(i64::from(MIN_BLOCK_DAYS)..=i64::from(MAX_BLOCK_DAYS)).contains(&value) {
            return None;
        }
        u32::try_from(value).ok().and_then(NonZeroU32::new)
    }
}

#[derive(Serialize, Deserialize)]
struct ShiftScheduleRecord {
    start_date: NaiveDate,
    work_days: i64,
    rest_days: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl TryFrom<ShiftScheduleRecord> for ShiftSchedule {
    type Error = ScheduleError;

    fn try_from(record: ShiftScheduleRecord) -> Result<Self, Self::Error> {
        let schedule = ShiftSchedule::new(record.start_date, record.work_days, record.rest_days)?;
        Ok(match record.name {
            Some(name) => schedule.with_name(name),
            None => schedule,
        })
    }
}

impl From<ShiftSchedule> for ShiftScheduleRecord {
    fn from(schedule: ShiftSchedule) -> Self {
        Self {
            start_date: schedule.start_date,
            work_days: i64::from(schedule.work_days.get()),
            rest_days: i64::from(schedule.rest_days.get()),
            name: schedule.name,
        }
    }
}
