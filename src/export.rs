use chrono::Datelike;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::calendar::{CalendarCell, CalendarMonth};
use crate::codec::format_date;

#[derive(Debug)]
pub enum ExportError {
    Io(io::Error),
    Csv(csv::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(err) => write!(f, "io error: {err}"),
            ExportError::Csv(err) => write!(f, "csv error: {err}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<io::Error> for ExportError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Serialize)]
struct CalendarCsvRecord {
    date: String,
    weekday: String,
    in_target_month: bool,
    is_working: bool,
    is_today: bool,
}

impl From<&CalendarCell> for CalendarCsvRecord {
    fn from(cell: &CalendarCell) -> Self {
        Self {
            date: format_date(cell.date),
            weekday: cell.date.weekday().to_string(),
            in_target_month: cell.in_target_month,
            is_working: cell.is_working,
            is_today: cell.is_today,
        }
    }
}

pub fn write_month_csv<W: io::Write>(month: &CalendarMonth, writer: W) -> ExportResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for cell in &month.cells {
        writer.serialize(CalendarCsvRecord::from(cell))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_month_to_csv<P: AsRef<Path>>(month: &CalendarMonth, path: P) -> ExportResult<()> {
    let file = File::create(path.as_ref())?;
    write_month_csv(month, file)?;
    tracing::info!(
        path = %path.as_ref().display(),
        year = month.year,
        month = month.month,
        "exported calendar month"
    );
    Ok(())
}
