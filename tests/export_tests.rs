use chrono::NaiveDate;
use shift_calendar::{ShiftSchedule, build_calendar_month, save_month_to_csv, write_month_csv};
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn month_csv_has_header_and_one_row_per_cell() {
    let schedule = ShiftSchedule::new(d(2025, 8, 11), 2, 2).unwrap();
    let month = build_calendar_month(&schedule, d(2025, 8, 1), d(2025, 8, 12)).unwrap();

    let mut buffer = Vec::new();
    write_month_csv(&month, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 43);
    assert_eq!(lines[0], "date,weekday,in_target_month,is_working,is_today");
    assert_eq!(lines[1], "2025-07-28,Mon,false,false,false");
    assert!(lines.contains(&"2025-08-11,Mon,true,true,false"));
    assert!(lines.contains(&"2025-08-12,Tue,true,true,true"));
    assert!(lines.contains(&"2025-08-13,Wed,true,false,false"));
}

#[test]
fn save_month_to_csv_writes_file() {
    let schedule = ShiftSchedule::new(d(2025, 8, 11), 2, 2).unwrap();
    let month = build_calendar_month(&schedule, d(2025, 9, 1), d(2025, 9, 1)).unwrap();
    let tmp = NamedTempFile::new().expect("create temp file");

    save_month_to_csv(&month, tmp.path()).expect("export month");

    let text = std::fs::read_to_string(tmp.path()).unwrap();
    assert_eq!(text.lines().count(), 43);
    assert!(text.contains("2025-09-01,Mon,true,true,true"));
}

#[test]
fn save_month_to_csv_reports_io_errors() {
    let schedule = ShiftSchedule::new(d(2025, 8, 11), 2, 2).unwrap();
    let month = build_calendar_month(&schedule, d(2025, 9, 1), d(2025, 9, 1)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-dir").join("month.csv");

    let err = save_month_to_csv(&month, &missing).unwrap_err();
    assert!(err.to_string().starts_with("io error"));
}
