use chrono::{Datelike, Duration, NaiveDate, Weekday};
use shift_calendar::calendar::{
    GRID_CELLS, days_in_month, first_of_month, next_month, previous_month,
};
use shift_calendar::{
    CalendarError, ShiftSchedule, build_calendar_month, build_calendar_year, count_working_days,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn two_on_two_off() -> ShiftSchedule {
    ShiftSchedule::new(d(2025, 8, 11), 2, 2).unwrap()
}

#[test]
fn august_2025_grid_matches_known_layout() {
    let schedule = two_on_two_off();
    let month = build_calendar_month(&schedule, d(2025, 8, 1), d(2025, 8, 20)).unwrap();

    assert_eq!(month.cells.len(), 42);
    assert_eq!((month.year, month.month), (2025, 8));
    // 2025-08-01 is a Friday
    assert_eq!(month.leading_days, 4);
    assert_eq!(month.trailing_days, 7);

    let first = month.cells[0];
    assert_eq!(first.date, d(2025, 7, 28));
    assert!(!first.in_target_month);
    assert!(!first.is_working);

    let aug11 = month.cell(d(2025, 8, 11)).unwrap();
    assert!(aug11.is_working);
    assert!(aug11.in_target_month);

    assert_eq!(month.cells[41].date, d(2025, 9, 7));
    assert_eq!(month.first_day(), d(2025, 8, 1));
}

#[test]
fn every_grid_has_42_consecutive_cells_in_whole_weeks() {
    let schedule = two_on_two_off();
    let mut anchor = d(2023, 1, 1);
    while anchor < d(2027, 1, 1) {
        let month = build_calendar_month(&schedule, anchor, anchor).unwrap();
        assert_eq!(month.cells.len(), GRID_CELLS);
        assert_eq!(month.cells[0].date.weekday(), Weekday::Mon);
        assert_eq!(month.cells[GRID_CELLS - 1].date.weekday(), Weekday::Sun);
        for pair in month.cells.windows(2) {
            assert_eq!(pair[1].date, pair[0].date + Duration::days(1));
        }
        assert_eq!(
            month.target_cells().count() as u32,
            days_in_month(anchor),
            "wrong in-month count for {anchor}"
        );
        assert_eq!(
            month.leading_days + days_in_month(anchor) + month.trailing_days,
            GRID_CELLS as u32
        );
        assert_eq!(month.weeks().count(), 6);
        anchor = next_month(anchor).unwrap();
    }
}

#[test]
fn month_starting_on_monday_has_no_leading_days() {
    let schedule = two_on_two_off();
    // 2021-02-01 is a Monday and February 2021 has 28 days
    let month = build_calendar_month(&schedule, d(2021, 2, 14), d(2021, 2, 14)).unwrap();
    assert_eq!(month.leading_days, 0);
    assert_eq!(month.trailing_days, 14);
    assert_eq!(month.cells[0].date, d(2021, 2, 1));
    assert!(month.cells[0].in_target_month);
}

#[test]
fn today_flag_uses_supplied_reference_day() {
    let schedule = two_on_two_off();
    let month = build_calendar_month(&schedule, d(2025, 8, 1), d(2025, 8, 15)).unwrap();
    let todays: Vec<_> = month.cells.iter().filter(|c| c.is_today).collect();
    assert_eq!(todays.len(), 1);
    assert_eq!(todays[0].date, d(2025, 8, 15));

    let elsewhere = build_calendar_month(&schedule, d(2025, 8, 1), d(2026, 1, 1)).unwrap();
    assert!(elsewhere.cells.iter().all(|c| !c.is_today));

    // padding days can be "today" too
    let padded = build_calendar_month(&schedule, d(2025, 8, 1), d(2025, 7, 30)).unwrap();
    assert!(padded.cell(d(2025, 7, 30)).unwrap().is_today);
}

#[test]
fn cells_before_start_are_resting() {
    let schedule = two_on_two_off();
    let month = build_calendar_month(&schedule, d(2025, 8, 1), d(2025, 8, 1)).unwrap();
    for cell in month.cells.iter().filter(|c| c.date < schedule.start_date()) {
        assert!(!cell.is_working);
    }
    assert_eq!(month.working_days(), 11);
}

#[test]
fn month_helpers_handle_boundaries() {
    assert_eq!(first_of_month(d(2025, 8, 31)), d(2025, 8, 1));
    assert_eq!(next_month(d(2025, 12, 15)), Some(d(2026, 1, 1)));
    assert_eq!(previous_month(d(2025, 1, 31)), Some(d(2024, 12, 1)));
    assert_eq!(previous_month(d(2025, 3, 31)), Some(d(2025, 2, 1)));
    assert_eq!(next_month(NaiveDate::MAX), None);
    assert_eq!(previous_month(NaiveDate::MIN), None);
    assert_eq!(days_in_month(d(2024, 2, 10)), 29);
    assert_eq!(days_in_month(d(2100, 2, 10)), 28);
    assert_eq!(days_in_month(d(2000, 2, 10)), 29);
    assert_eq!(days_in_month(d(2025, 4, 1)), 30);
    assert_eq!(days_in_month(d(2025, 12, 1)), 31);
}

#[test]
fn year_overview_agrees_with_range_count() {
    let schedule = two_on_two_off();
    let months = build_calendar_year(&schedule, 2025, d(2025, 8, 15)).unwrap();
    assert_eq!(months.len(), 12);
    for (idx, month) in months.iter().enumerate() {
        assert_eq!(month.month, idx as u32 + 1);
        assert_eq!(month.year, 2025);
    }
    let total: usize = months.iter().map(|m| m.working_days()).sum();
    assert_eq!(
        total as i64,
        count_working_days(&schedule, d(2025, 1, 1), d(2025, 12, 31))
    );
}

#[test]
fn dataframe_view_has_one_row_per_cell() {
    let schedule = two_on_two_off();
    let month = build_calendar_month(&schedule, d(2025, 8, 1), d(2025, 8, 15)).unwrap();
    let df = month.to_dataframe().unwrap();
    assert_eq!(df.height(), 42);
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(
        names,
        vec!["date", "weekday", "in_target_month", "is_working", "is_today"]
    );
    let working = df.column("is_working").unwrap().bool().unwrap();
    // 11 in August plus Sep 1, 4 and 5 in the trailing week
    let count = working.into_iter().filter(|v| *v == Some(true)).count();
    assert_eq!(count, 14);
}

#[test]
fn months_at_the_date_limits_are_rejected() {
    let schedule = ShiftSchedule::new(NaiveDate::MIN, 3, 4).unwrap();

    let first = build_calendar_month(&schedule, NaiveDate::MIN, NaiveDate::MIN);
    assert_eq!(
        first,
        Err(CalendarError::OutOfRange {
            year: NaiveDate::MIN.year(),
            month: 1
        })
    );
    let last = build_calendar_month(&schedule, NaiveDate::MAX, NaiveDate::MAX);
    assert_eq!(
        last,
        Err(CalendarError::OutOfRange {
            year: NaiveDate::MAX.year(),
            month: 12
        })
    );
    assert!(
        last.unwrap_err()
            .to_string()
            .contains("outside the supported date range")
    );
}

#[test]
fn months_next_to_the_date_limits_keep_full_grids() {
    let schedule = ShiftSchedule::new(NaiveDate::MIN, 3, 4).unwrap();
    let february = next_month(NaiveDate::MIN).unwrap();
    let november = previous_month(first_of_month(NaiveDate::MAX)).unwrap();

    for anchor in [february, november] {
        let month = build_calendar_month(&schedule, anchor, anchor).unwrap();
        assert_eq!(month.cells.len(), GRID_CELLS);
        assert_eq!(month.cells[0].date.weekday(), Weekday::Mon);
        assert_eq!(month.target_cells().count() as u32, days_in_month(anchor));
    }
}

#[test]
fn years_at_the_date_limits_are_rejected() {
    let schedule = two_on_two_off();
    let today = d(2025, 8, 15);

    assert!(build_calendar_year(&schedule, NaiveDate::MIN.year(), today).is_err());
    assert!(build_calendar_year(&schedule, NaiveDate::MAX.year(), today).is_err());
    assert!(build_calendar_year(&schedule, i32::MAX, today).is_err());
    assert!(build_calendar_year(&schedule, i32::MIN, today).is_err());

    let inner = build_calendar_year(&schedule, NaiveDate::MAX.year() - 1, today).unwrap();
    assert_eq!(inner.len(), 12);
    assert!(inner.iter().all(|month| month.cells.len() == GRID_CELLS));
}
