use chrono::{Days, NaiveDate};

use crate::schedule::ShiftSchedule;

/// Whole days from the schedule start to `date`; negative before the start.
fn days_since_start(schedule: &ShiftSchedule, date: NaiveDate) -> i64 {
    date.signed_duration_since(schedule.start_date()).num_days()
}

/// Zero-based position of `date` inside its cycle, or `None` before the start date.
pub fn day_in_cycle(schedule: &ShiftSchedule, date: NaiveDate) -> Option<u32> {
    let days_diff = days_since_start(schedule, date);
    if days_diff < 0 {
        return None;
    }
    let cycle_length = i64::from(schedule.cycle_length().get());
    u32::try_from(days_diff.rem_euclid(cycle_length)).ok()
}

/// Check whether `date` falls inside a working block of the schedule.
///
/// Days before the start date are never working days.
pub fn is_working_day(schedule: &ShiftSchedule, date: NaiveDate) -> bool {
    day_in_cycle(schedule, date).is_some_and(|day| day < schedule.work_days())
}

/// Find the first working day strictly after `from`.
///
/// Returns `None` when that day lies past `NaiveDate::MAX`.
pub fn next_working_day(schedule: &ShiftSchedule, from: NaiveDate) -> Option<NaiveDate> {
    let Some(day) = day_in_cycle(schedule, from) else {
        return Some(schedule.start_date());
    };
    let offset = if day + 1 < schedule.work_days() {
        1
    } else {
        // skip the rest of the cycle
        schedule.cycle_length().get() - day
    };
    from.checked_add_days(Days::new(u64::from(offset)))
}

/// Get all working days in an inclusive date range
pub fn working_days_in_range(
    schedule: &ShiftSchedule,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<NaiveDate> {
    // `iter_days` never yields `NaiveDate::MAX`
    std::iter::successors(Some(start), |date| date.succ_opt())
        .take_while(|date| *date <= end)
        .filter(|date| is_working_day(schedule, *date))
        .collect()
}

/// Count working days in an inclusive date range
pub fn count_working_days(schedule: &ShiftSchedule, start: NaiveDate, end: NaiveDate) -> i64 {
    let start = start.max(schedule.start_date());
    if start > end {
        return 0;
    }
    let cycle = i64::from(schedule.cycle_length().get());
    let work = i64::from(schedule.work_days());
    // working days among the first `n` days of the schedule
    let worked_within = |n: i64| (n / cycle) * work + (n % cycle).min(work);

    worked_within(days_since_start(schedule, end) + 1)
        - worked_within(days_since_start(schedule, start))
}
