pub mod calendar;
pub mod codec;
pub mod config;
pub mod cycle;
pub mod export;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod link;
pub mod logging;
pub mod schedule;

pub use calendar::{
    CalendarCell, CalendarError, CalendarMonth, build_calendar_month, build_calendar_year,
};
pub use codec::{MalformedScheduleParameters, ScheduleParams, parse_schedule, serialize_schedule};
pub use config::{AppConfig, ConfigError};
pub use cycle::{
    count_working_days, day_in_cycle, is_working_day, next_working_day, working_days_in_range,
};
pub use export::{ExportError, save_month_to_csv, write_month_csv};
pub use link::{parse_schedule_url, schedule_url};
pub use schedule::{ScheduleError, ShiftSchedule};
