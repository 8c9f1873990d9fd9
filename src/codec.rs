//! Mapping between [`ShiftSchedule`] and the flat `start`/`work`/`rest`/`name`
//! parameters carried by a shareable link.
//!
//! Percent-encoding is not handled here; see [`crate::link`].

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::schedule::{ScheduleError, ShiftSchedule};

pub const START_KEY: &str = "start";
pub const WORK_KEY: &str = "work";
pub const REST_KEY: &str = "rest";
pub const NAME_KEY: &str = "name";

/// Keys in the order they appear in a generated link.
pub const PARAM_KEYS: [&str; 4] = [START_KEY, WORK_KEY, REST_KEY, NAME_KEY];

const DATE_FORMAT: &str = "%Y-%m-%d";

pub type ScheduleParams = BTreeMap<String, String>;

/// Anything that can answer "what is the value of this query key".
pub trait ParamSource {
    fn param(&self, key: &str) -> Option<&str>;
}

impl ParamSource for BTreeMap<String, String> {
    fn param(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl ParamSource for HashMap<String, String> {
    fn param(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

/// Why a parameter set could not be turned into a schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedScheduleParameters {
    MissingField(&'static str),
    InvalidDate(String),
    InvalidNumber { field: &'static str, value: String },
    OutOfRange(ScheduleError),
}

impl fmt::Display for MalformedScheduleParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedScheduleParameters::MissingField(field) => {
                write!(f, "missing required parameter '{field}'")
            }
            MalformedScheduleParameters::InvalidDate(value) => {
                write!(f, "invalid start date '{value}' (expected YYYY-MM-DD)")
            }
            MalformedScheduleParameters::InvalidNumber { field, value } => {
                write!(f, "parameter '{field}' is not an integer: '{value}'")
            }
            MalformedScheduleParameters::OutOfRange(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for MalformedScheduleParameters {}

impl From<ScheduleError> for MalformedScheduleParameters {
    fn from(value: ScheduleError) -> Self {
        Self::OutOfRange(value)
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

pub fn serialize_schedule(schedule: &ShiftSchedule) -> ScheduleParams {
    let mut params = ScheduleParams::new();
    params.insert(START_KEY.to_string(), format_date(schedule.start_date()));
    params.insert(WORK_KEY.to_string(), schedule.work_days().to_string());
    params.insert(REST_KEY.to_string(), schedule.rest_days().to_string());
    if let Some(name) = schedule.name() {
        params.insert(NAME_KEY.to_string(), name.to_string());
    }
    params
}

pub fn parse_schedule<P>(params: &P) -> Result<ShiftSchedule, MalformedScheduleParameters>
where
    P: ParamSource + ?Sized,
{
    let result = parse_params(params);
    if let Err(err) = &result {
        tracing::debug!(reason = %err, "rejected schedule parameters");
    }
    result
}

fn parse_params<P>(params: &P) -> Result<ShiftSchedule, MalformedScheduleParameters>
where
    P: ParamSource + ?Sized,
{
    let start = required(params, START_KEY)?;
    let work = required(params, WORK_KEY)?;
    let rest = required(params, REST_KEY)?;

    let start_date =
        parse_date(start).ok_or_else(|| MalformedScheduleParameters::InvalidDate(start.to_string()))?;
    let work_days = parse_integer(WORK_KEY, work)?;
    let rest_days = parse_integer(REST_KEY, rest)?;

    let schedule = ShiftSchedule::new(start_date, work_days, rest_days)?;
    Ok(match params.param(NAME_KEY) {
        Some(name) => schedule.with_name(name),
        None => schedule,
    })
}

// Empty values count as absent.
fn required<'a, P>(params: &'a P, key: &'static str) -> Result<&'a str, MalformedScheduleParameters>
where
    P: ParamSource + ?Sized,
{
    match params.param(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(MalformedScheduleParameters::MissingField(key)),
    }
}

fn parse_integer(field: &'static str, input: &str) -> Result<i64, MalformedScheduleParameters> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| MalformedScheduleParameters::InvalidNumber {
            field,
            value: input.to_string(),
        })
}
