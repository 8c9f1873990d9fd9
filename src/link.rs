//! Shareable links: query-string encoding around the codec parameters.

use crate::codec::{
    MalformedScheduleParameters, PARAM_KEYS, ScheduleParams, parse_schedule, serialize_schedule,
};
use crate::schedule::ShiftSchedule;

/// Path the schedule view is served under.
pub const SCHEDULE_PATH: &str = "/schedule";

/// Form-encode key/value pairs (`+` for spaces, like HTML forms).
pub fn encode_query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Decode a query string into a parameter map.
///
/// Accepts an optional leading `?` and drops any `#fragment`. Invalid UTF-8 is
/// replaced rather than rejected, and a repeated key keeps its last value.
pub fn decode_query(query: &str) -> ScheduleParams {
    let query = query.split('#').next().unwrap_or_default();
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut params = ScheduleParams::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(decode_component(key), decode_component(value));
    }
    params
}

pub fn schedule_query(schedule: &ShiftSchedule) -> String {
    let params = serialize_schedule(schedule);
    encode_query(
        PARAM_KEYS
            .iter()
            .filter_map(|key| params.get(*key).map(|value| (*key, value.as_str()))),
    )
}

/// Full link to the schedule view, e.g.
/// `https://example.org/schedule?start=2025-08-11&work=2&rest=2`.
pub fn schedule_url(base_url: &str, schedule: &ShiftSchedule) -> String {
    format!(
        "{}{}?{}",
        base_url.trim_end_matches('/'),
        SCHEDULE_PATH,
        schedule_query(schedule)
    )
}

/// Parse a full link or a bare query string back into a schedule.
pub fn parse_schedule_url(input: &str) -> Result<ShiftSchedule, MalformedScheduleParameters> {
    let input = input.trim();
    let query = match input.split_once('?') {
        Some((_, query)) => query,
        None => input,
    };
    parse_schedule(&decode_query(query))
}

fn encode_component(input: &str) -> String {
    urlencoding::encode(input).replace("%20", "+")
}

fn decode_component(input: &str) -> String {
    let spaced = input.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}
