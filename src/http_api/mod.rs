use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Datelike, Local, NaiveDate};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::json;

use crate::calendar::{
    CalendarError, CalendarMonth, build_calendar_month, build_calendar_year, days_in_month,
    first_of_month,
};
use crate::codec::{
    MalformedScheduleParameters, ScheduleParams, parse_date, parse_schedule, serialize_schedule,
};
use crate::cycle::{day_in_cycle, is_working_day};
use crate::link::schedule_url;
use crate::ShiftSchedule;

const DEFAULT_CACHE_CAPACITY: usize = 256;

type GridKey = (ShiftSchedule, NaiveDate, NaiveDate);

/// Memoised month grids keyed by schedule, month and reference day.
///
/// The whole map is dropped once it reaches capacity.
pub struct GridCache {
    capacity: usize,
    grids: RwLock<HashMap<GridKey, Arc<CalendarMonth>>>,
}

impl GridCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            grids: RwLock::new(HashMap::new()),
        }
    }

    pub fn get_or_build(
        &self,
        schedule: &ShiftSchedule,
        anchor: NaiveDate,
        today: NaiveDate,
    ) -> Result<Arc<CalendarMonth>, CalendarError> {
        let key = (schedule.clone(), first_of_month(anchor), today);
        let cached = self.grids.read().get(&key).cloned();
        if let Some(month) = cached {
            tracing::debug!(month = %key.1, "grid cache hit");
            return Ok(month);
        }

        tracing::debug!(month = %key.1, "grid cache miss");
        let month = Arc::new(build_calendar_month(schedule, anchor, today)?);
        let mut grids = self.grids.write();
        if grids.len() >= self.capacity {
            grids.clear();
        }
        grids.insert(key, month.clone());
        Ok(month)
    }

    pub fn len(&self) -> usize {
        self.grids.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.read().is_empty()
    }
}

#[derive(Clone)]
pub struct AppState {
    base_url: Arc<str>,
    cache: Arc<GridCache>,
}

impl AppState {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_cache(base_url, Arc::new(GridCache::new(DEFAULT_CACHE_CAPACITY)))
    }

    pub fn with_cache(base_url: impl Into<String>, cache: Arc<GridCache>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: Arc::from(base_url.trim_end_matches('/')),
            cache,
        }
    }

    pub fn cache(&self) -> Arc<GridCache> {
        self.cache.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<MalformedScheduleParameters> for ApiError {
    fn from(value: MalformedScheduleParameters) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl From<CalendarError> for ApiError {
    fn from(value: CalendarError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorBody {
                    error: "not_found",
                    message,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ScheduleView {
    schedule: ShiftSchedule,
    params: ScheduleParams,
    url: String,
    month: CalendarMonth,
}

#[derive(Debug, Serialize)]
struct DayStatus {
    date: NaiveDate,
    is_working: bool,
    day_in_cycle: Option<u32>,
}

#[derive(Debug, Serialize)]
struct MonthSummary {
    month: u32,
    days_in_month: u32,
    working_days: usize,
}

#[derive(Debug, Serialize)]
struct YearSummary {
    year: i32,
    working_days: usize,
    months: Vec<MonthSummary>,
}

#[derive(Debug, Serialize)]
struct LinkResponse {
    url: String,
    params: ScheduleParams,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schedule", get(schedule_view))
        .route("/schedule/day", get(day_status))
        .route("/schedule/year", get(year_summary))
        .route("/link", post(create_link))
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "shift-calendar HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("no such route".into())
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn optional_date(
    params: &HashMap<String, String>,
    key: &str,
) -> Result<Option<NaiveDate>, ApiError> {
    match params.get(key) {
        Some(value) => parse_date(value)
            .map(Some)
            .ok_or_else(|| ApiError::invalid(format!("invalid {key} '{value}' (expected YYYY-MM-DD)"))),
        None => Ok(None),
    }
}

fn parse_month(value: &str) -> Result<NaiveDate, ApiError> {
    parse_date(&format!("{}-01", value.trim()))
        .ok_or_else(|| ApiError::invalid(format!("invalid month '{value}' (expected YYYY-MM)")))
}

async fn schedule_view(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ScheduleView>, ApiError> {
    let schedule = parse_schedule(&params)?;
    let today = optional_date(&params, "today")?.unwrap_or_else(local_today);
    let anchor = match params.get("month") {
        Some(month) => parse_month(month)?,
        None => today,
    };

    let month = state.cache.get_or_build(&schedule, anchor, today)?;
    tracing::info!(
        start = %schedule.start_date(),
        year = month.year,
        month = month.month,
        "rendered schedule month"
    );
    Ok(Json(ScheduleView {
        params: serialize_schedule(&schedule),
        url: schedule_url(&state.base_url, &schedule),
        month: month.as_ref().clone(),
        schedule,
    }))
}

async fn day_status(Query(params): Query<HashMap<String, String>>) -> Result<Json<DayStatus>, ApiError> {
    let schedule = parse_schedule(&params)?;
    let date = optional_date(&params, "date")?
        .ok_or_else(|| ApiError::invalid("missing required parameter 'date'"))?;
    Ok(Json(DayStatus {
        date,
        is_working: is_working_day(&schedule, date),
        day_in_cycle: day_in_cycle(&schedule, date),
    }))
}

async fn year_summary(Query(params): Query<HashMap<String, String>>) -> Result<Json<YearSummary>, ApiError> {
    let schedule = parse_schedule(&params)?;
    let today = optional_date(&params, "today")?.unwrap_or_else(local_today);
    let year = match params.get("year") {
        Some(value) => value
            .trim()
            .parse::<i32>()
            .map_err(|_| ApiError::invalid(format!("invalid year '{value}'")))?,
        None => today.year(),
    };

    let months: Vec<MonthSummary> = build_calendar_year(&schedule, year, today)?
        .iter()
        .map(|month| MonthSummary {
            month: month.month,
            days_in_month: days_in_month(month.first_day()),
            working_days: month.working_days(),
        })
        .collect();

    Ok(Json(YearSummary {
        year,
        working_days: months.iter().map(|m| m.working_days).sum(),
        months,
    }))
}

async fn create_link(
    State(state): State<AppState>,
    Json(schedule): Json<ShiftSchedule>,
) -> Json<LinkResponse> {
    Json(LinkResponse {
        url: schedule_url(&state.base_url, &schedule),
        params: serialize_schedule(&schedule),
    })
}
