use crate::errors::ApiError;
use crate::models::{AnalyticsResponse, CalendarResponse, MonthQuery, RangeQuery};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, Duration, Local};

pub async fn range(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let today = Local::now().date_naive();
    // The dashboard defaults to a trailing quarter.
    let start = query.start.unwrap_or(today - Duration::days(90));
    let end = query.end.unwrap_or(today);
    if start > end {
        return Err(ApiError::bad_request("start must not be after end"));
    }

    let overview = state
        .analytics
        .range_overview(query.user_id, start, end, today)
        .await?;
    Ok(Json(overview))
}

pub async fn calendar(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CalendarResponse>, ApiError> {
    let today = Local::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    state
        .analytics
        .month_overview(query.user_id, year, month, today)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::bad_request("invalid year/month"))
}
