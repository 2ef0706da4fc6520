use crate::errors::ApiError;
use crate::models::{LoginDaysResponse, TrackActivityRequest, UserIdQuery, VisitResponse};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use chrono::Local;

/// Record today as a login day. Idempotent; the response carries the
/// updated distinct-day count.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<TrackActivityRequest>,
) -> Result<Json<LoginDaysResponse>, ApiError> {
    if state.users.get(payload.user_id).await?.is_none() {
        return Err(ApiError::not_found("user not found"));
    }

    let today = Local::now().date_naive();
    state.activity.record_login(payload.user_id, today).await?;
    let active_days = state.activity.login_day_count(payload.user_id).await?;

    Ok(Json(LoginDaysResponse { active_days }))
}

pub async fn login_days(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<LoginDaysResponse>, ApiError> {
    let active_days = state.activity.login_day_count(query.user_id).await?;
    Ok(Json(LoginDaysResponse { active_days }))
}

pub async fn visit(
    State(state): State<AppState>,
    Json(payload): Json<TrackActivityRequest>,
) -> Result<Json<VisitResponse>, ApiError> {
    if state.users.get(payload.user_id).await?.is_none() {
        return Err(ApiError::not_found("user not found"));
    }

    let now = Local::now().naive_local();
    let today = now.date();
    let visit_count = state.activity.record_visit(payload.user_id, today, now).await?;

    Ok(Json(VisitResponse {
        visit_date: today,
        visit_count,
    }))
}
