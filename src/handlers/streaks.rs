use crate::errors::ApiError;
use crate::models::{RefreshStreakRequest, StreakResponse, UserIdQuery};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use chrono::Local;

pub async fn current(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<StreakResponse>, ApiError> {
    let streak = state.streaks.current(query.user_id).await?;
    Ok(Json(StreakResponse {
        current_streak: streak.current_streak,
        best_streak: streak.best_streak,
        last_completion_date: streak.last_completion_date,
    }))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshStreakRequest>,
) -> Result<Json<StreakResponse>, ApiError> {
    let today = Local::now().date_naive();
    let date = payload.date.unwrap_or(today);
    if date > today {
        return Err(ApiError::bad_request("cannot evaluate a future date"));
    }

    let (streak, _) = state.streaks.refresh_global(payload.user_id, date, today).await?;
    Ok(Json(StreakResponse {
        current_streak: streak.current_streak,
        best_streak: streak.best_streak,
        last_completion_date: streak.last_completion_date,
    }))
}
