use crate::errors::ApiError;
use crate::models::{AchievementsResponse, CheckAchievementsRequest, CheckAchievementsResponse, UserIdQuery};
use crate::services::Trigger;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use chrono::Local;

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<AchievementsResponse>, ApiError> {
    Ok(Json(state.achievements.summary(query.user_id).await?))
}

pub async fn check(
    State(state): State<AppState>,
    Json(payload): Json<CheckAchievementsRequest>,
) -> Result<Json<CheckAchievementsResponse>, ApiError> {
    let trigger = Trigger::parse(&payload.action).ok_or_else(|| {
        ApiError::bad_request("action must be one of login, habit_created, habit_completed, all")
    })?;

    let now = Local::now().naive_local();
    let result = state
        .achievements
        .check(payload.user_id, trigger, now.date(), now)
        .await?;

    Ok(Json(result))
}
