use crate::errors::ApiError;
use crate::models::{ToggleRequest, ToggleResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use chrono::Local;

pub async fn toggle(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let now = Local::now().naive_local();
    let today = now.date();
    let date = payload.date.unwrap_or(today);

    if date > today {
        return Err(ApiError::bad_request("cannot record a completion in the future"));
    }

    state
        .habits
        .get_owned(payload.habit_id, payload.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("habit not found"))?;

    let outcome = state
        .streaks
        .toggle(
            payload.user_id,
            payload.habit_id,
            date,
            payload.completed,
            now,
            today,
        )
        .await?;

    Ok(Json(ToggleResponse {
        date,
        completed: payload.completed,
        current_streak: outcome.habit_streak,
        global_streak: outcome.global.current_streak,
        all_habits_completed: outcome.day_perfect,
    }))
}
