use crate::domain::Habit;
use crate::errors::ApiError;
use crate::models::{
    CreateHabitRequest, DeleteHabitRequest, HabitCard, HabitListResponse, UpdateHabitRequest,
    UserIdQuery,
};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Local;

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateHabitRequest>,
) -> Result<(StatusCode, Json<HabitCard>), ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("name must not be empty"));
    }
    if state.users.get(payload.user_id).await?.is_none() {
        return Err(ApiError::not_found("user not found"));
    }

    let habit = state
        .habits
        .create(
            payload.user_id,
            name,
            payload.category,
            payload.icon.trim(),
            Local::now().naive_local(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(HabitCard {
            id: habit.id,
            name: habit.name,
            category: habit.category,
            icon: habit.icon,
            current_streak: 0,
            week_progress: [false; 7],
            completed_days: 0,
        }),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<HabitListResponse>, ApiError> {
    let today = Local::now().date_naive();
    let habits = state.streaks.habit_cards(query.user_id, today).await?;
    Ok(Json(HabitListResponse { habits }))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateHabitRequest>,
) -> Result<Json<Habit>, ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("name must not be empty"));
    }

    let habit = state
        .habits
        .update(
            id,
            payload.user_id,
            name,
            payload.category,
            payload.icon.trim(),
            Local::now().naive_local(),
        )
        .await?
        .ok_or_else(|| ApiError::not_found("habit not found"))?;

    Ok(Json(habit))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<DeleteHabitRequest>,
) -> Result<StatusCode, ApiError> {
    if !state.habits.delete(id, payload.user_id).await? {
        return Err(ApiError::not_found("habit not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
