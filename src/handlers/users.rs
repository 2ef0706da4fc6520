use crate::errors::ApiError;
use crate::models::{CreateUserRequest, ProfileResponse, UserResponse};
use crate::repository::is_unique_violation;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Local;

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(ApiError::bad_request("username must not be empty"));
    }

    let user = state
        .users
        .create(username, Local::now().naive_local())
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                ApiError::conflict("username already taken")
            } else {
                ApiError::Internal(err.into())
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        }),
    ))
}

pub async fn profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state
        .users
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    let total_habits = state.habits.count_for_user(id).await?;
    let longest_streak = state.analytics.longest_perfect_run(id).await?;

    Ok(Json(ProfileResponse {
        id: user.id,
        username: user.username,
        created_at: user.created_at,
        total_habits,
        longest_streak,
    }))
}
