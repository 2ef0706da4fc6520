pub mod achievements;
pub mod activity;
pub mod analytics;
pub mod completions;
pub mod habits;
pub mod notes;
pub mod streaks;
pub mod users;

use axum::http::StatusCode;

pub async fn health() -> StatusCode {
    StatusCode::OK
}
