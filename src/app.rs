use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post, put};
use axum::Router;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health))
        .route("/api/users", post(handlers::users::create))
        .route("/api/users/:id", get(handlers::users::profile))
        .route(
            "/api/habits",
            post(handlers::habits::create).get(handlers::habits::list),
        )
        .route(
            "/api/habits/:id",
            put(handlers::habits::update).delete(handlers::habits::remove),
        )
        .route("/api/completions/toggle", post(handlers::completions::toggle))
        .route("/api/streaks", get(handlers::streaks::current))
        .route("/api/streaks/refresh", post(handlers::streaks::refresh))
        .route("/api/analytics", get(handlers::analytics::range))
        .route("/api/calendar", get(handlers::analytics::calendar))
        .route("/api/achievements", get(handlers::achievements::list))
        .route("/api/achievements/check", post(handlers::achievements::check))
        .route(
            "/api/notes",
            put(handlers::notes::save).get(handlers::notes::list),
        )
        .route("/api/activity/login", post(handlers::activity::login))
        .route("/api/activity/login-days", get(handlers::activity::login_days))
        .route("/api/activity/visit", post(handlers::activity::visit))
        .with_state(state)
}
