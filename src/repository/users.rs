use crate::domain::User;
use anyhow::Result;
use chrono::NaiveDateTime;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user. Surfaces the raw sqlx error so callers can map a
    /// unique-constraint hit on `username` to a conflict response.
    pub async fn create(&self, username: &str, now: NaiveDateTime) -> Result<User, sqlx::Error> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO users (username, created_at) VALUES (?, ?) RETURNING id")
                .bind(username)
                .bind(now)
                .fetch_one(&self.pool)
                .await?;

        Ok(User {
            id,
            username: username.to_string(),
            created_at: now,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Option<User>> {
        let row: Option<(i64, String, NaiveDateTime)> =
            sqlx::query_as("SELECT id, username, created_at FROM users WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(id, username, created_at)| User {
            id,
            username,
            created_at,
        }))
    }
}
