use crate::domain::UserStreak;
use anyhow::Result;
use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Clone)]
pub struct StreakRepository {
    pool: SqlitePool,
}

impl StreakRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read the global streak row, materializing a zero row on first access.
    pub async fn ensure_user_streak(&self, user_id: i64) -> Result<UserStreak> {
        if let Some(streak) = self.user_streak(user_id).await? {
            return Ok(streak);
        }

        sqlx::query(
            "INSERT INTO user_streaks (user_id, current_streak, best_streak) VALUES (?, 0, 0) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(UserStreak::zero())
    }

    pub async fn user_streak(&self, user_id: i64) -> Result<Option<UserStreak>> {
        let row: Option<(i64, i64, Option<NaiveDate>)> = sqlx::query_as(
            "SELECT current_streak, best_streak, last_completion_date \
             FROM user_streaks WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(current_streak, best_streak, last_completion_date)| UserStreak {
            current_streak,
            best_streak,
            last_completion_date,
        }))
    }
}

pub async fn upsert_habit_streak_tx(
    conn: &mut SqliteConnection,
    habit_id: i64,
    streak: i64,
    last_completion_date: Option<NaiveDate>,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO habit_streaks (habit_id, streak, last_completion_date) VALUES (?, ?, ?) \
         ON CONFLICT (habit_id) DO UPDATE SET \
         streak = excluded.streak, last_completion_date = excluded.last_completion_date",
    )
    .bind(habit_id)
    .bind(streak)
    .bind(last_completion_date)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn user_streak_tx(conn: &mut SqliteConnection, user_id: i64) -> Result<UserStreak> {
    let row: Option<(i64, i64, Option<NaiveDate>)> = sqlx::query_as(
        "SELECT current_streak, best_streak, last_completion_date \
         FROM user_streaks WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await?;

    Ok(row
        .map(|(current_streak, best_streak, last_completion_date)| UserStreak {
            current_streak,
            best_streak,
            last_completion_date,
        })
        .unwrap_or_else(UserStreak::zero))
}

pub async fn upsert_user_streak_tx(
    conn: &mut SqliteConnection,
    user_id: i64,
    streak: UserStreak,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO user_streaks (user_id, current_streak, best_streak, last_completion_date) \
         VALUES (?, ?, ?, ?) \
         ON CONFLICT (user_id) DO UPDATE SET \
         current_streak = excluded.current_streak, \
         best_streak = excluded.best_streak, \
         last_completion_date = excluded.last_completion_date",
    )
    .bind(user_id)
    .bind(streak.current_streak)
    .bind(streak.best_streak)
    .bind(streak.last_completion_date)
    .execute(conn)
    .await?;
    Ok(())
}
