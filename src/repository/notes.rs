use crate::domain::DailyNote;
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct NoteRepository {
    pool: SqlitePool,
}

impl NoteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert(
        &self,
        user_id: i64,
        date: NaiveDate,
        content: &str,
        now: NaiveDateTime,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO daily_notes (user_id, date, content, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT (user_id, date) DO UPDATE SET \
             content = excluded.content, updated_at = excluded.updated_at",
        )
        .bind(user_id)
        .bind(date)
        .bind(content)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete(&self, user_id: i64, date: NaiveDate) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM daily_notes WHERE user_id = ? AND date = ?")
            .bind(user_id)
            .bind(date)
            .execute(&self.pool)
            .await?;
        Ok(deleted.rows_affected() > 0)
    }

    pub async fn range(&self, user_id: i64, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyNote>> {
        let rows: Vec<(NaiveDate, String)> = sqlx::query_as(
            "SELECT date, content FROM daily_notes \
             WHERE user_id = ? AND date BETWEEN ? AND ? ORDER BY date ASC",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(date, content)| DailyNote { date, content })
            .collect())
    }
}
