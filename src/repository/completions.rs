use crate::domain::Category;
use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone)]
pub struct CompletionRepository {
    pool: SqlitePool,
}

impl CompletionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn all_for_user(&self, user_id: i64) -> Result<Vec<(i64, NaiveDate)>> {
        let rows: Vec<(i64, NaiveDate)> = sqlx::query_as(
            "SELECT hc.habit_id, hc.completion_date \
             FROM habit_completions hc \
             JOIN habits h ON hc.habit_id = h.id \
             WHERE h.user_id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Full history keyed by habit: one query feeding every per-habit walk.
    pub async fn by_habit_for_user(&self, user_id: i64) -> Result<BTreeMap<i64, BTreeSet<NaiveDate>>> {
        let rows = self.all_for_user(user_id).await?;
        let mut grouped: BTreeMap<i64, BTreeSet<NaiveDate>> = BTreeMap::new();
        for (habit_id, date) in rows {
            grouped.entry(habit_id).or_default().insert(date);
        }
        Ok(grouped)
    }

    /// Full history keyed by day, the input to the perfect-day scan.
    pub async fn by_day_for_user(&self, user_id: i64) -> Result<BTreeMap<NaiveDate, BTreeSet<i64>>> {
        let rows = self.all_for_user(user_id).await?;
        let mut grouped: BTreeMap<NaiveDate, BTreeSet<i64>> = BTreeMap::new();
        for (habit_id, date) in rows {
            grouped.entry(date).or_default().insert(habit_id);
        }
        Ok(grouped)
    }

    pub async fn range_for_user(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(i64, NaiveDate)>> {
        let rows: Vec<(i64, NaiveDate)> = sqlx::query_as(
            "SELECT hc.habit_id, hc.completion_date \
             FROM habit_completions hc \
             JOIN habits h ON hc.habit_id = h.id \
             WHERE h.user_id = ? AND hc.completion_date BETWEEN ? AND ? \
             ORDER BY hc.completion_date ASC",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count_for_user(&self, user_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM habit_completions hc \
             JOIN habits h ON hc.habit_id = h.id WHERE h.user_id = ?",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn count_by_category(&self, user_id: i64) -> Result<BTreeMap<Category, i64>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT h.category, COUNT(*) \
             FROM habit_completions hc \
             JOIN habits h ON hc.habit_id = h.id \
             WHERE h.user_id = ? GROUP BY h.category",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = BTreeMap::new();
        for (category, count) in rows {
            let category = Category::parse(&category)
                .ok_or_else(|| anyhow!("unknown habit category: {category}"))?;
            counts.insert(category, count);
        }
        Ok(counts)
    }

    /// Completions recorded strictly before `cutoff` (wall-clock, "HH:MM:SS").
    pub async fn count_before_time(&self, user_id: i64, cutoff: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM habit_completions hc \
             JOIN habits h ON hc.habit_id = h.id \
             WHERE h.user_id = ? AND time(hc.completed_at) < ?",
        )
        .bind(user_id)
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Completions recorded strictly after `cutoff` (wall-clock, "HH:MM:SS").
    pub async fn count_after_time(&self, user_id: i64, cutoff: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM habit_completions hc \
             JOIN habits h ON hc.habit_id = h.id \
             WHERE h.user_id = ? AND time(hc.completed_at) > ?",
        )
        .bind(user_id)
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

// Transaction-scoped statements used by the toggle path; every write to a
// completion row happens inside the caller's transaction.

pub async fn insert_tx(
    conn: &mut SqliteConnection,
    habit_id: i64,
    date: NaiveDate,
    completed_at: NaiveDateTime,
) -> Result<bool> {
    let inserted = sqlx::query(
        "INSERT INTO habit_completions (habit_id, completion_date, completed_at) \
         VALUES (?, ?, ?) ON CONFLICT (habit_id, completion_date) DO NOTHING",
    )
    .bind(habit_id)
    .bind(date)
    .bind(completed_at)
    .execute(conn)
    .await?;

    Ok(inserted.rows_affected() > 0)
}

pub async fn remove_tx(conn: &mut SqliteConnection, habit_id: i64, date: NaiveDate) -> Result<bool> {
    let removed =
        sqlx::query("DELETE FROM habit_completions WHERE habit_id = ? AND completion_date = ?")
            .bind(habit_id)
            .bind(date)
            .execute(conn)
            .await?;

    Ok(removed.rows_affected() > 0)
}

pub async fn dates_for_habit_tx(
    conn: &mut SqliteConnection,
    habit_id: i64,
) -> Result<BTreeSet<NaiveDate>> {
    let rows: Vec<(NaiveDate,)> =
        sqlx::query_as("SELECT completion_date FROM habit_completions WHERE habit_id = ?")
            .bind(habit_id)
            .fetch_all(conn)
            .await?;

    Ok(rows.into_iter().map(|(date,)| date).collect())
}

/// Distinct habits completed on `date`, counting only habits that already
/// existed on that day.
pub async fn completed_on_tx(conn: &mut SqliteConnection, user_id: i64, date: NaiveDate) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(DISTINCT hc.habit_id) \
         FROM habit_completions hc \
         JOIN habits h ON hc.habit_id = h.id \
         WHERE h.user_id = ? AND hc.completion_date = ? AND date(h.created_at) <= ?",
    )
    .bind(user_id)
    .bind(date)
    .bind(date)
    .fetch_one(conn)
    .await?;
    Ok(count)
}

/// Habits of `user_id` that existed on `date`.
pub async fn existing_on_tx(conn: &mut SqliteConnection, user_id: i64, date: NaiveDate) -> Result<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM habits WHERE user_id = ? AND date(created_at) <= ?")
            .bind(user_id)
            .bind(date)
            .fetch_one(conn)
            .await?;
    Ok(count)
}
