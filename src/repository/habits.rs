use crate::domain::{Category, Habit};
use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;
use std::collections::BTreeMap;

type HabitRow = (i64, i64, String, String, String, NaiveDateTime, NaiveDateTime);

const HABIT_COLUMNS: &str = "id, user_id, name, category, icon, created_at, updated_at";

#[derive(Clone)]
pub struct HabitRepository {
    pool: SqlitePool,
}

impl HabitRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: i64,
        name: &str,
        category: Category,
        icon: &str,
        now: NaiveDateTime,
    ) -> Result<Habit> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO habits (user_id, name, category, icon, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(user_id)
        .bind(name)
        .bind(category.as_str())
        .bind(icon)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(Habit {
            id,
            user_id,
            name: name.to_string(),
            category,
            icon: icon.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Fetch a habit only if it belongs to `user_id`; the ownership check on
    /// every mutating endpoint goes through here.
    pub async fn get_owned(&self, id: i64, user_id: i64) -> Result<Option<Habit>> {
        let row: Option<HabitRow> = sqlx::query_as(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(habit_from_row).transpose()
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Habit>> {
        let rows: Vec<HabitRow> = sqlx::query_as(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits WHERE user_id = ? ORDER BY created_at ASC, id ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(habit_from_row).collect()
    }

    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        name: &str,
        category: Category,
        icon: &str,
        now: NaiveDateTime,
    ) -> Result<Option<Habit>> {
        let updated = sqlx::query(
            "UPDATE habits SET name = ?, category = ?, icon = ?, updated_at = ? \
             WHERE id = ? AND user_id = ?",
        )
        .bind(name)
        .bind(category.as_str())
        .bind(icon)
        .bind(now)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_owned(id, user_id).await
    }

    /// Delete a habit; completions and the streak row go with it via the
    /// schema's cascades.
    pub async fn delete(&self, id: i64, user_id: i64) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM habits WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(deleted.rows_affected() > 0)
    }

    pub async fn count_for_user(&self, user_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM habits WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Creation day per habit, the input to existence gating.
    pub async fn created_dates(&self, user_id: i64) -> Result<BTreeMap<i64, NaiveDate>> {
        let rows: Vec<(i64, NaiveDateTime)> =
            sqlx::query_as("SELECT id, created_at FROM habits WHERE user_id = ?")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, created_at)| (id, created_at.date()))
            .collect())
    }
}

fn habit_from_row(row: HabitRow) -> Result<Habit> {
    let (id, user_id, name, category, icon, created_at, updated_at) = row;
    let category =
        Category::parse(&category).ok_or_else(|| anyhow!("unknown habit category: {category}"))?;

    Ok(Habit {
        id,
        user_id,
        name,
        category,
        icon,
        created_at,
        updated_at,
    })
}
