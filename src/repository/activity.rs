use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone)]
pub struct ActivityRepository {
    pool: SqlitePool,
}

impl ActivityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a login day. One row per (user, day); repeats are no-ops.
    pub async fn record_login(&self, user_id: i64, date: NaiveDate) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_login_days (user_id, login_date) VALUES (?, ?) \
             ON CONFLICT (user_id, login_date) DO NOTHING",
        )
        .bind(user_id)
        .bind(date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn login_day_count(&self, user_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_login_days WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn login_days(&self, user_id: i64) -> Result<BTreeSet<NaiveDate>> {
        let rows: Vec<(NaiveDate,)> =
            sqlx::query_as("SELECT login_date FROM user_login_days WHERE user_id = ?")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(date,)| date).collect())
    }

    /// Count a visit: first one of the day creates the row, later ones bump
    /// the counter and the last-seen time.
    pub async fn record_visit(&self, user_id: i64, date: NaiveDate, now: NaiveDateTime) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "INSERT INTO user_visits (user_id, visit_date, visit_count, first_visit_time, last_visit_time) \
             VALUES (?, ?, 1, ?, ?) \
             ON CONFLICT (user_id, visit_date) DO UPDATE SET \
             visit_count = user_visits.visit_count + 1, \
             last_visit_time = excluded.last_visit_time \
             RETURNING visit_count",
        )
        .bind(user_id)
        .bind(date)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn visits_range(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, i64>> {
        let rows: Vec<(NaiveDate, i64)> = sqlx::query_as(
            "SELECT visit_date, visit_count FROM user_visits \
             WHERE user_id = ? AND visit_date BETWEEN ? AND ? ORDER BY visit_date ASC",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }
}
