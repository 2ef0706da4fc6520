use crate::achievements::{AchievementDef, CATALOG};
use anyhow::Result;
use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use tracing::info;

/// One catalog row joined with the user's progress record (if any).
#[derive(Debug, Clone)]
pub struct AchievementStatus {
    pub key: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub requirement_type: String,
    pub requirement_value: i64,
    pub points: i64,
    pub current_progress: i64,
    pub is_earned: bool,
    pub earned_at: Option<NaiveDateTime>,
}

#[derive(Clone)]
pub struct AchievementRepository {
    pool: SqlitePool,
}

impl AchievementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Idempotently seed the catalog table from the in-code definitions.
    /// Existing rows are refreshed in place so edits to names, descriptions,
    /// or point values propagate; `achievement_key` is the identity.
    pub async fn seed_catalog(&self) -> Result<()> {
        for def in CATALOG {
            self.upsert_def(def).await?;
        }
        info!("achievement catalog seeded ({} entries)", CATALOG.len());
        Ok(())
    }

    async fn upsert_def(&self, def: &AchievementDef) -> Result<()> {
        sqlx::query(
            "INSERT INTO achievements \
             (achievement_key, name, description, icon, category, requirement_type, requirement_value, points) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT (achievement_key) DO UPDATE SET \
             name = excluded.name, \
             description = excluded.description, \
             icon = excluded.icon, \
             category = excluded.category, \
             requirement_type = excluded.requirement_type, \
             requirement_value = excluded.requirement_value, \
             points = excluded.points",
        )
        .bind(def.key)
        .bind(def.name)
        .bind(def.description)
        .bind(def.icon)
        .bind(def.category)
        .bind(def.requirement.type_name())
        .bind(def.threshold)
        .bind(def.points)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list_with_progress(&self, user_id: i64) -> Result<Vec<AchievementStatus>> {
        type Row = (
            String,
            String,
            String,
            String,
            String,
            String,
            i64,
            i64,
            Option<i64>,
            Option<i64>,
            Option<NaiveDateTime>,
        );

        let rows: Vec<Row> = sqlx::query_as(
            "SELECT a.achievement_key, a.name, a.description, a.icon, a.category, \
                    a.requirement_type, a.requirement_value, a.points, \
                    ua.current_progress, ua.is_earned, ua.earned_at \
             FROM achievements a \
             LEFT JOIN user_achievements ua \
               ON ua.achievement_id = a.id AND ua.user_id = ? \
             ORDER BY a.id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(
                    key,
                    name,
                    description,
                    icon,
                    category,
                    requirement_type,
                    requirement_value,
                    points,
                    current_progress,
                    is_earned,
                    earned_at,
                )| AchievementStatus {
                    key,
                    name,
                    description,
                    icon,
                    category,
                    requirement_type,
                    requirement_value,
                    points,
                    current_progress: current_progress.unwrap_or(0),
                    is_earned: is_earned.unwrap_or(0) != 0,
                    earned_at,
                },
            )
            .collect())
    }

    /// Record progress toward an achievement. Progress never decreases.
    pub async fn upsert_progress(&self, user_id: i64, key: &str, progress: i64) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_achievements (user_id, achievement_id, current_progress) \
             SELECT ?, id, ? FROM achievements WHERE achievement_key = ? \
             ON CONFLICT (user_id, achievement_id) DO UPDATE SET \
             current_progress = MAX(user_achievements.current_progress, excluded.current_progress)",
        )
        .bind(user_id)
        .bind(progress)
        .bind(key)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Mark an achievement earned. Returns false when it was already earned;
    /// a user can earn each achievement exactly once.
    pub async fn award(
        &self,
        user_id: i64,
        key: &str,
        progress: i64,
        now: NaiveDateTime,
    ) -> Result<bool> {
        let awarded = sqlx::query(
            "INSERT INTO user_achievements (user_id, achievement_id, current_progress, is_earned, earned_at) \
             SELECT ?, id, ?, 1, ? FROM achievements WHERE achievement_key = ? \
             ON CONFLICT (user_id, achievement_id) DO UPDATE SET \
             current_progress = MAX(user_achievements.current_progress, excluded.current_progress), \
             is_earned = 1, \
             earned_at = excluded.earned_at \
             WHERE user_achievements.is_earned = 0",
        )
        .bind(user_id)
        .bind(progress)
        .bind(now)
        .bind(key)
        .execute(&self.pool)
        .await?;

        Ok(awarded.rows_affected() > 0)
    }

    /// Distinct catalog categories in which the user has earned something.
    pub async fn earned_category_count(&self, user_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT a.category) \
             FROM user_achievements ua \
             JOIN achievements a ON ua.achievement_id = a.id \
             WHERE ua.user_id = ? AND ua.is_earned = 1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

}
