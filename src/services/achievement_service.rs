use crate::achievements::{self, progress_for, Requirement, UserStats, CATALOG};
use crate::models::{AchievementStats, AchievementView, AchievementsResponse, CheckAchievementsResponse};
use crate::repository::{AchievementRepository, ActivityRepository, CompletionRepository, HabitRepository};
use crate::streaks::{best_run, current_run_lenient, perfect_days};
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Which user action is being evaluated. Each trigger looks only at the
/// catalog entries that action can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Login,
    HabitCreated,
    HabitCompleted,
    All,
}

impl Trigger {
    pub fn parse(value: &str) -> Option<Trigger> {
        match value {
            "login" => Some(Trigger::Login),
            "habit_created" => Some(Trigger::HabitCreated),
            "habit_completed" => Some(Trigger::HabitCompleted),
            "all" => Some(Trigger::All),
            _ => None,
        }
    }

    fn covers(self, requirement: Requirement) -> bool {
        match self {
            Trigger::All => true,
            Trigger::Login => matches!(
                requirement,
                Requirement::LoginStreak | Requirement::TotalLogins
            ),
            Trigger::HabitCreated => matches!(requirement, Requirement::HabitsCreated),
            Trigger::HabitCompleted => !matches!(
                requirement,
                Requirement::LoginStreak | Requirement::TotalLogins | Requirement::HabitsCreated
            ),
        }
    }
}

#[derive(Clone)]
pub struct AchievementService {
    habits: HabitRepository,
    completions: CompletionRepository,
    activity: ActivityRepository,
    achievements: AchievementRepository,
}

impl AchievementService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            habits: HabitRepository::new(pool.clone()),
            completions: CompletionRepository::new(pool.clone()),
            activity: ActivityRepository::new(pool.clone()),
            achievements: AchievementRepository::new(pool),
        }
    }

    /// One snapshot of every metric the catalog evaluates.
    pub async fn compute_stats(&self, user_id: i64, today: NaiveDate) -> Result<UserStats> {
        let login_days = self.activity.login_days(user_id).await?;
        let created = self.habits.created_dates(user_id).await?;
        let by_habit = self.completions.by_habit_for_user(user_id).await?;

        let mut by_day: BTreeMap<NaiveDate, BTreeSet<i64>> = BTreeMap::new();
        for (habit_id, days) in &by_habit {
            for day in days {
                by_day.entry(*day).or_default().insert(*habit_id);
            }
        }

        let perfect = perfect_days(&created, &by_day);
        let best_habit_streak = by_habit.values().map(best_run).max().unwrap_or(0);
        let has_comeback = by_habit.values().any(|days| {
            let run = current_run_lenient(days, today);
            run >= 2 && days.len() as u32 > run
        });

        Ok(UserStats {
            best_login_streak: best_run(&login_days),
            total_logins: login_days.len() as i64,
            habits_created: created.len() as i64,
            total_completions: self.completions.count_for_user(user_id).await?,
            best_habit_streak,
            perfect_days: perfect.len() as i64,
            consecutive_perfect_days: current_run_lenient(&perfect, today),
            category_completions: self.completions.count_by_category(user_id).await?,
            early_bird_completions: self.completions.count_before_time(user_id, "07:00:00").await?,
            night_owl_completions: self.completions.count_after_time(user_id, "22:00:00").await?,
            has_comeback,
            earned_categories: self.achievements.earned_category_count(user_id).await?,
        })
    }

    /// Refresh stored progress for every catalog entry from a fresh snapshot.
    pub async fn update_all_progress(&self, user_id: i64, today: NaiveDate) -> Result<UserStats> {
        let stats = self.compute_stats(user_id, today).await?;
        for def in CATALOG {
            self.achievements
                .upsert_progress(user_id, def.key, progress_for(def, &stats))
                .await?;
        }
        Ok(stats)
    }

    /// Refresh progress, then award whatever the trigger's subset of the
    /// catalog now qualifies for. Returns the newly earned keys.
    pub async fn check(
        &self,
        user_id: i64,
        trigger: Trigger,
        today: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<CheckAchievementsResponse> {
        let stats = self.update_all_progress(user_id, today).await?;
        let mut awarded = Vec::new();

        for def in CATALOG {
            // all_rounder is settled last, once this pass's awards are in.
            if def.requirement == Requirement::AllRounder || !trigger.covers(def.requirement) {
                continue;
            }
            let progress = progress_for(def, &stats);
            if progress >= def.threshold
                && self.achievements.award(user_id, def.key, progress, now).await?
            {
                awarded.push(def.key.to_string());
            }
        }

        if trigger.covers(Requirement::AllRounder) {
            if let Some(def) = achievements::find("all_rounder") {
                let earned = self.achievements.earned_category_count(user_id).await?;
                self.achievements.upsert_progress(user_id, def.key, earned).await?;
                if earned >= def.threshold
                    && self.achievements.award(user_id, def.key, earned, now).await?
                {
                    awarded.push(def.key.to_string());
                }
            }
        }

        if !awarded.is_empty() {
            info!(user_id, ?awarded, "achievements earned");
        }

        Ok(CheckAchievementsResponse { awarded })
    }

    /// The achievements page: the full catalog with the user's progress plus
    /// the XP/level summary.
    pub async fn summary(&self, user_id: i64) -> Result<AchievementsResponse> {
        let rows = self.achievements.list_with_progress(user_id).await?;

        let earned_count = rows.iter().filter(|row| row.is_earned).count() as i64;
        let total_xp: i64 = rows
            .iter()
            .filter(|row| row.is_earned)
            .map(|row| row.points)
            .sum();
        let level = achievements::level_for_xp(total_xp);

        Ok(AchievementsResponse {
            achievements: rows
                .into_iter()
                .map(|row| AchievementView {
                    key: row.key,
                    name: row.name,
                    description: row.description,
                    icon: row.icon,
                    category: row.category,
                    requirement_type: row.requirement_type,
                    requirement_value: row.requirement_value,
                    points: row.points,
                    progress: row.current_progress,
                    earned: row.is_earned,
                    earned_at: row.earned_at,
                })
                .collect(),
            stats: AchievementStats {
                earned_count,
                total_xp,
                level,
                level_title: achievements::level_title(level).to_string(),
            },
        })
    }
}
