use crate::domain::UserStreak;
use crate::models::HabitCard;
use crate::repository::{completions, streaks, CompletionRepository, HabitRepository, StreakRepository};
use crate::streaks::{advance_global_streak, current_run, current_run_lenient, is_perfect_day};
use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct ToggleOutcome {
    pub habit_streak: i64,
    pub global: UserStreak,
    pub day_perfect: bool,
}

/// Owns every streak mutation. The toggle path runs as one transaction so a
/// pair of concurrent check-ins cannot interleave the global streak's
/// read-modify-write.
#[derive(Clone)]
pub struct StreakService {
    pool: SqlitePool,
    habits: HabitRepository,
    completions: CompletionRepository,
    streaks: StreakRepository,
}

impl StreakService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            habits: HabitRepository::new(pool.clone()),
            completions: CompletionRepository::new(pool.clone()),
            streaks: StreakRepository::new(pool.clone()),
            pool,
        }
    }

    /// Mark or unmark a completion, then bring both streak counters up to
    /// date. The caller has already verified habit ownership.
    pub async fn toggle(
        &self,
        user_id: i64,
        habit_id: i64,
        date: NaiveDate,
        completed: bool,
        now: NaiveDateTime,
        today: NaiveDate,
    ) -> Result<ToggleOutcome> {
        let mut tx = self.pool.begin().await?;

        if completed {
            completions::insert_tx(&mut tx, habit_id, date, now).await?;
        } else {
            completions::remove_tx(&mut tx, habit_id, date).await?;
        }

        let days = completions::dates_for_habit_tx(&mut tx, habit_id).await?;
        let habit_streak = i64::from(current_run(&days, date));
        streaks::upsert_habit_streak_tx(&mut tx, habit_id, habit_streak, days.last().copied()).await?;

        let (global, day_perfect) = refresh_global_tx(&mut tx, user_id, date, today).await?;

        tx.commit().await?;

        debug!(
            user_id,
            habit_id,
            %date,
            completed,
            habit_streak,
            global_streak = global.current_streak,
            "toggle applied"
        );

        Ok(ToggleOutcome {
            habit_streak,
            global,
            day_perfect,
        })
    }

    /// Re-evaluate the global streak for a date (calendar backfills, the
    /// explicit refresh endpoint, and the analytics read path).
    pub async fn refresh_global(
        &self,
        user_id: i64,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(UserStreak, bool)> {
        let mut tx = self.pool.begin().await?;
        let outcome = refresh_global_tx(&mut tx, user_id, date, today).await?;
        tx.commit().await?;
        Ok(outcome)
    }

    pub async fn current(&self, user_id: i64) -> Result<UserStreak> {
        self.streaks.ensure_user_streak(user_id).await
    }

    /// The habit list as the dashboard shows it: live streak plus the current
    /// Sunday-to-Saturday week's progress.
    pub async fn habit_cards(&self, user_id: i64, today: NaiveDate) -> Result<Vec<HabitCard>> {
        let habits = self.habits.list_for_user(user_id).await?;
        let by_habit = self.completions.by_habit_for_user(user_id).await?;
        let week_start = week_start_sunday(today);

        let empty = BTreeSet::new();
        Ok(habits
            .into_iter()
            .map(|habit| {
                let days = by_habit.get(&habit.id).unwrap_or(&empty);
                let mut week_progress = [false; 7];
                for (offset, slot) in week_progress.iter_mut().enumerate() {
                    *slot = days.contains(&(week_start + Duration::days(offset as i64)));
                }
                let completed_days = week_progress.iter().filter(|done| **done).count() as u32;

                HabitCard {
                    id: habit.id,
                    name: habit.name,
                    category: habit.category,
                    icon: habit.icon,
                    current_streak: i64::from(current_run_lenient(days, today)),
                    week_progress,
                    completed_days,
                }
            })
            .collect())
    }
}

async fn refresh_global_tx(
    conn: &mut SqliteConnection,
    user_id: i64,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<(UserStreak, bool)> {
    let existing = completions::existing_on_tx(conn, user_id, date).await?;
    let completed = completions::completed_on_tx(conn, user_id, date).await?;
    let perfect = is_perfect_day(existing as usize, completed as usize);

    let prev = streaks::user_streak_tx(conn, user_id).await?;
    let next = advance_global_streak(prev, date, today, perfect, existing > 0);
    streaks::upsert_user_streak_tx(conn, user_id, next).await?;

    Ok((next, perfect))
}

fn week_start_sunday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_test_database;
    use crate::domain::Category;
    use crate::repository::UserRepository;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn at(date: NaiveDate, hour: u32) -> NaiveDateTime {
        date.and_hms_opt(hour, 0, 0).unwrap()
    }

    async fn seed_user(pool: &SqlitePool) -> i64 {
        UserRepository::new(pool.clone())
            .create("tester", at(d(2026, 1, 1), 9))
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn toggling_a_single_habit_builds_both_streaks() {
        let pool = init_test_database().await.unwrap();
        let user_id = seed_user(&pool).await;
        let habits = HabitRepository::new(pool.clone());
        let service = StreakService::new(pool);

        let habit = habits
            .create(user_id, "Stretch", Category::Physical, "", at(d(2026, 3, 1), 8))
            .await
            .unwrap();

        let today = d(2026, 3, 3);
        for day in [d(2026, 3, 1), d(2026, 3, 2), d(2026, 3, 3)] {
            service
                .toggle(user_id, habit.id, day, true, at(day, 9), today)
                .await
                .unwrap();
        }

        let outcome = service
            .toggle(user_id, habit.id, today, true, at(today, 9), today)
            .await
            .unwrap();
        assert_eq!(outcome.habit_streak, 3);
        assert_eq!(outcome.global.current_streak, 3);
        assert!(outcome.day_perfect);
    }

    #[tokio::test]
    async fn toggle_pair_restores_the_original_state() {
        let pool = init_test_database().await.unwrap();
        let user_id = seed_user(&pool).await;
        let habits = HabitRepository::new(pool.clone());
        let service = StreakService::new(pool);

        let habit = habits
            .create(user_id, "Read", Category::Learning, "", at(d(2026, 3, 1), 8))
            .await
            .unwrap();

        let today = d(2026, 3, 5);
        let before = service.current(user_id).await.unwrap();

        service
            .toggle(user_id, habit.id, today, true, at(today, 9), today)
            .await
            .unwrap();
        let after = service
            .toggle(user_id, habit.id, today, false, at(today, 10), today)
            .await
            .unwrap();

        assert_eq!(after.habit_streak, 0);
        assert!(!after.day_perfect);
        // Un-toggling rolls back the extension the first toggle recorded.
        assert_eq!(after.global.current_streak, before.current_streak);
        assert_eq!(after.global.last_completion_date, None);
    }

    #[tokio::test]
    async fn global_streak_needs_every_existing_habit() {
        let pool = init_test_database().await.unwrap();
        let user_id = seed_user(&pool).await;
        let habits = HabitRepository::new(pool.clone());
        let service = StreakService::new(pool);

        let first = habits
            .create(user_id, "Stretch", Category::Physical, "", at(d(2026, 3, 1), 8))
            .await
            .unwrap();
        let second = habits
            .create(user_id, "Journal", Category::Mindfulness, "", at(d(2026, 3, 1), 8))
            .await
            .unwrap();

        let today = d(2026, 3, 1);
        let partial = service
            .toggle(user_id, first.id, today, true, at(today, 9), today)
            .await
            .unwrap();
        assert!(!partial.day_perfect);
        assert_eq!(partial.global.current_streak, 0);

        let full = service
            .toggle(user_id, second.id, today, true, at(today, 21), today)
            .await
            .unwrap();
        assert!(full.day_perfect);
        assert_eq!(full.global.current_streak, 1);
    }

    #[tokio::test]
    async fn habits_created_later_do_not_break_earlier_perfect_days() {
        let pool = init_test_database().await.unwrap();
        let user_id = seed_user(&pool).await;
        let habits = HabitRepository::new(pool.clone());
        let service = StreakService::new(pool);

        let old = habits
            .create(user_id, "Stretch", Category::Physical, "", at(d(2026, 3, 1), 8))
            .await
            .unwrap();
        habits
            .create(user_id, "Journal", Category::Mindfulness, "", at(d(2026, 3, 4), 8))
            .await
            .unwrap();

        // March 2nd predates the second habit, so the first one alone
        // makes it perfect.
        let outcome = service
            .toggle(user_id, old.id, d(2026, 3, 2), true, at(d(2026, 3, 2), 9), d(2026, 3, 5))
            .await
            .unwrap();
        assert!(outcome.day_perfect);
    }

    #[tokio::test]
    async fn habit_cards_report_week_progress() {
        let pool = init_test_database().await.unwrap();
        let user_id = seed_user(&pool).await;
        let habits = HabitRepository::new(pool.clone());
        let service = StreakService::new(pool);

        let habit = habits
            .create(user_id, "Run", Category::Physical, "shoe", at(d(2026, 3, 1), 8))
            .await
            .unwrap();

        // 2026-03-18 is a Wednesday; its week runs Sunday 03-15 to Saturday 03-21.
        let today = d(2026, 3, 18);
        for day in [d(2026, 3, 16), d(2026, 3, 17), d(2026, 3, 18)] {
            service
                .toggle(user_id, habit.id, day, true, at(day, 7), today)
                .await
                .unwrap();
        }

        let cards = service.habit_cards(user_id, today).await.unwrap();
        assert_eq!(cards.len(), 1);
        let card = &cards[0];
        assert_eq!(card.current_streak, 3);
        assert_eq!(card.completed_days, 3);
        assert_eq!(
            card.week_progress,
            [false, true, true, true, false, false, false]
        );
    }
}
