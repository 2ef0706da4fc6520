use crate::models::{
    AnalyticsResponse, CalendarResponse, HabitSummary, MonthStats, RangeStats,
};
use crate::repository::{
    ActivityRepository, CompletionRepository, HabitRepository, NoteRepository,
};
use crate::services::StreakService;
use crate::streaks::{best_run, is_perfect_day, perfect_days};
use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use sqlx::SqlitePool;
use std::collections::{BTreeMap, BTreeSet};

/// Read-side summaries for the analytics and calendar views. All derived
/// numbers come from the shared streak engine; nothing here re-walks dates
/// on its own.
#[derive(Clone)]
pub struct AnalyticsService {
    habits: HabitRepository,
    completions: CompletionRepository,
    activity: ActivityRepository,
    notes: NoteRepository,
    streaks: StreakService,
}

impl AnalyticsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            habits: HabitRepository::new(pool.clone()),
            completions: CompletionRepository::new(pool.clone()),
            activity: ActivityRepository::new(pool.clone()),
            notes: NoteRepository::new(pool.clone()),
            streaks: StreakService::new(pool),
        }
    }

    /// The dashboard's date-range view: habits, raw completions, visit
    /// counts, and the global streak (re-evaluated for today first so a
    /// stale row never leaks out).
    pub async fn range_overview(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Result<AnalyticsResponse> {
        let habits = self.habits.list_for_user(user_id).await?;
        let rows = self.completions.range_for_user(user_id, start, end).await?;
        let visits = self.activity.visits_range(user_id, start, end).await?;

        let (global, _) = self.streaks.refresh_global(user_id, today, today).await?;

        let mut completions: BTreeMap<NaiveDate, Vec<i64>> = BTreeMap::new();
        for (habit_id, date) in rows {
            completions.entry(date).or_default().push(habit_id);
        }
        let active_days = completions.len() as i64;

        Ok(AnalyticsResponse {
            habits: habits.into_iter().map(summary_of).collect(),
            completions,
            visits,
            stats: RangeStats {
                current_streak: global.current_streak,
                best_streak: global.best_streak,
                active_days,
            },
        })
    }

    /// One month of calendar data plus its stat strip.
    pub async fn month_overview(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> Result<Option<CalendarResponse>> {
        let Some(start) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return Ok(None);
        };
        let end = month_end(start);

        let habits = self.habits.list_for_user(user_id).await?;
        let rows = self.completions.range_for_user(user_id, start, end).await?;
        let notes = self.notes.range(user_id, start, end).await?;

        let mut completions: BTreeMap<NaiveDate, BTreeSet<i64>> = BTreeMap::new();
        for (habit_id, date) in rows {
            completions.entry(date).or_default().insert(habit_id);
        }

        let mut perfect = 0i64;
        let mut active = 0i64;
        let mut total_done = 0i64;
        let mut total_possible = 0i64;
        let mut per_habit: BTreeMap<i64, (i64, i64)> = BTreeMap::new();

        let mut day = start;
        while day <= end && day <= today {
            let existing: Vec<_> = habits.iter().filter(|h| h.existed_on(day)).collect();
            if !existing.is_empty() {
                let done_ids = completions.get(&day);
                let done = existing
                    .iter()
                    .filter(|h| done_ids.is_some_and(|ids| ids.contains(&h.id)))
                    .count();

                active += 1;
                total_possible += existing.len() as i64;
                total_done += done as i64;
                if is_perfect_day(existing.len(), done) {
                    perfect += 1;
                }

                for habit in &existing {
                    let entry = per_habit.entry(habit.id).or_default();
                    entry.1 += 1;
                    if done_ids.is_some_and(|ids| ids.contains(&habit.id)) {
                        entry.0 += 1;
                    }
                }
            }
            day += Duration::days(1);
        }

        let best_habit = per_habit
            .iter()
            .filter(|(_, (_, total))| *total > 0)
            .max_by(|(_, (done_a, total_a)), (_, (done_b, total_b))| {
                (*done_a * *total_b).cmp(&(*done_b * *total_a))
            })
            .filter(|(_, (done, _))| *done > 0)
            .and_then(|(id, _)| habits.iter().find(|h| h.id == *id))
            .map(|h| h.name.clone());

        let overall_progress = if total_possible > 0 {
            (total_done * 100 + total_possible / 2) / total_possible
        } else {
            0
        };

        let global = self.streaks.current(user_id).await?;

        Ok(Some(CalendarResponse {
            habits: habits.into_iter().map(summary_of).collect(),
            completions: completions
                .into_iter()
                .map(|(date, ids)| (date, ids.into_iter().collect()))
                .collect(),
            notes: notes.into_iter().map(|n| (n.date, n.content)).collect(),
            stats: MonthStats {
                overall_progress,
                perfect_days: perfect,
                active_days: active,
                current_streak: global.current_streak,
                best_habit,
                days_in_month: end.day(),
            },
        }))
    }

    /// Longest run of perfect days anywhere in the user's history; the
    /// profile's "longest streak" number.
    pub async fn longest_perfect_run(&self, user_id: i64) -> Result<i64> {
        let created = self.habits.created_dates(user_id).await?;
        let by_day = self.completions.by_day_for_user(user_id).await?;
        Ok(i64::from(best_run(&perfect_days(&created, &by_day))))
    }
}

fn summary_of(habit: crate::domain::Habit) -> HabitSummary {
    HabitSummary {
        id: habit.id,
        name: habit.name,
        category: habit.category,
        icon: habit.icon,
        created_at: habit.created_at,
    }
}

fn month_end(start: NaiveDate) -> NaiveDate {
    let (year, month) = if start.month() == 12 {
        (start.year() + 1, 1)
    } else {
        (start.year(), start.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first| first - Duration::days(1))
        .unwrap_or(start)
}
