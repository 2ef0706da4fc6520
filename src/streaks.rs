//! Consecutive-day streak computation over in-memory day sets.
//!
//! Every streak-shaped statistic in the application (per-habit streaks, the
//! global perfect-day streak, login streaks, perfect weeks/months) goes
//! through these functions; nothing else walks dates.

use crate::domain::UserStreak;
use chrono::{Duration, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

/// Length of the consecutive run ending exactly at `from`. Zero when `from`
/// itself is absent.
pub fn current_run(days: &BTreeSet<NaiveDate>, from: NaiveDate) -> u32 {
    let mut run = 0;
    let mut cursor = from;
    while days.contains(&cursor) {
        run += 1;
        cursor -= Duration::days(1);
    }
    run
}

/// Like [`current_run`], but a run is still "alive" while today is not over:
/// if `today` is absent the run may end at `today - 1` instead.
pub fn current_run_lenient(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    if days.contains(&today) {
        current_run(days, today)
    } else {
        current_run(days, today - Duration::days(1))
    }
}

/// Longest consecutive run anywhere in the set.
pub fn best_run(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;

    for &day in days {
        run = match prev {
            Some(p) if day == p + Duration::days(1) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(day);
    }

    best
}

/// The one perfect-day predicate: every habit that existed on the day was
/// completed, and there was at least one habit to complete.
pub fn is_perfect_day(total_habits: usize, completed_habits: usize) -> bool {
    total_habits > 0 && completed_habits == total_habits
}

/// All perfect days over full history, honoring existence gating: a habit
/// counts toward a date iff it was created on or before that date.
///
/// Only days carrying at least one completion can be perfect, so the scan is
/// over completion days rather than the whole calendar.
pub fn perfect_days(
    habit_created: &BTreeMap<i64, NaiveDate>,
    completions_by_day: &BTreeMap<NaiveDate, BTreeSet<i64>>,
) -> BTreeSet<NaiveDate> {
    completions_by_day
        .iter()
        .filter(|(day, completed)| {
            let total = habit_created
                .values()
                .filter(|created| **created <= **day)
                .count();
            let done = completed
                .iter()
                .filter(|id| {
                    habit_created
                        .get(*id)
                        .is_some_and(|created| *created <= **day)
                })
                .count();
            is_perfect_day(total, done)
        })
        .map(|(day, _)| *day)
        .collect()
}

/// Apply one day's outcome to the stored global streak.
///
/// Rules:
/// - perfect day following `last == date - 1` extends the run; re-reporting
///   the same day is a no-op; anything else starts a fresh run of 1
/// - an imperfect `date` in the past resets the run; an imperfect *today*
///   leaves it untouched, since the user can still finish the day. If today
///   had already been recorded as perfect, that extension is rolled back so
///   an un-toggle restores the prior run
/// - with no habits in existence the run is pinned at zero
/// - `best_streak` never decreases
pub fn advance_global_streak(
    prev: UserStreak,
    date: NaiveDate,
    today: NaiveDate,
    perfect: bool,
    any_habits: bool,
) -> UserStreak {
    if !any_habits {
        return UserStreak {
            current_streak: 0,
            best_streak: prev.best_streak,
            last_completion_date: prev.last_completion_date,
        };
    }

    if perfect {
        let current = match prev.last_completion_date {
            Some(last) if last == date - Duration::days(1) => prev.current_streak + 1,
            Some(last) if last == date => prev.current_streak,
            _ => 1,
        };
        UserStreak {
            current_streak: current,
            best_streak: prev.best_streak.max(current),
            last_completion_date: Some(date),
        }
    } else if date == today {
        if prev.last_completion_date == Some(date) {
            // Today was counted perfect earlier in the day; take it back.
            let current = (prev.current_streak - 1).max(0);
            UserStreak {
                current_streak: current,
                best_streak: prev.best_streak,
                last_completion_date: (current > 0).then(|| date - Duration::days(1)),
            }
        } else {
            prev
        }
    } else {
        UserStreak {
            current_streak: 0,
            best_streak: prev.best_streak,
            last_completion_date: None,
        }
    }
}
