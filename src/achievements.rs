//! Achievement catalog and progress evaluation.
//!
//! The catalog below is the only place keys, thresholds, XP points, and
//! requirement kinds are defined. The database `achievements` table is seeded
//! from it (keyed by the unique `achievement_key`), and every progress or
//! award decision evaluates a [`UserStats`] snapshot against it.

use crate::domain::Category;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Best consecutive-login-day run.
    LoginStreak,
    /// Distinct login days.
    TotalLogins,
    /// Habits ever created.
    HabitsCreated,
    /// Completions across all habits.
    TotalCompletions,
    /// Best consecutive-day run of any single habit.
    HabitStreak,
    /// Days on which every existing habit was completed.
    PerfectDays,
    /// Consecutive perfect days, in whole weeks.
    PerfectWeeks,
    /// Consecutive perfect days, in whole months (30-day blocks).
    PerfectMonths,
    /// Completions within one habit category.
    CategoryCompletions(Category),
    /// Minimum completion count across every category.
    BalancedLife,
    /// Completions recorded before 07:00.
    EarlyBird,
    /// Completions recorded after 22:00.
    NightOwl,
    /// A habit streak rebuilt after a gap in that habit's history.
    ComebackKid,
    /// An earned achievement in every catalog category.
    AllRounder,
}

impl Requirement {
    pub fn type_name(self) -> &'static str {
        match self {
            Requirement::LoginStreak => "login_streak",
            Requirement::TotalLogins => "total_logins",
            Requirement::HabitsCreated => "habit_creation",
            Requirement::TotalCompletions => "completion",
            Requirement::HabitStreak => "habit_streak",
            Requirement::PerfectDays => "perfect_day",
            Requirement::PerfectWeeks => "perfect_week",
            Requirement::PerfectMonths => "perfect_month",
            Requirement::CategoryCompletions(_) => "category_specific",
            Requirement::BalancedLife => "balanced_life",
            Requirement::EarlyBird
            | Requirement::NightOwl
            | Requirement::ComebackKid
            | Requirement::AllRounder => "special",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: &'static str,
    pub requirement: Requirement,
    pub threshold: i64,
    pub points: i64,
}

pub const CATALOG: &[AchievementDef] = &[
    // Login streaks
    AchievementDef {
        key: "streak_starter",
        name: "Streak Starter",
        description: "Log in 3 days in a row",
        icon: "fire",
        category: "streaks",
        requirement: Requirement::LoginStreak,
        threshold: 3,
        points: 100,
    },
    AchievementDef {
        key: "streak_pro",
        name: "Streak Pro",
        description: "Log in 7 days in a row",
        icon: "fire",
        category: "streaks",
        requirement: Requirement::LoginStreak,
        threshold: 7,
        points: 150,
    },
    AchievementDef {
        key: "streak_master",
        name: "Streak Master",
        description: "Log in 30 days in a row",
        icon: "fire",
        category: "streaks",
        requirement: Requirement::LoginStreak,
        threshold: 30,
        points: 300,
    },
    AchievementDef {
        key: "streak_legend",
        name: "Streak Legend",
        description: "Log in 100 days in a row",
        icon: "fire",
        category: "streaks",
        requirement: Requirement::LoginStreak,
        threshold: 100,
        points: 500,
    },
    // Loyalty
    AchievementDef {
        key: "regular_visitor",
        name: "Regular Visitor",
        description: "Log in on 10 different days",
        icon: "calendar",
        category: "loyalty",
        requirement: Requirement::TotalLogins,
        threshold: 10,
        points: 100,
    },
    AchievementDef {
        key: "habitual_user",
        name: "Habitual User",
        description: "Log in on 50 different days",
        icon: "calendar",
        category: "loyalty",
        requirement: Requirement::TotalLogins,
        threshold: 50,
        points: 200,
    },
    AchievementDef {
        key: "veteran",
        name: "Veteran",
        description: "Log in on 200 different days",
        icon: "calendar",
        category: "loyalty",
        requirement: Requirement::TotalLogins,
        threshold: 200,
        points: 300,
    },
    AchievementDef {
        key: "lifetime_member",
        name: "Lifetime Member",
        description: "Log in on 500 different days",
        icon: "calendar",
        category: "loyalty",
        requirement: Requirement::TotalLogins,
        threshold: 500,
        points: 500,
    },
    // Building habits
    AchievementDef {
        key: "getting_started",
        name: "Getting Started",
        description: "Create your first habit",
        icon: "seedling",
        category: "builder",
        requirement: Requirement::HabitsCreated,
        threshold: 1,
        points: 50,
    },
    AchievementDef {
        key: "habit_builder",
        name: "Habit Builder",
        description: "Create 5 habits",
        icon: "seedling",
        category: "builder",
        requirement: Requirement::HabitsCreated,
        threshold: 5,
        points: 100,
    },
    AchievementDef {
        key: "habit_architect",
        name: "Habit Architect",
        description: "Create 20 habits",
        icon: "seedling",
        category: "builder",
        requirement: Requirement::HabitsCreated,
        threshold: 20,
        points: 200,
    },
    AchievementDef {
        key: "habit_tycoon",
        name: "Habit Tycoon",
        description: "Create 50 habits",
        icon: "seedling",
        category: "builder",
        requirement: Requirement::HabitsCreated,
        threshold: 50,
        points: 300,
    },
    // Completions
    AchievementDef {
        key: "first_step",
        name: "First Step",
        description: "Complete a habit for the first time",
        icon: "check",
        category: "completion",
        requirement: Requirement::TotalCompletions,
        threshold: 1,
        points: 50,
    },
    AchievementDef {
        key: "consistency_champ",
        name: "Consistency Champ",
        description: "Complete 100 habit check-ins",
        icon: "check",
        category: "completion",
        requirement: Requirement::TotalCompletions,
        threshold: 100,
        points: 200,
    },
    AchievementDef {
        key: "completionist",
        name: "Completionist",
        description: "Complete 500 habit check-ins",
        icon: "check",
        category: "completion",
        requirement: Requirement::TotalCompletions,
        threshold: 500,
        points: 300,
    },
    AchievementDef {
        key: "habit_hero",
        name: "Habit Hero",
        description: "Complete 1000 habit check-ins",
        icon: "check",
        category: "completion",
        requirement: Requirement::TotalCompletions,
        threshold: 1000,
        points: 500,
    },
    // Per-habit streaks
    AchievementDef {
        key: "mini_streak",
        name: "Mini Streak",
        description: "Keep one habit going 7 days in a row",
        icon: "bolt",
        category: "dedication",
        requirement: Requirement::HabitStreak,
        threshold: 7,
        points: 150,
    },
    AchievementDef {
        key: "mega_streak",
        name: "Mega Streak",
        description: "Keep one habit going 30 days in a row",
        icon: "bolt",
        category: "dedication",
        requirement: Requirement::HabitStreak,
        threshold: 30,
        points: 300,
    },
    AchievementDef {
        key: "ultimate_streak",
        name: "Ultimate Streak",
        description: "Keep one habit going 100 days in a row",
        icon: "bolt",
        category: "dedication",
        requirement: Requirement::HabitStreak,
        threshold: 100,
        points: 400,
    },
    AchievementDef {
        key: "streak_king",
        name: "Streak King",
        description: "Keep one habit going a full year",
        icon: "crown",
        category: "dedication",
        requirement: Requirement::HabitStreak,
        threshold: 365,
        points: 500,
    },
    // Perfect days
    AchievementDef {
        key: "perfect_day",
        name: "Perfect Day",
        description: "Complete every habit on a single day",
        icon: "star",
        category: "consistency",
        requirement: Requirement::PerfectDays,
        threshold: 1,
        points: 100,
    },
    AchievementDef {
        key: "perfect_week",
        name: "Perfect Week",
        description: "Complete every habit for 7 days straight",
        icon: "star",
        category: "consistency",
        requirement: Requirement::PerfectWeeks,
        threshold: 1,
        points: 200,
    },
    AchievementDef {
        key: "perfect_month",
        name: "Perfect Month",
        description: "Complete every habit for 30 days straight",
        icon: "star",
        category: "consistency",
        requirement: Requirement::PerfectMonths,
        threshold: 1,
        points: 400,
    },
    AchievementDef {
        key: "flawless_quarter",
        name: "Flawless Quarter",
        description: "Complete every habit for three months straight",
        icon: "star",
        category: "consistency",
        requirement: Requirement::PerfectMonths,
        threshold: 3,
        points: 500,
    },
    // Category focus
    AchievementDef {
        key: "fitness_fanatic",
        name: "Fitness Fanatic",
        description: "Complete 50 physical habits",
        icon: "dumbbell",
        category: "balance",
        requirement: Requirement::CategoryCompletions(Category::Physical),
        threshold: 50,
        points: 200,
    },
    AchievementDef {
        key: "mindful_master",
        name: "Mindful Master",
        description: "Complete 50 mindfulness habits",
        icon: "spa",
        category: "balance",
        requirement: Requirement::CategoryCompletions(Category::Mindfulness),
        threshold: 50,
        points: 200,
    },
    AchievementDef {
        key: "productivity_pro",
        name: "Productivity Pro",
        description: "Complete 50 productivity habits",
        icon: "rocket",
        category: "balance",
        requirement: Requirement::CategoryCompletions(Category::Productivity),
        threshold: 50,
        points: 200,
    },
    AchievementDef {
        key: "balanced_life",
        name: "Balanced Life",
        description: "Complete 20 habits in every category",
        icon: "scale",
        category: "balance",
        requirement: Requirement::BalancedLife,
        threshold: 20,
        points: 300,
    },
    // Specials
    AchievementDef {
        key: "early_bird",
        name: "Early Bird",
        description: "Complete a habit before 7 AM",
        icon: "sun",
        category: "special",
        requirement: Requirement::EarlyBird,
        threshold: 1,
        points: 150,
    },
    AchievementDef {
        key: "night_owl",
        name: "Night Owl",
        description: "Complete a habit after 10 PM",
        icon: "moon",
        category: "special",
        requirement: Requirement::NightOwl,
        threshold: 1,
        points: 150,
    },
    AchievementDef {
        key: "comeback_kid",
        name: "Comeback Kid",
        description: "Rebuild a habit streak after breaking one",
        icon: "undo",
        category: "special",
        requirement: Requirement::ComebackKid,
        threshold: 1,
        points: 200,
    },
    AchievementDef {
        key: "all_rounder",
        name: "All-Rounder",
        description: "Earn an achievement in every category",
        icon: "trophy",
        category: "special",
        requirement: Requirement::AllRounder,
        threshold: 8,
        points: 500,
    },
];

pub fn find(key: &str) -> Option<&'static AchievementDef> {
    CATALOG.iter().find(|def| def.key == key)
}

/// Distinct catalog categories, in definition order.
pub fn categories() -> Vec<&'static str> {
    let mut seen = Vec::new();
    for def in CATALOG {
        if !seen.contains(&def.category) {
            seen.push(def.category);
        }
    }
    seen
}

/// One snapshot of everything the catalog can be evaluated against.
#[derive(Debug, Clone, Default)]
pub struct UserStats {
    pub best_login_streak: u32,
    pub total_logins: i64,
    pub habits_created: i64,
    pub total_completions: i64,
    pub best_habit_streak: u32,
    pub perfect_days: i64,
    pub consecutive_perfect_days: u32,
    pub category_completions: BTreeMap<Category, i64>,
    pub early_bird_completions: i64,
    pub night_owl_completions: i64,
    pub has_comeback: bool,
    pub earned_categories: i64,
}

impl UserStats {
    fn category_count(&self, category: Category) -> i64 {
        self.category_completions.get(&category).copied().unwrap_or(0)
    }
}

/// Current progress toward a definition. Earned iff `progress >= threshold`.
pub fn progress_for(def: &AchievementDef, stats: &UserStats) -> i64 {
    match def.requirement {
        Requirement::LoginStreak => i64::from(stats.best_login_streak),
        Requirement::TotalLogins => stats.total_logins,
        Requirement::HabitsCreated => stats.habits_created,
        Requirement::TotalCompletions => stats.total_completions,
        Requirement::HabitStreak => i64::from(stats.best_habit_streak),
        Requirement::PerfectDays => stats.perfect_days,
        Requirement::PerfectWeeks => i64::from(stats.consecutive_perfect_days / 7),
        Requirement::PerfectMonths => i64::from(stats.consecutive_perfect_days / 30),
        Requirement::CategoryCompletions(category) => stats.category_count(category),
        Requirement::BalancedLife => Category::ALL
            .iter()
            .map(|c| stats.category_count(*c))
            .min()
            .unwrap_or(0),
        Requirement::EarlyBird => stats.early_bird_completions,
        Requirement::NightOwl => stats.night_owl_completions,
        Requirement::ComebackKid => i64::from(stats.has_comeback),
        Requirement::AllRounder => stats.earned_categories,
    }
}

pub fn level_for_xp(total_xp: i64) -> i64 {
    total_xp / 500 + 1
}

pub fn level_title(level: i64) -> &'static str {
    if level >= 20 {
        "Habit Legend"
    } else if level >= 15 {
        "Habit Hero"
    } else if level >= 10 {
        "Habit Master"
    } else if level >= 5 {
        "Habit Warrior"
    } else {
        "Habit Novice"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_keys_are_unique() {
        let mut keys: Vec<_> = CATALOG.iter().map(|def| def.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), CATALOG.len());
    }

    #[test]
    fn all_rounder_threshold_matches_category_count() {
        let def = find("all_rounder").unwrap();
        assert_eq!(def.threshold, categories().len() as i64);
    }

    #[test]
    fn perfect_week_progress_comes_in_whole_weeks() {
        let stats = UserStats {
            consecutive_perfect_days: 20,
            ..UserStats::default()
        };
        assert_eq!(progress_for(find("perfect_week").unwrap(), &stats), 2);
        assert_eq!(progress_for(find("perfect_month").unwrap(), &stats), 0);
    }

    #[test]
    fn balanced_life_uses_the_weakest_category() {
        let mut stats = UserStats::default();
        for category in Category::ALL {
            stats.category_completions.insert(category, 25);
        }
        stats.category_completions.insert(Category::Social, 4);
        assert_eq!(progress_for(find("balanced_life").unwrap(), &stats), 4);
    }

    #[test]
    fn levels_step_every_500_xp() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(499), 1);
        assert_eq!(level_for_xp(500), 2);
        assert_eq!(level_for_xp(2_300), 5);
        assert_eq!(level_title(1), "Habit Novice");
        assert_eq!(level_title(5), "Habit Warrior");
        assert_eq!(level_title(12), "Habit Master");
        assert_eq!(level_title(23), "Habit Legend");
    }
}
