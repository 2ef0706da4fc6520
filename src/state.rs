use crate::repository::{ActivityRepository, HabitRepository, NoteRepository, UserRepository};
use crate::services::{AchievementService, AnalyticsService, StreakService};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub users: UserRepository,
    pub habits: HabitRepository,
    pub notes: NoteRepository,
    pub activity: ActivityRepository,
    pub streaks: StreakService,
    pub achievements: AchievementService,
    pub analytics: AnalyticsService,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            habits: HabitRepository::new(pool.clone()),
            notes: NoteRepository::new(pool.clone()),
            activity: ActivityRepository::new(pool.clone()),
            streaks: StreakService::new(pool.clone()),
            achievements: AchievementService::new(pool.clone()),
            analytics: AnalyticsService::new(pool),
        }
    }
}
