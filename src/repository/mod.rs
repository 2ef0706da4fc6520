pub mod achievements;
pub mod activity;
pub mod completions;
pub mod habits;
pub mod notes;
pub mod streaks;
pub mod users;

pub use achievements::AchievementRepository;
pub use activity::ActivityRepository;
pub use completions::CompletionRepository;
pub use habits::HabitRepository;
pub use notes::NoteRepository;
pub use streaks::StreakRepository;
pub use users::UserRepository;

/// True when an insert bounced off a UNIQUE constraint.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
