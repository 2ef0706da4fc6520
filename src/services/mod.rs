pub mod achievement_service;
pub mod analytics_service;
pub mod streak_service;

pub use achievement_service::{AchievementService, Trigger};
pub use analytics_service::AnalyticsService;
pub use streak_service::StreakService;
