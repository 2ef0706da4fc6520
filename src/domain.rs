use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Habit categories accepted by the API. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Health,
    Physical,
    Learning,
    Mindfulness,
    Creativity,
    Productivity,
    Social,
    Lifestyle,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Health,
        Category::Physical,
        Category::Learning,
        Category::Mindfulness,
        Category::Creativity,
        Category::Productivity,
        Category::Social,
        Category::Lifestyle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Health => "health",
            Category::Physical => "physical",
            Category::Learning => "learning",
            Category::Mindfulness => "mindfulness",
            Category::Creativity => "creativity",
            Category::Productivity => "productivity",
            Category::Social => "social",
            Category::Lifestyle => "lifestyle",
        }
    }

    pub fn parse(value: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_str() == value)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Habit {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub category: Category,
    pub icon: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Habit {
    /// A habit only counts toward a date's "total possible" once it exists.
    pub fn existed_on(&self, date: NaiveDate) -> bool {
        self.created_at.date() <= date
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UserStreak {
    pub current_streak: i64,
    pub best_streak: i64,
    pub last_completion_date: Option<NaiveDate>,
}

impl UserStreak {
    pub fn zero() -> Self {
        Self {
            current_streak: 0,
            best_streak: 0,
            last_completion_date: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyNote {
    pub date: NaiveDate,
    pub content: String,
}
