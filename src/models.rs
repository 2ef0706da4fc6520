use crate::domain::Category;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Requests

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateHabitRequest {
    pub user_id: i64,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateHabitRequest {
    pub user_id: i64,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteHabitRequest {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub user_id: i64,
    pub habit_id: i64,
    pub date: Option<NaiveDate>,
    #[serde(default = "default_completed")]
    pub completed: bool,
}

fn default_completed() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct RefreshStreakRequest {
    pub user_id: i64,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CheckAchievementsRequest {
    pub user_id: i64,
    pub action: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveNoteRequest {
    pub user_id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct TrackActivityRequest {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub user_id: i64,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub user_id: i64,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

// Responses

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub username: String,
    pub created_at: NaiveDateTime,
    pub total_habits: i64,
    pub longest_streak: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitCard {
    pub id: i64,
    pub name: String,
    pub category: Category,
    pub icon: String,
    pub current_streak: i64,
    pub week_progress: [bool; 7],
    pub completed_days: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitListResponse {
    pub habits: Vec<HabitCard>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub date: NaiveDate,
    pub completed: bool,
    pub current_streak: i64,
    pub global_streak: i64,
    pub all_habits_completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StreakResponse {
    pub current_streak: i64,
    pub best_streak: i64,
    pub last_completion_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub id: i64,
    pub name: String,
    pub category: Category,
    pub icon: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RangeStats {
    pub current_streak: i64,
    pub best_streak: i64,
    pub active_days: i64,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub habits: Vec<HabitSummary>,
    pub completions: BTreeMap<NaiveDate, Vec<i64>>,
    pub visits: BTreeMap<NaiveDate, i64>,
    pub stats: RangeStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MonthStats {
    /// Whole-percent completion rate across the month's possible check-ins.
    pub overall_progress: i64,
    pub perfect_days: i64,
    pub active_days: i64,
    pub current_streak: i64,
    pub best_habit: Option<String>,
    pub days_in_month: u32,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub habits: Vec<HabitSummary>,
    pub completions: BTreeMap<NaiveDate, Vec<i64>>,
    pub notes: BTreeMap<NaiveDate, String>,
    pub stats: MonthStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AchievementView {
    pub key: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub requirement_type: String,
    pub requirement_value: i64,
    pub points: i64,
    pub progress: i64,
    pub earned: bool,
    pub earned_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AchievementStats {
    pub earned_count: i64,
    pub total_xp: i64,
    pub level: i64,
    pub level_title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AchievementsResponse {
    pub achievements: Vec<AchievementView>,
    pub stats: AchievementStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckAchievementsResponse {
    pub awarded: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NoteView {
    pub date: NaiveDate,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct NotesResponse {
    pub notes: Vec<NoteView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveNoteResponse {
    pub saved: bool,
    pub deleted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginDaysResponse {
    pub active_days: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VisitResponse {
    pub visit_date: NaiveDate,
    pub visit_count: i64,
}
