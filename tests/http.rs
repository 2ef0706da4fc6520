use habithub::models::{
    AchievementsResponse, CheckAchievementsResponse, HabitCard, HabitListResponse,
    LoginDaysResponse, ProfileResponse, SaveNoteResponse, StreakResponse, ToggleResponse,
    UserResponse, VisitResponse,
};
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_db_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("habithub_http_{}_{}.db", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/healthz")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let db_path = unique_db_path();
    let child = Command::new(env!("CARGO_BIN_EXE_habithub"))
        .env("PORT", port.to_string())
        .env("HABITHUB_DB_PATH", db_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn create_user(client: &Client, base_url: &str, username: &str) -> UserResponse {
    client
        .post(format!("{base_url}/api/users"))
        .json(&json!({ "username": username }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn create_habit(
    client: &Client,
    base_url: &str,
    user_id: i64,
    name: &str,
    category: &str,
) -> HabitCard {
    client
        .post(format!("{base_url}/api/habits"))
        .json(&json!({ "user_id": user_id, "name": name, "category": category }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn toggle(
    client: &Client,
    base_url: &str,
    user_id: i64,
    habit_id: i64,
    completed: bool,
) -> ToggleResponse {
    client
        .post(format!("{base_url}/api/completions/toggle"))
        .json(&json!({ "user_id": user_id, "habit_id": habit_id, "completed": completed }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_duplicate_username_conflicts() {
    let server = shared_server().await;
    let client = Client::new();

    let first = client
        .post(format!("{}/api/users", server.base_url))
        .json(&json!({ "username": "ana" }))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client
        .post(format!("{}/api/users", server.base_url))
        .json(&json!({ "username": "ana" }))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn http_toggle_builds_streaks_and_untoggle_restores() {
    let server = shared_server().await;
    let client = Client::new();

    let user = create_user(&client, &server.base_url, "ben").await;
    let habit = create_habit(&client, &server.base_url, user.id, "Stretch", "physical").await;
    assert_eq!(habit.current_streak, 0);

    let done = toggle(&client, &server.base_url, user.id, habit.id, true).await;
    assert_eq!(done.current_streak, 1);
    assert_eq!(done.global_streak, 1);
    assert!(done.all_habits_completed);

    let cards: HabitListResponse = client
        .get(format!(
            "{}/api/habits?user_id={}",
            server.base_url, user.id
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cards.habits.len(), 1);
    assert_eq!(cards.habits[0].current_streak, 1);
    assert_eq!(cards.habits[0].completed_days, 1);

    let undone = toggle(&client, &server.base_url, user.id, habit.id, false).await;
    assert_eq!(undone.current_streak, 0);
    assert_eq!(undone.global_streak, 0);
    assert!(!undone.all_habits_completed);

    let streak: StreakResponse = client
        .get(format!(
            "{}/api/streaks?user_id={}",
            server.base_url, user.id
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(streak.current_streak, 0);
}

#[tokio::test]
async fn http_global_streak_waits_for_every_habit() {
    let server = shared_server().await;
    let client = Client::new();

    let user = create_user(&client, &server.base_url, "cleo").await;
    let first = create_habit(&client, &server.base_url, user.id, "Run", "physical").await;
    let second = create_habit(&client, &server.base_url, user.id, "Journal", "mindfulness").await;

    let partial = toggle(&client, &server.base_url, user.id, first.id, true).await;
    assert!(!partial.all_habits_completed);
    assert_eq!(partial.global_streak, 0);

    let full = toggle(&client, &server.base_url, user.id, second.id, true).await;
    assert!(full.all_habits_completed);
    assert_eq!(full.global_streak, 1);
}

#[tokio::test]
async fn http_rejects_bad_input() {
    let server = shared_server().await;
    let client = Client::new();

    let user = create_user(&client, &server.base_url, "dana").await;

    // Unknown category never reaches the database.
    let bad_category = client
        .post(format!("{}/api/habits", server.base_url))
        .json(&json!({ "user_id": user.id, "name": "Gym", "category": "fitness" }))
        .send()
        .await
        .unwrap();
    assert!(bad_category.status().is_client_error());

    // Unknown habit is a 404.
    let missing = client
        .post(format!("{}/api/completions/toggle", server.base_url))
        .json(&json!({ "user_id": user.id, "habit_id": 999_999 }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    // Completions cannot land in the future.
    let habit = create_habit(&client, &server.base_url, user.id, "Gym", "physical").await;
    let future = client
        .post(format!("{}/api/completions/toggle", server.base_url))
        .json(&json!({
            "user_id": user.id,
            "habit_id": habit.id,
            "date": "2099-01-01"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(future.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_habit_update_and_delete() {
    let server = shared_server().await;
    let client = Client::new();

    let user = create_user(&client, &server.base_url, "eryn").await;
    let habit = create_habit(&client, &server.base_url, user.id, "Paint", "creativity").await;

    let updated = client
        .put(format!("{}/api/habits/{}", server.base_url, habit.id))
        .json(&json!({
            "user_id": user.id,
            "name": "Paint daily",
            "category": "creativity"
        }))
        .send()
        .await
        .unwrap();
    assert!(updated.status().is_success());
    let updated: Value = updated.json().await.unwrap();
    assert_eq!(updated["name"], "Paint daily");

    let deleted = client
        .delete(format!("{}/api/habits/{}", server.base_url, habit.id))
        .json(&json!({ "user_id": user.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let cards: HabitListResponse = client
        .get(format!(
            "{}/api/habits?user_id={}",
            server.base_url, user.id
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(cards.habits.is_empty());
}

#[tokio::test]
async fn http_achievements_award_once() {
    let server = shared_server().await;
    let client = Client::new();

    let user = create_user(&client, &server.base_url, "finn").await;
    create_habit(&client, &server.base_url, user.id, "Read", "learning").await;

    let checked: CheckAchievementsResponse = client
        .post(format!("{}/api/achievements/check", server.base_url))
        .json(&json!({ "user_id": user.id, "action": "habit_created" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(checked.awarded, vec!["getting_started".to_string()]);

    let again: CheckAchievementsResponse = client
        .post(format!("{}/api/achievements/check", server.base_url))
        .json(&json!({ "user_id": user.id, "action": "habit_created" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(again.awarded.is_empty());

    let summary: AchievementsResponse = client
        .get(format!(
            "{}/api/achievements?user_id={}",
            server.base_url, user.id
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary.stats.earned_count, 1);
    assert_eq!(summary.stats.total_xp, 50);
    assert_eq!(summary.stats.level, 1);
    assert!(summary
        .achievements
        .iter()
        .any(|a| a.key == "getting_started" && a.earned));

    let bad_action = client
        .post(format!("{}/api/achievements/check", server.base_url))
        .json(&json!({ "user_id": user.id, "action": "teleport" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_action.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_notes_round_trip_and_empty_deletes() {
    let server = shared_server().await;
    let client = Client::new();

    let user = create_user(&client, &server.base_url, "gale").await;

    let saved: SaveNoteResponse = client
        .put(format!("{}/api/notes", server.base_url))
        .json(&json!({
            "user_id": user.id,
            "date": "2026-08-01",
            "content": "slept early"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(saved.saved);

    let notes: Value = client
        .get(format!(
            "{}/api/notes?user_id={}&start=2026-08-01&end=2026-08-31",
            server.base_url, user.id
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(notes["notes"][0]["content"], "slept early");

    let cleared: SaveNoteResponse = client
        .put(format!("{}/api/notes", server.base_url))
        .json(&json!({
            "user_id": user.id,
            "date": "2026-08-01",
            "content": "  "
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(cleared.deleted);
}

#[tokio::test]
async fn http_activity_tracking_is_idempotent_per_day() {
    let server = shared_server().await;
    let client = Client::new();

    let user = create_user(&client, &server.base_url, "hani").await;

    let first: LoginDaysResponse = client
        .post(format!("{}/api/activity/login", server.base_url))
        .json(&json!({ "user_id": user.id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first.active_days, 1);

    let repeat: LoginDaysResponse = client
        .post(format!("{}/api/activity/login", server.base_url))
        .json(&json!({ "user_id": user.id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(repeat.active_days, 1);

    let visit: VisitResponse = client
        .post(format!("{}/api/activity/visit", server.base_url))
        .json(&json!({ "user_id": user.id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let visit_again: VisitResponse = client
        .post(format!("{}/api/activity/visit", server.base_url))
        .json(&json!({ "user_id": user.id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(visit_again.visit_count, visit.visit_count + 1);
}

#[tokio::test]
async fn http_analytics_and_calendar_report_the_shared_streak() {
    let server = shared_server().await;
    let client = Client::new();

    let user = create_user(&client, &server.base_url, "iris").await;
    let habit = create_habit(&client, &server.base_url, user.id, "Walk", "health").await;
    toggle(&client, &server.base_url, user.id, habit.id, true).await;

    let analytics: Value = client
        .get(format!(
            "{}/api/analytics?user_id={}",
            server.base_url, user.id
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(analytics["stats"]["current_streak"], 1);
    assert_eq!(analytics["stats"]["active_days"], 1);
    assert_eq!(analytics["habits"].as_array().unwrap().len(), 1);

    let calendar: Value = client
        .get(format!(
            "{}/api/calendar?user_id={}",
            server.base_url, user.id
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(calendar["stats"]["current_streak"], 1);
    assert_eq!(calendar["stats"]["perfect_days"], 1);
    assert_eq!(calendar["stats"]["best_habit"], "Walk");

    let profile: ProfileResponse = client
        .get(format!("{}/api/users/{}", server.base_url, user.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile.total_habits, 1);
    assert_eq!(profile.longest_streak, 1);
}
