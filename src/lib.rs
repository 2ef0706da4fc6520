pub mod achievements;
pub mod app;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod services;
pub mod state;
pub mod streaks;

pub use app::router;
pub use config::Config;
pub use state::AppState;
