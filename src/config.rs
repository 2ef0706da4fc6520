use std::env;

/// Runtime settings, all sourced from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);

        let db_path = env::var("HABITHUB_DB_PATH").unwrap_or_else(|_| "data/habithub.db".to_string());

        Self { port, db_path }
    }
}
