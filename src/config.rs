// src/config.rs
use std::env;

/// Process configuration, read once at startup. Every knob has a default so
/// a bare `cargo run` works against a local SQLite file with mail logged
/// instead of sent.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub db_path: String,
    /// API key for the transactional mail provider. When absent, login codes
    /// are written to the log instead.
    pub mail_api_key: Option<String>,
    pub mail_from: String,
    pub mail_from_name: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string()),
            db_path: env::var("DB_PATH").unwrap_or_else(|_| "leadpanel.sqlite3".to_string()),
            mail_api_key: env::var("MAIL_API_KEY").ok().filter(|k| !k.is_empty()),
            mail_from: env::var("MAIL_FROM").unwrap_or_else(|_| "login@leadpanel.local".to_string()),
            mail_from_name: env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "Lead Panel".to_string()),
        }
    }
}
