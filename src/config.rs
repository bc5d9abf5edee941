use std::env;
use anyhow::{Context, Result};

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The hostname of the SMTP relay used for contact notifications.
    pub smtp_server: String,
    /// The port of the SMTP relay.
    pub smtp_port: u16,
    /// The administrator address notified about contact submissions.
    /// Notifications are skipped entirely when unset.
    pub admin_email: Option<String>,
    /// The duration of a session in days.
    pub session_duration_days: i64,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            smtp_server: env::var("SMTP_SERVER")
                .unwrap_or_else(|_| "localhost".to_string()),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "25".to_string())
                .parse()
                .context("Invalid SMTP_PORT")?,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            session_duration_days: env::var("SESSION_DURATION_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid SESSION_DURATION_DAYS")?,
        })
    }
}
