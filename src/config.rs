use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub square_access_token: String,
    pub square_location_id: String,
    pub square_environment: String,
    pub hold_hours: i64,
    pub reject_past_dates: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "tinywed.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            square_access_token: env::var("SQUARE_ACCESS_TOKEN").unwrap_or_default(),
            square_location_id: env::var("SQUARE_LOCATION_ID").unwrap_or_default(),
            square_environment: env::var("SQUARE_ENVIRONMENT")
                .unwrap_or_else(|_| "sandbox".to_string()),
            hold_hours: env::var("HOLD_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(12),
            reject_past_dates: env::var("REJECT_PAST_DATES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}
