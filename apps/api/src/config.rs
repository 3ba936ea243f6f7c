use anyhow::{Context, Result};

const DEFAULT_SCRAPER_API_URL: &str = "https://api.browse.ai/v2";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub anthropic_api_key: String,
    pub scraper_api_url: String,
    pub scraper_api_key: String,
    pub scraper_robot_ids: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            scraper_api_url: std::env::var("SCRAPER_API_URL")
                .unwrap_or_else(|_| DEFAULT_SCRAPER_API_URL.to_string()),
            scraper_api_key: require_env("SCRAPER_API_KEY")?,
            scraper_robot_ids: parse_robot_ids(&require_env("SCRAPER_ROBOT_IDS")?),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Splits the comma-separated SCRAPER_ROBOT_IDS value, dropping blanks.
fn parse_robot_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
