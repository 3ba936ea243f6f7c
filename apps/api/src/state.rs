use std::sync::Arc;

use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::jobs::store::JobStore;
use crate::llm_client::LlmClient;
use crate::scrape::JobSource;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Collaborators are constructed once in `main` and passed in here — no
/// module-level singletons. Tests build the same shape around fakes.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Match score cache (24h TTL per resume).
    pub redis: RedisClient,
    pub llm: LlmClient,
    /// Job posting store. Production: Postgres.
    pub jobs: Arc<dyn JobStore>,
    /// Scraping provider. Production: robot-API client.
    pub scraper: Arc<dyn JobSource>,
}
