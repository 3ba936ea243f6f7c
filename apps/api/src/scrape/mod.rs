// Scraping collaborator: the `JobSource` trait plus the production
// browser-automation ("robot") client behind it. The reconciler only ever
// sees the trait, so tests swap in static fakes.

pub mod robot;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A posting as fetched from the scraping provider. Transient — same shape as
/// a persisted posting minus identity and timestamps, discarded after
/// reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: Option<String>,
    pub short_description: Option<String>,
    pub full_description: String,
    pub source_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("scraper API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("robot task {task_id} did not finish within {deadline_secs}s")]
    Timeout { task_id: String, deadline_secs: u64 },

    #[error("robot task {task_id} failed upstream")]
    TaskFailed { task_id: String },
}

/// The scraping collaborator. `fetch_latest_postings` returns every posting
/// currently visible to the provider; an empty list is a valid result, not an
/// error.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch_latest_postings(&self) -> Result<Vec<ScrapedJob>, ScrapeError>;
}
