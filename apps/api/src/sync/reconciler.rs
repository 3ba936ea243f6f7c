//! Job sync reconciler.
//!
//! Pulls the current posting list from the scraping collaborator and merges
//! it into the job store by identity key: a real source URL when the posting
//! has one, otherwise the exact (title, company, location) triple. Existing
//! rows are overwritten in place; nothing is ever deleted.
//!
//! One bad item never aborts the run — per-item failures are collected into
//! `SyncResult::errors` and processing continues. Concurrent runs are not
//! mutually excluded; two runs racing on the same identity key settle
//! last-write-wins.

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::redact;
use crate::jobs::store::{JobStore, PLACEHOLDER_URL};
use crate::scrape::{JobSource, ScrapedJob};

/// Upper bound on postings persisted concurrently within one batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Summary of one reconciliation run. Returned to the caller, never persisted.
#[derive(Debug, Default, Serialize)]
pub struct SyncResult {
    pub created: u32,
    pub updated: u32,
    pub total: u32,
    pub errors: Vec<String>,
}

enum ItemOutcome {
    Created,
    Updated,
}

/// Runs one full sync: fetch, reconcile in bounded batches, aggregate.
///
/// A total fetch failure (or an empty upstream result) is soft — the caller
/// gets a `SyncResult` with `total = 0` and an explanatory error string, not
/// an `Err`.
pub async fn run_sync(
    store: &dyn JobStore,
    source: &dyn JobSource,
    batch_size: usize,
) -> SyncResult {
    let scraped = match source.fetch_latest_postings().await {
        Ok(scraped) => scraped,
        Err(e) => {
            warn!("scraper fetch failed: {e}");
            return SyncResult {
                errors: vec![redact(&format!("scraper fetch failed: {e}"))],
                ..SyncResult::default()
            };
        }
    };

    if scraped.is_empty() {
        return SyncResult {
            errors: vec!["scraper returned no postings".to_string()],
            ..SyncResult::default()
        };
    }

    let mut result = SyncResult {
        total: scraped.len() as u32,
        ..SyncResult::default()
    };

    // Bounded fan-out: each batch settles fully before the next one starts,
    // capping concurrent store operations at `batch_size`.
    for batch in scraped.chunks(batch_size.max(1)) {
        let outcomes = join_all(batch.iter().map(|job| reconcile_one(store, job))).await;
        for outcome in outcomes {
            match outcome {
                Ok(ItemOutcome::Created) => result.created += 1,
                Ok(ItemOutcome::Updated) => result.updated += 1,
                Err(msg) => result.errors.push(msg),
            }
        }
    }

    info!(
        "sync complete: {} created, {} updated, {} errors of {} postings",
        result.created,
        result.updated,
        result.errors.len(),
        result.total
    );
    result
}

async fn reconcile_one(store: &dyn JobStore, job: &ScrapedJob) -> Result<ItemOutcome, String> {
    let existing = match real_source_url(job) {
        Some(url) => store.find_by_source_url(url).await,
        None => {
            store
                .find_by_composite(&job.title, &job.company, &job.location)
                .await
        }
    }
    .map_err(|e| item_error(job, "lookup", &e))?;

    match existing {
        Some(row) => {
            store
                .update(row.id, job)
                .await
                .map_err(|e| item_error(job, "update", &e))?;
            Ok(ItemOutcome::Updated)
        }
        None => {
            store
                .insert(job)
                .await
                .map_err(|e| item_error(job, "create", &e))?;
            Ok(ItemOutcome::Created)
        }
    }
}

/// The URL half of the identity key: present, non-blank, and not the `"#"`
/// placeholder some boards emit when a posting has no canonical link. A
/// placeholder forces the composite key so two unrelated placeholder postings
/// never collide as duplicates.
fn real_source_url(job: &ScrapedJob) -> Option<&str> {
    job.source_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty() && *url != PLACEHOLDER_URL)
}

fn item_error(job: &ScrapedJob, action: &str, e: &sqlx::Error) -> String {
    redact(&format!(
        "failed to {action} '{}' at '{}': {e}",
        job.title, job.company
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobPostingRow;
    use crate::scrape::ScrapeError;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct MemStore {
        rows: Mutex<Vec<JobPostingRow>>,
        fail_insert_title: Option<String>,
    }

    impl MemStore {
        fn new() -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                fail_insert_title: None,
            }
        }

        fn failing_on(title: &str) -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                fail_insert_title: Some(title.to_string()),
            }
        }

        fn row_count(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        fn make_row(job: &ScrapedJob) -> JobPostingRow {
            let now = Utc::now();
            JobPostingRow {
                id: Uuid::new_v4(),
                title: job.title.clone(),
                company: job.company.clone(),
                location: job.location.clone(),
                job_type: job.job_type.clone(),
                short_description: job.short_description.clone(),
                full_description: job.full_description.clone(),
                source_url: job.source_url.clone(),
                posted_at: now,
                created_at: now,
                updated_at: now,
            }
        }
    }

    #[async_trait]
    impl JobStore for MemStore {
        async fn find_by_source_url(
            &self,
            url: &str,
        ) -> Result<Option<JobPostingRow>, sqlx::Error> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.source_url.as_deref() == Some(url))
                .cloned())
        }

        async fn find_by_composite(
            &self,
            title: &str,
            company: &str,
            location: &str,
        ) -> Result<Option<JobPostingRow>, sqlx::Error> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.title == title && r.company == company && r.location == location)
                .cloned())
        }

        async fn insert(&self, job: &ScrapedJob) -> Result<JobPostingRow, sqlx::Error> {
            if self.fail_insert_title.as_deref() == Some(job.title.as_str()) {
                return Err(sqlx::Error::Protocol("simulated insert failure".into()));
            }
            let row = Self::make_row(job);
            self.rows.lock().unwrap().push(row.clone());
            Ok(row)
        }

        async fn update(&self, id: Uuid, job: &ScrapedJob) -> Result<JobPostingRow, sqlx::Error> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or(sqlx::Error::RowNotFound)?;
            row.title = job.title.clone();
            row.company = job.company.clone();
            row.location = job.location.clone();
            row.job_type = job.job_type.clone();
            row.short_description = job.short_description.clone();
            row.full_description = job.full_description.clone();
            row.source_url = job.source_url.clone();
            row.updated_at = Utc::now();
            Ok(row.clone())
        }

        async fn list(&self, limit: i64, _offset: i64) -> Result<Vec<JobPostingRow>, sqlx::Error> {
            let mut rows = self.rows.lock().unwrap().clone();
            rows.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
            rows.truncate(limit as usize);
            Ok(rows)
        }

        async fn get(&self, id: Uuid) -> Result<Option<JobPostingRow>, sqlx::Error> {
            Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
        }
    }

    struct StaticSource(Vec<ScrapedJob>);

    #[async_trait]
    impl JobSource for StaticSource {
        async fn fetch_latest_postings(&self) -> Result<Vec<ScrapedJob>, ScrapeError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl JobSource for FailingSource {
        async fn fetch_latest_postings(&self) -> Result<Vec<ScrapedJob>, ScrapeError> {
            Err(ScrapeError::Timeout {
                task_id: "t1".into(),
                deadline_secs: 90,
            })
        }
    }

    fn job(title: &str, company: &str, url: Option<&str>) -> ScrapedJob {
        ScrapedJob {
            title: title.to_string(),
            company: company.to_string(),
            location: "Remote".to_string(),
            job_type: Some("Full-time".to_string()),
            short_description: None,
            full_description: format!("{title} at {company}"),
            source_url: url.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_three_new_postings_all_created() {
        let store = MemStore::new();
        let source = StaticSource(vec![
            job("Engineer", "Acme", Some("https://a.test/1")),
            job("Designer", "Acme", Some("https://a.test/2")),
            job("Manager", "Beta", Some("https://b.test/1")),
        ]);

        let result = run_sync(&store, &source, DEFAULT_BATCH_SIZE).await;
        assert_eq!(result.created, 3);
        assert_eq!(result.updated, 0);
        assert_eq!(result.total, 3);
        assert!(result.errors.is_empty());
        assert_eq!(store.row_count(), 3);
    }

    #[tokio::test]
    async fn test_resync_is_idempotent() {
        let store = MemStore::new();
        let source = StaticSource(vec![
            job("Engineer", "Acme", Some("https://a.test/1")),
            job("Designer", "Acme", Some("https://a.test/2")),
        ]);

        let first = run_sync(&store, &source, DEFAULT_BATCH_SIZE).await;
        assert_eq!((first.created, first.updated), (2, 0));

        let second = run_sync(&store, &source, DEFAULT_BATCH_SIZE).await;
        assert_eq!((second.created, second.updated), (0, 2));
        assert_eq!(store.row_count(), 2);
    }

    #[tokio::test]
    async fn test_url_match_wins_over_changed_title() {
        let store = MemStore::new();
        run_sync(
            &store,
            &StaticSource(vec![job("Engineer", "Acme", Some("https://a.test/1"))]),
            DEFAULT_BATCH_SIZE,
        )
        .await;

        // Same URL, retitled posting: must update the existing row.
        let result = run_sync(
            &store,
            &StaticSource(vec![job("Sr. Engineer", "Acme", Some("https://a.test/1"))]),
            DEFAULT_BATCH_SIZE,
        )
        .await;
        assert_eq!((result.created, result.updated), (0, 1));
        assert_eq!(store.row_count(), 1);
        assert_eq!(store.rows.lock().unwrap()[0].title, "Sr. Engineer");
    }

    #[tokio::test]
    async fn test_placeholder_url_falls_back_to_composite_key() {
        let store = MemStore::new();
        run_sync(
            &store,
            &StaticSource(vec![job("Engineer", "Acme", Some("#"))]),
            DEFAULT_BATCH_SIZE,
        )
        .await;

        // Identical triple with the placeholder URL reconciles to the same row.
        let result = run_sync(
            &store,
            &StaticSource(vec![job("Engineer", "Acme", Some("#"))]),
            DEFAULT_BATCH_SIZE,
        )
        .await;
        assert_eq!((result.created, result.updated), (0, 1));
        assert_eq!(store.row_count(), 1);
    }

    #[tokio::test]
    async fn test_placeholder_urls_do_not_collide_across_jobs() {
        let store = MemStore::new();
        let source = StaticSource(vec![
            job("Engineer", "Acme", Some("#")),
            job("Designer", "Beta", Some("#")),
        ]);

        let result = run_sync(&store, &source, DEFAULT_BATCH_SIZE).await;
        assert_eq!(result.created, 2);
        assert_eq!(store.row_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_url_uses_composite_key() {
        let store = MemStore::new();
        run_sync(
            &store,
            &StaticSource(vec![job("Engineer", "Acme", None)]),
            DEFAULT_BATCH_SIZE,
        )
        .await;
        let result = run_sync(
            &store,
            &StaticSource(vec![job("Engineer", "Acme", None)]),
            DEFAULT_BATCH_SIZE,
        )
        .await;
        assert_eq!((result.created, result.updated), (0, 1));
    }

    #[tokio::test]
    async fn test_per_item_failure_does_not_abort_run() {
        let store = MemStore::failing_on("Designer");
        let source = StaticSource(vec![
            job("Engineer", "Acme", Some("https://a.test/1")),
            job("Designer", "Acme", Some("https://a.test/2")),
            job("Manager", "Beta", Some("https://b.test/1")),
        ]);

        let result = run_sync(&store, &source, DEFAULT_BATCH_SIZE).await;
        assert_eq!(result.created, 2);
        assert_eq!(result.total, 3);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("Designer"));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_soft() {
        let store = MemStore::new();
        let result = run_sync(&store, &FailingSource, DEFAULT_BATCH_SIZE).await;
        assert_eq!(result.total, 0);
        assert_eq!(result.created, 0);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(store.row_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_fetch_reports_error_string() {
        let store = MemStore::new();
        let result = run_sync(&store, &StaticSource(vec![]), DEFAULT_BATCH_SIZE).await;
        assert_eq!(result.total, 0);
        assert_eq!(result.errors, vec!["scraper returned no postings"]);
    }

    #[tokio::test]
    async fn test_zero_batch_size_is_clamped() {
        let store = MemStore::new();
        let source = StaticSource(vec![job("Engineer", "Acme", Some("https://a.test/1"))]);
        let result = run_sync(&store, &source, 0).await;
        assert_eq!(result.created, 1);
    }
}
