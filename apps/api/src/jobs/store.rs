//! Persistence collaborator for job postings.
//!
//! The reconciler and handlers only see the `JobStore` trait; `PgJobStore` is
//! the production implementation. Tests use an in-memory fake.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::models::job::JobPostingRow;
use crate::scrape::ScrapedJob;

/// Sentinel meaning "no real URL available". Postings carrying it are
/// reconciled by the composite key instead.
pub const PLACEHOLDER_URL: &str = "#";

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn find_by_source_url(&self, url: &str) -> Result<Option<JobPostingRow>, sqlx::Error>;

    /// Exact match on the (title, company, location) triple.
    async fn find_by_composite(
        &self,
        title: &str,
        company: &str,
        location: &str,
    ) -> Result<Option<JobPostingRow>, sqlx::Error>;

    /// Inserts a new posting; `posted_at` is stamped now.
    async fn insert(&self, job: &ScrapedJob) -> Result<JobPostingRow, sqlx::Error>;

    /// Overwrites every scalar field of an existing posting except `id`,
    /// `created_at`, and `posted_at`; bumps `updated_at`.
    async fn update(&self, id: Uuid, job: &ScrapedJob) -> Result<JobPostingRow, sqlx::Error>;

    /// Lists postings ordered by `posted_at` descending.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<JobPostingRow>, sqlx::Error>;

    async fn get(&self, id: Uuid) -> Result<Option<JobPostingRow>, sqlx::Error>;
}

pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn find_by_source_url(&self, url: &str) -> Result<Option<JobPostingRow>, sqlx::Error> {
        sqlx::query_as::<_, JobPostingRow>(
            "SELECT * FROM job_postings WHERE source_url = $1 ORDER BY created_at ASC LIMIT 1",
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_by_composite(
        &self,
        title: &str,
        company: &str,
        location: &str,
    ) -> Result<Option<JobPostingRow>, sqlx::Error> {
        sqlx::query_as::<_, JobPostingRow>(
            r#"
            SELECT * FROM job_postings
            WHERE title = $1 AND company = $2 AND location = $3
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(title)
        .bind(company)
        .bind(location)
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert(&self, job: &ScrapedJob) -> Result<JobPostingRow, sqlx::Error> {
        sqlx::query_as::<_, JobPostingRow>(
            r#"
            INSERT INTO job_postings
                (title, company, location, job_type, short_description,
                 full_description, source_url, posted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            RETURNING *
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.job_type)
        .bind(&job.short_description)
        .bind(&job.full_description)
        .bind(&job.source_url)
        .fetch_one(&self.pool)
        .await
    }

    async fn update(&self, id: Uuid, job: &ScrapedJob) -> Result<JobPostingRow, sqlx::Error> {
        sqlx::query_as::<_, JobPostingRow>(
            r#"
            UPDATE job_postings
            SET title = $2, company = $3, location = $4, job_type = $5,
                short_description = $6, full_description = $7, source_url = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.job_type)
        .bind(&job.short_description)
        .bind(&job.full_description)
        .bind(&job.source_url)
        .fetch_one(&self.pool)
        .await
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<JobPostingRow>, sqlx::Error> {
        sqlx::query_as::<_, JobPostingRow>(
            "SELECT * FROM job_postings ORDER BY posted_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get(&self, id: Uuid) -> Result<Option<JobPostingRow>, sqlx::Error> {
        sqlx::query_as::<_, JobPostingRow>("SELECT * FROM job_postings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }
}

/// Optional per-scraper configuration. Missing rows and lookup failures are
/// both normal — this never surfaces an error to the caller.
pub async fn get_scraper_config(pool: &PgPool, name: &str) -> Option<serde_json::Value> {
    match sqlx::query_scalar::<_, serde_json::Value>(
        "SELECT config FROM scraper_configs WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await
    {
        Ok(config) => config,
        Err(e) => {
            warn!("scraper config lookup '{name}' failed: {e}");
            None
        }
    }
}
