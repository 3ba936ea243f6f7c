use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::jobs::store::get_scraper_config;
use crate::state::AppState;
use crate::sync::reconciler::{run_sync, DEFAULT_BATCH_SIZE};

/// Name of the optional `scraper_configs` row consulted for sync overrides.
const SYNC_CONFIG_NAME: &str = "job_sync";

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub success: bool,
    pub message: String,
    pub created: u32,
    pub updated: u32,
    pub total: u32,
    pub errors: Vec<String>,
}

/// GET|POST /sync-jobs
///
/// Runs the reconciler and reports its summary. Partial per-item failures
/// still produce a 200 — only an error outside the reconciler's own
/// collection becomes a 500.
pub async fn handle_sync_jobs(
    State(state): State<AppState>,
) -> Result<Json<SyncResponse>, AppError> {
    let batch_size = sync_batch_size(&state.db).await;
    let result = run_sync(state.jobs.as_ref(), state.scraper.as_ref(), batch_size).await;

    let message = format!(
        "Sync complete: {} created, {} updated, {} failed of {} postings",
        result.created,
        result.updated,
        result.errors.len(),
        result.total
    );

    Ok(Json(SyncResponse {
        success: true,
        message,
        created: result.created,
        updated: result.updated,
        total: result.total,
        errors: result.errors,
    }))
}

/// Batch size from the optional scraper config row, else the default.
async fn sync_batch_size(pool: &PgPool) -> usize {
    get_scraper_config(pool, SYNC_CONFIG_NAME)
        .await
        .and_then(|config| config.get("batch_size").and_then(|v| v.as_u64()))
        .map(|n| n as usize)
        .unwrap_or(DEFAULT_BATCH_SIZE)
}
