pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs;
use crate::matching;
use crate::resumes;
use crate::state::AppState;
use crate::sync;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Core endpoints — GET and POST both trigger the same logic.
        .route(
            "/sync-jobs",
            get(sync::handlers::handle_sync_jobs).post(sync::handlers::handle_sync_jobs),
        )
        .route(
            "/match-jobs",
            get(matching::handlers::handle_match_jobs_get)
                .post(matching::handlers::handle_match_jobs_post),
        )
        // Job pool
        .route("/api/v1/jobs", get(jobs::handlers::handle_list_jobs))
        .route("/api/v1/jobs/:id", get(jobs::handlers::handle_get_job))
        // Resumes
        .route("/api/v1/resumes", post(resumes::handlers::handle_create_resume))
        .route(
            "/api/v1/resumes/generate",
            post(resumes::handlers::handle_generate_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handlers::handle_get_resume).put(resumes::handlers::handle_update_resume),
        )
        .with_state(state)
}
