use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::handlers::DEFAULT_PAGE_SIZE;
use crate::matching::cache::{get_cached_scores, put_cached_scores};
use crate::matching::pipeline::{score_jobs_for_resume, MatchScore, NEUTRAL_SCORE};
use crate::models::job::JobPostingRow;
use crate::resumes::store::get_resume;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchJobsRequest {
    #[serde(alias = "resumeId")]
    pub resume_id: Uuid,
    #[serde(alias = "userId")]
    pub user_id: Option<Uuid>,
    /// Explicit re-match: skip the cache and overwrite it.
    #[serde(default)]
    pub refresh: bool,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredJob {
    #[serde(flatten)]
    pub job: JobPostingRow,
    pub match_score: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchJobsResponse {
    pub resume_id: Uuid,
    pub resume_title: String,
    pub jobs: Vec<ScoredJob>,
    pub total_jobs: usize,
}

/// GET /match-jobs
pub async fn handle_match_jobs_get(
    State(state): State<AppState>,
    Query(request): Query<MatchJobsRequest>,
) -> Result<Json<MatchJobsResponse>, AppError> {
    match_jobs(state, request).await.map(Json)
}

/// POST /match-jobs
pub async fn handle_match_jobs_post(
    State(state): State<AppState>,
    Json(request): Json<MatchJobsRequest>,
) -> Result<Json<MatchJobsResponse>, AppError> {
    match_jobs(state, request).await.map(Json)
}

async fn match_jobs(
    state: AppState,
    request: MatchJobsRequest,
) -> Result<MatchJobsResponse, AppError> {
    let user_id = request.user_id.ok_or(AppError::Unauthorized)?;

    let resume = get_resume(&state.db, request.resume_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {} not found", request.resume_id)))?;

    let limit = request.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 500);
    let jobs = state.jobs.list(limit, 0).await?;
    if jobs.is_empty() {
        return Err(AppError::NotFound(
            "No job postings available to match against".to_string(),
        ));
    }

    let cached = if request.refresh {
        None
    } else {
        get_cached_scores(&state.redis, resume.id).await
    };

    let scores = match cached {
        Some(scores) => scores,
        None => {
            let scores = score_jobs_for_resume(&state.llm, &resume, &jobs).await;
            put_cached_scores(&state.redis, resume.id, &scores).await;
            scores
        }
    };

    let total_jobs = jobs.len();
    let jobs = rank_jobs(jobs, &scores);

    Ok(MatchJobsResponse {
        resume_id: resume.id,
        resume_title: resume.title,
        jobs,
        total_jobs,
    })
}

/// Attaches scores and sorts best-first. The sort is stable, so jobs with
/// equal scores keep their posted-at ordering from the store. A job absent
/// from the (possibly cached) score set falls back to the neutral score.
fn rank_jobs(jobs: Vec<JobPostingRow>, scores: &[MatchScore]) -> Vec<ScoredJob> {
    let by_id: HashMap<Uuid, u32> = scores.iter().map(|s| (s.job_id, s.score)).collect();
    let mut ranked: Vec<ScoredJob> = jobs
        .into_iter()
        .map(|job| {
            let match_score = by_id.get(&job.id).copied().unwrap_or(NEUTRAL_SCORE);
            ScoredJob { job, match_score }
        })
        .collect();
    ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    ranked
}
