use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::cache::invalidate_cached_scores;
use crate::models::resume::{ResumeDocument, ResumeRow};
use crate::resumes::generate::generate_resume_document;
use crate::resumes::store::{get_resume, insert_resume, update_resume};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveResumeRequest {
    #[serde(alias = "userId")]
    pub user_id: Option<Uuid>,
    #[serde(flatten)]
    pub document: ResumeDocument,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResumeRequest {
    #[serde(alias = "userId")]
    pub user_id: Option<Uuid>,
    #[serde(alias = "rawText")]
    pub raw_text: String,
}

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    #[serde(alias = "userId")]
    pub user_id: Option<Uuid>,
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(request): Json<SaveResumeRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    let user_id = request.user_id.ok_or(AppError::Unauthorized)?;
    validate_document(&request.document)?;
    let resume = insert_resume(&state.db, user_id, &request.document).await?;
    Ok(Json(resume))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeRow>, AppError> {
    let user_id = params.user_id.ok_or(AppError::Unauthorized)?;
    let resume = get_resume(&state.db, id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(resume))
}

/// PUT /api/v1/resumes/:id — explicit re-save. Stale match scores for this
/// resume are invalidated along the way.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SaveResumeRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    let user_id = request.user_id.ok_or(AppError::Unauthorized)?;
    validate_document(&request.document)?;
    let resume = update_resume(&state.db, id, user_id, &request.document)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    invalidate_cached_scores(&state.redis, resume.id).await;
    Ok(Json(resume))
}

/// POST /api/v1/resumes/generate — AI-generate a structured resume from raw
/// background text and persist it.
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    Json(request): Json<GenerateResumeRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    let user_id = request.user_id.ok_or(AppError::Unauthorized)?;
    if request.raw_text.trim().is_empty() {
        return Err(AppError::Validation("raw_text cannot be empty".to_string()));
    }

    let document = generate_resume_document(&state.llm, &request.raw_text).await?;
    let resume = insert_resume(&state.db, user_id, &document).await?;
    Ok(Json(resume))
}

fn validate_document(document: &ResumeDocument) -> Result<(), AppError> {
    if document.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if document.full_name.trim().is_empty() {
        return Err(AppError::Validation("fullName cannot be empty".to_string()));
    }
    Ok(())
}
