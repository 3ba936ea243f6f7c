//! Resume persistence. Rows are immutable once written except through the
//! explicit re-save path.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resume::{ResumeDocument, ResumeRow};
use crate::resumes::normalize::dedup_skills;

pub async fn insert_resume(
    pool: &PgPool,
    user_id: Uuid,
    document: &ResumeDocument,
) -> Result<ResumeRow, sqlx::Error> {
    let skills = dedup_skills(&document.skills, &document.keywords);
    sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes
            (user_id, title, full_name, email, phone, location, headline,
             summary, skills, keywords, experience, education)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&document.title)
    .bind(&document.full_name)
    .bind(&document.email)
    .bind(&document.phone)
    .bind(&document.location)
    .bind(&document.headline)
    .bind(&document.summary)
    .bind(&skills)
    .bind(&document.keywords)
    .bind(Json(&document.experience))
    .bind(Json(&document.education))
    .fetch_one(pool)
    .await
}

pub async fn get_resume(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Explicit re-save: overwrites every field of an existing resume.
pub async fn update_resume(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    document: &ResumeDocument,
) -> Result<Option<ResumeRow>, sqlx::Error> {
    let skills = dedup_skills(&document.skills, &document.keywords);
    sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes
        SET title = $3, full_name = $4, email = $5, phone = $6, location = $7,
            headline = $8, summary = $9, skills = $10, keywords = $11,
            experience = $12, education = $13, updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&document.title)
    .bind(&document.full_name)
    .bind(&document.email)
    .bind(&document.phone)
    .bind(&document.location)
    .bind(&document.headline)
    .bind(&document.summary)
    .bind(&skills)
    .bind(&document.keywords)
    .bind(Json(&document.experience))
    .bind(Json(&document.education))
    .fetch_optional(pool)
    .await
}
