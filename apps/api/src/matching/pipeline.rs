//! Match scoring pipeline.
//!
//! One LLM call scores the whole job page; the response is decoded
//! defensively ([`crate::matching::response`]) and resolved against the input
//! list so every job gets exactly one integer score in [0, 100]. If the LLM
//! path fails in any way, the partial result is discarded and the
//! deterministic keyword fallback scores every job instead — the pipeline
//! itself never errors.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::llm_client::{strip_json_fences, LlmClient, LlmError};
use crate::matching::prompts::{MATCH_PROMPT_TEMPLATE, MATCH_SYSTEM};
use crate::matching::response::ScoreResponse;
use crate::models::job::JobPostingRow;
use crate::models::resume::ResumeRow;
use crate::resumes::normalize::resume_to_text;

/// Score assigned when the LLM omits a job from its response. Neutral rather
/// than zero so an omission does not read as a hard mismatch. Known oddity
/// inherited from the original behavior: a silent default can mask real
/// gaps in the model output.
pub const NEUTRAL_SCORE: u32 = 50;

/// Job descriptions are truncated to this many characters in the prompt.
const MAX_PROMPT_DESC_CHARS: usize = 1200;

/// Compatibility score for one (resume, job) pair. Ephemeral — cached at most
/// 24h, never persisted as its own row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
    pub job_id: Uuid,
    pub score: u32,
}

/// Scores every job against the resume. Infallible: the fallback path covers
/// any LLM failure, and an empty job list yields an empty result.
pub async fn score_jobs_for_resume(
    llm: &LlmClient,
    resume: &ResumeRow,
    jobs: &[JobPostingRow],
) -> Vec<MatchScore> {
    if jobs.is_empty() {
        return Vec::new();
    }

    match llm_scores(llm, resume, jobs).await {
        Ok(scores) => scores,
        Err(e) => {
            warn!("LLM scoring failed, using keyword fallback: {e}");
            fallback_scores(&resume.keywords, jobs)
        }
    }
}

async fn llm_scores(
    llm: &LlmClient,
    resume: &ResumeRow,
    jobs: &[JobPostingRow],
) -> Result<Vec<MatchScore>, LlmError> {
    let prompt = build_match_prompt(resume, jobs);
    let response = llm.call(&prompt, MATCH_SYSTEM).await?;
    let text = response.text().ok_or(LlmError::EmptyContent)?;
    let decoded = ScoreResponse::decode(strip_json_fences(text)).map_err(LlmError::Parse)?;
    debug!("LLM returned scores for {} jobs", jobs.len());
    Ok(resolve_scores(jobs, &decoded.entries()))
}

/// One entry per input job, in input order: look up by job id, default
/// omissions to [`NEUTRAL_SCORE`], clamp and round everything else.
fn resolve_scores(jobs: &[JobPostingRow], entries: &[(String, f64)]) -> Vec<MatchScore> {
    jobs.iter()
        .map(|job| {
            let id = job.id.to_string();
            let score = entries
                .iter()
                .find(|(job_id, _)| *job_id == id)
                .map(|(_, raw)| clamp_score(*raw))
                .unwrap_or(NEUTRAL_SCORE);
            MatchScore {
                job_id: job.id,
                score,
            }
        })
        .collect()
}

fn clamp_score(raw: f64) -> u32 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0).round() as u32
}

/// Deterministic keyword fallback: `50 + 50 × matched/total`, where a keyword
/// matches if it appears case-insensitively anywhere in the job's title,
/// company, or descriptions. Zero keywords scores every job exactly 50.
pub fn fallback_scores(keywords: &[String], jobs: &[JobPostingRow]) -> Vec<MatchScore> {
    jobs.iter()
        .map(|job| MatchScore {
            job_id: job.id,
            score: keyword_score(keywords, job),
        })
        .collect()
}

fn keyword_score(keywords: &[String], job: &JobPostingRow) -> u32 {
    if keywords.is_empty() {
        return NEUTRAL_SCORE;
    }

    let haystack = format!(
        "{} {} {} {}",
        job.title,
        job.company,
        job.short_description.as_deref().unwrap_or(""),
        job.full_description
    )
    .to_lowercase();

    let matched = keywords
        .iter()
        .filter(|keyword| haystack.contains(&keyword.to_lowercase()))
        .count();

    (50.0 + 50.0 * matched as f64 / keywords.len() as f64).round() as u32
}

fn build_match_prompt(resume: &ResumeRow, jobs: &[JobPostingRow]) -> String {
    let jobs_json: Vec<serde_json::Value> = jobs
        .iter()
        .map(|job| {
            let description = job
                .short_description
                .as_deref()
                .unwrap_or(&job.full_description);
            serde_json::json!({
                "id": job.id.to_string(),
                "title": job.title,
                "company": job.company,
                "location": job.location,
                "description": truncate_chars(description, MAX_PROMPT_DESC_CHARS),
            })
        })
        .collect();

    MATCH_PROMPT_TEMPLATE
        .replace("{resume_text}", &resume_to_text(resume))
        .replace(
            "{jobs_json}",
            &serde_json::to_string_pretty(&jobs_json).unwrap_or_else(|_| "[]".to_string()),
        )
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
