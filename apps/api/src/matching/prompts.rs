// LLM prompt constants for match scoring.

/// System prompt for match scoring — enforces JSON-only output.
pub const MATCH_SYSTEM: &str =
    "You are an expert technical recruiter scoring how well a candidate's resume \
    matches job postings. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Match scoring prompt template.
/// Replace `{resume_text}` and `{jobs_json}` before sending.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"Score how well the following resume matches each job posting.

Return a JSON object with this EXACT schema (no extra fields):
{
  "scores": [
    {"jobId": "<id copied verbatim from the posting>", "score": 87}
  ]
}

Rules:
- "score" is an integer from 0 (no match at all) to 100 (perfect match).
- Return EXACTLY one entry per job posting listed below — no more, no fewer.
- Copy each posting's "id" field verbatim as "jobId".
- Weigh required skills and domain experience over incidental keyword overlap.

RESUME:
{resume_text}

JOB POSTINGS:
{jobs_json}"#;
