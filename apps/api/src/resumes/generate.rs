//! AI resume generation: raw background text in, structured resume out.

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::resume::ResumeDocument;
use crate::resumes::normalize::dedup_skills;
use crate::resumes::prompts::{RESUME_PARSE_PROMPT_TEMPLATE, RESUME_PARSE_SYSTEM};

/// Generates a structured resume from raw background text via the LLM.
/// Skills come back deduplicated against keywords, matching the invariant
/// the store enforces on every save.
pub async fn generate_resume_document(
    llm: &LlmClient,
    raw_text: &str,
) -> Result<ResumeDocument, AppError> {
    let prompt = RESUME_PARSE_PROMPT_TEMPLATE.replace("{raw_text}", raw_text);
    let mut document: ResumeDocument = llm
        .call_json(&prompt, RESUME_PARSE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume generation failed: {e}")))?;

    document.skills = dedup_skills(&document.skills, &document.keywords);
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_document_parses_schema_example() {
        // The schema shown in the prompt must itself deserialize.
        let example = r#"{
            "title": "Backend Engineer Resume",
            "fullName": "Sam Doe",
            "email": "sam@example.com",
            "phone": null,
            "location": "Berlin, Germany",
            "headline": "Backend engineer",
            "summary": "Short paragraph.",
            "skills": ["Rust", "PostgreSQL"],
            "keywords": ["distributed systems"],
            "experience": [
                {"jobTitle": "Engineer", "company": "Acme", "startDate": "2019-03",
                 "endDate": null, "description": "Scope and impact."}
            ],
            "education": [
                {"degree": "BSc Computer Science", "institution": "State University"}
            ]
        }"#;
        let document: ResumeDocument = serde_json::from_str(example).unwrap();
        assert_eq!(document.full_name, "Sam Doe");
        assert_eq!(document.experience.len(), 1);
        assert_eq!(document.experience[0].end_date, None);
    }

    #[test]
    fn test_resume_document_tolerates_missing_collections() {
        let minimal = r#"{"title": "Resume", "fullName": "Sam Doe"}"#;
        let document: ResumeDocument = serde_json::from_str(minimal).unwrap();
        assert!(document.skills.is_empty());
        assert!(document.experience.is_empty());
    }
}
