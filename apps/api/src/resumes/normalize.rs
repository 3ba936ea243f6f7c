//! Resume flattening and skill normalization.

use std::collections::HashSet;

use crate::models::resume::ResumeRow;

/// Flattens a resume into the plain-text block sent to the scoring prompt:
/// name, headline, summary, comma-joined skills and keywords, then one line
/// per experience and education entry.
pub fn resume_to_text(resume: &ResumeRow) -> String {
    let mut text = String::new();
    text.push_str(&resume.full_name);
    text.push('\n');

    if let Some(headline) = resume.headline.as_deref().filter(|s| !s.is_empty()) {
        text.push_str(headline);
        text.push('\n');
    }
    if let Some(summary) = resume.summary.as_deref().filter(|s| !s.is_empty()) {
        text.push_str(summary);
        text.push('\n');
    }
    if !resume.skills.is_empty() {
        text.push_str("Skills: ");
        text.push_str(&resume.skills.join(", "));
        text.push('\n');
    }
    if !resume.keywords.is_empty() {
        text.push_str("Keywords: ");
        text.push_str(&resume.keywords.join(", "));
        text.push('\n');
    }

    if !resume.experience.0.is_empty() {
        text.push_str("Experience:\n");
        for entry in resume.experience.0.iter() {
            let start = entry.start_date.as_deref().unwrap_or("unknown");
            let end = entry.end_date.as_deref().unwrap_or("present");
            text.push_str(&format!(
                "- {} at {} ({} - {}): {}\n",
                entry.job_title, entry.company, start, end, entry.description
            ));
        }
    }

    if !resume.education.0.is_empty() {
        text.push_str("Education:\n");
        for entry in resume.education.0.iter() {
            text.push_str(&format!("- {} at {}\n", entry.degree, entry.institution));
        }
    }

    text
}

/// Skills are stored deduplicated: duplicates within the list and anything
/// already present in the keyword list are dropped (case-insensitive).
pub fn dedup_skills(skills: &[String], keywords: &[String]) -> Vec<String> {
    let keyword_set: HashSet<String> = keywords.iter().map(|k| k.trim().to_lowercase()).collect();
    let mut seen = HashSet::new();
    skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter(|s| {
            let lower = s.to_lowercase();
            !keyword_set.contains(&lower) && seen.insert(lower)
        })
        .map(String::from)
        .collect()
}
