// LLM prompt constants for AI resume generation.

/// System prompt for resume generation — enforces JSON-only output.
pub const RESUME_PARSE_SYSTEM: &str =
    "You are an expert resume writer. Turn a candidate's raw professional \
    background into a structured resume. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT invent employers, dates, or credentials not present in the input.";

/// Resume generation prompt template. Replace `{raw_text}` before sending.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"Turn the following raw professional background into a structured resume.

Return a JSON object with this EXACT schema (no extra fields):
{
  "title": "Backend Engineer Resume",
  "fullName": "Sam Doe",
  "email": "sam@example.com",
  "phone": null,
  "location": "Berlin, Germany",
  "headline": "Backend engineer focused on billing systems",
  "summary": "One short paragraph.",
  "skills": ["Rust", "PostgreSQL"],
  "keywords": ["distributed systems", "payments"],
  "experience": [
    {
      "jobTitle": "Software Engineer",
      "company": "Acme",
      "startDate": "2019-03",
      "endDate": null,
      "description": "One or two sentences on scope and impact."
    }
  ],
  "education": [
    {"degree": "BSc Computer Science", "institution": "State University"}
  ]
}

Rules:
- Use null for anything the input does not state; NEVER fabricate.
- "keywords" are the 5-15 terms a recruiter would search for; "skills" are
  concrete tools and technologies not already listed as keywords.
- Keep experience entries in reverse chronological order.

RAW BACKGROUND:
{raw_text}"#;
