//! Decoding of the LLM score payload.
//!
//! Models in the wild return the contract three ways: the requested
//! `{"scores": [...]}` envelope, a bare array, or an object keyed by job id.
//! Each shape gets an explicit named parser, attempted strictest-first; the
//! result is normalized into one canonical entry list.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreEntry {
    #[serde(rename = "jobId", alias = "job_id")]
    pub job_id: String,
    pub score: f64,
}

/// The three accepted response shapes.
#[derive(Debug)]
pub enum ScoreResponse {
    Strict(Vec<ScoreEntry>),
    Array(Vec<ScoreEntry>),
    Keyed(HashMap<String, f64>),
}

#[derive(Debug, Deserialize)]
struct StrictEnvelope {
    scores: Vec<ScoreEntry>,
}

/// Keyed-object values may be bare numbers or `{"score": n}` objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KeyedValue {
    Number(f64),
    Object { score: f64 },
}

impl KeyedValue {
    fn score(&self) -> f64 {
        match self {
            KeyedValue::Number(n) => *n,
            KeyedValue::Object { score } => *score,
        }
    }
}

impl ScoreResponse {
    /// Attempts the strict envelope first, then the two fallback shapes.
    /// Returns the strict parser's error if no shape matches.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        let strict_err = match serde_json::from_str::<StrictEnvelope>(text) {
            Ok(envelope) => return Ok(ScoreResponse::Strict(envelope.scores)),
            Err(e) => e,
        };

        if let Ok(entries) = serde_json::from_str::<Vec<ScoreEntry>>(text) {
            return Ok(ScoreResponse::Array(entries));
        }

        if let Ok(keyed) = serde_json::from_str::<HashMap<String, KeyedValue>>(text) {
            return Ok(ScoreResponse::Keyed(
                keyed.into_iter().map(|(k, v)| (k, v.score())).collect(),
            ));
        }

        Err(strict_err)
    }

    /// Canonical (job id, raw score) list, whatever shape arrived.
    pub fn entries(self) -> Vec<(String, f64)> {
        match self {
            ScoreResponse::Strict(entries) | ScoreResponse::Array(entries) => entries
                .into_iter()
                .map(|entry| (entry.job_id, entry.score))
                .collect(),
            ScoreResponse::Keyed(map) => map.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_strict_envelope() {
        let text = r#"{"scores": [{"jobId": "a", "score": 80}, {"jobId": "b", "score": 20}]}"#;
        let decoded = ScoreResponse::decode(text).unwrap();
        assert!(matches!(decoded, ScoreResponse::Strict(_)));
        let entries = decoded.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("a".to_string(), 80.0));
    }

    #[test]
    fn test_decode_bare_array() {
        let text = r#"[{"jobId": "a", "score": 33}]"#;
        let decoded = ScoreResponse::decode(text).unwrap();
        assert!(matches!(decoded, ScoreResponse::Array(_)));
        assert_eq!(decoded.entries(), vec![("a".to_string(), 33.0)]);
    }

    #[test]
    fn test_decode_keyed_numbers() {
        let text = r#"{"a": 70, "b": 45}"#;
        let decoded = ScoreResponse::decode(text).unwrap();
        assert!(matches!(decoded, ScoreResponse::Keyed(_)));
        let mut entries = decoded.entries();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(entries, vec![("a".to_string(), 70.0), ("b".to_string(), 45.0)]);
    }

    #[test]
    fn test_decode_keyed_objects() {
        let text = r#"{"a": {"score": 65}}"#;
        let decoded = ScoreResponse::decode(text).unwrap();
        assert_eq!(decoded.entries(), vec![("a".to_string(), 65.0)]);
    }

    #[test]
    fn test_decode_snake_case_job_id() {
        let text = r#"{"scores": [{"job_id": "a", "score": 10}]}"#;
        let decoded = ScoreResponse::decode(text).unwrap();
        assert_eq!(decoded.entries(), vec![("a".to_string(), 10.0)]);
    }

    #[test]
    fn test_decode_rejects_non_json() {
        assert!(ScoreResponse::decode("not json").is_err());
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        // Object values that are neither numbers nor score objects.
        assert!(ScoreResponse::decode(r#"{"a": "high"}"#).is_err());
    }
}
