//! Generative candidate source
//!
//! Asks the chat model to propose classification codes for the full record.
//! The reply is expected to contain a JSON array somewhere in the text; the
//! span between the first `[` and the last `]` is parsed. Any failure along
//! the way (no client, transport error, no bracket span, bad JSON) degrades
//! to an empty candidate list.

use super::source::{CandidateSource, QueryContext, RawCandidate};
use crate::services::chat_client::{ChatClient, ChatParams, CLASSIFY_MODEL};
use dcme_common::Record;
use serde_json::Value;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "Return only JSON. Use valid Iconclass notations.";
const TEMPERATURE: f64 = 0.2;
const MAX_TOKENS: u32 = 600;

/// Maximum suggestions taken from one reply
const MAX_SUGGESTIONS: usize = 10;

/// Generative suggester (candidate source B)
pub struct GenerativeSuggester {
    chat: Option<Arc<ChatClient>>,
}

impl GenerativeSuggester {
    pub fn new(chat: Option<Arc<ChatClient>>) -> Self {
        Self { chat }
    }
}

/// Build the classification prompt from record fields
pub(crate) fn build_classification_prompt(record: &Record) -> String {
    format!(
        r#"You assign up to 10 **Iconclass** notations for this record.
Respond as JSON array of objects:
[{{"notation":"…","label_de":"…","label_en":"…","why":"…"}}]
Use valid Iconclass codes (e.g., 25F, 31A, 52D1). Prefer German labels when possible.

title: {title}
description: {description}
subject: {subject}
creator: {creator}
relation: {relation}
era/date: {coverage} {date}
language: {language}"#,
        title = record.text("title"),
        description = record.text("description"),
        subject = record.joined("subject"),
        creator = record.joined("creator"),
        relation = record.joined("relation"),
        coverage = record.text("coverage"),
        date = record.text("date"),
        language = record.text("language"),
    )
}

/// Parse the first `[`...last `]` span of a reply as candidates
pub(crate) fn parse_candidate_array(content: &str) -> Vec<RawCandidate> {
    let Some(start) = content.find('[') else {
        return Vec::new();
    };
    let Some(end) = content.rfind(']') else {
        return Vec::new();
    };
    if end < start {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<Value>>(&content[start..=end]) {
        Ok(items) => items
            .iter()
            .take(MAX_SUGGESTIONS)
            .map(RawCandidate::from_value)
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[async_trait::async_trait]
impl CandidateSource for GenerativeSuggester {
    fn name(&self) -> &'static str {
        "generative"
    }

    async fn candidates(&self, ctx: &QueryContext<'_>) -> Vec<RawCandidate> {
        let Some(chat) = &self.chat else {
            return Vec::new();
        };

        let prompt = build_classification_prompt(ctx.record);
        let params = ChatParams {
            temperature: Some(TEMPERATURE),
            max_tokens: Some(MAX_TOKENS),
            max_completion_tokens: None,
        };

        match chat
            .complete(CLASSIFY_MODEL, SYSTEM_PROMPT, Value::String(prompt), &params)
            .await
        {
            Ok(content) => {
                let candidates = parse_candidate_array(&content);
                tracing::debug!(count = candidates.len(), "Generative suggestions parsed");
                candidates
            }
            Err(e) => {
                tracing::debug!(error = %e, "Generative suggestion call failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_interpolation() {
        let record = Record::from_value(json!({
            "title": "Basel Stadtansicht",
            "description": "Kupferstich",
            "subject": ["Stadt", "Rhein"],
            "creator": ["M. Merian"],
            "coverage": "1642",
            "language": "de"
        }));
        let prompt = build_classification_prompt(&record);
        assert!(prompt.contains("title: Basel Stadtansicht"));
        assert!(prompt.contains("subject: Stadt, Rhein"));
        assert!(prompt.contains("creator: M. Merian"));
        assert!(prompt.contains("era/date: 1642 "));
        assert!(prompt.contains("language: de"));
    }

    #[test]
    fn test_prompt_missing_fields_empty() {
        let record = Record::from_value(json!({}));
        let prompt = build_classification_prompt(&record);
        assert!(prompt.contains("title: \n"));
        assert!(prompt.contains("subject: \n"));
    }

    #[test]
    fn test_parse_plain_array() {
        let content = r#"[{"notation":"25F","label_de":"Stadtansicht","why":"city"}]"#;
        let candidates = parse_candidate_array(content);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].notation.as_deref(), Some("25F"));
    }

    #[test]
    fn test_parse_array_embedded_in_prose() {
        let content = "Here are the codes:\n```json\n[{\"notation\":\"62\"}]\n```\nDone.";
        let candidates = parse_candidate_array(content);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].notation.as_deref(), Some("62"));
    }

    #[test]
    fn test_parse_no_brackets() {
        assert!(parse_candidate_array("no json here").is_empty());
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(parse_candidate_array("[{broken").is_empty());
    }

    #[test]
    fn test_parse_caps_at_ten() {
        let items: Vec<String> = (0..12)
            .map(|i| format!(r#"{{"notation":"31A{i}"}}"#))
            .collect();
        let content = format!("[{}]", items.join(","));
        assert_eq!(parse_candidate_array(&content).len(), 10);
    }

    #[tokio::test]
    async fn test_missing_client_yields_empty() {
        let suggester = GenerativeSuggester::new(None);
        let record = Record::default();
        let keywords: Vec<String> = Vec::new();
        let ctx = QueryContext {
            record: &record,
            keywords: &keywords,
        };
        assert!(suggester.candidates(&ctx).await.is_empty());
    }
}
