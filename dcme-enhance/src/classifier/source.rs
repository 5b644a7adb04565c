//! Candidate source interface
//!
//! A candidate source proposes classification codes for a record. Sources
//! are best-effort by contract: `candidates` never fails, it just returns
//! fewer (or zero) candidates when the backing service misbehaves. New
//! sources plug in here without touching the ranking engine.

use dcme_common::Record;
use serde_json::Value;

/// Query context handed to every candidate source
#[derive(Debug, Clone, Copy)]
pub struct QueryContext<'a> {
    /// The record under classification
    pub record: &'a Record,
    /// Normalized search keywords extracted from the record
    pub keywords: &'a [String],
}

/// A raw candidate as reported by a source, before pooling
///
/// Every field is optional; sources differ in what they can provide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCandidate {
    /// Vocabulary code; candidates without one are discarded at merge
    pub notation: Option<String>,
    /// Source label without language tag (treated as preferred-language)
    pub label: Option<String>,
    pub label_de: Option<String>,
    pub label_en: Option<String>,
    /// Source-reported confidence in [0, 1]
    pub score: Option<f64>,
    /// Source-assigned rationale, informational only
    pub why: Option<String>,
}

impl RawCandidate {
    /// Best-effort extraction from an arbitrary JSON value
    ///
    /// Tolerates missing fields, wrong types and numeric scores sent as
    /// strings; anything unusable reads as absent.
    pub fn from_value(value: &Value) -> Self {
        Self {
            notation: string_field(value, "notation"),
            label: string_field(value, "label"),
            label_de: string_field(value, "label_de"),
            label_en: string_field(value, "label_en"),
            score: score_field(value, "score"),
            why: string_field(value, "why"),
        }
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn score_field(value: &Value, key: &str) -> Option<f64> {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Source of classification candidates
#[async_trait::async_trait]
pub trait CandidateSource: Send + Sync {
    /// Source name for logging and provenance
    fn name(&self) -> &'static str;

    /// Propose candidates for the record; never fails
    async fn candidates(&self, ctx: &QueryContext<'_>) -> Vec<RawCandidate>;
}
