//! Aggregation and ranking engine
//!
//! Merges candidates from all sources into the pool, validates them against
//! the authority, then selects a division-diverse top-k:
//!
//! 1. extract keywords, query every source, concatenate the results
//! 2. merge into the notation-keyed pool (max-score, first-label-wins)
//! 3. validate each pooled candidate (or synthesize the URI when validation
//!    is disabled); candidates unknown to the authority are dropped
//! 4. stable sort by score descending, keep the best candidate per division
//!    (first character of the notation)
//! 5. fill remaining top-k slots from the unselected remainder by score
//! 6. format as subjects with confidence rounded to two decimals
//!
//! No step fails for malformed upstream data; bad candidates are filtered,
//! not propagated. An empty result means every source came up empty or every
//! candidate failed validation.

use super::authority::{AuthorityValidator, NotationAuthority};
use super::keywords::extract_keywords;
use super::llm_suggester::GenerativeSuggester;
use super::pool::CandidatePool;
use super::search_client::LexicalSearchClient;
use super::source::{CandidateSource, QueryContext};
use crate::services::chat_client::ChatClient;
use dcme_common::{EnhancerConfig, PrefLabel, Record, Subject};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Division sentinel for empty notations
const EMPTY_DIVISION: char = '0';

/// A pooled candidate that passed validation (or URI synthesis)
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCandidate {
    pub notation: String,
    pub score: f64,
    pub label_de: Option<String>,
    pub label_en: Option<String>,
    pub uri: String,
}

impl ValidatedCandidate {
    /// Topical division used by the diversity heuristic
    fn division(&self) -> char {
        self.notation.chars().next().unwrap_or(EMPTY_DIVISION)
    }

    fn to_subject(&self, scheme: &str) -> Subject {
        Subject {
            value_uri: self.uri.clone(),
            notation: self.notation.clone(),
            pref_label: PrefLabel {
                de: self.label_de.clone(),
                en: self.label_en.clone(),
            },
            confidence: round2(self.score),
            scheme: scheme.to_string(),
        }
    }
}

fn round2(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

/// Subject classifier: candidate sources + authority + selection policy
pub struct SubjectClassifier {
    config: EnhancerConfig,
    sources: Vec<Box<dyn CandidateSource>>,
    authority: Box<dyn NotationAuthority>,
}

impl SubjectClassifier {
    /// Standard wiring: lexical search (when configured) plus the
    /// generative suggester, validated against the HTTP authority
    pub fn new(config: EnhancerConfig, chat: Option<Arc<ChatClient>>) -> Self {
        let sources: Vec<Box<dyn CandidateSource>> = vec![
            Box::new(LexicalSearchClient::new(
                config.search_url.clone(),
                config.lang.clone(),
            )),
            Box::new(GenerativeSuggester::new(chat)),
        ];
        let authority = Box::new(AuthorityValidator::new(config.authority_base.clone()));
        Self {
            config,
            sources,
            authority,
        }
    }

    /// Custom wiring for tests and alternative sources
    pub fn with_components(
        config: EnhancerConfig,
        sources: Vec<Box<dyn CandidateSource>>,
        authority: Box<dyn NotationAuthority>,
    ) -> Self {
        Self {
            config,
            sources,
            authority,
        }
    }

    /// Classify one record into a ranked subject list
    pub async fn classify(&self, record: &Record) -> Vec<Subject> {
        let keywords = extract_keywords(record);
        let ctx = QueryContext {
            record,
            keywords: &keywords,
        };

        let mut pool = CandidatePool::new();
        for source in &self.sources {
            let candidates = source.candidates(&ctx).await;
            debug!(
                source = source.name(),
                count = candidates.len(),
                "Collected candidates"
            );
            pool.extend(candidates);
        }

        debug!(pooled = pool.len(), "Candidate pool merged");

        let validated = self.validate_pool(pool).await;
        let selected = select_top_k(&validated, self.config.top_k);

        selected
            .iter()
            .map(|c| c.to_subject(&self.config.scheme))
            .collect()
    }

    /// Validate pooled candidates, or synthesize URIs when validation is off
    async fn validate_pool(&self, pool: CandidatePool) -> Vec<ValidatedCandidate> {
        let mut validated = Vec::new();

        for candidate in pool.into_entries() {
            if self.config.validate {
                match self.authority.validate(&candidate.notation).await {
                    Some(confirmed) => validated.push(ValidatedCandidate {
                        uri: confirmed.uri,
                        label_de: candidate.label_de.or(confirmed.label_de),
                        label_en: candidate.label_en.or(confirmed.label_en),
                        notation: candidate.notation,
                        score: candidate.score,
                    }),
                    None => {
                        debug!(notation = %candidate.notation, "Dropped unvalidated candidate");
                    }
                }
            } else {
                validated.push(ValidatedCandidate {
                    uri: self.authority.uri_for(&candidate.notation),
                    notation: candidate.notation,
                    score: candidate.score,
                    label_de: candidate.label_de,
                    label_en: candidate.label_en,
                });
            }
        }

        validated
    }
}

/// Division-diverse top-k selection
///
/// First pass walks candidates in score order (stable, so equal scores keep
/// encounter order) and takes at most one per division. If that yields fewer
/// than `top_k`, remaining slots fill from the unselected remainder in the
/// same score order.
pub fn select_top_k(validated: &[ValidatedCandidate], top_k: usize) -> Vec<ValidatedCandidate> {
    let mut ranked: Vec<&ValidatedCandidate> = validated.iter().collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let mut selected: Vec<ValidatedCandidate> = Vec::new();
    let mut seen_divisions = HashSet::new();

    for candidate in &ranked {
        if selected.len() >= top_k {
            break;
        }
        if seen_divisions.insert(candidate.division()) {
            selected.push((*candidate).clone());
        }
    }

    if selected.len() < top_k {
        let chosen: HashSet<String> = selected.iter().map(|c| c.notation.clone()).collect();
        for candidate in &ranked {
            if selected.len() >= top_k {
                break;
            }
            if !chosen.contains(candidate.notation.as_str()) {
                selected.push((*candidate).clone());
            }
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(notation: &str, score: f64) -> ValidatedCandidate {
        ValidatedCandidate {
            notation: notation.to_string(),
            score,
            label_de: None,
            label_en: None,
            uri: format!("https://iconclass.org/{notation}"),
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.856), 0.86);
        assert_eq!(round2(0.7), 0.7);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(1.0), 1.0);
    }

    #[test]
    fn test_top_k_bound() {
        let validated: Vec<_> = (0..8)
            .map(|i| candidate(&format!("{i}A"), 0.9 - 0.05 * i as f64))
            .collect();
        assert_eq!(select_top_k(&validated, 5).len(), 5);
        assert_eq!(select_top_k(&validated, 10).len(), 8);
        assert!(select_top_k(&validated, 0).is_empty());
    }

    #[test]
    fn test_one_per_division_first_pass() {
        // Two candidates in each of five divisions: pick the stronger of each
        let mut validated = Vec::new();
        for d in 1..=5 {
            validated.push(candidate(&format!("{d}A"), 0.9 - 0.01 * d as f64));
            validated.push(candidate(&format!("{d}B"), 0.8 - 0.01 * d as f64));
        }

        let selected = select_top_k(&validated, 5);
        let notations: Vec<_> = selected.iter().map(|c| c.notation.as_str()).collect();
        assert_eq!(notations, vec!["1A", "2A", "3A", "4A", "5A"]);
    }

    #[test]
    fn test_score_fill_after_divisions_exhausted() {
        // Only two divisions available: winners first, then score fill
        let validated = vec![
            candidate("1A", 0.9),
            candidate("1B", 0.85),
            candidate("2A", 0.8),
            candidate("2B", 0.75),
        ];

        let selected = select_top_k(&validated, 3);
        let notations: Vec<_> = selected.iter().map(|c| c.notation.as_str()).collect();
        assert_eq!(notations, vec!["1A", "2A", "1B"]);
    }

    #[test]
    fn test_stable_tie_break_by_encounter_order() {
        let validated = vec![
            candidate("3X", 0.8),
            candidate("1X", 0.8),
            candidate("2X", 0.8),
        ];

        let selected = select_top_k(&validated, 3);
        let notations: Vec<_> = selected.iter().map(|c| c.notation.as_str()).collect();
        assert_eq!(notations, vec!["3X", "1X", "2X"]);
    }

    #[test]
    fn test_deterministic_selection() {
        let validated = vec![
            candidate("25F", 0.8),
            candidate("25G", 0.8),
            candidate("62", 0.7),
        ];
        assert_eq!(select_top_k(&validated, 5), select_top_k(&validated, 5));
    }

    #[test]
    fn test_empty_notation_uses_sentinel_division() {
        let validated = vec![candidate("", 0.9), candidate("0A", 0.8)];
        // Both live in division '0'; only the stronger survives the first
        // pass, the other comes back in the fill
        let selected = select_top_k(&validated, 1);
        assert_eq!(selected[0].notation, "");
        let selected = select_top_k(&validated, 2);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(select_top_k(&[], 5).is_empty());
    }
}
