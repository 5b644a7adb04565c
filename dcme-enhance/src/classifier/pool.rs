//! Candidate pool
//!
//! Deduplicates raw candidates by notation while preserving the order in
//! which notations were first seen; that encounter order is the stable
//! tie-break for equal scores later in selection.
//!
//! Merge semantics per notation:
//! - score: maximum of all observations, default 0.7 when a source reports
//!   none, clamped to [0, 1]
//! - labels: first present value wins, later sources only fill gaps; a
//!   source's plain `label` counts as the German (preferred) label

use super::source::RawCandidate;
use std::collections::HashMap;

/// Score assumed for candidates whose source reports none
pub const DEFAULT_SCORE: f64 = 0.7;

/// A merged candidate, best-known view of one notation
#[derive(Debug, Clone, PartialEq)]
pub struct PooledCandidate {
    pub notation: String,
    pub score: f64,
    pub label_de: Option<String>,
    pub label_en: Option<String>,
}

/// Insertion-ordered map notation → merged candidate
///
/// Lives for one classification call only.
#[derive(Debug, Default)]
pub struct CandidatePool {
    index: HashMap<String, usize>,
    entries: Vec<PooledCandidate>,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one raw candidate into the pool
    ///
    /// Candidates without a notation are discarded.
    pub fn merge(&mut self, raw: RawCandidate) {
        let Some(notation) = raw.notation.filter(|n| !n.is_empty()) else {
            return;
        };

        let score = raw.score.unwrap_or(DEFAULT_SCORE).clamp(0.0, 1.0);
        let label_de = raw.label_de.or(raw.label);
        let label_en = raw.label_en;

        match self.index.get(&notation) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                if score > entry.score {
                    entry.score = score;
                }
                if entry.label_de.is_none() {
                    entry.label_de = label_de;
                }
                if entry.label_en.is_none() {
                    entry.label_en = label_en;
                }
            }
            None => {
                self.index.insert(notation.clone(), self.entries.len());
                self.entries.push(PooledCandidate {
                    notation,
                    score,
                    label_de,
                    label_en,
                });
            }
        }
    }

    /// Merge a batch of raw candidates in order
    pub fn extend(&mut self, raws: impl IntoIterator<Item = RawCandidate>) {
        for raw in raws {
            self.merge(raw);
        }
    }

    /// Consume the pool, yielding merged candidates in encounter order
    pub fn into_entries(self) -> Vec<PooledCandidate> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(notation: &str, score: Option<f64>) -> RawCandidate {
        RawCandidate {
            notation: Some(notation.to_string()),
            score,
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_notation_discarded() {
        let mut pool = CandidatePool::new();
        pool.merge(RawCandidate::default());
        pool.merge(RawCandidate {
            notation: Some(String::new()),
            ..Default::default()
        });
        assert!(pool.is_empty());
    }

    #[test]
    fn test_default_score_applied() {
        let mut pool = CandidatePool::new();
        pool.merge(raw("25F", None));
        let entries = pool.into_entries();
        assert_eq!(entries[0].score, DEFAULT_SCORE);
    }

    #[test]
    fn test_max_score_wins() {
        let mut pool = CandidatePool::new();
        pool.merge(raw("25F", Some(0.5)));
        pool.merge(raw("25F", Some(0.9)));
        pool.merge(raw("25F", Some(0.6)));
        let entries = pool.into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].score, 0.9);
    }

    #[test]
    fn test_idempotent_merge() {
        // Same notation, same or lower score: entry unchanged
        let mut pool = CandidatePool::new();
        pool.merge(RawCandidate {
            notation: Some("25F".to_string()),
            label_de: Some("Stadtansicht".to_string()),
            score: Some(0.8),
            ..Default::default()
        });
        pool.merge(RawCandidate {
            notation: Some("25F".to_string()),
            label_de: Some("andere Ansicht".to_string()),
            score: Some(0.8),
            ..Default::default()
        });

        let entries = pool.into_entries();
        assert_eq!(entries[0].score, 0.8);
        assert_eq!(entries[0].label_de.as_deref(), Some("Stadtansicht"));
    }

    #[test]
    fn test_labels_fill_but_never_overwrite() {
        let mut pool = CandidatePool::new();
        pool.merge(RawCandidate {
            notation: Some("25F".to_string()),
            label_de: Some("Stadtansicht".to_string()),
            ..Default::default()
        });
        pool.merge(RawCandidate {
            notation: Some("25F".to_string()),
            label_de: Some("Prospekt".to_string()),
            label_en: Some("city view".to_string()),
            ..Default::default()
        });

        let entries = pool.into_entries();
        assert_eq!(entries[0].label_de.as_deref(), Some("Stadtansicht"));
        assert_eq!(entries[0].label_en.as_deref(), Some("city view"));
    }

    #[test]
    fn test_plain_label_backfills_label_de() {
        let mut pool = CandidatePool::new();
        pool.merge(RawCandidate {
            notation: Some("62".to_string()),
            label: Some("Karte".to_string()),
            score: Some(0.5),
            ..Default::default()
        });
        let entries = pool.into_entries();
        assert_eq!(entries[0].label_de.as_deref(), Some("Karte"));
    }

    #[test]
    fn test_score_clamped() {
        let mut pool = CandidatePool::new();
        pool.merge(raw("25F", Some(1.5)));
        pool.merge(raw("62", Some(-0.3)));
        let entries = pool.into_entries();
        assert_eq!(entries[0].score, 1.0);
        assert_eq!(entries[1].score, 0.0);
    }

    #[test]
    fn test_encounter_order_preserved() {
        let mut pool = CandidatePool::new();
        pool.extend([raw("62", Some(0.5)), raw("25F", Some(0.9)), raw("31A", None)]);
        let notations: Vec<_> = pool
            .into_entries()
            .into_iter()
            .map(|e| e.notation)
            .collect();
        assert_eq!(notations, vec!["62", "25F", "31A"]);
    }

    #[test]
    fn test_case_sensitive_notations_distinct() {
        let mut pool = CandidatePool::new();
        pool.merge(raw("25F", Some(0.8)));
        pool.merge(raw("25f", Some(0.8)));
        assert_eq!(pool.len(), 2);
    }
}
