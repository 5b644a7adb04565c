//! Record enhancement pipeline
//!
//! Drives per-record processing in input order. Alt-text generation is the
//! hard-failure stage: when it fails the record is skipped entirely and the
//! batch continues. Classification is best-effort: an empty subject list is
//! logged, never fatal. A batch run therefore always completes.

use crate::alt_text::{AltTextGenerator, AltTextProvider};
use crate::classifier::SubjectClassifier;
use crate::services::chat_client::ChatClient;
use dcme_common::{EnhancedRecord, EnhancerConfig, Record};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Per-record enhancement pipeline
pub struct EnhancePipeline {
    alt_text: Box<dyn AltTextProvider>,
    classifier: Option<SubjectClassifier>,
}

impl EnhancePipeline {
    /// Standard wiring from configuration and a shared chat client
    pub fn new(config: EnhancerConfig, chat: Arc<ChatClient>) -> Self {
        let classifier = if config.classify_enabled {
            Some(SubjectClassifier::new(config.clone(), Some(chat.clone())))
        } else {
            info!("Subject classification disabled by configuration");
            None
        };

        Self {
            alt_text: Box::new(AltTextGenerator::new(chat)),
            classifier,
        }
    }

    /// Custom wiring for tests
    pub fn with_components(
        alt_text: Box<dyn AltTextProvider>,
        classifier: Option<SubjectClassifier>,
    ) -> Self {
        Self {
            alt_text,
            classifier,
        }
    }

    /// Process all records in input order
    pub async fn run(&self, records: &[Record]) -> Vec<EnhancedRecord> {
        let total = records.len();
        let mut results = Vec::new();

        for (i, record) in records.iter().enumerate() {
            let object_id = record.object_id();
            info!(object_id = %object_id, "Processing record {}/{}", i + 1, total);

            let alt_text = match self.alt_text.generate(record).await {
                Ok(output) => output,
                Err(e) => {
                    error!(object_id = %object_id, error = %e, "Alt text generation failed, skipping record");
                    continue;
                }
            };

            let subjects = match &self.classifier {
                Some(classifier) => {
                    let subjects = classifier.classify(record).await;
                    if subjects.is_empty() {
                        warn!(object_id = %object_id, "Classification produced no subjects");
                    } else {
                        info!(object_id = %object_id, count = subjects.len(), "Subjects assigned");
                    }
                    subjects
                }
                None => Vec::new(),
            };

            results.push(EnhancedRecord {
                objectid: alt_text.objectid.unwrap_or(object_id),
                alt_text: alt_text.alt_text,
                longdesc: alt_text.longdesc,
                subjects,
            });
        }

        info!(
            enhanced = results.len(),
            skipped = total - results.len(),
            "Batch complete"
        );

        results
    }
}
