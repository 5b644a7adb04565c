//! Emitted subject and enhanced-record types
//!
//! These are the wire shapes attached to each processed record. Serde renames
//! produce the exact JSON keys the downstream JSON-LD formatter and existing
//! consumers expect (`valueURI`, `prefLabel`).

use serde::{Deserialize, Serialize};

/// Bilingual preferred label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrefLabel {
    pub de: Option<String>,
    pub en: Option<String>,
}

/// One ranked subject classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Canonical authority URI for the notation
    #[serde(rename = "valueURI")]
    pub value_uri: String,
    /// Vocabulary code
    pub notation: String,
    /// Preferred labels
    #[serde(rename = "prefLabel")]
    pub pref_label: PrefLabel,
    /// Final confidence, rounded to two decimals, in [0, 1]
    pub confidence: f64,
    /// Vocabulary scheme name
    pub scheme: String,
}

/// Enhanced record accumulated by the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedRecord {
    /// Record identifier
    pub objectid: String,
    /// Generated alternative text (German)
    pub alt_text: String,
    /// Optional long description for complex images
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longdesc: Option<String>,
    /// Ranked subject classifications; empty when classification is
    /// disabled or produced nothing
    #[serde(default)]
    pub subjects: Vec<Subject>,
}
