//! Search keyword extraction
//!
//! Derives a bounded, deterministic set of search terms from a record's
//! free-text fields (title, description, subject). Tokens are runs of
//! letters (including German umlauts and ß) or hyphens, lowercased, longer
//! than two characters, deduplicated and sorted.

use dcme_common::Record;
use std::collections::BTreeSet;

/// Maximum number of keywords per record
const MAX_KEYWORDS: usize = 20;

/// Minimum token length (exclusive lower bound is 2)
const MIN_TOKEN_CHARS: usize = 3;

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, 'Ä' | 'Ö' | 'Ü' | 'ä' | 'ö' | 'ü' | 'ß' | '-')
}

/// Extract up to 20 normalized keywords from a record
pub fn extract_keywords(record: &Record) -> Vec<String> {
    let mut text = String::new();
    text.push_str(&record.text("title"));
    text.push(' ');
    text.push_str(&record.text("description"));
    for subject in record.text_values("subject") {
        text.push(' ');
        text.push_str(&subject);
    }

    let mut terms = BTreeSet::new();
    let mut current = String::new();

    for c in text.chars().chain(std::iter::once(' ')) {
        if is_word_char(c) {
            current.push(c);
        } else if !current.is_empty() {
            if current.chars().count() >= MIN_TOKEN_CHARS {
                terms.insert(current.to_lowercase());
            }
            current.clear();
        }
    }

    terms.into_iter().take(MAX_KEYWORDS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_value(value)
    }

    #[test]
    fn test_basic_extraction() {
        let r = record(json!({"title": "Basel Stadtansicht"}));
        assert_eq!(extract_keywords(&r), vec!["basel", "stadtansicht"]);
    }

    #[test]
    fn test_short_tokens_dropped() {
        let r = record(json!({"title": "Die Stadt am Rhein um 1642"}));
        // "am", "um" and the digits contribute nothing
        assert_eq!(extract_keywords(&r), vec!["die", "rhein", "stadt"]);
    }

    #[test]
    fn test_umlauts_and_hyphen_retained() {
        let r = record(json!({"title": "Münster-Ansicht", "description": "große Straße"}));
        let keywords = extract_keywords(&r);
        assert!(keywords.contains(&"münster-ansicht".to_string()));
        assert!(keywords.contains(&"große".to_string()));
        assert!(keywords.contains(&"straße".to_string()));
    }

    #[test]
    fn test_subject_list_contributes() {
        let r = record(json!({"subject": ["Karte", "Vogelschau"]}));
        assert_eq!(extract_keywords(&r), vec!["karte", "vogelschau"]);
    }

    #[test]
    fn test_deduplication_and_sorting() {
        let r = record(json!({
            "title": "Basel Basel",
            "description": "Ansicht von Basel",
            "subject": ["Ansicht"]
        }));
        assert_eq!(extract_keywords(&r), vec!["ansicht", "basel", "von"]);
    }

    #[test]
    fn test_cap_at_twenty() {
        let words: Vec<String> = (b'a'..=b'z').map(|c| format!("wort{}", c as char)).collect();
        let r = record(json!({"title": words.join(" ")}));
        assert_eq!(extract_keywords(&r).len(), 20);
    }

    #[test]
    fn test_empty_record() {
        let r = record(json!({}));
        assert!(extract_keywords(&r).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let r = record(json!({"title": "Vogelschau der Stadt Basel", "description": "Kupferstich"}));
        assert_eq!(extract_keywords(&r), extract_keywords(&r));
    }
}
