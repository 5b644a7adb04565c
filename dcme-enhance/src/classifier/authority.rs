//! Vocabulary authority validation
//!
//! Confirms that a notation exists in the controlled vocabulary and fetches
//! its canonical labels. The HTTP validator never fails: any transport
//! error, non-200 response or malformed payload reads as "not found".

use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Authority-confirmed notation details
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedLabels {
    pub notation: String,
    pub label_de: Option<String>,
    pub label_en: Option<String>,
    /// Canonical authority URI for the notation
    pub uri: String,
}

/// Validates notations against the vocabulary authority
#[async_trait::async_trait]
pub trait NotationAuthority: Send + Sync {
    /// Look up a notation; `None` means unknown to the authority
    async fn validate(&self, notation: &str) -> Option<ValidatedLabels>;

    /// Deterministic canonical URI for a notation (no lookup)
    fn uri_for(&self, notation: &str) -> String;
}

/// HTTP authority client (`{base}/{escaped notation}.json`)
pub struct AuthorityValidator {
    http_client: reqwest::Client,
    base_url: String,
}

impl AuthorityValidator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl NotationAuthority for AuthorityValidator {
    async fn validate(&self, notation: &str) -> Option<ValidatedLabels> {
        if notation.is_empty() {
            return None;
        }

        let url = format!("{}/{}.json", self.base_url, urlencoding::encode(notation));

        let response = self
            .http_client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .ok()?;

        if response.status() != reqwest::StatusCode::OK {
            tracing::debug!(
                notation = %notation,
                status = response.status().as_u16(),
                "Authority lookup returned non-200"
            );
            return None;
        }

        let data: Value = response.json().await.ok()?;
        let (label_de, label_en) = extract_labels(&data);

        Some(ValidatedLabels {
            notation: notation.to_string(),
            label_de,
            label_en,
            uri: self.uri_for(notation),
        })
    }

    fn uri_for(&self, notation: &str) -> String {
        format!("{}/{}", self.base_url, notation)
    }
}

/// Extract German and English labels from the payload
///
/// Known shapes under `prefLabel`/`label`/`labels`: a language-keyed object
/// (`{"de": "...", "en": "..."}`) or a list of `{lang, value}` entries.
pub(crate) fn extract_labels(data: &Value) -> (Option<String>, Option<String>) {
    let mut label_de = None;
    let mut label_en = None;

    for key in ["prefLabel", "label", "labels"] {
        match data.get(key) {
            Some(Value::Object(map)) => {
                if let Some(de) = map.get("de").and_then(Value::as_str) {
                    label_de = Some(de.to_string());
                }
                if let Some(en) = map.get("en").and_then(Value::as_str) {
                    label_en = Some(en.to_string());
                }
            }
            Some(Value::Array(items)) => {
                for item in items {
                    let lang = item.get("lang").and_then(Value::as_str);
                    let value = item.get("value").and_then(Value::as_str);
                    match (lang, value) {
                        (Some("de"), Some(v)) => label_de = Some(v.to_string()),
                        (Some("en"), Some(v)) => label_en = Some(v.to_string()),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    (label_de, label_en)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_labels_object_shape() {
        let data = json!({"prefLabel": {"de": "Stadtansicht", "en": "city view"}});
        let (de, en) = extract_labels(&data);
        assert_eq!(de.as_deref(), Some("Stadtansicht"));
        assert_eq!(en.as_deref(), Some("city view"));
    }

    #[test]
    fn test_extract_labels_list_shape() {
        let data = json!({"labels": [
            {"lang": "de", "value": "Karte"},
            {"lang": "en", "value": "map"},
            {"lang": "fr", "value": "carte"},
        ]});
        let (de, en) = extract_labels(&data);
        assert_eq!(de.as_deref(), Some("Karte"));
        assert_eq!(en.as_deref(), Some("map"));
    }

    #[test]
    fn test_extract_labels_partial() {
        let data = json!({"label": {"de": "Stadtansicht"}});
        let (de, en) = extract_labels(&data);
        assert_eq!(de.as_deref(), Some("Stadtansicht"));
        assert!(en.is_none());
    }

    #[test]
    fn test_extract_labels_unknown_shape() {
        let data = json!({"prefLabel": "not a mapping", "something": 3});
        assert_eq!(extract_labels(&data), (None, None));
    }

    #[test]
    fn test_uri_for() {
        let validator = AuthorityValidator::new("https://iconclass.org/");
        assert_eq!(validator.uri_for("25F"), "https://iconclass.org/25F");
    }

    #[tokio::test]
    async fn test_empty_notation_invalid() {
        let validator = AuthorityValidator::new("https://iconclass.org");
        assert!(validator.validate("").await.is_none());
    }
}
