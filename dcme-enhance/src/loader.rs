//! Metadata loading
//!
//! Loads the source metadata document from a local JSON file or an http(s)
//! URL and yields its `objects` array as records. Unlike the best-effort
//! candidate sources, failures here are fatal input errors surfaced before
//! any record is processed.

use dcme_common::{Error, Record, Result};
use serde_json::Value;

/// Load records from a file path or URL
pub async fn load_records(source: &str) -> Result<Vec<Record>> {
    let data = if is_url(source) {
        load_from_url(source).await?
    } else {
        load_from_file(source)?
    };

    let root = data
        .as_object()
        .ok_or_else(|| Error::Metadata("expected JSON object at top level".to_string()))?;

    let records = root
        .get("objects")
        .and_then(Value::as_array)
        .map(|objects| {
            objects
                .iter()
                .map(|v| Record::from_value(v.clone()))
                .collect()
        })
        .unwrap_or_default();

    Ok(records)
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn load_from_file(path: &str) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Metadata(format!("cannot read {path}: {e}")))?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Metadata(format!("invalid JSON in {path}: {e}")))
}

async fn load_from_url(url: &str) -> Result<Value> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| Error::Metadata(format!("failed to fetch {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(Error::Metadata(format!(
            "failed to fetch {url}: HTTP {}",
            response.status().as_u16()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| Error::Metadata(format!("invalid JSON from {url}: {e}")))
}
