//! Lexical search candidate source
//!
//! Queries a term-search endpoint once per keyword and collects the scored
//! candidate codes it returns. The whole source is optional: without a
//! configured endpoint it contributes nothing. Per-keyword failures are
//! swallowed; a short fixed delay between lookups keeps the remote service's
//! rate limits happy.

use super::source::{CandidateSource, QueryContext, RawCandidate};
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const INTER_REQUEST_DELAY: Duration = Duration::from_millis(100);

/// Maximum results taken per keyword
const RESULTS_PER_TERM: usize = 10;

/// Score assumed when the search service omits one
const SEARCH_DEFAULT_SCORE: f64 = 0.5;

/// Lexical search client (candidate source A)
pub struct LexicalSearchClient {
    http_client: reqwest::Client,
    search_url: Option<String>,
    lang: String,
}

impl LexicalSearchClient {
    pub fn new(search_url: Option<String>, lang: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            search_url,
            lang,
        }
    }

    async fn lookup_term(&self, url: &str, term: &str) -> Result<Vec<RawCandidate>, String> {
        let response = self
            .http_client
            .get(url)
            .query(&[("q", term), ("lang", self.lang.as_str())])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(format!("HTTP {}", response.status().as_u16()));
        }

        let data: Value = response.json().await.map_err(|e| e.to_string())?;
        Ok(parse_search_results(&data))
    }
}

/// Parse a search response into raw candidates (top 10, default score 0.5)
pub(crate) fn parse_search_results(data: &Value) -> Vec<RawCandidate> {
    data.as_array()
        .map(|items| {
            items
                .iter()
                .take(RESULTS_PER_TERM)
                .map(|item| {
                    let mut candidate = RawCandidate::from_value(item);
                    candidate.score = candidate.score.or(Some(SEARCH_DEFAULT_SCORE));
                    candidate
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait::async_trait]
impl CandidateSource for LexicalSearchClient {
    fn name(&self) -> &'static str {
        "lexical-search"
    }

    async fn candidates(&self, ctx: &QueryContext<'_>) -> Vec<RawCandidate> {
        let Some(url) = &self.search_url else {
            return Vec::new();
        };

        let mut candidates = Vec::new();

        for term in ctx.keywords {
            match self.lookup_term(url, term).await {
                Ok(results) => {
                    candidates.extend(results);
                    tokio::time::sleep(INTER_REQUEST_DELAY).await;
                }
                Err(e) => {
                    tracing::debug!(term = %term, error = %e, "Search lookup failed, skipping term");
                }
            }
        }

        tracing::debug!(
            keywords = ctx.keywords.len(),
            candidates = candidates.len(),
            "Lexical search complete"
        );

        candidates
    }
}
