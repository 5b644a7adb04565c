//! Chat completion client
//!
//! Thin client for an OpenAI-compatible `/chat/completions` endpoint. Both
//! the alt-text generator and the generative subject suggester go through
//! this client; the base URL is overridable so tests can point at fixtures.

use serde_json::{json, Map, Value};
use std::time::Duration;
use thiserror::Error;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const USER_AGENT: &str = "dcme/0.1.0 (https://github.com/maehr/dublin-core-metadata-enhancer)";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Model used for alt-text generation (vision input)
pub const ALT_TEXT_MODEL: &str = "gpt-5";

/// Model used for subject classification
pub const CLASSIFY_MODEL: &str = "gpt-4o";

/// Chat client errors
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Empty or null completion content")]
    EmptyResponse,
}

/// Optional sampling parameters for a completion request
#[derive(Debug, Clone, Default)]
pub struct ChatParams {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub max_completion_tokens: Option<u32>,
}

/// Chat completion client
pub struct ChatClient {
    http_client: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl ChatClient {
    pub fn new(api_key: String) -> Result<Self, ChatError> {
        Self::with_api_base(api_key, OPENAI_API_BASE.to_string())
    }

    /// Client against a non-default endpoint (tests, proxies)
    pub fn with_api_base(api_key: String, api_base: String) -> Result<Self, ChatError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ChatError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Request a completion; returns the first choice's message content
    ///
    /// `user_content` is either a plain string or the multimodal content
    /// array (text + image parts) the API accepts.
    pub async fn complete(
        &self,
        model: &str,
        system: &str,
        user_content: Value,
        params: &ChatParams,
    ) -> Result<String, ChatError> {
        let body = build_body(model, system, user_content, params);
        let url = format!("{}/chat/completions", self.api_base);

        tracing::debug!(model = model, "Requesting chat completion");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ChatError::ApiError(status.as_u16(), error_text));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ChatError::ParseError(e.to_string()))?;

        extract_content(&payload)
    }
}

/// Build the request body
fn build_body(model: &str, system: &str, user_content: Value, params: &ChatParams) -> Value {
    let mut body = Map::new();
    body.insert("model".to_string(), json!(model));
    body.insert(
        "messages".to_string(),
        json!([
            {"role": "system", "content": system},
            {"role": "user", "content": user_content},
        ]),
    );

    if let Some(temperature) = params.temperature {
        body.insert("temperature".to_string(), json!(temperature));
    }
    if let Some(max_tokens) = params.max_tokens {
        body.insert("max_tokens".to_string(), json!(max_tokens));
    }
    if let Some(max_completion_tokens) = params.max_completion_tokens {
        body.insert(
            "max_completion_tokens".to_string(),
            json!(max_completion_tokens),
        );
    }

    Value::Object(body)
}

/// Pull the first choice's content out of a completion payload
fn extract_content(payload: &Value) -> Result<String, ChatError> {
    let content = payload["choices"][0]["message"]["content"]
        .as_str()
        .ok_or(ChatError::EmptyResponse)?;

    if content.trim().is_empty() {
        return Err(ChatError::EmptyResponse);
    }

    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ChatClient::new("test-key".to_string());
        assert!(client.is_ok());
    }

    #[test]
    fn test_api_base_trailing_slash_trimmed() {
        let client =
            ChatClient::with_api_base("k".to_string(), "http://localhost:8080/v1/".to_string())
                .unwrap();
        assert_eq!(client.api_base, "http://localhost:8080/v1");
    }

    #[test]
    fn test_build_body_minimal() {
        let body = build_body(CLASSIFY_MODEL, "system text", json!("user text"), &ChatParams::default());
        assert_eq!(body["model"], CLASSIFY_MODEL);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "user text");
        assert!(body.get("temperature").is_none());
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_build_body_with_params() {
        let params = ChatParams {
            temperature: Some(0.2),
            max_tokens: Some(600),
            max_completion_tokens: None,
        };
        let body = build_body(CLASSIFY_MODEL, "s", json!("u"), &params);
        assert_eq!(body["temperature"], 0.2);
        assert_eq!(body["max_tokens"], 600);
        assert!(body.get("max_completion_tokens").is_none());
    }

    #[test]
    fn test_extract_content() {
        let payload = json!({
            "choices": [{"message": {"role": "assistant", "content": "hello"}}]
        });
        assert_eq!(extract_content(&payload).unwrap(), "hello");
    }

    #[test]
    fn test_extract_content_empty() {
        let payload = json!({
            "choices": [{"message": {"role": "assistant", "content": "   "}}]
        });
        assert!(matches!(
            extract_content(&payload),
            Err(ChatError::EmptyResponse)
        ));
    }

    #[test]
    fn test_extract_content_missing_choices() {
        let payload = json!({"error": {"message": "nope"}});
        assert!(matches!(
            extract_content(&payload),
            Err(ChatError::EmptyResponse)
        ));
    }
}
