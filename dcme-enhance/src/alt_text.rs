//! Alt-text generation
//!
//! Produces a WCAG-compliant German alternative text for a record's image by
//! sending the image plus interpolated metadata to the chat model. This is
//! the pipeline's hard-failure stage: a record without a usable image or a
//! malformed model reply is skipped entirely.

use crate::services::chat_client::{ChatClient, ChatError, ChatParams, ALT_TEXT_MODEL};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use dcme_common::Record;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

const SYSTEM_PROMPT: &str = "Du bist ein Experte für Alternativtexte.";
const MAX_COMPLETION_TOKENS: u32 = 2000;

/// Alt-text generation errors (record-level hard failures)
#[derive(Debug, Error)]
pub enum AltTextError {
    #[error("no image URL in object_thumb field")]
    MissingImage,

    #[error("image download failed: {0}")]
    ImageDownload(String),

    #[error("chat completion failed: {0}")]
    Chat(#[from] ChatError),

    #[error("reply is not a JSON object: {0}")]
    MalformedReply(String),

    #[error("reply missing alt_text field")]
    MissingAltText,
}

/// Generated alt-text payload for one record
#[derive(Debug, Clone)]
pub struct AltTextOutput {
    /// Identifier echoed by the model, when present
    pub objectid: Option<String>,
    pub alt_text: String,
    pub longdesc: Option<String>,
}

/// Provider seam so the pipeline can run without a live model
#[async_trait::async_trait]
pub trait AltTextProvider: Send + Sync {
    async fn generate(&self, record: &Record) -> Result<AltTextOutput, AltTextError>;
}

/// Chat-model-backed alt-text generator
pub struct AltTextGenerator {
    chat: Arc<ChatClient>,
    http_client: reqwest::Client,
}

impl AltTextGenerator {
    pub fn new(chat: Arc<ChatClient>) -> Self {
        Self {
            chat,
            http_client: reqwest::Client::new(),
        }
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, AltTextError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| AltTextError::ImageDownload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AltTextError::ImageDownload(format!(
                "HTTP {}",
                response.status().as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AltTextError::ImageDownload(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

/// Build the German WCAG prompt from record metadata
pub(crate) fn build_alt_text_prompt(record: &Record) -> String {
    format!(
        r#"Du bist ein Spezialist für barrierefreie Alternativtexte (WCAG).
Das folgende Bild stammt von „forschung.stadtgeschichtebasel.ch" und diese Metadaten:

Titel: {title}
Beschreibung: {description}
Thema: {subject}
Zeitraum: {coverage}
Schöpfer: {creator}
Datum: {date}
Teil von: {is_part_of}
Verweise: {relation}
Sprache: {language}

Analysiere das Bild (siehe separate Bildübertragung) zusammen mit den Metadaten.

1. Identifiziere: Bildtyp – *Informativ*, **Komplex (Diagramm/Karte)** oder
   *Bild von Text*.
2. Erstelle:
   • Bei *Informativ*: 1–2 Sätze, keine Wiederholung der Metadaten, Fokus
     auf Relevanz.
   • Bei *Komplex* (Diagramm/Karte): Alt-Text mit Typ + Kernaussage, ggf.
     Langbeschreibung.
   • Bei *Bild von Text*: Text als Alt-Text (bei Kurztext) oder Hinweis +
     exakter OCR-Text.
Allgemein: Keine Formate wie „Bild von…", keine Emojis, Alt-Text auf Deutsch,
maximal 120 Zeichen (informativ/Text), maximal 200 Zeichen (komplex).

Antworte **nur** als JSON wie im Beispiel:
{{
  "objectid": "{objectid}",
  "alt_text": "…",
  "longdesc": "…"
}}"#,
        title = record.text("title"),
        description = record.text("description"),
        subject = record.joined("subject"),
        coverage = record.text("coverage"),
        creator = record.joined("creator"),
        date = record.text("date"),
        is_part_of = record.joined("isPartOf"),
        relation = record.joined("relation"),
        language = record.text("language"),
        objectid = record.text("objectid"),
    )
}

/// Validate the model reply and pull out the alt-text fields
pub(crate) fn parse_alt_text_reply(content: &str) -> Result<AltTextOutput, AltTextError> {
    let value: Value = serde_json::from_str(content.trim())
        .map_err(|_| AltTextError::MalformedReply(content.trim().to_string()))?;

    let obj = value
        .as_object()
        .ok_or_else(|| AltTextError::MalformedReply(content.trim().to_string()))?;

    let alt_text = obj
        .get("alt_text")
        .and_then(Value::as_str)
        .ok_or(AltTextError::MissingAltText)?
        .to_string();

    let objectid = obj
        .get("objectid")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let longdesc = obj
        .get("longdesc")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string);

    Ok(AltTextOutput {
        objectid,
        alt_text,
        longdesc,
    })
}

#[async_trait::async_trait]
impl AltTextProvider for AltTextGenerator {
    async fn generate(&self, record: &Record) -> Result<AltTextOutput, AltTextError> {
        let image_url = record.text("object_thumb");
        if image_url.is_empty() {
            return Err(AltTextError::MissingImage);
        }

        tracing::debug!(url = %image_url, "Downloading image");
        let image_bytes = self.fetch_image(&image_url).await?;
        let image_base64 = BASE64.encode(&image_bytes);

        let prompt = build_alt_text_prompt(record);
        let user_content = json!([
            {"type": "text", "text": prompt},
            {
                "type": "image_url",
                "image_url": {
                    "url": format!("data:image/jpeg;base64,{image_base64}"),
                    "detail": "high",
                },
            },
        ]);

        let params = ChatParams {
            temperature: None,
            max_tokens: None,
            max_completion_tokens: Some(MAX_COMPLETION_TOKENS),
        };

        let content = self
            .chat
            .complete(ALT_TEXT_MODEL, SYSTEM_PROMPT, user_content, &params)
            .await?;

        parse_alt_text_reply(&content)
    }
}
