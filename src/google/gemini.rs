//! Gemini `generateContent` client used by both the proxy and the
//! daily digest.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use http::StatusCode;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::core::{GeminiConfig, GenerationBackend};

/// Response shape from the Gemini API documentation. Every level is
/// optional since the API omits empty fields (e.g. a blocked prompt
/// has no candidates at all).
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenate the text of every part of the first candidate.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Extract the generated text from a raw provider response.
pub fn extract_text(raw: &Value) -> Result<String> {
    let response = GenerateContentResponse::deserialize(raw)
        .context("Unexpected response shape from generation provider")?;
    Ok(response.text())
}

/// Status and body of a `generateContent` call, untouched.
#[derive(Debug)]
pub struct GenerateContentReply {
    pub status: StatusCode,
    pub body: String,
}

/// Anything that can turn a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

pub type BoxedTextGenerator = Arc<dyn TextGenerator + 'static>;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send `payload` as the request body and return whatever the
    /// provider replied with, success or not.
    pub async fn generate_content(&self, payload: &Value) -> Result<GenerateContentReply> {
        tracing::debug!("Calling generateContent with model {}", self.config.model);
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .timeout(self.config.timeout)
            .json(payload)
            .send()
            .await
            .context("Request to generation provider failed")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read generation provider response")?;

        Ok(GenerateContentReply { status, body })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let payload = json!({
            "contents": [{"parts": [{"text": prompt}]}]
        });
        let reply = self.generate_content(&payload).await?;
        if !reply.status.is_success() {
            bail!(
                "Generation provider returned {}: {}",
                reply.status,
                reply.body
            );
        }
        let raw: Value = serde_json::from_str(&reply.body)
            .context("Generation provider returned invalid JSON")?;
        extract_text(&raw)
    }
}

/// Stand-in used when no provider is configured.
#[derive(Debug, Default)]
pub struct UnavailableGenerator;

#[async_trait]
impl TextGenerator for UnavailableGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(anyhow!("Generation provider is not configured"))
    }
}

/// Build the generator for the configured backend.
pub fn text_generator(backend: &GenerationBackend) -> BoxedTextGenerator {
    match backend {
        GenerationBackend::Gemini(config) => Arc::new(GeminiClient::new(config.clone())),
        GenerationBackend::Unavailable => Arc::new(UnavailableGenerator),
    }
}
