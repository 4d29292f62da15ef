//! Ollama client — the single entry point for local language-model calls.
//!
//! Talks to the `/api/generate` endpoint of a locally hosted Ollama server
//! and turns the model's JSON reply into a raw extraction payload. The
//! payload is whatever the model produced; the normalizer owns the schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

pub mod prompts;

// Large documents on CPU-only hosts are slow; mirror a generous timeout.
const GENERATE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum OllamaError {
    #[error("cannot connect to Ollama at {url}; make sure the server is running")]
    Unreachable { url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Ollama API failed (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("no JSON object found in model reply")]
    NoJson,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    // Asks Ollama to constrain decoding to valid JSON.
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(http: reqwest::Client, base_url: String, model: String) -> Self {
        Self {
            http,
            base_url,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends a prompt to `/api/generate`, requesting JSON-formatted output,
    /// and returns the raw reply text.
    pub async fn generate(&self, prompt: &str) -> Result<String, OllamaError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
        };

        info!("Calling Ollama with model: {}", self.model);
        let response = self
            .http
            .post(&url)
            .json(&request)
            .timeout(GENERATE_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    OllamaError::Unreachable {
                        url: self.base_url.clone(),
                    }
                } else {
                    OllamaError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OllamaError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let reply: GenerateResponse = response.json().await?;
        debug!("Ollama reply: {} chars", reply.response.len());
        Ok(reply.response)
    }

    /// Prompts the model with the document text and parses its reply into a
    /// raw extraction payload.
    pub async fn parse_cv(&self, pdf_text: &str) -> Result<Value, OllamaError> {
        let prompt = prompts::build_parse_prompt(pdf_text);
        let reply = self.generate(&prompt).await?;

        let json_str = extract_json_slice(&reply).ok_or(OllamaError::NoJson)?;
        let payload: Value = serde_json::from_str(json_str)?;

        info!("CV parsed successfully via Ollama");
        Ok(payload)
    }
}

/// Extracts the first `{` … last `}` slice from the reply. Models sometimes
/// add chatter around the JSON even when asked not to.
fn extract_json_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end >= start).then(|| &text[start..=end])
}
