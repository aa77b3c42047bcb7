//! Gemini `generateContent` client.
//!
//! POST {api_base}/models/{model}:generateContent with the API key in the
//! `x-goog-api-key` header and `responseMimeType: application/json`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{Generator, GeneratorError};
use crate::config::ModelConfig;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

pub struct GeminiGenerator {
    client: Client,
    endpoint: String,
    api_key: String,
    temperature: f32,
    timeout: Option<Duration>,
}

impl GeminiGenerator {
    /// Create a generator reading the API key from `model.api_key_env`.
    pub fn from_env(model: &ModelConfig) -> Result<Self, GeneratorError> {
        let api_key = std::env::var(&model.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GeneratorError::MissingApiKey(model.api_key_env.clone()))?;
        Ok(Self::with_api_key(model, api_key))
    }

    pub fn with_api_key(model: &ModelConfig, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!(
                "{}/models/{}:generateContent",
                model.api_base.trim_end_matches('/'),
                model.name
            ),
            api_key: api_key.into(),
            temperature: model.temperature,
            timeout: model.timeout(),
        }
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": self.temperature,
                "responseMimeType": "application/json"
            }
        })
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<Option<Value>, GeneratorError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(prompt));
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(map_transport)?;
        let status = response.status();
        let body = response.text().await.map_err(map_transport)?;

        if !status.is_success() {
            return Err(GeneratorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = match serde_json::from_str(&body) {
            Ok(r) => r,
            Err(e) => {
                warn!("Unreadable generateContent response: {e}");
                return Ok(None);
            }
        };
        Ok(extract_output(&parsed))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

fn map_transport(e: reqwest::Error) -> GeneratorError {
    if e.is_timeout() {
        GeneratorError::Timeout
    } else {
        GeneratorError::Transport(e)
    }
}

/// Pull the JSON answer out of the first candidate.
fn extract_output(response: &GenerateResponse) -> Option<Value> {
    let content = response.candidates.first()?.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();
    let text = strip_code_fence(text.trim());
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str(text) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!("Model text is not JSON: {e}");
            None
        }
    }
}

/// Models sometimes wrap JSON in a ```json fence despite the MIME type.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
