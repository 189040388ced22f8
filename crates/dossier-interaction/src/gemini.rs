//! GeminiAgent - direct REST API client for the Gemini generateContent
//! endpoint.
//!
//! The API key is read from the `GEMINI_API_KEY` environment variable.

use async_trait::async_trait;
use dossier_core::{DossierError, PersonaDraft, PersonaRecord, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::agent::{SynthesisAgent, SynthesisRequest};
use crate::prompt;

const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Synthesis agent that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiAgent {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiAgent {
    /// Creates a new agent with the provided API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Loads the API key from `GEMINI_API_KEY`.
    pub fn try_from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            DossierError::validation(format!("{API_KEY_ENV} environment variable is not set"))
        })?;
        Ok(Self::new(api_key))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sends one generateContent call and returns the concatenated candidate
    /// text (empty when the response carries no text part). Errors are plain
    /// messages; callers classify them as synthesis or expansion failures.
    async fn generate_text(
        &self,
        prompt: String,
        config: GenerationConfig,
    ) -> std::result::Result<String, String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: config,
        };

        let url = format!(
            "{BASE_URL}/{model}:generateContent?key={api_key}",
            model = self.model,
            api_key = self.api_key
        );
        tracing::debug!(model = %self.model, "sending generateContent request");

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|err| format!("Gemini API request failed: {err}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read Gemini error body".to_string());
            return Err(extract_error_message(status.as_u16(), &body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| format!("failed to parse Gemini response: {err}"))?;

        Ok(extract_text(parsed))
    }
}

#[async_trait]
impl SynthesisAgent for GeminiAgent {
    async fn synthesize_persona(&self, request: &SynthesisRequest) -> Result<PersonaDraft> {
        let config = GenerationConfig {
            temperature: 1.0,
            top_p: Some(0.95),
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(prompt::synthesis_response_schema()),
        };

        let text = self
            .generate_text(prompt::synthesis_prompt(request), config)
            .await
            .map_err(DossierError::synthesis)?;

        serde_json::from_str(&text)
            .map_err(|err| DossierError::synthesis(format!("schema violation: {err}")))
    }

    async fn expand_biography(&self, record: &PersonaRecord) -> Result<String> {
        let config = GenerationConfig {
            temperature: 0.9,
            top_p: None,
            response_mime_type: None,
            response_schema: None,
        };

        self.generate_text(prompt::expansion_prompt(record), config)
            .await
            .map_err(DossierError::expansion)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Option<Vec<PartResponse>>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .map(|parts| {
            parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

fn extract_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                format!("HTTP {status}: {msg}")
            } else {
                format!("HTTP {status} {status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| format!("HTTP {status}: {body}"))
}
