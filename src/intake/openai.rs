//! HTTP client for the structured-extraction service.
//!
//! Sends the finished conversation to an OpenAI-compatible chat-completions
//! endpoint with a fixed instruction set and parses the JSON reply into an
//! [`IntakeRecord`].

use crate::defaults;
use crate::error::{IntakeError, Result};
use crate::intake::extractor::IntakeExtractor;
use crate::intake::record::IntakeRecord;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed instruction set for intake classification.
///
/// Encodes the dispatch priority rules and the strict missing-field policy.
const INTAKE_INSTRUCTIONS: &str = r#"You are a service-call intake classifier for a heating/plumbing dispatch desk. You receive the transcript of what a customer said on the phone and produce exactly one JSON object with these fields:

{
  "job_type": string or null,
  "priority": "P1" | "P2" | "P3" | "P4" | null,
  "issue_summary": string or null,
  "estimated_duration_minutes": number or null,
  "customer_constraints": {
    "same_day_preferred": boolean or null,
    "time_window": string or null
  },
  "location": {
    "address": string or null,
    "city": string or null
  },
  "recommended_action": string or null
}

Priority rules:
- P1: emergency — gas smell, active leak, no heat in winter, anything unsafe
- P2: urgent comfort or noise issue (no cooling in heat, loud banging unit)
- P3: standard diagnostic visit (intermittent fault, error code, weak output)
- P4: planned maintenance (tune-up, filter change, seasonal inspection)

Rules:
- NEVER invent information the customer did not state. Use null for anything missing.
- Output ONLY the JSON object, no explanations, no markdown.

The customer's words are provided in <conversation> tags."#;

/// Configuration for the extraction client.
#[derive(Debug, Clone)]
pub struct ChatExtractorConfig {
    /// Endpoint URL.
    pub url: String,
    /// Model name sent with each request.
    pub model: String,
    /// Bearer token for the service.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ChatExtractorConfig {
    /// Creates a config for the default endpoint with the given key.
    pub fn new(api_key: String) -> Self {
        Self {
            url: defaults::EXTRACTION_URL.to_string(),
            model: defaults::EXTRACTION_MODEL.to_string(),
            api_key,
            timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Request body for the chat-completions API.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response from the chat-completions API.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: String,
}

/// Error response body.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Strip a surrounding markdown code fence, if present.
///
/// Some models wrap JSON replies in ```json fences despite instructions.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Extraction client for an OpenAI-compatible chat endpoint.
pub struct ChatExtractor {
    config: ChatExtractorConfig,
    client: Client,
}

impl ChatExtractor {
    /// Creates a new extraction client.
    pub fn new(config: ChatExtractorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IntakeError::Extraction {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl IntakeExtractor for ChatExtractor {
    async fn extract(&self, conversation: &str) -> Result<IntakeRecord> {
        // Tag-wrap the transcript so stray instructions in speech stay data
        let user_content = format!("<conversation>\n{}\n</conversation>", conversation);

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: INTAKE_INSTRUCTIONS.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_content,
                },
            ],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| IntakeError::Extraction {
                message: format!("Request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&error_text) {
                Ok(parsed) => parsed.error.message,
                Err(_) => error_text,
            };
            return Err(IntakeError::ExtractionApi {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await.map_err(|e| IntakeError::Extraction {
            message: format!("Failed to parse response envelope: {}", e),
        })?;

        let content = body
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| IntakeError::ExtractionParse {
                message: "response contained no choices".to_string(),
            })?;

        serde_json::from_str(strip_code_fences(content)).map_err(|e| {
            IntakeError::ExtractionParse {
                message: e.to_string(),
            }
        })
    }

    fn service_name(&self) -> &str {
        &self.config.model
    }
}
