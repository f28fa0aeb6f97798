//! HTTP client for the remote transcription service.
//!
//! Talks to an OpenAI-compatible `audio/transcriptions` endpoint: one
//! multipart request per audio window, plain JSON response.

use crate::defaults;
use crate::error::{IntakeError, Result};
use crate::stt::transcriber::SpeechToText;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Configuration for the transcription client.
#[derive(Debug, Clone)]
pub struct WhisperApiConfig {
    /// Endpoint URL.
    pub url: String,
    /// Model name sent with each request.
    pub model: String,
    /// Bearer token for the service.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl WhisperApiConfig {
    /// Creates a config for the default endpoint with the given key.
    pub fn new(api_key: String) -> Self {
        Self {
            url: defaults::TRANSCRIPTION_URL.to_string(),
            model: defaults::TRANSCRIPTION_MODEL.to_string(),
            api_key,
            timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Successful response body.
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
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

/// Transcription client for an OpenAI-compatible endpoint.
pub struct WhisperApiClient {
    config: WhisperApiConfig,
    client: Client,
}

impl WhisperApiClient {
    /// Creates a new client with a connection pool sized for one stream.
    pub fn new(config: WhisperApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IntakeError::Transcription {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl SpeechToText for WhisperApiClient {
    async fn transcribe(&self, wav: Vec<u8>) -> Result<String> {
        let file_part = Part::bytes(wav)
            .file_name("window.wav")
            .mime_str("audio/wav")
            .map_err(|e| IntakeError::Transcription {
                message: format!("Failed to build multipart body: {}", e),
            })?;

        let form = Form::new()
            .part("file", file_part)
            .text("model", self.config.model.clone())
            .text("response_format", "json")
            .text("temperature", "0");

        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| IntakeError::Transcription {
                message: format!("Request failed: {}", e),
            })?;

        let status = response.status();
        if status.is_success() {
            let body: TranscriptionResponse =
                response
                    .json()
                    .await
                    .map_err(|e| IntakeError::Transcription {
                        message: format!("Failed to parse response: {}", e),
                    })?;
            Ok(body.text)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            let message =
                match serde_json::from_str::<ApiErrorResponse>(&error_text) {
                    Ok(parsed) => parsed.error.message,
                    Err(_) => error_text,
                };
            Err(IntakeError::TranscriptionApi {
                status: status.as_u16(),
                message,
            })
        }
    }

    fn service_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = WhisperApiConfig::new("sk-test".to_string());
        assert_eq!(config.url, defaults::TRANSCRIPTION_URL);
        assert_eq!(config.model, "whisper-1");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_client_creation() {
        let client = WhisperApiClient::new(WhisperApiConfig::new("sk-test".to_string()));
        assert!(client.is_ok());
        assert_eq!(client.unwrap().service_name(), "whisper-1");
    }

    #[test]
    fn test_error_body_parsing() {
        let body = r#"{"error":{"message":"Invalid API key","type":"auth"}}"#;
        let parsed: ApiErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "Invalid API key");
    }

    #[test]
    fn test_success_body_parsing() {
        let body = r#"{"text":"I have no heat"}"#;
        let parsed: TranscriptionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.text, "I have no heat");
    }
}
