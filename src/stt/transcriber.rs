use crate::error::{IntakeError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Trait for speech-to-text transcription services.
///
/// This trait allows swapping implementations (remote API vs mock).
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe a WAV-encoded audio artifact to text.
    ///
    /// # Arguments
    /// * `wav` - Complete WAV file bytes
    ///
    /// # Returns
    /// Transcribed text (possibly empty) or error
    async fn transcribe(&self, wav: Vec<u8>) -> Result<String>;

    /// Name of the backing service/model, for diagnostics.
    fn service_name(&self) -> &str;
}

/// Implement SpeechToText for Arc<T> to allow sharing across stations.
#[async_trait]
impl<T: SpeechToText> SpeechToText for Arc<T> {
    async fn transcribe(&self, wav: Vec<u8>) -> Result<String> {
        (**self).transcribe(wav).await
    }

    fn service_name(&self) -> &str {
        (**self).service_name()
    }
}

/// One scripted reply from the mock service.
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Failure(String),
}

/// Mock speech-to-text service for testing.
///
/// Replays a script of replies in order; once the script is exhausted it
/// falls back to a fixed response (or failure).
#[derive(Debug)]
pub struct MockSpeechToText {
    name: String,
    script: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
}

impl MockSpeechToText {
    /// Create a new mock service with default settings.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(VecDeque::new()),
            fallback: MockReply::Text("mock transcription".to_string()),
        }
    }

    /// Configure the fallback response used once the script is exhausted.
    pub fn with_response(mut self, response: &str) -> Self {
        self.fallback = MockReply::Text(response.to_string());
        self
    }

    /// Configure the mock to fail once the script is exhausted.
    pub fn with_failure(mut self) -> Self {
        self.fallback = MockReply::Failure("mock transcription failure".to_string());
        self
    }

    /// Append a successful reply to the script.
    pub fn then_text(self, text: &str) -> Self {
        self.push(MockReply::Text(text.to_string()));
        self
    }

    /// Append a failing reply to the script.
    pub fn then_failure(self, message: &str) -> Self {
        self.push(MockReply::Failure(message.to_string()));
        self
    }

    fn push(&self, reply: MockReply) {
        self.script
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push_back(reply);
    }

    fn next_reply(&self) -> MockReply {
        self.script
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl SpeechToText for MockSpeechToText {
    async fn transcribe(&self, _wav: Vec<u8>) -> Result<String> {
        match self.next_reply() {
            MockReply::Text(text) => Ok(text),
            MockReply::Failure(message) => Err(IntakeError::Transcription { message }),
        }
    }

    fn service_name(&self) -> &str {
        &self.name
    }
}
