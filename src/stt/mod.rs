//! Speech-to-text collaborator.

pub mod transcriber;
pub mod whisper_api;

pub use transcriber::{MockSpeechToText, SpeechToText};
pub use whisper_api::{WhisperApiClient, WhisperApiConfig};
