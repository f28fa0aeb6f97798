//! intakeline - Streaming voice intake for service call lines
//!
//! Listens to a live call, transcribes it window by window, and, once the
//! caller has been quiet long enough, extracts a classified intake record.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod conversation;
pub mod defaults;
pub mod error;
pub mod intake;
pub mod output;
pub mod streaming;
pub mod stt;

// Core traits (source → transcribe → extract)
pub use audio::recorder::AudioSource;
pub use intake::extractor::IntakeExtractor;
pub use stt::transcriber::SpeechToText;

// Pipeline
pub use streaming::pipeline::{IntakePipeline, IntakePipelineConfig};

// Conversation core
pub use conversation::{
    CompletionDebouncer, CompletionPhase, ConversationState, TranscriptClassifier,
};

// Finalization
pub use intake::dispatcher::{FinalizationDispatcher, FinalizationOutcome};
pub use intake::record::{IntakeRecord, Priority};

// Error handling
pub use error::{IntakeError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
