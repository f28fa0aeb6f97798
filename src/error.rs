//! Error types for intakeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntakeError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio capture errors
    #[error("Audio device not found: {device}")]
    AudioDeviceNotFound { device: String },

    #[error("Audio capture failed: {message}")]
    AudioCapture { message: String },

    // Transcoding errors (raw PCM -> WAV)
    #[error("Audio transcode failed: {message}")]
    Transcode { message: String },

    // Transcription service errors
    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    #[error("Transcription service error ({status}): {message}")]
    TranscriptionApi { status: u16, message: String },

    // Structured-extraction service errors
    #[error("Extraction failed: {message}")]
    Extraction { message: String },

    #[error("Extraction service error ({status}): {message}")]
    ExtractionApi { status: u16, message: String },

    #[error("Failed to parse extraction response: {message}")]
    ExtractionParse { message: String },

    #[error("API key not set: export {env} or configure services.api_key_env")]
    MissingApiKey { env: String },

    #[error("Conversation already finalized")]
    AlreadyFinalized,

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, IntakeError>;
