//! Default configuration constants for intakeline.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

/// Default audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition and provides a good balance
/// between quality and computational efficiency for voice applications.
pub const SAMPLE_RATE: u32 = 16000;

/// Bytes per sample for signed 16-bit PCM.
pub const BYTES_PER_SAMPLE: u32 = 2;

/// Default window duration in seconds.
///
/// Each captured window is transcribed as one unit. Five seconds keeps
/// per-request latency low while giving the transcription service enough
/// context for coherent text.
pub const WINDOW_SECONDS: u32 = 5;

/// Default number of consecutive non-meaningful segments before the
/// completion debouncer arms.
pub const SILENCE_SEGMENTS: u32 = 3;

/// Default grace delay in milliseconds between arming and finalization.
///
/// Any transcript arriving within this delay cancels the pending
/// finalization and the debounce window starts over.
pub const FINALIZE_DELAY_MS: u64 = 4000;

/// Maximum normalized length (in characters) still treated as filler.
///
/// Transcripts this short carry no intake-relevant content even when they
/// are not in the filler set ("hm", "so", "and").
pub const MAX_FILLER_CHARS: usize = 3;

/// Default transcription model name for the speech-to-text service.
pub const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Default model name for the structured-extraction service.
pub const EXTRACTION_MODEL: &str = "gpt-4o-mini";

/// Default transcription service endpoint.
pub const TRANSCRIPTION_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Default structured-extraction service endpoint.
pub const EXTRACTION_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Environment variable holding the API key for both services.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default HTTP request timeout in seconds for both services.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Default channel buffer size between pipeline stations.
pub const CHANNEL_BUFFER_SIZE: usize = 64;

/// Default capture-thread channel buffer (byte chunks).
pub const CAPTURE_BUFFER_SIZE: usize = 1024;

/// Returns the exact window size in bytes for the given audio parameters.
pub fn window_bytes(sample_rate: u32, bytes_per_sample: u32, window_seconds: u32) -> usize {
    (sample_rate * bytes_per_sample * window_seconds) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_bytes_default_parameters() {
        // 16000 Hz * 2 bytes * 5 s = 160000 bytes per window
        assert_eq!(
            window_bytes(SAMPLE_RATE, BYTES_PER_SAMPLE, WINDOW_SECONDS),
            160_000
        );
    }

    #[test]
    fn window_bytes_one_second_window() {
        assert_eq!(window_bytes(8000, 2, 1), 16_000);
    }
}
