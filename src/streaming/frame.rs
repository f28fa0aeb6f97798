//! Frame types for the streaming pipeline.
//!
//! Defines the data structures that flow between pipeline stations.

use std::time::Instant;

/// One fixed-duration window of raw audio, ready for transcription.
#[derive(Debug, Clone)]
pub struct AudioWindow {
    /// Sequence number for ordering windows.
    pub sequence: u64,
    /// Timestamp when the window was completed.
    pub timestamp: Instant,
    /// Raw PCM bytes (signed 16-bit little-endian mono).
    pub bytes: Vec<u8>,
}

impl AudioWindow {
    /// Creates a new audio window.
    pub fn new(sequence: u64, bytes: Vec<u8>) -> Self {
        Self {
            sequence,
            timestamp: Instant::now(),
            bytes,
        }
    }

    /// Returns the duration of this window in milliseconds.
    pub fn duration_ms(&self, sample_rate: u32, bytes_per_sample: u32) -> u32 {
        let samples = self.bytes.len() as u64 / bytes_per_sample as u64;
        ((samples * 1000) / sample_rate as u64) as u32
    }
}

/// Transcription of one audio window.
///
/// Immutable once created; the text may be empty when the service heard
/// nothing in the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSegment {
    /// Sequence of the window this text came from.
    pub sequence: u64,
    /// Transcribed text.
    pub text: String,
}

impl TranscriptSegment {
    /// Creates a new transcript segment.
    pub fn new(sequence: u64, text: impl Into<String>) -> Self {
        Self {
            sequence,
            text: text.into(),
        }
    }

    /// Returns true if the text is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_window_creation() {
        let bytes = vec![1u8, 2, 3, 4];
        let window = AudioWindow::new(42, bytes.clone());

        assert_eq!(window.sequence, 42);
        assert_eq!(window.bytes, bytes);
    }

    #[test]
    fn test_audio_window_duration() {
        // 1 second at 16kHz, 2 bytes/sample
        let window = AudioWindow::new(0, vec![0u8; 32_000]);
        assert_eq!(window.duration_ms(16000, 2), 1000);
    }

    #[test]
    fn test_audio_window_duration_full_default_window() {
        let window = AudioWindow::new(0, vec![0u8; 160_000]);
        assert_eq!(window.duration_ms(16000, 2), 5000);
    }

    #[test]
    fn test_transcript_segment_blank() {
        assert!(TranscriptSegment::new(0, "").is_blank());
        assert!(TranscriptSegment::new(0, "   ").is_blank());
        assert!(!TranscriptSegment::new(0, "hello").is_blank());
    }
}
