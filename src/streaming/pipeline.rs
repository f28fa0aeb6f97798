//! Streaming pipeline orchestrator.
//!
//! Connects all stations together and manages the complete flow:
//! Capture Feed → Segmenter → Transcriber → Conversation → Outcome

use crate::audio::recorder::AudioSource;
use crate::config::Config;
use crate::conversation::classifier::{ClassifierConfig, TranscriptClassifier};
use crate::conversation::debouncer::{CompletionDebouncer, DebounceConfig};
use crate::conversation::station::ConversationStation;
use crate::defaults;
use crate::error::{IntakeError, Result};
use crate::intake::dispatcher::{FinalizationDispatcher, FinalizationOutcome};
use crate::intake::extractor::IntakeExtractor;
use crate::streaming::feed::{CaptureFeed, CaptureFeedConfig};
use crate::streaming::frame::{AudioWindow, TranscriptSegment};
use crate::streaming::segmenter::{SegmenterConfig, SegmenterStation};
use crate::streaming::transcriber::TranscriberStation;
use crate::stt::transcriber::SpeechToText;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Configuration for the intake pipeline.
#[derive(Debug, Clone)]
pub struct IntakePipelineConfig {
    /// Capture feed configuration.
    pub capture: CaptureFeedConfig,
    /// Segmenter configuration.
    pub segmenter: SegmenterConfig,
    /// Classifier configuration.
    pub classifier: ClassifierConfig,
    /// Completion detection configuration.
    pub debounce: DebounceConfig,
    /// Channel buffer sizes between stations.
    pub channel_buffer_size: usize,
    /// Echo transcripts and decisions to stderr.
    pub echo: bool,
}

impl Default for IntakePipelineConfig {
    fn default() -> Self {
        Self {
            capture: CaptureFeedConfig::default(),
            segmenter: SegmenterConfig::default(),
            classifier: ClassifierConfig::default(),
            debounce: DebounceConfig::default(),
            channel_buffer_size: defaults::CHANNEL_BUFFER_SIZE,
            echo: false,
        }
    }
}

impl IntakePipelineConfig {
    /// Creates a config with custom window duration.
    pub fn with_window_seconds(mut self, seconds: u32) -> Self {
        self.segmenter.window_seconds = seconds;
        self
    }

    /// Enables transcript echo (for verbose mode).
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Creates configuration from app config.
    pub fn from_config(config: &Config) -> Self {
        let mut pipeline_config = Self::default();

        pipeline_config.segmenter.sample_rate = config.audio.sample_rate;
        pipeline_config.segmenter.bytes_per_sample = config.audio.bytes_per_sample;
        pipeline_config.segmenter.window_seconds = config.audio.window_seconds;

        pipeline_config.classifier.max_filler_chars = config.completion.max_filler_chars;
        pipeline_config.classifier.extra_fillers = config.completion.extra_fillers.clone();

        pipeline_config.debounce.silence_segments = config.completion.silence_segments;
        pipeline_config.debounce.finalize_delay =
            Duration::from_millis(config.completion.finalize_delay_ms);

        pipeline_config
    }
}

/// Intake pipeline that orchestrates all stations.
pub struct IntakePipeline {
    config: IntakePipelineConfig,
}

impl IntakePipeline {
    /// Creates a new pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(IntakePipelineConfig::default())
    }

    /// Creates a new pipeline with custom configuration.
    pub fn with_config(config: IntakePipelineConfig) -> Self {
        Self { config }
    }

    /// Runs the pipeline until the conversation is finalized.
    ///
    /// Blocks until the completion debouncer declares the caller done and
    /// the extraction attempt finishes, then stops capture and drains the
    /// stations.
    ///
    /// # Arguments
    /// * `audio_source` - Audio source for capturing raw PCM bytes
    /// * `stt` - Speech-to-text service for each window
    /// * `extractor` - Structured-extraction service for the finalization
    ///
    /// # Returns
    /// The finalization outcome (record or reported failure)
    pub async fn run<A, S>(
        &self,
        audio_source: A,
        stt: S,
        extractor: Arc<dyn IntakeExtractor>,
    ) -> Result<FinalizationOutcome>
    where
        A: AudioSource + 'static,
        S: SpeechToText + 'static,
    {
        // Create channels between stations
        let (window_tx, window_rx) = mpsc::channel::<AudioWindow>(self.config.channel_buffer_size);
        let (segment_tx, segment_rx) =
            mpsc::channel::<TranscriptSegment>(self.config.channel_buffer_size);
        let (outcome_tx, mut outcome_rx) = mpsc::channel::<FinalizationOutcome>(1);

        // Start the capture feed (returns receiver and stop handle)
        let feed = CaptureFeed::with_config(audio_source, self.config.capture.clone());
        let (bytes_rx, feed_handle) = feed.start()?;

        // Create stations
        let segmenter = SegmenterStation::with_config(self.config.segmenter.clone());
        let transcriber = TranscriberStation::new(stt, self.config.segmenter.sample_rate);
        let conversation = ConversationStation::new(
            TranscriptClassifier::with_config(self.config.classifier.clone()),
            CompletionDebouncer::with_config(self.config.debounce.clone()),
            FinalizationDispatcher::new(extractor),
        )
        .with_echo(self.config.echo);

        // Spawn station tasks
        let segmenter_task = tokio::spawn(async move {
            segmenter.run(bytes_rx, window_tx).await;
        });

        let transcriber_task = tokio::spawn(async move {
            transcriber.run(window_rx, segment_tx).await;
        });

        let conversation_task = tokio::spawn(async move {
            conversation.run(segment_rx, outcome_tx).await;
        });

        // Wait for the finalization outcome
        let outcome = outcome_rx.recv().await;

        // Clean up: stop capture, let the stations drain
        feed_handle.stop();
        let _ = tokio::join!(segmenter_task, transcriber_task, conversation_task);

        outcome.ok_or_else(|| IntakeError::Other(
            "Pipeline completed without reaching a finalization decision".to_string(),
        ))
    }
}

impl Default for IntakePipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_config_default() {
        let config = IntakePipelineConfig::default();
        assert_eq!(config.channel_buffer_size, defaults::CHANNEL_BUFFER_SIZE);
        assert!(!config.echo);
        assert_eq!(config.segmenter.window_seconds, 5);
    }

    #[test]
    fn test_pipeline_config_with_window_seconds() {
        let config = IntakePipelineConfig::default().with_window_seconds(2);
        assert_eq!(config.segmenter.window_seconds, 2);
    }

    #[test]
    fn test_pipeline_config_from_app_config() {
        let mut app_config = Config::default();
        app_config.audio.window_seconds = 3;
        app_config.completion.silence_segments = 5;
        app_config.completion.finalize_delay_ms = 1000;
        app_config.completion.extra_fillers = vec!["no worries".to_string()];

        let config = IntakePipelineConfig::from_config(&app_config);
        assert_eq!(config.segmenter.window_seconds, 3);
        assert_eq!(config.debounce.silence_segments, 5);
        assert_eq!(config.debounce.finalize_delay, Duration::from_millis(1000));
        assert_eq!(config.classifier.extra_fillers, vec!["no worries"]);
    }

    #[test]
    fn test_pipeline_creation() {
        let _pipeline = IntakePipeline::new();
    }

    // End-to-end runs with mock collaborators live in tests/intake_flow.rs
}
