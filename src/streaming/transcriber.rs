//! Transcriber station.
//!
//! Encodes each audio window as WAV and sends it to the speech-to-text
//! service. Windows are awaited one at a time so transcripts leave the
//! station in capture order; upstream channel buffering keeps byte
//! arrival from blocking on an in-flight request.
//!
//! A failed window is reported and discarded: it contributes nothing to
//! the conversation and later windows proceed normally.

use crate::audio::wav;
use crate::error::Result;
use crate::streaming::frame::{AudioWindow, TranscriptSegment};
use crate::streaming::report::{ErrorReporter, LogReporter, StationError};
use crate::stt::transcriber::SpeechToText;
use std::sync::Arc;
use tokio::sync::mpsc;

const STATION_NAME: &str = "transcriber";

/// Transcriber station that processes windows in order.
pub struct TranscriberStation<S: SpeechToText> {
    stt: Arc<S>,
    sample_rate: u32,
    reporter: Arc<dyn ErrorReporter>,
}

impl<S: SpeechToText + 'static> TranscriberStation<S> {
    /// Creates a new transcriber station wrapping the given service.
    pub fn new(stt: S, sample_rate: u32) -> Self {
        Self {
            stt: Arc::new(stt),
            sample_rate,
            reporter: Arc::new(LogReporter),
        }
    }

    /// Replaces the error reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Transcribes a single window: WAV encode, then the remote call.
    pub async fn transcribe_window(&self, window: AudioWindow) -> Result<TranscriptSegment> {
        let sequence = window.sequence;
        let wav_bytes = wav::encode_wav(&window.bytes, self.sample_rate)?;
        let text = self.stt.transcribe(wav_bytes).await?;
        Ok(TranscriptSegment::new(sequence, text))
    }

    /// Runs the transcriber station.
    ///
    /// Receives windows, transcribes them sequentially, and sends the
    /// resulting segments downstream in the same order.
    pub async fn run(
        self,
        mut input: mpsc::Receiver<AudioWindow>,
        output: mpsc::Sender<TranscriptSegment>,
    ) {
        while let Some(window) = input.recv().await {
            let sequence = window.sequence;
            match self.transcribe_window(window).await {
                Ok(segment) => {
                    if output.send(segment).await.is_err() {
                        return;
                    }
                }
                Err(e) => {
                    self.reporter.report(
                        STATION_NAME,
                        &StationError::Recoverable(format!("window {}: {}", sequence, e)),
                    );
                }
            }
        }
    }
}
