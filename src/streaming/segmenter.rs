//! Segmenter station for the streaming pipeline.
//!
//! Accumulates raw audio bytes and emits a window once the exact byte
//! threshold for the configured duration is reached. Bytes beyond the
//! threshold stay in the accumulator for the next window; nothing is
//! dropped and no partial window is ever emitted.

use crate::defaults;
use crate::streaming::frame::AudioWindow;
use tokio::sync::mpsc;

/// Configuration for the segmenter.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Sample rate of the incoming PCM stream.
    pub sample_rate: u32,
    /// Bytes per sample (2 for signed 16-bit).
    pub bytes_per_sample: u32,
    /// Window duration in seconds.
    pub window_seconds: u32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
            bytes_per_sample: defaults::BYTES_PER_SAMPLE,
            window_seconds: defaults::WINDOW_SECONDS,
        }
    }
}

impl SegmenterConfig {
    /// Exact size of one window in bytes.
    pub fn window_bytes(&self) -> usize {
        defaults::window_bytes(self.sample_rate, self.bytes_per_sample, self.window_seconds)
    }
}

/// Segmenter that accumulates bytes and emits fixed-size windows.
pub struct SegmenterStation {
    config: SegmenterConfig,
    /// Bytes not yet assigned to a window.
    pending: Vec<u8>,
    /// Next window ID to emit.
    next_sequence: u64,
}

impl SegmenterStation {
    /// Creates a new segmenter with default configuration.
    pub fn new() -> Self {
        Self::with_config(SegmenterConfig::default())
    }

    /// Creates a new segmenter with custom configuration.
    pub fn with_config(config: SegmenterConfig) -> Self {
        Self {
            config,
            pending: Vec::new(),
            next_sequence: 0,
        }
    }

    /// Number of bytes currently held back for the next window.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Feeds incoming bytes into the accumulator.
    ///
    /// Returns a window when the accumulator reached the byte threshold.
    /// The window holds exactly `window_bytes` bytes; any excess stays
    /// pending. When one feed crosses the threshold more than once, call
    /// [`take_ready`](Self::take_ready) until it returns `None`.
    pub fn feed(&mut self, bytes: &[u8]) -> Option<AudioWindow> {
        self.pending.extend_from_slice(bytes);
        self.take_ready()
    }

    /// Extracts the next complete window from the accumulator, if any.
    pub fn take_ready(&mut self) -> Option<AudioWindow> {
        let window_bytes = self.config.window_bytes();
        if self.pending.len() < window_bytes {
            return None;
        }

        let rest = self.pending.split_off(window_bytes);
        let bytes = std::mem::replace(&mut self.pending, rest);

        let window = AudioWindow::new(self.next_sequence, bytes);
        self.next_sequence += 1;
        Some(window)
    }

    /// Runs the segmenter as a station.
    ///
    /// # Arguments
    /// * `input` - Receiver for raw byte chunks from the capture feed
    /// * `output` - Sender for completed audio windows
    pub async fn run(mut self, mut input: mpsc::Receiver<Vec<u8>>, output: mpsc::Sender<AudioWindow>) {
        while let Some(chunk) = input.recv().await {
            let mut next = self.feed(&chunk);
            while let Some(window) = next {
                if output.send(window).await.is_err() {
                    return;
                }
                next = self.take_ready();
            }
        }
    }
}

impl Default for SegmenterStation {
    fn default() -> Self {
        Self::new()
    }
}
