//! Capture feed for continuous audio ingest.
//!
//! Wraps an audio source and provides:
//! - Continuous reading on a dedicated thread
//! - A bounded channel of raw byte chunks into the async pipeline
//! - A stop handle decoupled from transcription timing

use crate::audio::recorder::AudioSource;
use crate::defaults;
use crate::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;

/// Configuration for the capture feed.
#[derive(Debug, Clone)]
pub struct CaptureFeedConfig {
    /// Channel buffer size (number of byte chunks to buffer).
    pub channel_buffer_size: usize,
    /// Polling interval when no bytes are available (ms).
    pub poll_interval_ms: u64,
}

impl Default for CaptureFeedConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: defaults::CAPTURE_BUFFER_SIZE,
            poll_interval_ms: 10,
        }
    }
}

/// Capture feed that continuously reads audio bytes and forwards them.
pub struct CaptureFeed<A: AudioSource> {
    audio_source: A,
    config: CaptureFeedConfig,
    running: Arc<AtomicBool>,
}

impl<A: AudioSource + 'static> CaptureFeed<A> {
    /// Creates a new capture feed wrapping the given audio source.
    pub fn new(audio_source: A) -> Self {
        Self::with_config(audio_source, CaptureFeedConfig::default())
    }

    /// Creates a new capture feed with custom configuration.
    pub fn with_config(audio_source: A, config: CaptureFeedConfig) -> Self {
        Self {
            audio_source,
            config,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts continuous capture in a background thread.
    ///
    /// Returns a receiver for byte chunks and a handle to stop the feed.
    /// The capture runs until the handle is stopped or the receiver is
    /// dropped.
    pub fn start(mut self) -> Result<(mpsc::Receiver<Vec<u8>>, CaptureFeedHandle)> {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let running = self.running.clone();

        self.audio_source.start()?;
        running.store(true, Ordering::SeqCst);

        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);

        thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                match self.audio_source.read_chunk() {
                    Ok(chunk) if !chunk.is_empty() => {
                        // Stop if receiver dropped
                        if tx.blocking_send(chunk).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {
                        // No bytes yet, wait briefly
                        thread::sleep(poll_interval);
                    }
                    Err(e) => {
                        eprintln!("Audio capture error: {}", e);
                        break;
                    }
                }
            }

            let _ = self.audio_source.stop();
        });

        let handle = CaptureFeedHandle {
            running: self.running.clone(),
        };

        Ok((rx, handle))
    }
}

/// Handle to control a running capture feed.
#[derive(Clone)]
pub struct CaptureFeedHandle {
    running: Arc<AtomicBool>,
}

impl CaptureFeedHandle {
    /// Stops the capture feed.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Returns true if the feed is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
