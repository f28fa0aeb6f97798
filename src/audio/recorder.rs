use crate::error::{IntakeError, Result};

/// Trait for audio source devices.
///
/// This trait allows swapping implementations (real audio device vs mock).
/// Sources emit raw PCM bytes (signed 16-bit little-endian mono); the
/// segmenter downstream decides window boundaries, so chunk sizes here are
/// arbitrary.
pub trait AudioSource: Send {
    /// Start capturing audio from the source.
    fn start(&mut self) -> Result<()>;

    /// Stop capturing audio from the source.
    fn stop(&mut self) -> Result<()>;

    /// Read the next chunk of raw PCM bytes from the source.
    ///
    /// An empty chunk means no data is available right now; it does not
    /// signal end of stream.
    fn read_chunk(&mut self) -> Result<Vec<u8>>;
}

/// Mock audio source for testing.
///
/// Plays back a fixed byte sequence in chunks, then returns empty chunks.
#[derive(Debug, Clone)]
pub struct MockAudioSource {
    is_started: bool,
    bytes: Vec<u8>,
    chunk_size: usize,
    position: usize,
    should_fail_start: bool,
    should_fail_read: bool,
    error_message: String,
}

impl MockAudioSource {
    /// Create a new mock audio source with default settings.
    pub fn new() -> Self {
        Self {
            is_started: false,
            bytes: vec![0u8; 3200],
            chunk_size: 3200,
            position: 0,
            should_fail_start: false,
            should_fail_read: false,
            error_message: "mock audio error".to_string(),
        }
    }

    /// Configure the mock to play back specific bytes.
    pub fn with_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.bytes = bytes;
        self
    }

    /// Configure the chunk size returned by each read.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Configure the mock to fail on start.
    pub fn with_start_failure(mut self) -> Self {
        self.should_fail_start = true;
        self
    }

    /// Configure the mock to fail on read.
    pub fn with_read_failure(mut self) -> Self {
        self.should_fail_read = true;
        self
    }

    /// Check if the audio source is started.
    pub fn is_started(&self) -> bool {
        self.is_started
    }
}

impl Default for MockAudioSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSource for MockAudioSource {
    fn start(&mut self) -> Result<()> {
        if self.should_fail_start {
            Err(IntakeError::AudioCapture {
                message: self.error_message.clone(),
            })
        } else {
            self.is_started = true;
            Ok(())
        }
    }

    fn stop(&mut self) -> Result<()> {
        self.is_started = false;
        Ok(())
    }

    fn read_chunk(&mut self) -> Result<Vec<u8>> {
        if self.should_fail_read {
            return Err(IntakeError::AudioCapture {
                message: self.error_message.clone(),
            });
        }
        if self.position >= self.bytes.len() {
            return Ok(Vec::new());
        }
        let end = std::cmp::min(self.position + self.chunk_size, self.bytes.len());
        let chunk = self.bytes[self.position..end].to_vec();
        self.position = end;
        Ok(chunk)
    }
}
