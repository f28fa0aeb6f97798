//! In-memory raw-PCM to WAV transcoding.
//!
//! The transcription service wants a decodable audio artifact, not bare
//! PCM. Encoding happens entirely in memory; no temp files.

use crate::error::{IntakeError, Result};
use std::io::Cursor;

/// Encode raw signed 16-bit little-endian mono PCM bytes as a WAV file.
///
/// # Arguments
/// * `pcm` - Raw PCM bytes; length must be a multiple of 2
/// * `sample_rate` - Sample rate of the PCM data in Hz
///
/// # Returns
/// The complete WAV file as bytes, or a transcode error.
pub fn encode_wav(pcm: &[u8], sample_rate: u32) -> Result<Vec<u8>> {
    if pcm.len() % 2 != 0 {
        return Err(IntakeError::Transcode {
            message: format!("PCM byte count {} is not sample-aligned", pcm.len()),
        });
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| IntakeError::Transcode {
                message: format!("Failed to create WAV writer: {}", e),
            })?;

        for sample in pcm.chunks_exact(2) {
            writer
                .write_sample(i16::from_le_bytes([sample[0], sample[1]]))
                .map_err(|e| IntakeError::Transcode {
                    message: format!("Failed to write WAV samples: {}", e),
                })?;
        }

        writer.finalize().map_err(|e| IntakeError::Transcode {
            message: format!("Failed to finalize WAV: {}", e),
        })?;
    }

    Ok(cursor.into_inner())
}
