//! Audio capture and transcoding.

#[cfg(feature = "cpal-audio")]
pub mod capture;
pub mod recorder;
pub mod wav;

pub use recorder::{AudioSource, MockAudioSource};
