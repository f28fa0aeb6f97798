//! Streaming pipeline for live call intake.
//!
//! Implements a multi-station pipeline architecture:
//! ```text
//! ┌─────────────┐    ┌───────────┐    ┌────────────┐    ┌──────────────┐
//! │  Capture    │───▶│ Segmenter │───▶│ Transcriber│───▶│ Conversation │───▶ IntakeRecord
//! │  Feed       │    │ (windows) │    │  (remote)  │    │ (debounce)   │
//! └─────────────┘    └───────────┘    └────────────┘    └──────────────┘
//!      bytes           exact-size        WAV + STT        classify /
//!                      windows           per window       accumulate /
//!                                                         finalize once
//! ```

pub mod feed;
pub mod frame;
pub mod pipeline;
pub mod report;
pub mod segmenter;
pub mod transcriber;

pub use feed::{CaptureFeed, CaptureFeedConfig, CaptureFeedHandle};
pub use frame::{AudioWindow, TranscriptSegment};
pub use pipeline::{IntakePipeline, IntakePipelineConfig};
pub use report::{ErrorReporter, LogReporter, StationError};
pub use segmenter::{SegmenterConfig, SegmenterStation};
pub use transcriber::TranscriberStation;
