//! Conversation tracking and completion detection.
//!
//! ```text
//! transcripts ──▶ classifier ──▶ accumulator ──▶ debouncer ──▶ dispatcher
//!    (ordered)     meaningful?     state          IDLE/ARMED/    one-shot
//!                                                 FINALIZED      extraction
//! ```

pub mod classifier;
pub mod debouncer;
pub mod state;
pub mod station;

pub use classifier::{ClassifierConfig, TranscriptClassifier};
pub use debouncer::{CompletionDebouncer, CompletionPhase, DebounceConfig, IngestOutcome};
pub use state::ConversationState;
pub use station::ConversationStation;
