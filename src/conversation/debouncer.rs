//! Completion debouncer: decides when the speaker is done.
//!
//! There is no explicit hang-up signal, so end-of-input is inferred from a
//! sustained run of non-meaningful segments after real content, plus a
//! grace delay to absorb brief pauses. The state machine here is pure
//! (timer plumbing lives in the conversation station), so arming,
//! cancellation, and the at-most-once guarantee are directly testable.

use crate::conversation::state::ConversationState;
use crate::defaults;
use std::time::Duration;

/// Phase of the completion state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionPhase {
    /// No deadline pending.
    Idle,
    /// A finalization deadline is scheduled.
    Armed,
    /// Finalization fired. Terminal.
    Finalized,
}

/// Configuration for completion detection.
#[derive(Debug, Clone)]
pub struct DebounceConfig {
    /// Consecutive non-meaningful segments required before arming.
    pub silence_segments: u32,
    /// Grace delay between arming and finalization.
    pub finalize_delay: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            silence_segments: defaults::SILENCE_SEGMENTS,
            finalize_delay: Duration::from_millis(defaults::FINALIZE_DELAY_MS),
        }
    }
}

/// What the caller must do after an ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Schedule a deadline carrying this generation. Any previously
    /// scheduled deadline is already stale (the generation moved on) and
    /// should be aborted.
    Arm { generation: u64 },
    /// No deadline pending; abort any previously scheduled one.
    Settle,
}

/// Debounce state machine for one conversation.
pub struct CompletionDebouncer {
    config: DebounceConfig,
    phase: CompletionPhase,
    generation: u64,
}

impl CompletionDebouncer {
    /// Creates a debouncer with default configuration.
    pub fn new() -> Self {
        Self::with_config(DebounceConfig::default())
    }

    /// Creates a debouncer with custom configuration.
    pub fn with_config(config: DebounceConfig) -> Self {
        Self {
            config,
            phase: CompletionPhase::Idle,
            generation: 0,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> CompletionPhase {
        self.phase
    }

    /// Grace delay to use when arming.
    pub fn finalize_delay(&self) -> Duration {
        self.config.finalize_delay
    }

    /// Advances the machine after a transcript was ingested.
    ///
    /// Every ingest, meaningful or not, invalidates the pending deadline
    /// by advancing the generation; a firing that was already queued is
    /// then rejected as stale. Arms when accumulated content exists, the
    /// silence streak has reached the threshold, and the machine is not
    /// finalized.
    pub fn on_ingest(&mut self, state: &ConversationState) -> IngestOutcome {
        if self.phase == CompletionPhase::Finalized {
            return IngestOutcome::Settle;
        }

        self.generation += 1;

        if state.has_content() && state.non_meaningful_streak() >= self.config.silence_segments {
            self.phase = CompletionPhase::Armed;
            IngestOutcome::Arm {
                generation: self.generation,
            }
        } else {
            self.phase = CompletionPhase::Idle;
            IngestOutcome::Settle
        }
    }

    /// Handles a deadline firing.
    ///
    /// Returns true exactly when this firing finalizes the conversation:
    /// the machine is armed and the generation is still current. Stale
    /// generations (input arrived after scheduling) and repeat firings are
    /// no-ops.
    pub fn on_deadline(&mut self, generation: u64) -> bool {
        if self.phase == CompletionPhase::Armed && generation == self.generation {
            self.phase = CompletionPhase::Finalized;
            true
        } else {
            false
        }
    }
}

impl Default for CompletionDebouncer {
    fn default() -> Self {
        Self::new()
    }
}
