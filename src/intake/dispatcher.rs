//! One-shot finalization of a finished conversation.

use crate::error::{IntakeError, Result};
use crate::intake::extractor::IntakeExtractor;
use crate::intake::record::IntakeRecord;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of finalizing a conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum FinalizationOutcome {
    /// The extraction service produced a record.
    Completed(IntakeRecord),
    /// Extraction failed; the conversation stays finalized and is not retried.
    Failed { error: String },
}

/// Dispatcher that invokes the extraction collaborator at most once.
///
/// The completion debouncer already guarantees a single finalization per
/// conversation; the dispatcher enforces the same invariant independently
/// so a second call is an error rather than a second service request.
pub struct FinalizationDispatcher {
    extractor: Arc<dyn IntakeExtractor>,
    dispatched: AtomicBool,
}

impl FinalizationDispatcher {
    /// Creates a dispatcher around the given extraction collaborator.
    pub fn new(extractor: Arc<dyn IntakeExtractor>) -> Self {
        Self {
            extractor,
            dispatched: AtomicBool::new(false),
        }
    }

    /// Sends the conversation to the extraction service.
    ///
    /// Errors with `AlreadyFinalized` on any call after the first. A failed
    /// extraction is not retried; the one dispatch is spent.
    pub async fn finalize(&self, conversation: &str) -> Result<IntakeRecord> {
        if self.dispatched.swap(true, Ordering::SeqCst) {
            return Err(IntakeError::AlreadyFinalized);
        }
        self.extractor.extract(conversation).await
    }

    /// Returns true once a dispatch has been attempted.
    pub fn has_dispatched(&self) -> bool {
        self.dispatched.load(Ordering::SeqCst)
    }
}
