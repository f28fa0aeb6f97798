//! Structured-extraction collaborator and finalization.

pub mod dispatcher;
pub mod extractor;
pub mod openai;
pub mod record;

pub use dispatcher::{FinalizationDispatcher, FinalizationOutcome};
pub use extractor::{IntakeExtractor, MockExtractor};
pub use openai::{ChatExtractor, ChatExtractorConfig};
pub use record::{CustomerConstraints, IntakeRecord, Location, Priority};
