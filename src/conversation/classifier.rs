//! Transcript classification: meaningful content vs noise/filler.
//!
//! A conservative text heuristic, deliberately free of semantic
//! understanding. Its only job is to keep acknowledgements and
//! false-positive transcriptions from skewing completion detection.

use crate::defaults;
use std::collections::HashSet;

/// Filler phrases that never count as meaningful content, compared after
/// normalization.
const FILLER_PHRASES: &[&str] = &[
    "ok",
    "okay",
    "yes",
    "no",
    "yeah",
    "yep",
    "nope",
    "mhm",
    "uh huh",
    "mm hmm",
    "hmm",
    "thanks",
    "thank you",
    "sure",
    "alright",
    "all right",
    "right",
    "got it",
    "i see",
    "hello",
    "hi",
    "bye",
    "goodbye",
];

/// Configuration for the classifier.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Normalized transcripts at or below this length are filler.
    pub max_filler_chars: usize,
    /// Additional filler phrases from configuration (raw; normalized on load).
    pub extra_fillers: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_filler_chars: defaults::MAX_FILLER_CHARS,
            extra_fillers: Vec::new(),
        }
    }
}

/// Judges whether a transcript carries meaningful conversational content.
#[derive(Debug, Clone)]
pub struct TranscriptClassifier {
    max_filler_chars: usize,
    fillers: HashSet<String>,
}

impl TranscriptClassifier {
    /// Creates a classifier with the default filler set.
    pub fn new() -> Self {
        Self::with_config(ClassifierConfig::default())
    }

    /// Creates a classifier with custom configuration.
    pub fn with_config(config: ClassifierConfig) -> Self {
        let mut fillers: HashSet<String> =
            FILLER_PHRASES.iter().map(|p| p.to_string()).collect();
        for phrase in &config.extra_fillers {
            let normalized = normalize(phrase);
            if !normalized.is_empty() {
                fillers.insert(normalized);
            }
        }
        Self {
            max_filler_chars: config.max_filler_chars,
            fillers,
        }
    }

    /// Returns true when the transcript carries meaningful content.
    ///
    /// Pure: the same input always yields the same answer. False for empty
    /// or near-empty text, exact filler-set matches, and anything at or
    /// below the length floor after normalization.
    pub fn is_meaningful(&self, text: &str) -> bool {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return false;
        }
        if normalized.chars().count() <= self.max_filler_chars {
            return false;
        }
        !self.fillers.contains(&normalized)
    }
}

impl Default for TranscriptClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a transcript for comparison: lowercase, punctuation stripped,
/// whitespace collapsed and trimmed.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
