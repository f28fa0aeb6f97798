//! Error types and reporting for pipeline stations.

use std::fmt;

/// Errors that can occur during station processing.
#[derive(Debug, Clone)]
pub enum StationError {
    /// Recoverable error scoped to one window; the station continues.
    Recoverable(String),
    /// Fatal error that requires the station to shut down.
    Fatal(String),
}

impl fmt::Display for StationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationError::Recoverable(msg) => write!(f, "Recoverable error: {}", msg),
            StationError::Fatal(msg) => write!(f, "Fatal error: {}", msg),
        }
    }
}

impl std::error::Error for StationError {}

/// Trait for reporting station errors.
pub trait ErrorReporter: Send + Sync {
    /// Reports an error from a station.
    fn report(&self, station: &str, error: &StationError);
}

/// Simple error reporter that logs to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, station: &str, error: &StationError) {
        eprintln!("[{}] {}", station, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_station_error_display() {
        let recoverable = StationError::Recoverable("transcription timed out".to_string());
        assert_eq!(
            recoverable.to_string(),
            "Recoverable error: transcription timed out"
        );

        let fatal = StationError::Fatal("capture device lost".to_string());
        assert_eq!(fatal.to_string(), "Fatal error: capture device lost");
    }

    #[test]
    fn test_log_reporter() {
        let reporter = LogReporter;
        let error = StationError::Recoverable("test error".to_string());
        // Just ensure it doesn't panic
        reporter.report("TestStation", &error);
    }

    #[test]
    fn test_custom_reporter_collects() {
        #[derive(Default)]
        struct CollectingReporter {
            seen: Mutex<Vec<String>>,
        }

        impl ErrorReporter for CollectingReporter {
            fn report(&self, station: &str, error: &StationError) {
                if let Ok(mut seen) = self.seen.lock() {
                    seen.push(format!("{}: {}", station, error));
                }
            }
        }

        let reporter = CollectingReporter::default();
        reporter.report("transcriber", &StationError::Recoverable("boom".into()));
        let seen = reporter.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("transcriber"));
    }
}
