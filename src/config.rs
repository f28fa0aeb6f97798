use crate::defaults;
use crate::error::{IntakeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub completion: CompletionConfig,
    pub services: ServicesConfig,
}

/// Audio capture and windowing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub device: Option<String>,
    pub sample_rate: u32,
    pub bytes_per_sample: u32,
    pub window_seconds: u32,
}

/// Completion detection configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompletionConfig {
    pub silence_segments: u32,
    pub finalize_delay_ms: u64,
    pub max_filler_chars: usize,
    pub extra_fillers: Vec<String>,
}

/// External service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServicesConfig {
    pub transcription_url: String,
    pub transcription_model: String,
    pub extraction_url: String,
    pub extraction_model: String,
    pub api_key_env: String,
    pub request_timeout_secs: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: defaults::SAMPLE_RATE,
            bytes_per_sample: defaults::BYTES_PER_SAMPLE,
            window_seconds: defaults::WINDOW_SECONDS,
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            silence_segments: defaults::SILENCE_SEGMENTS,
            finalize_delay_ms: defaults::FINALIZE_DELAY_MS,
            max_filler_chars: defaults::MAX_FILLER_CHARS,
            extra_fillers: Vec::new(),
        }
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            transcription_url: defaults::TRANSCRIPTION_URL.to_string(),
            transcription_model: defaults::TRANSCRIPTION_MODEL.to_string(),
            extraction_url: defaults::EXTRACTION_URL.to_string(),
            extraction_model: defaults::EXTRACTION_MODEL.to_string(),
            api_key_env: defaults::API_KEY_ENV.to_string(),
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ServicesConfig {
    /// Resolve the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => Err(IntakeError::MissingApiKey {
                env: self.api_key_env.clone(),
            }),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is missing or contains invalid TOML.
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IntakeError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                IntakeError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file, or return defaults if it doesn't exist
    ///
    /// Only falls back to defaults for a missing file; invalid TOML is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(IntakeError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - INTAKELINE_AUDIO_DEVICE → audio.device
    /// - INTAKELINE_TRANSCRIPTION_URL → services.transcription_url
    /// - INTAKELINE_EXTRACTION_URL → services.extraction_url
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(device) = std::env::var("INTAKELINE_AUDIO_DEVICE") {
            if !device.is_empty() {
                self.audio.device = Some(device);
            }
        }

        if let Ok(url) = std::env::var("INTAKELINE_TRANSCRIPTION_URL") {
            if !url.is_empty() {
                self.services.transcription_url = url;
            }
        }

        if let Ok(url) = std::env::var("INTAKELINE_EXTRACTION_URL") {
            if !url.is_empty() {
                self.services.extraction_url = url;
            }
        }

        self
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate == 0 {
            return Err(IntakeError::ConfigInvalidValue {
                key: "audio.sample_rate".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.audio.bytes_per_sample != 2 {
            return Err(IntakeError::ConfigInvalidValue {
                key: "audio.bytes_per_sample".to_string(),
                message: "only 2 (signed 16-bit PCM) is supported".to_string(),
            });
        }
        if self.audio.window_seconds == 0 {
            return Err(IntakeError::ConfigInvalidValue {
                key: "audio.window_seconds".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.completion.silence_segments == 0 {
            return Err(IntakeError::ConfigInvalidValue {
                key: "completion.silence_segments".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.services.transcription_url.is_empty() {
            return Err(IntakeError::ConfigInvalidValue {
                key: "services.transcription_url".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.services.extraction_url.is_empty() {
            return Err(IntakeError::ConfigInvalidValue {
                key: "services.extraction_url".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/intakeline/config.toml on Linux
    #[cfg(feature = "cli")]
    pub fn default_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|dir| dir.join("intakeline").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_intakeline_env() {
        std::env::remove_var("INTAKELINE_AUDIO_DEVICE");
        std::env::remove_var("INTAKELINE_TRANSCRIPTION_URL");
        std::env::remove_var("INTAKELINE_EXTRACTION_URL");
    }

    #[test]
    fn test_default_config_has_correct_values() {
        let config = Config::default();

        assert_eq!(config.audio.device, None);
        assert_eq!(config.audio.sample_rate, 16000);
        assert_eq!(config.audio.bytes_per_sample, 2);
        assert_eq!(config.audio.window_seconds, 5);

        assert_eq!(config.completion.silence_segments, 3);
        assert_eq!(config.completion.finalize_delay_ms, 4000);
        assert_eq!(config.completion.max_filler_chars, 3);
        assert!(config.completion.extra_fillers.is_empty());

        assert_eq!(config.services.transcription_model, "whisper-1");
        assert_eq!(config.services.extraction_model, "gpt-4o-mini");
        assert_eq!(config.services.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.services.request_timeout_secs, 60);
    }

    #[test]
    fn test_load_from_toml_file() {
        let toml_content = r#"
            [audio]
            device = "BlackHole 2ch"
            window_seconds = 3

            [completion]
            silence_segments = 2
            finalize_delay_ms = 2500
            extra_fillers = ["no worries"]

            [services]
            extraction_model = "gpt-4o"
        "#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.audio.device.as_deref(), Some("BlackHole 2ch"));
        assert_eq!(config.audio.window_seconds, 3);
        // Unset fields keep defaults
        assert_eq!(config.audio.sample_rate, 16000);
        assert_eq!(config.completion.silence_segments, 2);
        assert_eq!(config.completion.finalize_delay_ms, 2500);
        assert_eq!(config.completion.extra_fillers, vec!["no worries"]);
        assert_eq!(config.services.extraction_model, "gpt-4o");
        assert_eq!(config.services.transcription_model, "whisper-1");
    }

    #[test]
    fn test_load_missing_file_is_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/intakeline.toml"));
        assert!(matches!(
            result,
            Err(IntakeError::ConfigFileNotFound { .. })
        ));
    }

    #[test]
    fn test_load_or_default_returns_default_for_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/intakeline.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_errors_on_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not [valid toml").unwrap();

        assert!(Config::load_or_default(file.path()).is_err());
    }

    #[test]
    fn test_env_override_device() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        clear_intakeline_env();

        std::env::set_var("INTAKELINE_AUDIO_DEVICE", "pipewire");
        let config = Config::default().with_env_overrides();
        assert_eq!(config.audio.device.as_deref(), Some("pipewire"));

        clear_intakeline_env();
    }

    #[test]
    fn test_env_override_empty_string_ignored() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        clear_intakeline_env();

        std::env::set_var("INTAKELINE_TRANSCRIPTION_URL", "");
        let config = Config::default().with_env_overrides();
        assert_eq!(
            config.services.transcription_url,
            defaults::TRANSCRIPTION_URL
        );

        clear_intakeline_env();
    }

    #[test]
    fn test_validate_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let mut config = Config::default();
        config.audio.window_seconds = 0;
        match config.validate() {
            Err(IntakeError::ConfigInvalidValue { key, .. }) => {
                assert_eq!(key, "audio.window_seconds");
            }
            other => panic!("expected ConfigInvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_unsupported_sample_width() {
        let mut config = Config::default();
        config.audio.bytes_per_sample = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_service_url() {
        let mut config = Config::default();
        config.services.extraction_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_missing_env() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());

        let mut services = ServicesConfig::default();
        services.api_key_env = "INTAKELINE_TEST_KEY_UNSET".to_string();
        std::env::remove_var("INTAKELINE_TEST_KEY_UNSET");

        assert!(matches!(
            services.api_key(),
            Err(IntakeError::MissingApiKey { .. })
        ));
    }

    #[test]
    fn test_api_key_from_env() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());

        let mut services = ServicesConfig::default();
        services.api_key_env = "INTAKELINE_TEST_KEY_SET".to_string();
        std::env::set_var("INTAKELINE_TEST_KEY_SET", "sk-test");

        assert_eq!(services.api_key().unwrap(), "sk-test");
        std::env::remove_var("INTAKELINE_TEST_KEY_SET");
    }

    #[test]
    fn test_round_trip_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }
}
