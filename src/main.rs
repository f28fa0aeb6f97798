use anyhow::Result;
use clap::Parser;
use intakeline::audio::capture::{list_devices, CpalAudioSource};
use intakeline::cli::{Cli, Commands};
use intakeline::config::Config;
use intakeline::intake::dispatcher::FinalizationOutcome;
use intakeline::intake::openai::{ChatExtractor, ChatExtractorConfig};
use intakeline::output::{self, PipelineEvent};
use intakeline::stt::whisper_api::{WhisperApiClient, WhisperApiConfig};
use intakeline::{IntakePipeline, IntakePipelineConfig};
use owo_colors::OwoColorize;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Devices) => list_audio_devices()?,
        None => run_intake(cli).await?,
    }

    Ok(())
}

fn list_audio_devices() -> Result<()> {
    let devices = list_devices()?;
    if devices.is_empty() {
        println!("No audio input devices found");
    } else {
        println!("Audio input devices:");
        for device in devices {
            println!("  {}", device);
        }
    }
    Ok(())
}

/// Load configuration, then layer on environment and CLI overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => match Config::default_path() {
            Some(path) => Config::load_or_default(&path)?,
            None => Config::default(),
        },
    };

    let mut config = config.with_env_overrides();

    if let Some(device) = &cli.device {
        config.audio.device = Some(device.clone());
    }
    if let Some(window) = cli.window {
        config.audio.window_seconds = window;
    }
    if let Some(segments) = cli.silence_segments {
        config.completion.silence_segments = segments;
    }
    if let Some(delay) = cli.finalize_delay {
        config.completion.finalize_delay_ms = delay.as_millis() as u64;
    }

    config.validate()?;
    Ok(config)
}

async fn run_intake(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let api_key = config.services.api_key()?;
    let timeout = Duration::from_secs(config.services.request_timeout_secs);

    eprintln!(
        "{} v{} — listening for caller audio ({}s windows)",
        "intakeline".green().bold(),
        intakeline::version_string(),
        config.audio.window_seconds,
    );

    let source = CpalAudioSource::with_sample_rate(
        config.audio.device.as_deref(),
        config.audio.sample_rate,
    )?;

    let stt = WhisperApiClient::new(WhisperApiConfig {
        url: config.services.transcription_url.clone(),
        model: config.services.transcription_model.clone(),
        api_key: api_key.clone(),
        timeout,
    })?;

    let extractor = Arc::new(ChatExtractor::new(ChatExtractorConfig {
        url: config.services.extraction_url.clone(),
        model: config.services.extraction_model.clone(),
        api_key,
        timeout,
    })?);

    let pipeline = IntakePipeline::with_config(
        IntakePipelineConfig::from_config(&config).with_echo(!cli.quiet),
    );

    match pipeline.run(source, stt, extractor).await? {
        FinalizationOutcome::Completed(record) => {
            output::render_event(&PipelineEvent::RecordReady { record });
            Ok(())
        }
        FinalizationOutcome::Failed { error } => {
            output::render_event(&PipelineEvent::ExtractionFailed {
                error: error.clone(),
            });
            anyhow::bail!("extraction failed: {}", error)
        }
    }
}
