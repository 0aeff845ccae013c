//! Voice module for Muse
//!
//! Provides the Text-to-Speech (TTS) abstraction, two providers, and the
//! detached narrator that speaks each generated idea.

mod command;
mod narrator;
mod openai;
mod player;
mod tts;

pub use command::CommandTts;
pub use narrator::Narrator;
pub use openai::OpenAiSpeech;
pub use player::AudioPlayer;
pub use tts::{AudioFormat, TextToSpeech};

use anyhow::{Context, Result};
use muse_core::config::VoiceConfig;
use std::sync::Arc;

/// Build the configured TTS provider, or `None` when speech is disabled.
pub fn create_tts(config: &VoiceConfig) -> Result<Option<Arc<dyn TextToSpeech>>> {
    if !config.enabled {
        return Ok(None);
    }
    let tts: Arc<dyn TextToSpeech> = match config.provider.to_ascii_lowercase().as_str() {
        "none" | "off" => return Ok(None),
        "command" => Arc::new(CommandTts::new(
            &config.command,
            config.command_args.clone(),
            &config.voice,
            AudioFormat::Wav,
        )),
        "openai" => {
            let api_key = std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty())
                .context("OPENAI_API_KEY is not set")?;
            let base_url =
                std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| openai::DEFAULT_BASE_URL.to_string());
            Arc::new(OpenAiSpeech::new(&base_url, &api_key, &config.openai_model, &config.voice)?)
        }
        other => anyhow::bail!("Unknown TTS provider '{}' (expected command, openai or none)", other),
    };
    Ok(Some(tts))
}

/// TTS plus player from config; `None` when speech is disabled.
pub fn create_narrator(config: &VoiceConfig) -> Result<Option<Narrator>> {
    let Some(tts) = create_tts(config)? else {
        return Ok(None);
    };
    let player = match &config.player {
        Some(program) if program.is_empty() => None,
        Some(program) => Some(AudioPlayer::new(program, config.player_args.clone())),
        None => Some(AudioPlayer::platform_default()),
    };
    tracing::info!(
        provider = tts.provider_name(),
        voice = tts.voice_id(),
        player = player.as_ref().map(|p| p.program()).unwrap_or("none"),
        "voice ready"
    );
    Ok(Some(Narrator::new(tts, player)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_voice_builds_nothing() {
        let config = VoiceConfig {
            enabled: false,
            ..VoiceConfig::default()
        };
        assert!(create_tts(&config).unwrap().is_none());
        assert!(create_narrator(&config).unwrap().is_none());
    }

    #[test]
    fn test_none_provider_builds_nothing() {
        let config = VoiceConfig {
            provider: "none".into(),
            ..VoiceConfig::default()
        };
        assert!(create_tts(&config).unwrap().is_none());
    }

    #[test]
    fn test_command_provider_default() {
        let tts = create_tts(&VoiceConfig::default()).unwrap().unwrap();
        assert_eq!(tts.provider_name(), "command");
        assert_eq!(tts.format(), AudioFormat::Wav);
        assert_eq!(tts.voice_id(), "en");
    }

    #[test]
    fn test_empty_player_means_save_only() {
        let config = VoiceConfig {
            player: Some(String::new()),
            ..VoiceConfig::default()
        };
        assert!(create_narrator(&config).unwrap().is_some());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let config = VoiceConfig {
            provider: "theremin".into(),
            ..VoiceConfig::default()
        };
        assert!(create_tts(&config).is_err());
    }
}
