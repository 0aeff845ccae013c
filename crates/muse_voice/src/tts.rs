//! Text-to-Speech (TTS) trait definition

use anyhow::Result;
use async_trait::async_trait;

/// Container format of synthesized audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioFormat {
    #[default]
    Wav,
    Mp3,
}

impl AudioFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
        }
    }
}

/// Text-to-Speech trait for synthesizing audio from text
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize text to audio
    ///
    /// # Returns
    /// Raw audio bytes in [`TextToSpeech::format`]
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;

    /// Format of the bytes returned by `synthesize`
    fn format(&self) -> AudioFormat;

    /// Get the voice identifier being used
    fn voice_id(&self) -> &str;

    /// Get the name of this TTS provider
    fn provider_name(&self) -> &'static str;
}
