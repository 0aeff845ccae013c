//! Speaks generated text: synthesize, save next to the text output, play.
//!
//! Narration is best effort. [`Narrator::narrate_detached`] runs it on a spawned
//! task that nobody joins: the session moves on immediately, failures are only
//! logged, and if the program exits first playback is simply cut off.

use crate::player::AudioPlayer;
use crate::tts::TextToSpeech;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct Narrator {
    tts: Arc<dyn TextToSpeech>,
    player: Option<AudioPlayer>,
}

impl Narrator {
    /// `player: None` saves audio files without playing them.
    pub fn new(tts: Arc<dyn TextToSpeech>, player: Option<AudioPlayer>) -> Self {
        Self { tts, player }
    }

    pub fn provider_name(&self) -> &'static str {
        self.tts.provider_name()
    }

    /// Synthesize `text`, write it to `stem` with the format's extension, then play it.
    ///
    /// Returns the audio file path.
    pub async fn narrate(&self, text: &str, stem: &Path) -> Result<PathBuf> {
        let audio = self
            .tts
            .synthesize(text)
            .await
            .with_context(|| format!("{} synthesis failed", self.tts.provider_name()))?;

        let path = stem.with_extension(self.tts.format().extension());
        tokio::fs::write(&path, &audio)
            .await
            .with_context(|| format!("Failed to write audio to {}", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = audio.len(), "audio saved");

        if let Some(player) = &self.player {
            player.play(&path).await?;
        }
        Ok(path)
    }

    /// Fire-and-forget narration on a new task.
    ///
    /// The handle is returned for callers that want to wait; the interactive
    /// session drops it. Errors never leave the task.
    pub fn narrate_detached(self: &Arc<Self>, text: String, stem: PathBuf) -> JoinHandle<()> {
        let narrator = Arc::clone(self);
        tokio::spawn(async move {
            match narrator.narrate(&text, &stem).await {
                Ok(path) => tracing::info!(path = %path.display(), "narration finished"),
                Err(e) => tracing::warn!("Narration skipped: {:#}", e),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tts::AudioFormat;
    use async_trait::async_trait;

    struct FakeTts {
        fail: bool,
    }

    #[async_trait]
    impl TextToSpeech for FakeTts {
        async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
            if self.fail {
                anyhow::bail!("speech service down");
            }
            Ok(format!("AUDIO:{}", text).into_bytes())
        }

        fn format(&self) -> AudioFormat {
            AudioFormat::Mp3
        }

        fn voice_id(&self) -> &str {
            "fake"
        }

        fn provider_name(&self) -> &'static str {
            "fake"
        }
    }

    #[tokio::test]
    async fn test_narrate_writes_audio_next_to_stem() {
        let dir = tempfile::TempDir::new().unwrap();
        let narrator = Narrator::new(Arc::new(FakeTts { fail: false }), None);
        let stem = dir.path().join("idea_20240101_000000");

        let path = narrator.narrate("hello", &stem).await.unwrap();
        assert_eq!(path, dir.path().join("idea_20240101_000000.mp3"));
        assert_eq!(std::fs::read(&path).unwrap(), b"AUDIO:hello");
    }

    #[tokio::test]
    async fn test_detached_task_completes_and_can_be_awaited() {
        let dir = tempfile::TempDir::new().unwrap();
        let narrator = Arc::new(Narrator::new(Arc::new(FakeTts { fail: false }), None));
        let stem = dir.path().join("cycle");

        let handle = narrator.narrate_detached("text".to_string(), stem.clone());
        handle.await.unwrap();
        assert!(stem.with_extension("mp3").exists());
    }

    #[tokio::test]
    async fn test_detached_failure_is_swallowed() {
        let dir = tempfile::TempDir::new().unwrap();
        let narrator = Arc::new(Narrator::new(Arc::new(FakeTts { fail: true }), None));
        let stem = dir.path().join("cycle");

        // The task must finish normally (no panic) even though synthesis fails.
        narrator
            .narrate_detached("text".to_string(), stem.clone())
            .await
            .unwrap();
        assert!(!stem.with_extension("mp3").exists());
    }

    #[tokio::test]
    async fn test_direct_narrate_surfaces_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let narrator = Narrator::new(Arc::new(FakeTts { fail: true }), None);
        let err = narrator.narrate("x", &dir.path().join("s")).await.unwrap_err();
        assert!(format!("{:#}", err).contains("speech service down"));
    }
}
