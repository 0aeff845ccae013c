//! TTS through a local synthesizer program (espeak-ng by default).
//!
//! Text goes in on stdin, audio comes out on stdout.

use crate::tts::{AudioFormat, TextToSpeech};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct CommandTts {
    program: String,
    args: Vec<String>,
    voice: String,
    format: AudioFormat,
}

impl CommandTts {
    pub fn new(program: &str, args: Vec<String>, voice: &str, format: AudioFormat) -> Self {
        Self {
            program: program.to_string(),
            args,
            voice: voice.to_string(),
            format,
        }
    }

    /// Arguments with `{voice}` substituted.
    fn expanded_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.replace("{voice}", &self.voice))
            .collect()
    }
}

#[async_trait]
impl TextToSpeech for CommandTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(self.expanded_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start TTS program '{}'", self.program))?;

        let mut stdin = child.stdin.take().context("TTS program has no stdin")?;
        let input = text.as_bytes().to_vec();
        let feed = async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        };

        // Feed stdin while draining stdout so neither pipe can fill up and stall.
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.context("TTS program did not finish")?;

        if !output.status.success() {
            anyhow::bail!(
                "TTS program '{}' exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        if output.stdout.is_empty() {
            fed.context("Failed to pass text to TTS program")?;
            anyhow::bail!("TTS program '{}' produced no audio", self.program);
        }
        // A synthesizer may stop reading once it has what it needs.
        match fed {
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                tracing::debug!(program = %self.program, "TTS program closed stdin early");
            }
            other => other.context("Failed to pass text to TTS program")?,
        }
        Ok(output.stdout)
    }

    fn format(&self) -> AudioFormat {
        self.format
    }

    fn voice_id(&self) -> &str {
        &self.voice
    }

    fn provider_name(&self) -> &'static str {
        "command"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_placeholder_substituted() {
        let tts = CommandTts::new(
            "espeak-ng",
            vec!["--stdout".into(), "-v".into(), "{voice}".into()],
            "en-us",
            AudioFormat::Wav,
        );
        assert_eq!(tts.expanded_args(), vec!["--stdout", "-v", "en-us"]);
        assert_eq!(tts.voice_id(), "en-us");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_becomes_audio() {
        // `cat` echoes stdin, standing in for a synthesizer.
        let tts = CommandTts::new("cat", vec![], "x", AudioFormat::Wav);
        let audio = tts.synthesize("hello muse").await.unwrap();
        assert_eq!(audio, b"hello muse");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_program_ignoring_stdin_still_yields_audio() {
        let tts = CommandTts::new(
            "sh",
            vec!["-c".into(), "printf audio".into()],
            "x",
            AudioFormat::Wav,
        );
        let text = "word ".repeat(1 << 18);
        let audio = tts.synthesize(&text).await.unwrap();
        assert_eq!(audio, b"audio");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_program_is_error() {
        let tts = CommandTts::new("false", vec![], "x", AudioFormat::Wav);
        assert!(tts.synthesize("hi").await.is_err());
    }

    #[tokio::test]
    async fn test_missing_program_is_error() {
        let tts = CommandTts::new("muse-no-such-synth-binary", vec![], "x", AudioFormat::Wav);
        let err = tts.synthesize("hi").await.unwrap_err();
        assert!(err.to_string().contains("muse-no-such-synth-binary"));
    }
}
