use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Plays an audio file by running an external player to completion.
#[derive(Debug, Clone)]
pub struct AudioPlayer {
    program: String,
    args: Vec<String>,
}

impl AudioPlayer {
    pub fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
        }
    }

    /// `afplay` on macOS, `ffplay` without a window elsewhere.
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("afplay", vec![])
        } else {
            Self::new(
                "ffplay",
                ["-nodisp", "-autoexit", "-loglevel", "quiet"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            )
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub async fn play(&self, file: &Path) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .with_context(|| format!("Failed to start audio player '{}'", self.program))?;

        if !status.success() {
            anyhow::bail!("Audio player '{}' exited with {}", self.program, status);
        }
        Ok(())
    }
}
