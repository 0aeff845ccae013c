use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MuseConfig {
    pub llm: LlmConfig,
    pub voice: VoiceConfig,
    pub storage: StorageConfig,
    pub studio: StudioConfig,
    pub logging: LoggingConfig,
}

impl MuseConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: MuseConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if the file is missing or broken, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({:#}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    /// Platform config dir (`~/.config/muse/config.toml` on Linux), or `muse.toml` in the working directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|base| base.join("muse").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("muse.toml"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("LLM_PROVIDER") {
            self.llm.provider = v;
        }
        if let Ok(v) = std::env::var("LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("LLM_BASE_URL") {
            self.llm.base_url = Some(v);
        }
        if let Ok(v) = std::env::var("LLM_MAX_TOKENS") {
            if let Ok(n) = v.parse() {
                self.llm.max_tokens = n;
            }
        }
        if let Ok(v) = std::env::var("LLM_TEMPERATURE") {
            if let Ok(n) = v.parse() {
                self.llm.temperature = n;
            }
        }
        if let Ok(v) = std::env::var("MUSE_MEMORY_PATH") {
            self.storage.memory_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("MUSE_OUTPUT_DIR") {
            self.storage.output_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("MUSE_VOICE") {
            self.voice.enabled = !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "off" | "no");
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// `openai`, `deepseek`, `ollama`, `anthropic` or `mock`.
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Total attempts per request, including the first.
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: None,
            max_tokens: 512,
            temperature: 0.9,
            timeout_secs: 60,
            max_retries: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub enabled: bool,
    /// `command`, `openai` or `none`.
    pub provider: String,
    pub voice: String,
    /// Synthesizer program for the `command` provider. Text is fed on stdin,
    /// audio is read from stdout. `{voice}` in `command_args` is substituted.
    pub command: String,
    pub command_args: Vec<String>,
    pub openai_model: String,
    /// Player program; platform default when unset.
    pub player: Option<String>,
    pub player_args: Vec<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: "command".to_string(),
            voice: "en".to_string(),
            command: "espeak-ng".to_string(),
            command_args: vec!["--stdout".to_string(), "-v".to_string(), "{voice}".to_string()],
            openai_model: "tts-1".to_string(),
            player: None,
            player_args: vec![],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub memory_path: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            memory_path: PathBuf::from("muse_memory.json"),
            output_dir: PathBuf::from("muse_outputs"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// How many earlier outputs the matcher feeds back into each brainstorm.
    pub recall_top_k: usize,
    /// Substituted for a perspective whose model call fails.
    pub fallback_text: String,
    pub share_hashtags: Vec<String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            recall_top_k: 3,
            fallback_text: "The muse is quiet right now. Picture the boldest version of this idea and sketch it yourself."
                .to_string(),
            share_hashtags: vec!["#Muse".to_string(), "#Ideas".to_string(), "#Innovation".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for daily-rotated log files. Stderr only when unset.
    pub dir: Option<PathBuf>,
    pub json: bool,
}

// ============================================================================
// Tests
// ============================================================================
