//! Plugin configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use yotts_dashscope::{Region, MODEL_QWEN3_TTS_VC_REALTIME};

use crate::error::{PluginError, Result};

/// Name under which the plugin keeps its data.
pub const PLUGIN_NAME: &str = "plugin";

/// Default chance, in percent, that an eligible reply is voiced.
pub const DEFAULT_TTS_PROBABILITY: i64 = 50;

/// Default maximum reply length, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 100;

/// Configuration handed over by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// DashScope API key.
    #[serde(default)]
    pub api_key: String,

    /// Enrolled voice to speak with.
    #[serde(default)]
    pub voice_id: String,

    /// Percent chance (0..=100) that an eligible reply is voiced.
    #[serde(default = "default_tts_probability")]
    pub tts_probability: i64,

    /// Replies longer than this many characters are never voiced.
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Keep clips under a timestamped name instead of releasing them.
    #[serde(default)]
    pub save_audio: bool,

    #[serde(default)]
    pub region: Region,

    /// Realtime TTS model.
    #[serde(default = "default_model")]
    pub model: String,

    /// Where clips are written. Defaults to `~/.yotts/plugin/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Transcoder path or name on `PATH`. Defaults to `ffmpeg`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffmpeg: Option<String>,
}

fn default_tts_probability() -> i64 {
    DEFAULT_TTS_PROBABILITY
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_model() -> String {
    MODEL_QWEN3_TTS_VC_REALTIME.to_string()
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            voice_id: String::new(),
            tts_probability: DEFAULT_TTS_PROBABILITY,
            max_length: DEFAULT_MAX_LENGTH,
            save_audio: false,
            region: Region::default(),
            model: default_model(),
            data_dir: None,
            ffmpeg: None,
        }
    }
}

impl PluginConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(s: &str) -> Result<Self> {
        let mut config: PluginConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a YAML configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: PluginConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks required keys and clamps the probability into 0..=100.
    pub fn validate(&mut self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(PluginError::Config("api_key is required".into()));
        }
        if self.voice_id.trim().is_empty() {
            return Err(PluginError::Config("voice_id is required".into()));
        }
        self.tts_probability = self.tts_probability.clamp(0, 100);
        if self.model.trim().is_empty() {
            self.model = default_model();
        }
        Ok(())
    }

    /// Probability as a percentage, clamped.
    pub fn probability(&self) -> u32 {
        self.tts_probability.clamp(0, 100) as u32
    }
}
