//! Type definitions for DashScope API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Realtime TTS model for cloned (enrolled) voices.
pub const MODEL_QWEN3_TTS_VC_REALTIME: &str = "qwen3-tts-vc-realtime-2025-11-27";

/// Voice-enrollment service model.
pub const MODEL_QWEN_VOICE_ENROLLMENT: &str = "qwen-voice-enrollment";

/// Response formats supported by the realtime TTS endpoint.
pub const RESPONSE_FORMAT_PCM: &str = "pcm";
pub const RESPONSE_FORMAT_WAV: &str = "wav";
pub const RESPONSE_FORMAT_MP3: &str = "mp3";

/// Sample rate of the PCM stream returned by the realtime TTS endpoint.
pub const DEFAULT_SAMPLE_RATE: u32 = 24000;

/// Session commit modes.
pub const MODE_SERVER_COMMIT: &str = "server_commit";
pub const MODE_COMMIT: &str = "commit";

/// Enrollment actions.
pub const ACTION_CREATE: &str = "create";
pub const ACTION_LIST: &str = "list";
pub const ACTION_DELETE: &str = "delete";

/// Preferred name used for enrolled voices when none is given.
pub const DEFAULT_PREFERRED_NAME: &str = "custom_voice";

/// Default page size for voice listings.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Service region. Each region has its own REST and realtime hosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Beijing (mainland China).
    #[default]
    #[serde(alias = "beijing")]
    Cn,
    /// Singapore (international).
    #[serde(alias = "singapore")]
    Intl,
}

impl Region {
    /// Returns the HTTP base URL for this region.
    pub fn http_base_url(&self) -> &'static str {
        match self {
            Region::Cn => "https://dashscope.aliyuncs.com",
            Region::Intl => "https://dashscope-intl.aliyuncs.com",
        }
    }

    /// Returns the realtime WebSocket URL for this region.
    pub fn realtime_url(&self) -> &'static str {
        match self {
            Region::Cn => "wss://dashscope.aliyuncs.com/api-ws/v1/realtime",
            Region::Intl => "wss://dashscope-intl.aliyuncs.com/api-ws/v1/realtime",
        }
    }

    /// Human readable node name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Region::Cn => "Beijing",
            Region::Intl => "Singapore",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Cn => "cn",
            Region::Intl => "intl",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cn" | "beijing" => Ok(Region::Cn),
            "intl" | "singapore" => Ok(Region::Intl),
            other => Err(format!("unknown region: {other} (expected cn or intl)")),
        }
    }
}

/// Session configuration for the realtime TTS endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsSessionConfig {
    /// Voice ID, usually one returned by voice enrollment.
    pub voice: String,

    /// Output format (default: pcm).
    #[serde(default = "default_response_format")]
    pub response_format: String,

    /// Output sample rate (default: 24000).
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Commit mode (default: server_commit).
    #[serde(default = "default_mode")]
    pub mode: String,
}

fn default_response_format() -> String {
    RESPONSE_FORMAT_PCM.to_string()
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

fn default_mode() -> String {
    MODE_SERVER_COMMIT.to_string()
}

impl TtsSessionConfig {
    /// PCM 24 kHz mono 16-bit output in server-commit mode.
    pub fn pcm(voice: impl Into<String>) -> Self {
        Self {
            voice: voice.into(),
            response_format: default_response_format(),
            sample_rate: default_sample_rate(),
            mode: default_mode(),
        }
    }
}

/// A voice returned by the enrollment list action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceRecord {
    /// Voice identifier.
    pub voice: String,

    /// Creation time as reported by the service.
    #[serde(default)]
    pub gmt_create: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmt_modified: Option<String>,

    /// Realtime model the voice was enrolled for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_model: Option<String>,
}

/// Session information from server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
}

/// Usage statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<i32>,
}
