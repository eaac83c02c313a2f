//! Error types for the plugin.

use thiserror::Error;

/// Errors surfaced by the plugin.
#[derive(Error, Debug)]
pub enum PluginError {
    /// Invalid or incomplete configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The transcoder is not available.
    #[error("preflight failed: {0}")]
    Preflight(#[source] yotts_audio::TranscodeError),

    #[error("dashscope error: {0}")]
    DashScope(#[from] yotts_dashscope::Error),

    #[error("synthesis failed: {0}")]
    Synth(#[from] yotts_synth::SynthError),

    /// Synthesis reported success but the clip is missing.
    #[error("clip not found: {0}")]
    MissingClip(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PluginError>;
