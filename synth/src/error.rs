//! Error types for the synthesis pipeline.

use thiserror::Error;

/// Errors from a synthesis run.
#[derive(Error, Debug)]
pub enum SynthError {
    /// Connection, protocol or session error from DashScope.
    #[error("dashscope: {0}")]
    DashScope(#[from] yotts_dashscope::Error),

    /// The finisher failed.
    #[error("transcode: {0}")]
    Transcode(#[from] yotts_audio::TranscodeError),

    /// The session completed without producing audio.
    #[error("session completed without audio")]
    NoAudio,

    /// Nothing to synthesize.
    #[error("empty text")]
    EmptyText,
}

impl SynthError {
    /// Returns true if the failure came from the remote service.
    pub fn is_remote(&self) -> bool {
        matches!(self, SynthError::DashScope(_))
    }
}

pub type Result<T> = std::result::Result<T, SynthError>;
