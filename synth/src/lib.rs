//! Text to audio file synthesis.
//!
//! [`Synthesizer`] is the seam both front ends program against.
//! [`RealtimeSynthesizer`] implements it over a DashScope realtime TTS
//! session followed by the ffmpeg finisher.

mod error;
mod realtime;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

pub use error::{Result, SynthError};
pub use realtime::RealtimeSynthesizer;

/// Renders text into an audio file.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesizes `text` and writes the finished container file to `out`.
    ///
    /// Returns the path that was written.
    async fn synthesize(&self, text: &str, out: &Path) -> Result<PathBuf>;
}
