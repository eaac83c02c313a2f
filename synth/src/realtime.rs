use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};
use yotts_audio::{AudioBuffer, Container, Format, Transcoder};
use yotts_dashscope::{
    Client, TtsRealtimeConfig, TtsSessionConfig, EVENT_TYPE_SESSION_CREATED,
    MODEL_QWEN3_TTS_VC_REALTIME,
};

use crate::error::{Result, SynthError};
use crate::Synthesizer;

/// Synthesizer backed by one realtime TTS session per call.
#[derive(Clone)]
pub struct RealtimeSynthesizer {
    client: Client,
    model: String,
    voice: String,
    container: Container,
    transcoder: Transcoder,
}

impl RealtimeSynthesizer {
    /// Creates a synthesizer for `voice` producing WAV output.
    pub fn new(client: Client, voice: impl Into<String>, transcoder: Transcoder) -> Self {
        Self {
            client,
            model: MODEL_QWEN3_TTS_VC_REALTIME.to_string(),
            voice: voice.into(),
            container: Container::Wav,
            transcoder,
        }
    }

    /// Overrides the realtime model. Empty keeps the default.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.is_empty() {
            self.model = model;
        }
        self
    }

    /// Sets the output container.
    pub fn with_container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    pub fn container(&self) -> Container {
        self.container
    }

    /// Runs one realtime session for `text` and returns the collected PCM.
    pub async fn render(&self, text: &str) -> Result<AudioBuffer> {
        if text.trim().is_empty() {
            return Err(SynthError::EmptyText);
        }

        let mut session = self
            .client
            .tts_realtime()
            .connect(&TtsRealtimeConfig {
                model: self.model.clone(),
            })
            .await?;

        session.wait_for_event(EVENT_TYPE_SESSION_CREATED).await?;
        debug!("Session created: {:?}", session.session_id());

        let session_config = TtsSessionConfig::pcm(&self.voice);
        let format = Format::mono(session_config.sample_rate);
        session.update_session(&session_config).await?;
        session.append_text(text).await?;
        session.finish_session().await?;

        let mut buffer = AudioBuffer::new(format);
        let collected = session.collect_audio(|chunk| buffer.push(chunk)).await;
        let _ = session.close().await;
        collected?;

        if buffer.is_empty() {
            return Err(SynthError::NoAudio);
        }
        debug!(
            "Collected {} bytes in {} fragments ({:?})",
            buffer.len(),
            buffer.fragment_count(),
            buffer.duration()
        );
        Ok(buffer)
    }
}

#[async_trait]
impl Synthesizer for RealtimeSynthesizer {
    async fn synthesize(&self, text: &str, out: &Path) -> Result<PathBuf> {
        let buffer = self.render(text).await?;
        let path = self.transcoder.finish(&buffer, self.container, out).await?;
        info!("Wrote {} ({:?})", path.display(), buffer.duration());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yotts_dashscope::DEFAULT_SAMPLE_RATE;

    fn synth() -> RealtimeSynthesizer {
        let client = Client::new("sk-test").unwrap();
        RealtimeSynthesizer::new(client, "qwen-tts-vc-a", Transcoder::with_program("ffmpeg"))
    }

    #[test]
    fn test_defaults() {
        let s = synth();
        assert_eq!(s.model(), MODEL_QWEN3_TTS_VC_REALTIME);
        assert_eq!(s.voice(), "qwen-tts-vc-a");
        assert_eq!(s.container(), Container::Wav);
        assert_eq!(TtsSessionConfig::pcm("v").sample_rate, DEFAULT_SAMPLE_RATE);
    }

    #[test]
    fn test_with_model() {
        let s = synth().with_model("").with_container(Container::MP3_128K);
        assert_eq!(s.model(), MODEL_QWEN3_TTS_VC_REALTIME);
        assert_eq!(s.container(), Container::MP3_128K);

        let s = s.with_model("qwen3-tts-vc-realtime-next");
        assert_eq!(s.model(), "qwen3-tts-vc-realtime-next");
    }

    #[tokio::test]
    async fn test_empty_text_never_connects() {
        let err = synth().render("   ").await.unwrap_err();
        assert!(matches!(err, SynthError::EmptyText));
    }
}
