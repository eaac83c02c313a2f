use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use yotts_audio::{Container, Transcoder};
use yotts_cli::Paths;
use yotts_dashscope::Client;
use yotts_synth::{RealtimeSynthesizer, Synthesizer};

use crate::config::{PluginConfig, PLUGIN_NAME};
use crate::error::{PluginError, Result};
use crate::gate::{decide, Gate, SkipReason};
use crate::message::{Component, MessageChain};

const TEMP_CLIP_PREFIX: &str = "temp_";

/// Result of one hook invocation.
#[derive(Debug)]
pub enum HookOutcome {
    /// The chain was left as is.
    Skipped(SkipReason),
    /// The chain now holds a single record pointing at this clip.
    Replaced(PathBuf),
    /// Synthesis was attempted and failed; the chain is untouched.
    Failed(PluginError),
}

impl HookOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, HookOutcome::Replaced(_))
    }

    /// The delivered clip, if any.
    pub fn clip(&self) -> Option<&Path> {
        match self {
            HookOutcome::Replaced(p) => Some(p),
            _ => None,
        }
    }
}

type Roll = Arc<dyn Fn() -> u32 + Send + Sync>;

/// The hook registered with the host.
pub struct YoTtsPlugin {
    config: PluginConfig,
    synthesizer: Arc<dyn Synthesizer>,
    data_dir: PathBuf,
    roll: Roll,
}

impl YoTtsPlugin {
    /// Validates `config`, checks that the transcoder is available and
    /// prepares the data directory.
    pub fn new(mut config: PluginConfig) -> Result<Self> {
        config.validate()?;

        let transcoder =
            Transcoder::locate(config.ffmpeg.as_deref()).map_err(PluginError::Preflight)?;
        let client = Client::builder(config.api_key.as_str()).region(config.region).build()?;
        let synthesizer = RealtimeSynthesizer::new(client, config.voice_id.as_str(), transcoder)
            .with_model(config.model.as_str())
            .with_container(Container::Wav);

        let data_dir = match &config.data_dir {
            Some(dir) => dir.clone(),
            None => Paths::new(PLUGIN_NAME)?.data_dir(),
        };
        info!(
            "TTS plugin ready: voice={}, region={}, probability={}%, max_length={}",
            config.voice_id,
            config.region.display_name(),
            config.probability(),
            config.max_length
        );
        Self::with_synthesizer(config, Arc::new(synthesizer), data_dir)
    }

    /// Builds the plugin around an existing synthesizer.
    pub fn with_synthesizer(
        config: PluginConfig,
        synthesizer: Arc<dyn Synthesizer>,
        data_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self {
            config,
            synthesizer,
            data_dir,
            roll: Arc::new(|| rand::thread_rng().gen_range(1..=100)),
        })
    }

    /// Replaces the 1..=100 roll.
    pub fn with_roll(mut self, roll: impl Fn() -> u32 + Send + Sync + 'static) -> Self {
        self.roll = Arc::new(roll);
        self
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Decorating-result hook.
    ///
    /// On success the chain is replaced by a single record. Failures are
    /// logged and returned; the chain is then left untouched.
    pub async fn on_decorating_result(&self, chain: &mut MessageChain) -> HookOutcome {
        let text = chain.text();
        let gate = decide(
            text.as_deref(),
            self.config.probability(),
            self.config.max_length,
            || (self.roll)(),
        );
        let text = match gate {
            Gate::Speak(text) => text,
            Gate::Skip(reason) => {
                debug!("TTS skipped: {}", reason);
                return HookOutcome::Skipped(reason);
            }
        };

        match self.generate(&text).await {
            Ok(clip) => {
                chain.replace(Component::record(&clip));
                HookOutcome::Replaced(clip)
            }
            Err(e) => {
                warn!("TTS failed, keeping text reply: {}", e);
                HookOutcome::Failed(e)
            }
        }
    }

    /// Synthesizes `text` into a clip under the data directory.
    pub async fn generate(&self, text: &str) -> Result<PathBuf> {
        let out = self
            .data_dir
            .join(clip_file_name(text, self.config.save_audio, Local::now()));
        let clip = self.synthesizer.synthesize(text, &out).await?;
        if !clip.exists() {
            return Err(PluginError::MissingClip(clip.display().to_string()));
        }
        debug!("Clip ready: {}", clip.display());
        Ok(clip)
    }

    /// Removes a delivered clip when audio is not being kept.
    ///
    /// Returns true if a file was removed. Saved clips and files outside
    /// the data directory are never touched.
    pub fn release(&self, clip: &Path) -> Result<bool> {
        if self.config.save_audio || clip.parent() != Some(self.data_dir.as_path()) {
            return Ok(false);
        }
        let is_temp = clip
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(TEMP_CLIP_PREFIX));
        if !is_temp {
            return Ok(false);
        }
        match std::fs::remove_file(clip) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// File name for a clip of `text`.
///
/// Saved clips are named by time (`tts_YYYYmmdd_HHMMSS.wav`). Transient
/// ones by the first 8 hex digits of the text's SHA-256 plus a random
/// suffix, so concurrent hooks for the same text never share a file.
pub fn clip_file_name(text: &str, save_audio: bool, now: DateTime<Local>) -> String {
    if save_audio {
        format!("tts_{}.wav", now.format("%Y%m%d_%H%M%S"))
    } else {
        let digest = Sha256::digest(text.as_bytes());
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        format!("{}{}_{}.wav", TEMP_CLIP_PREFIX, &hex::encode(digest)[..8], &nonce[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_saved_clip_name() {
        let now = Local.with_ymd_and_hms(2025, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(clip_file_name("hi", true, now), "tts_20250309_070501.wav");
    }

    #[test]
    fn test_temp_clip_name() {
        let now = Local::now();
        let a = clip_file_name("hello", false, now);
        assert!(a.starts_with("temp_2cf24dba_"), "{a}");
        assert!(a.ends_with(".wav"));
        assert_eq!(a.len(), "temp_2cf24dba_12345678.wav".len());
        assert_ne!(a, clip_file_name("hello", false, now));
        assert!(!clip_file_name("hello!", false, now).starts_with("temp_2cf24dba_"));
    }

    #[test]
    fn test_outcome_clip() {
        let outcome = HookOutcome::Replaced(PathBuf::from("/tmp/a.wav"));
        assert!(outcome.is_replaced());
        assert_eq!(outcome.clip(), Some(Path::new("/tmp/a.wav")));
        assert!(HookOutcome::Skipped(SkipReason::Disabled).clip().is_none());
    }
}
