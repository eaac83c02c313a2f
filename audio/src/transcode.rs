//! PCM to container transcoding through an external ffmpeg process.
//!
//! Buffered PCM is written to an intermediate `.pcm` file next to the output
//! and handed to ffmpeg. The intermediate file is removed when the call
//! returns, whether ffmpeg succeeded or not.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::pcm::{AudioBuffer, Format};

/// Default transcoder binary name, resolved on `PATH`.
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Errors from the transcoding step.
#[derive(Error, Debug)]
pub enum TranscodeError {
    /// The transcoder binary could not be found.
    #[error("transcoder not found: {0}")]
    NotFound(String),

    /// Nothing to transcode.
    #[error("no audio to transcode")]
    Empty,

    /// Transcoder exited unsuccessfully.
    #[error("transcoder failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TranscodeError>;

/// Output container produced by the transcoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// MP3 via libmp3lame at a constant bitrate.
    Mp3 { bitrate_kbps: u32 },
    /// 16-bit PCM WAV.
    Wav,
}

impl Container {
    /// MP3 at 128 kbps.
    pub const MP3_128K: Container = Container::Mp3 { bitrate_kbps: 128 };

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Container::Mp3 { .. } => "mp3",
            Container::Wav => "wav",
        }
    }

    fn codec_args(&self) -> Vec<String> {
        match self {
            Container::Mp3 { bitrate_kbps } => vec![
                "-codec:a".into(),
                "libmp3lame".into(),
                "-b:a".into(),
                format!("{}k", bitrate_kbps),
            ],
            Container::Wav => vec!["-codec:a".into(), "pcm_s16le".into()],
        }
    }
}

/// Handle to a located ffmpeg binary.
#[derive(Debug, Clone)]
pub struct Transcoder {
    program: PathBuf,
}

impl Transcoder {
    /// Resolves the transcoder: `custom` if given (a path or a name on
    /// `PATH`), otherwise `ffmpeg` on `PATH`.
    pub fn locate(custom: Option<&str>) -> Result<Self> {
        let name = custom.filter(|s| !s.trim().is_empty()).unwrap_or(DEFAULT_FFMPEG);
        let program =
            which::which(name).map_err(|e| TranscodeError::NotFound(format!("{name}: {e}")))?;
        debug!("Using transcoder: {}", program.display());
        Ok(Self { program })
    }

    /// Uses `program` as-is without a lookup.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Path of the resolved binary.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs `ffmpeg -version` and returns its first line.
    pub async fn version(&self) -> Result<String> {
        let output = Command::new(&self.program).arg("-version").output().await?;
        if !output.status.success() {
            return Err(TranscodeError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string())
    }

    /// Writes `buffer` to an intermediate file and transcodes it to `out`.
    ///
    /// On failure the partially written `out` is removed as well.
    pub async fn finish(
        &self,
        buffer: &AudioBuffer,
        container: Container,
        out: &Path,
    ) -> Result<PathBuf> {
        if buffer.is_empty() {
            return Err(TranscodeError::Empty);
        }

        let dir = match out.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&dir).await?;

        // Removed on drop, on every return path.
        let mut intermediate = tempfile::Builder::new()
            .prefix("yotts_")
            .suffix(".pcm")
            .tempfile_in(&dir)?;
        buffer.write_to(intermediate.as_file_mut())?;
        intermediate.as_file_mut().flush()?;
        debug!(
            "Wrote {} bytes ({} fragments) to {}",
            buffer.len(),
            buffer.fragment_count(),
            intermediate.path().display()
        );

        self.transcode_file(intermediate.path(), buffer.format(), container, out)
            .await?;

        if let Err(e) = intermediate.close() {
            warn!("Failed to remove intermediate file: {}", e);
        }
        Ok(out.to_path_buf())
    }

    /// Transcodes a raw PCM file to `out`.
    pub async fn transcode_file(
        &self,
        input: &Path,
        format: Format,
        container: Container,
        out: &Path,
    ) -> Result<()> {
        let args = transcode_args(input, format, container, out);
        debug!("Running {} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await?;

        if output.status.success() {
            return Ok(());
        }

        if out.exists() {
            if let Err(e) = tokio::fs::remove_file(out).await {
                warn!("Failed to remove partial output {}: {}", out.display(), e);
            }
        }
        Err(TranscodeError::Failed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Builds the static ffmpeg argument list.
pub fn transcode_args(
    input: &Path,
    format: Format,
    container: Container,
    out: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-hide_banner",
        "-loglevel",
        "error",
        "-y",
        "-f",
        format.ffmpeg_format(),
    ]
    .into_iter()
    .map(OsString::from)
    .collect();

    args.push("-ar".into());
    args.push(format.sample_rate.to_string().into());
    args.push("-ac".into());
    args.push(format.channels().to_string().into());
    args.push("-i".into());
    args.push(input.as_os_str().to_owned());
    args.extend(container.codec_args().into_iter().map(OsString::from));
    args.push(out.as_os_str().to_owned());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_mp3_args() {
        let args = strings(transcode_args(
            Path::new("in.pcm"),
            Format::L16_MONO_24K,
            Container::MP3_128K,
            Path::new("out.mp3"),
        ));
        assert_eq!(
            args,
            vec![
                "-hide_banner", "-loglevel", "error", "-y", "-f", "s16le", "-ar", "24000", "-ac", "1",
                "-i", "in.pcm", "-codec:a", "libmp3lame", "-b:a", "128k", "out.mp3",
            ]
        );
    }

    #[test]
    fn test_wav_args() {
        let args = strings(transcode_args(
            Path::new("in.pcm"),
            Format::L16_MONO_24K,
            Container::Wav,
            Path::new("out.wav"),
        ));
        assert_eq!(&args[args.len() - 3..], &["-codec:a", "pcm_s16le", "out.wav"]);
    }

    #[test]
    fn test_container_extension() {
        assert_eq!(Container::MP3_128K.extension(), "mp3");
        assert_eq!(Container::Wav.extension(), "wav");
    }

    #[test]
    fn test_locate_missing() {
        let err = Transcoder::locate(Some("definitely-not-a-real-transcoder-binary")).unwrap_err();
        assert!(matches!(err, TranscodeError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_finish_empty_buffer() {
        let t = Transcoder::with_program("ffmpeg");
        let dir = tempfile::tempdir().unwrap();
        let err = t
            .finish(&AudioBuffer::default(), Container::Wav, &dir.path().join("x.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, TranscodeError::Empty));
    }
}
