//! PCM audio format definitions.

use std::time::Duration;

/// Describes a signed 16-bit little-endian PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    /// Sample rate in Hz (e.g., 16000, 24000).
    pub sample_rate: u32,
    /// True for stereo (2 channels), false for mono (1 channel).
    pub stereo: bool,
}

impl Format {
    /// 24kHz mono, the realtime TTS output format.
    pub const L16_MONO_24K: Format = Format::mono(24000);

    /// Creates a new format with the given sample rate and mono audio.
    pub const fn mono(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            stereo: false,
        }
    }

    /// Returns the number of channels (1 for mono, 2 for stereo).
    pub fn channels(&self) -> u32 {
        if self.stereo { 2 } else { 1 }
    }

    /// Bits per sample. Always 16.
    pub fn depth(&self) -> u32 {
        16
    }

    /// Returns the number of bytes per sample frame.
    pub fn frame_bytes(&self) -> usize {
        (self.channels() * self.depth() / 8) as usize
    }

    /// Bytes per second of audio.
    pub fn bytes_rate(&self) -> u64 {
        self.sample_rate as u64 * self.frame_bytes() as u64
    }

    /// Duration of `bytes` bytes of audio in this format.
    ///
    /// `bytes / (sample_rate × channels × 2)` seconds; a trailing partial
    /// frame is ignored.
    pub fn duration(&self, bytes: u64) -> Duration {
        let rate = self.bytes_rate();
        if rate == 0 {
            return Duration::ZERO;
        }
        let bytes = bytes - bytes % self.frame_bytes() as u64;
        Duration::from_nanos((bytes as u128 * 1_000_000_000 / rate as u128) as u64)
    }

    /// ffmpeg `-f` demuxer name for this format.
    pub fn ffmpeg_format(&self) -> &'static str {
        "s16le"
    }
}

impl Default for Format {
    fn default() -> Self {
        Self::L16_MONO_24K
    }
}
