//! Audio utilities for synthesized speech.
//!
//! - `pcm`: 16-bit PCM format math and fragment buffering
//! - `transcode`: turning buffered PCM into a playable file with ffmpeg
//!
//! # Example
//!
//! ```rust
//! use yotts_audio::pcm::{AudioBuffer, Format};
//! use std::time::Duration;
//!
//! let mut buffer = AudioBuffer::new(Format::L16_MONO_24K);
//! buffer.push(vec![0u8; 4800]);
//! assert_eq!(buffer.duration(), Duration::from_millis(100));
//! ```

pub mod pcm;
pub mod transcode;

pub use pcm::{AudioBuffer, Format};
pub use transcode::{Container, TranscodeError, Transcoder};
