//! DashScope (Aliyun Model Studio) API SDK for Rust.
//!
//! This crate covers the two services used for cloned-voice TTS:
//! the voice-enrollment REST endpoint and the Qwen realtime TTS WebSocket API.
//!
//! # Example
//!
//! ```rust,no_run
//! use yotts_dashscope::{Client, Region, TtsRealtimeConfig, TtsSessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::builder("your-api-key").region(Region::Cn).build()?;
//!
//!     let voice = client
//!         .voice()
//!         .create_from_file("input.mp3", yotts_dashscope::MODEL_QWEN3_TTS_VC_REALTIME)
//!         .await?;
//!
//!     let mut session = client.tts_realtime().connect(&TtsRealtimeConfig::default()).await?;
//!     session.update_session(&TtsSessionConfig::pcm(&voice)).await?;
//!     session.append_text("hello").await?;
//!     session.finish_session().await?;
//!
//!     let mut pcm = Vec::new();
//!     session.collect_audio(|chunk| pcm.extend(chunk)).await?;
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod event;
mod http;
mod realtime;
mod types;
mod voice;

pub use client::{Client, ClientBuilder, DEFAULT_HTTP_BASE_URL, DEFAULT_REALTIME_URL};
pub use error::{Error, Result};
pub use event::*;
pub use http::DEFAULT_HTTP_TIMEOUT;
pub use realtime::{TtsRealtimeConfig, TtsRealtimeService, TtsRealtimeSession};
pub use types::*;
pub use voice::{guess_audio_mime, VoiceCreateRequest, VoiceService, VOICE_CUSTOMIZATION_PATH};
