//! Host-plugin hook for yotts.
//!
//! The host calls [`YoTtsPlugin::on_decorating_result`] with the outgoing
//! message chain. Short enough replies are, with the configured
//! probability, synthesized in the cloned voice and the chain is replaced
//! by a single [`Component::Record`].
//!
//! ```rust,no_run
//! use yotts_plugin::{MessageChain, PluginConfig, YoTtsPlugin};
//!
//! # async fn run() -> Result<(), yotts_plugin::PluginError> {
//! let config = PluginConfig::from_json(r#"{"api_key":"sk-xxx","voice_id":"qwen-tts-vc-a"}"#)?;
//! let plugin = YoTtsPlugin::new(config)?;
//!
//! let mut chain = MessageChain::plain("hello there");
//! let outcome = plugin.on_decorating_result(&mut chain).await;
//! if let Some(clip) = outcome.clip() {
//!     // send the chain, then
//!     plugin.release(clip)?;
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod gate;
mod message;
mod plugin;

pub use config::{PluginConfig, DEFAULT_MAX_LENGTH, DEFAULT_TTS_PROBABILITY, PLUGIN_NAME};
pub use error::{PluginError, Result};
pub use gate::{decide, Gate, SkipReason};
pub use message::{Component, MessageChain};
pub use plugin::{clip_file_name, HookOutcome, YoTtsPlugin};
