//! PCM (Pulse Code Modulation) audio handling.
//!
//! - [`Format`]: sample rate / channel layout of a 16-bit PCM stream
//! - [`AudioBuffer`]: ordered fragments received from a streaming session

mod buffer;
mod format;

pub use buffer::AudioBuffer;
pub use format::Format;
