//! Ordered accumulation of PCM fragments for one synthesis session.

use std::io::{self, Write};
use std::time::Duration;

use bytes::Bytes;

use super::Format;

/// Raw PCM fragments in arrival order.
///
/// Fragments are kept as received; they are only joined when written out,
/// so fragment boundaries never affect the resulting byte stream.
#[derive(Debug, Clone, Default)]
pub struct AudioBuffer {
    format: Format,
    fragments: Vec<Bytes>,
    len: u64,
}

impl AudioBuffer {
    /// Creates an empty buffer for the given format.
    pub fn new(format: Format) -> Self {
        Self {
            format,
            fragments: Vec::new(),
            len: 0,
        }
    }

    /// Appends a fragment. Empty fragments are ignored.
    pub fn push(&mut self, fragment: impl Into<Bytes>) {
        let fragment = fragment.into();
        if fragment.is_empty() {
            return;
        }
        self.len += fragment.len() as u64;
        self.fragments.push(fragment);
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Total bytes across all fragments.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of fragments received.
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Playback duration of the buffered audio.
    pub fn duration(&self) -> Duration {
        self.format.duration(self.len)
    }

    /// Writes all fragments, in order, to `w`.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<u64> {
        for fragment in &self.fragments {
            w.write_all(fragment)?;
        }
        Ok(self.len)
    }

    /// Joins all fragments into one contiguous vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len as usize);
        for fragment in &self.fragments {
            out.extend_from_slice(fragment);
        }
        out
    }
}
