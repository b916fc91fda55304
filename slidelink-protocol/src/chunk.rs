//! String chunking and reassembly
//!
//! A string travels as the bytes of the text followed by a NUL terminator,
//! cut into frames of at most [`PACKET_STRING_LEN`] bytes. All chunks of one
//! string share a tag; the receiver knows the string is complete when a
//! chunk contains the terminator.

use heapless::{String, Vec};

use crate::frame::PACKET_STRING_LEN;
use crate::packet::{Chunk, PacketType};

/// Longest string the receiver will reassemble (terminator excluded)
pub const MAX_STRING_LEN: usize = 48;

/// A fully reassembled string
pub type AssembledString = String<MAX_STRING_LEN>;

/// Split `text` into NUL-terminated chunks
///
/// Text after an interior NUL is not sent.
pub fn string_chunks(text: &[u8]) -> StringChunks<'_> {
    let len = text.iter().position(|&b| b == 0).unwrap_or(text.len());
    StringChunks {
        text: &text[..len],
        pos: 0,
        done: false,
    }
}

/// Iterator over the chunks of one string
#[derive(Debug, Clone)]
pub struct StringChunks<'a> {
    text: &'a [u8],
    pos: usize,
    done: bool,
}

impl Iterator for StringChunks<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.done {
            return None;
        }

        // Remaining bytes including the terminator
        let remaining = self.text.len() + 1 - self.pos;
        let take = remaining.min(PACKET_STRING_LEN);

        let mut chunk = Chunk::new();
        for i in 0..take {
            let byte = self.text.get(self.pos + i).copied().unwrap_or(0);
            // take <= PACKET_STRING_LEN, so the push always fits
            let _ = chunk.push(byte);
        }

        self.pos += take;
        if self.pos > self.text.len() {
            self.done = true;
        }
        Some(chunk)
    }
}

/// Receiver-side accumulation of chunked strings
#[derive(Debug, Default)]
pub struct StringReassembly {
    tag: Option<PacketType>,
    buffer: Vec<u8, MAX_STRING_LEN>,
    discarding: bool,
}

impl StringReassembly {
    /// Create an empty reassembly buffer
    pub const fn new() -> Self {
        Self {
            tag: None,
            buffer: Vec::new(),
            discarding: false,
        }
    }

    /// Forget any partial string
    pub fn reset(&mut self) {
        self.tag = None;
        self.buffer.clear();
        self.discarding = false;
    }

    /// Feed one received chunk
    ///
    /// Returns the complete string when `chunk` holds the terminator.
    /// A chunk with a different tag than the one being accumulated starts
    /// over. A string that outgrows [`MAX_STRING_LEN`] is dropped as a
    /// whole, and so is one that is not valid UTF-8.
    pub fn feed(&mut self, tag: PacketType, chunk: &[u8]) -> Option<AssembledString> {
        if self.tag != Some(tag) {
            self.reset();
            self.tag = Some(tag);
        }

        let (body, terminated) = match chunk.iter().position(|&b| b == 0) {
            Some(nul) => (&chunk[..nul], true),
            None => (chunk, false),
        };

        if !self.discarding && self.buffer.extend_from_slice(body).is_err() {
            self.buffer.clear();
            self.discarding = true;
        }

        if !terminated {
            return None;
        }

        let complete = if self.discarding {
            None
        } else {
            core::str::from_utf8(&self.buffer)
                .ok()
                .and_then(|s| AssembledString::try_from(s).ok())
        };
        self.reset();
        complete
    }

    /// Tag of the string currently being accumulated
    pub fn pending_tag(&self) -> Option<PacketType> {
        self.tag
    }
}
