//! Fixed-size radio frames.
//!
//! Frame format:
//! - TAG (1 byte): packet type identifier
//! - PAYLOAD (16 bytes): little-endian integer or string chunk, zero padded
//!
//! The radio is configured with a static payload width of [`FRAME_SIZE`],
//! so every frame on air has the same length.

/// Maximum string bytes carried by one frame
pub const PACKET_STRING_LEN: usize = 16;

/// Complete frame size (TAG + PAYLOAD)
pub const FRAME_SIZE: usize = 1 + PACKET_STRING_LEN;

/// Errors building a frame from received bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// No bytes at all (not even a tag)
    Empty,
    /// More bytes than a frame holds
    TooLong,
}

/// One radio frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    bytes: [u8; FRAME_SIZE],
}

impl Frame {
    /// Create a frame with the given tag and an all-zero payload
    pub const fn new(tag: u8) -> Self {
        let mut bytes = [0u8; FRAME_SIZE];
        bytes[0] = tag;
        Self { bytes }
    }

    /// Create a frame with the given tag and leading payload bytes
    ///
    /// Payload bytes beyond [`PACKET_STRING_LEN`] are rejected.
    pub fn with_payload(tag: u8, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > PACKET_STRING_LEN {
            return Err(FrameError::TooLong);
        }
        let mut frame = Self::new(tag);
        frame.bytes[1..1 + payload.len()].copy_from_slice(payload);
        Ok(frame)
    }

    /// Build a frame from bytes received off the air
    ///
    /// Short reads are zero padded.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.is_empty() {
            return Err(FrameError::Empty);
        }
        if bytes.len() > FRAME_SIZE {
            return Err(FrameError::TooLong);
        }
        let mut frame = Self::new(0);
        frame.bytes[..bytes.len()].copy_from_slice(bytes);
        Ok(frame)
    }

    /// Packet tag byte
    pub fn tag(&self) -> u8 {
        self.bytes[0]
    }

    /// Payload bytes (always [`PACKET_STRING_LEN`] long)
    pub fn payload(&self) -> &[u8] {
        &self.bytes[1..]
    }

    /// Whole frame as sent on air
    pub fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.bytes
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Frame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Frame({=u8}, {=[u8]})", self.tag(), self.payload())
    }
}
