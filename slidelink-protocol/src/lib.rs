//! SlideLink Radio Protocol
//!
//! This crate defines the packet protocol between the handheld transmitter
//! and the slider's receiver, plus the line framing of the serial debug
//! console.
//!
//! # Protocol Overview
//!
//! Every packet occupies exactly one fixed-size radio frame:
//! ```text
//! ┌──────┬──────────────────────────────────────┐
//! │ TAG  │ PAYLOAD (zero padded)                │
//! │ 1B   │ 16B: integer (LE) or string chunk    │
//! └──────┴──────────────────────────────────────┘
//! ```
//!
//! Settings families follow a GET / SET / PRINT pattern: a GET asks the far
//! side for a value, a SET carries a value to apply, a PRINT carries a value
//! for human-readable echo. Mutating and printing packets are answered with
//! an `Ok` packet carrying the tag being acknowledged.
//!
//! Strings longer than one frame are sent as a run of chunks with the same
//! tag, the last one holding a NUL terminator.

#![no_std]
#![deny(unsafe_code)]

pub mod chunk;
pub mod console;
pub mod frame;
pub mod packet;
pub mod serial;

pub use chunk::{string_chunks, AssembledString, StringChunks, StringReassembly, MAX_STRING_LEN};
pub use console::{Command, CommandParser, ConsoleError, IN_BUFFER_SIZE};
pub use frame::{Frame, FrameError, FRAME_SIZE, PACKET_STRING_LEN};
pub use packet::{Chunk, DecodeError, Packet, PacketType, ROLE_TRANSMITTER};
pub use serial::{ok_code, DebugLine, SerialKey};
