//! Packet types for the transmitter/receiver link
//!
//! Each settings family has a subset of:
//! - silent GET: far side answers with a SET carrying its value
//! - GET: far side answers with a PRINT carrying its value
//! - SET: apply the value, answer with `Ok`
//! - PRINT: show the value, answer with `Ok`

use heapless::Vec;

use crate::frame::{Frame, PACKET_STRING_LEN};

/// Role reported by a transmitter
pub const ROLE_TRANSMITTER: u16 = 1;

/// One frame's worth of string bytes
pub type Chunk = Vec<u8, PACKET_STRING_LEN>;

/// Packet tags (wire byte of every frame)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PacketType {
    VersionGet = b'v',
    VersionPrint = b'V',
    RoleGet = b'r',
    RolePrint = b'R',
    MaxSpeedGetSilent = b'm',
    MaxSpeedGet = b'n',
    MaxSpeedSet = b'M',
    MaxSpeedPrint = b'N',
    AccelGetSilent = b'a',
    AccelGet = b'b',
    AccelSet = b'A',
    AccelPrint = b'B',
    ChannelGet = b'c',
    ChannelSet = b'C',
    ChannelPrint = b'D',
    ProfileIdGet = b'i',
    ProfileIdSet = b'I',
    ProfileIdPrint = b'J',
    ProfileNameGet = b'k',
    ProfileNameSet = b'K',
    ProfileNamePrint = b'L',
    TargetPositionGet = b'p',
    TargetPositionSet = b'P',
    TargetPositionPrint = b'Q',
    SpeedPercentSet = b'S',
    AccelPercentSet = b'T',
    SaveConfig = b'w',
    ReloadConfig = b'l',
    PresetIndexGet = b'h',
    PresetIndexSet = b'H',
    PresetIndexPrint = b'G',
    StartStateGet = b'u',
    StartStateSet = b'U',
    StartStatePrint = b'Y',
    Ok = b'o',
}

impl PacketType {
    /// Every tag, in declaration order
    pub const ALL: [PacketType; 35] = [
        PacketType::VersionGet,
        PacketType::VersionPrint,
        PacketType::RoleGet,
        PacketType::RolePrint,
        PacketType::MaxSpeedGetSilent,
        PacketType::MaxSpeedGet,
        PacketType::MaxSpeedSet,
        PacketType::MaxSpeedPrint,
        PacketType::AccelGetSilent,
        PacketType::AccelGet,
        PacketType::AccelSet,
        PacketType::AccelPrint,
        PacketType::ChannelGet,
        PacketType::ChannelSet,
        PacketType::ChannelPrint,
        PacketType::ProfileIdGet,
        PacketType::ProfileIdSet,
        PacketType::ProfileIdPrint,
        PacketType::ProfileNameGet,
        PacketType::ProfileNameSet,
        PacketType::ProfileNamePrint,
        PacketType::TargetPositionGet,
        PacketType::TargetPositionSet,
        PacketType::TargetPositionPrint,
        PacketType::SpeedPercentSet,
        PacketType::AccelPercentSet,
        PacketType::SaveConfig,
        PacketType::ReloadConfig,
        PacketType::PresetIndexGet,
        PacketType::PresetIndexSet,
        PacketType::PresetIndexPrint,
        PacketType::StartStateGet,
        PacketType::StartStateSet,
        PacketType::StartStatePrint,
        PacketType::Ok,
    ];

    /// Get the tag as its wire byte
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a tag from its wire byte
    pub fn from_u8(byte: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_u8() == byte)
    }
}

/// Errors decoding a received frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Tag byte is not a known packet type
    UnknownTag(u8),
}

/// A decoded packet
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Packet {
    VersionGet,
    VersionPrint(Chunk),
    RoleGet,
    RolePrint(u16),
    MaxSpeedGetSilent,
    MaxSpeedGet,
    MaxSpeedSet(u16),
    MaxSpeedPrint(u16),
    AccelGetSilent,
    AccelGet,
    AccelSet(i16),
    AccelPrint(i16),
    ChannelGet,
    ChannelSet(i16),
    ChannelPrint(i16),
    ProfileIdGet,
    ProfileIdSet(u32),
    ProfileIdPrint(u32),
    ProfileNameGet,
    ProfileNameSet(Chunk),
    ProfileNamePrint(Chunk),
    TargetPositionGet,
    TargetPositionSet(i32),
    TargetPositionPrint(i32),
    SpeedPercentSet(i16),
    AccelPercentSet(i16),
    SaveConfig,
    ReloadConfig,
    PresetIndexGet,
    PresetIndexSet(i16),
    PresetIndexPrint(i16),
    StartStateGet,
    StartStateSet(bool),
    StartStatePrint(bool),
    /// Acknowledgment; `key` is the raw tag being confirmed
    Ok { key: u8 },
}

impl Packet {
    /// Acknowledge a packet type
    pub fn ok(key: PacketType) -> Self {
        Packet::Ok { key: key.as_u8() }
    }

    /// Build a string-carrying packet from one chunk
    ///
    /// Returns `None` if `tag` does not carry a string.
    pub fn string(tag: PacketType, chunk: Chunk) -> Option<Self> {
        match tag {
            PacketType::VersionPrint => Some(Packet::VersionPrint(chunk)),
            PacketType::ProfileNameSet => Some(Packet::ProfileNameSet(chunk)),
            PacketType::ProfileNamePrint => Some(Packet::ProfileNamePrint(chunk)),
            _ => None,
        }
    }

    /// Tag of this packet
    pub fn packet_type(&self) -> PacketType {
        use PacketType as T;
        match self {
            Packet::VersionGet => T::VersionGet,
            Packet::VersionPrint(_) => T::VersionPrint,
            Packet::RoleGet => T::RoleGet,
            Packet::RolePrint(_) => T::RolePrint,
            Packet::MaxSpeedGetSilent => T::MaxSpeedGetSilent,
            Packet::MaxSpeedGet => T::MaxSpeedGet,
            Packet::MaxSpeedSet(_) => T::MaxSpeedSet,
            Packet::MaxSpeedPrint(_) => T::MaxSpeedPrint,
            Packet::AccelGetSilent => T::AccelGetSilent,
            Packet::AccelGet => T::AccelGet,
            Packet::AccelSet(_) => T::AccelSet,
            Packet::AccelPrint(_) => T::AccelPrint,
            Packet::ChannelGet => T::ChannelGet,
            Packet::ChannelSet(_) => T::ChannelSet,
            Packet::ChannelPrint(_) => T::ChannelPrint,
            Packet::ProfileIdGet => T::ProfileIdGet,
            Packet::ProfileIdSet(_) => T::ProfileIdSet,
            Packet::ProfileIdPrint(_) => T::ProfileIdPrint,
            Packet::ProfileNameGet => T::ProfileNameGet,
            Packet::ProfileNameSet(_) => T::ProfileNameSet,
            Packet::ProfileNamePrint(_) => T::ProfileNamePrint,
            Packet::TargetPositionGet => T::TargetPositionGet,
            Packet::TargetPositionSet(_) => T::TargetPositionSet,
            Packet::TargetPositionPrint(_) => T::TargetPositionPrint,
            Packet::SpeedPercentSet(_) => T::SpeedPercentSet,
            Packet::AccelPercentSet(_) => T::AccelPercentSet,
            Packet::SaveConfig => T::SaveConfig,
            Packet::ReloadConfig => T::ReloadConfig,
            Packet::PresetIndexGet => T::PresetIndexGet,
            Packet::PresetIndexSet(_) => T::PresetIndexSet,
            Packet::PresetIndexPrint(_) => T::PresetIndexPrint,
            Packet::StartStateGet => T::StartStateGet,
            Packet::StartStateSet(_) => T::StartStateSet,
            Packet::StartStatePrint(_) => T::StartStatePrint,
            Packet::Ok { .. } => T::Ok,
        }
    }

    /// Encode this packet into a frame
    pub fn to_frame(&self) -> Frame {
        let tag = self.packet_type().as_u8();
        let mut bytes = [0u8; PACKET_STRING_LEN];

        let used = match self {
            Packet::RolePrint(v) | Packet::MaxSpeedSet(v) | Packet::MaxSpeedPrint(v) => {
                put(&mut bytes, &v.to_le_bytes())
            }
            Packet::AccelSet(v)
            | Packet::AccelPrint(v)
            | Packet::ChannelSet(v)
            | Packet::ChannelPrint(v)
            | Packet::SpeedPercentSet(v)
            | Packet::AccelPercentSet(v)
            | Packet::PresetIndexSet(v)
            | Packet::PresetIndexPrint(v) => put(&mut bytes, &v.to_le_bytes()),
            Packet::ProfileIdSet(v) | Packet::ProfileIdPrint(v) => {
                put(&mut bytes, &v.to_le_bytes())
            }
            Packet::TargetPositionSet(v) | Packet::TargetPositionPrint(v) => {
                put(&mut bytes, &v.to_le_bytes())
            }
            Packet::StartStateSet(v) | Packet::StartStatePrint(v) => put(&mut bytes, &[*v as u8]),
            Packet::VersionPrint(chunk)
            | Packet::ProfileNameSet(chunk)
            | Packet::ProfileNamePrint(chunk) => put(&mut bytes, chunk),
            Packet::Ok { key } => put(&mut bytes, &[*key]),
            _ => 0,
        };

        // `used` never exceeds PACKET_STRING_LEN, so this cannot fail
        Frame::with_payload(tag, &bytes[..used]).unwrap_or(Frame::new(tag))
    }

    /// Decode a packet from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, DecodeError> {
        use PacketType as T;

        let tag = frame.tag();
        let p = frame.payload();
        let t = PacketType::from_u8(tag).ok_or(DecodeError::UnknownTag(tag))?;

        let packet = match t {
            T::VersionGet => Packet::VersionGet,
            T::VersionPrint => Packet::VersionPrint(read_chunk(p)),
            T::RoleGet => Packet::RoleGet,
            T::RolePrint => Packet::RolePrint(read_u16(p)),
            T::MaxSpeedGetSilent => Packet::MaxSpeedGetSilent,
            T::MaxSpeedGet => Packet::MaxSpeedGet,
            T::MaxSpeedSet => Packet::MaxSpeedSet(read_u16(p)),
            T::MaxSpeedPrint => Packet::MaxSpeedPrint(read_u16(p)),
            T::AccelGetSilent => Packet::AccelGetSilent,
            T::AccelGet => Packet::AccelGet,
            T::AccelSet => Packet::AccelSet(read_i16(p)),
            T::AccelPrint => Packet::AccelPrint(read_i16(p)),
            T::ChannelGet => Packet::ChannelGet,
            T::ChannelSet => Packet::ChannelSet(read_i16(p)),
            T::ChannelPrint => Packet::ChannelPrint(read_i16(p)),
            T::ProfileIdGet => Packet::ProfileIdGet,
            T::ProfileIdSet => Packet::ProfileIdSet(read_u32(p)),
            T::ProfileIdPrint => Packet::ProfileIdPrint(read_u32(p)),
            T::ProfileNameGet => Packet::ProfileNameGet,
            T::ProfileNameSet => Packet::ProfileNameSet(read_chunk(p)),
            T::ProfileNamePrint => Packet::ProfileNamePrint(read_chunk(p)),
            T::TargetPositionGet => Packet::TargetPositionGet,
            T::TargetPositionSet => Packet::TargetPositionSet(read_i32(p)),
            T::TargetPositionPrint => Packet::TargetPositionPrint(read_i32(p)),
            T::SpeedPercentSet => Packet::SpeedPercentSet(read_i16(p)),
            T::AccelPercentSet => Packet::AccelPercentSet(read_i16(p)),
            T::SaveConfig => Packet::SaveConfig,
            T::ReloadConfig => Packet::ReloadConfig,
            T::PresetIndexGet => Packet::PresetIndexGet,
            T::PresetIndexSet => Packet::PresetIndexSet(read_i16(p)),
            T::PresetIndexPrint => Packet::PresetIndexPrint(read_i16(p)),
            T::StartStateGet => Packet::StartStateGet,
            T::StartStateSet => Packet::StartStateSet(p[0] != 0),
            T::StartStatePrint => Packet::StartStatePrint(p[0] != 0),
            T::Ok => Packet::Ok { key: p[0] },
        };

        Ok(packet)
    }
}

fn put(dst: &mut [u8; PACKET_STRING_LEN], src: &[u8]) -> usize {
    let len = src.len().min(PACKET_STRING_LEN);
    dst[..len].copy_from_slice(&src[..len]);
    len
}

fn read_u16(p: &[u8]) -> u16 {
    u16::from_le_bytes([p[0], p[1]])
}

fn read_i16(p: &[u8]) -> i16 {
    i16::from_le_bytes([p[0], p[1]])
}

fn read_u32(p: &[u8]) -> u32 {
    u32::from_le_bytes([p[0], p[1], p[2], p[3]])
}

fn read_i32(p: &[u8]) -> i32 {
    i32::from_le_bytes([p[0], p[1], p[2], p[3]])
}

/// String payload: everything up to and including the first NUL, or the
/// whole payload when the chunk is not the last one.
fn read_chunk(p: &[u8]) -> Chunk {
    let end = p
        .iter()
        .position(|&b| b == 0)
        .map(|nul| nul + 1)
        .unwrap_or(p.len());
    let mut chunk = Chunk::new();
    // p is exactly PACKET_STRING_LEN long, so this always fits
    let _ = chunk.extend_from_slice(&p[..end]);
    chunk
}
