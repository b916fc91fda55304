//! Debug console keys and line formatting
//!
//! Values are printed as `<key>=<value>`, acknowledgments as `OK <key>`.
//! Lowercase keys read a value, uppercase keys set one.

use core::fmt::{Display, Write};

use heapless::String;

use crate::packet::PacketType;

/// One formatted debug line
pub type DebugLine = String<64>;

/// Single-character keys of the debug console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SerialKey {
    RemoteVersion = b'V',
    RemoteRole = b'R',
    MaxSpeedGet = b'm',
    MaxSpeedSet = b'M',
    AccelGet = b'a',
    AccelSet = b'A',
    RemoteChannelGet = b'c',
    RemoteChannelSet = b'C',
    IdGet = b'i',
    IdSet = b'I',
    NameGet = b'n',
    NameSet = b'N',
    TargetPositionGet = b'p',
    TargetPositionSet = b'P',
    PresetIndexGet = b'h',
    PresetIndexSet = b'H',
    StartStateGet = b'u',
    StartStateSet = b'U',
    SaveConfig = b'w',
    ReloadConfig = b'l',
    Encoder = b'e',
    Pot = b'o',
}

impl SerialKey {
    const ALL: [SerialKey; 22] = [
        SerialKey::RemoteVersion,
        SerialKey::RemoteRole,
        SerialKey::MaxSpeedGet,
        SerialKey::MaxSpeedSet,
        SerialKey::AccelGet,
        SerialKey::AccelSet,
        SerialKey::RemoteChannelGet,
        SerialKey::RemoteChannelSet,
        SerialKey::IdGet,
        SerialKey::IdSet,
        SerialKey::NameGet,
        SerialKey::NameSet,
        SerialKey::TargetPositionGet,
        SerialKey::TargetPositionSet,
        SerialKey::PresetIndexGet,
        SerialKey::PresetIndexSet,
        SerialKey::StartStateGet,
        SerialKey::StartStateSet,
        SerialKey::SaveConfig,
        SerialKey::ReloadConfig,
        SerialKey::Encoder,
        SerialKey::Pot,
    ];

    /// Key character
    pub fn as_char(self) -> char {
        self as u8 as char
    }

    /// Parse a key from its character byte
    pub fn from_u8(byte: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| *k as u8 == byte)
    }

    /// Format `<key>=<value>`
    pub fn value_line(self, value: impl Display) -> DebugLine {
        let mut line = DebugLine::new();
        // Overlong values are truncated by the fixed capacity
        let _ = write!(line, "{}={}", self.as_char(), value);
        line
    }

    /// Format `OK <key>`
    pub fn ok_line(self) -> DebugLine {
        let mut line = DebugLine::new();
        let _ = write!(line, "OK {}", self.as_char());
        line
    }
}

/// Console key reported for an acknowledged packet tag
///
/// Tags without an entry (GETs, PRINTs and the momentary percent commands)
/// are not reported.
pub fn ok_code(key: u8) -> Option<SerialKey> {
    match PacketType::from_u8(key)? {
        PacketType::MaxSpeedSet => Some(SerialKey::MaxSpeedSet),
        PacketType::AccelSet => Some(SerialKey::AccelSet),
        PacketType::ChannelSet => Some(SerialKey::RemoteChannelSet),
        PacketType::ProfileIdSet => Some(SerialKey::IdSet),
        PacketType::ProfileNameSet => Some(SerialKey::NameSet),
        PacketType::TargetPositionSet => Some(SerialKey::TargetPositionSet),
        PacketType::SaveConfig => Some(SerialKey::SaveConfig),
        PacketType::ReloadConfig => Some(SerialKey::ReloadConfig),
        PacketType::PresetIndexSet => Some(SerialKey::PresetIndexSet),
        PacketType::StartStateSet => Some(SerialKey::StartStateSet),
        _ => None,
    }
}
