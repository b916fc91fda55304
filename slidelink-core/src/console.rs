//! Serial console command handling
//!
//! Executes parsed console commands against the local settings and the
//! radio link. Keys follow [`SerialKey`]: lowercase reads, uppercase
//! writes. Remote reads are answered asynchronously when the receiver's
//! PRINT packet arrives.

use core::fmt::Write;
use core::str::FromStr;

use slidelink_hal::{ControlInputs, DebugSink, SettingsStore};
use slidelink_protocol::{
    Command, ConsoleError, DebugLine, Packet, PacketType, SerialKey, MAX_STRING_LEN,
    ROLE_TRANSMITTER,
};

use crate::board::Board;
use crate::config::NUM_PRESETS;
use crate::link::{send_string, MAX_CHANNEL, MIN_CHANNEL};
use crate::state::Event;
use crate::VERSION;

/// Execute one command
///
/// Responses are written to the debug channel. A command either applies
/// fully or, on error, not at all. Returns an event for the mode
/// controller when local radio parameters changed.
pub fn execute<B: Board>(command: Command, io: &mut B) -> Result<Option<Event>, ConsoleError> {
    match command {
        Command::Echo(text) => {
            let line = DebugLine::try_from(text.as_str()).map_err(|_| ConsoleError::ResponseTooLong)?;
            io.debug().write_line(&line);
        }
        Command::Version => respond(io, format_args!("v={}", VERSION))?,
        Command::Role => respond(io, format_args!("r={}", ROLE_TRANSMITTER))?,
        Command::Get(key) => get(key, io)?,
        Command::Set { key, value } => return set(key, &value, io),
    }
    Ok(None)
}

fn get<B: Board>(key: u8, io: &mut B) -> Result<(), ConsoleError> {
    let key = SerialKey::from_u8(key).ok_or(ConsoleError::Malformed)?;
    let request = match key {
        SerialKey::Encoder => {
            let count = io.inputs().encoder_count();
            io.debug().write_line(&key.value_line(count));
            return Ok(());
        }
        SerialKey::Pot => {
            let raw = io.inputs().pot_raw();
            io.debug().write_line(&key.value_line(raw));
            return Ok(());
        }
        SerialKey::RemoteVersion => Packet::VersionGet,
        SerialKey::RemoteRole => Packet::RoleGet,
        SerialKey::MaxSpeedGet => Packet::MaxSpeedGet,
        SerialKey::AccelGet => Packet::AccelGet,
        SerialKey::RemoteChannelGet => Packet::ChannelGet,
        SerialKey::IdGet => Packet::ProfileIdGet,
        SerialKey::NameGet => Packet::ProfileNameGet,
        SerialKey::TargetPositionGet => Packet::TargetPositionGet,
        SerialKey::PresetIndexGet => Packet::PresetIndexGet,
        SerialKey::StartStateGet => Packet::StartStateGet,
        _ => return Err(ConsoleError::Malformed),
    };
    io.send(request);
    Ok(())
}

fn set<B: Board>(key: u8, value: &str, io: &mut B) -> Result<Option<Event>, ConsoleError> {
    let key = SerialKey::from_u8(key).ok_or(ConsoleError::Malformed)?;
    match key {
        SerialKey::MaxSpeedSet => {
            let max_speed: u16 = parse(value)?;
            io.settings().set_max_speed(max_speed);
            io.send(Packet::MaxSpeedSet(max_speed));
        }
        SerialKey::AccelSet => {
            let accel: i16 = parse(value)?;
            io.settings().set_max_accel(accel);
            io.send(Packet::AccelSet(accel));
        }
        SerialKey::RemoteChannelSet => {
            let channel: i16 = parse(value)?;
            if !(MIN_CHANNEL..=MAX_CHANNEL).contains(&channel) {
                return Err(ConsoleError::Malformed);
            }
            io.settings().set_channel(channel);
            io.send(Packet::ChannelSet(channel));
            io.retune_after_drain(channel);
        }
        SerialKey::IdSet => io.send(Packet::ProfileIdSet(parse(value)?)),
        SerialKey::NameSet => {
            if value.len() > MAX_STRING_LEN {
                return Err(ConsoleError::Malformed);
            }
            send_string(PacketType::ProfileNameSet, value, &mut |p| io.send(p));
        }
        SerialKey::TargetPositionSet => io.send(Packet::TargetPositionSet(parse(value)?)),
        SerialKey::PresetIndexSet => {
            let index: u8 = parse(value)?;
            if index as usize >= NUM_PRESETS {
                return Err(ConsoleError::Malformed);
            }
            io.settings().set_preset_index(index);
            let max_speed = io.settings().max_speed();
            let max_accel = io.settings().max_accel();
            io.send(Packet::MaxSpeedSet(max_speed));
            io.send(Packet::AccelSet(max_accel));
            io.debug().write_line(&key.ok_line());
            return Ok(Some(Event::UpdateParams));
        }
        SerialKey::StartStateSet => {
            let start = match value {
                "0" => false,
                "1" => true,
                _ => return Err(ConsoleError::Malformed),
            };
            io.settings().set_start_in_calibration(start);
            io.debug().write_line(&key.ok_line());
        }
        SerialKey::SaveConfig if value.is_empty() => {
            io.settings().flush_debounced();
            io.send(Packet::SaveConfig);
        }
        SerialKey::ReloadConfig if value.is_empty() => io.send(Packet::ReloadConfig),
        _ => return Err(ConsoleError::Malformed),
    }
    Ok(None)
}

fn parse<T: FromStr>(value: &str) -> Result<T, ConsoleError> {
    value.trim().parse().map_err(|_| ConsoleError::Malformed)
}

fn respond<B: Board>(io: &mut B, args: core::fmt::Arguments<'_>) -> Result<(), ConsoleError> {
    let mut line = DebugLine::new();
    line.write_fmt(args).map_err(|_| ConsoleError::ResponseTooLong)?;
    io.debug().write_line(&line);
    Ok(())
}
