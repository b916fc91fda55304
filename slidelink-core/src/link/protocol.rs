//! Inbound packet dispatch
//!
//! Applies received packets to the settings, answers queries, and echoes
//! printed values to the debug channel.

use slidelink_hal::{DebugSink, SettingsStore};
use slidelink_protocol::{
    ok_code, string_chunks, Packet, PacketType, SerialKey, StringReassembly,
    ROLE_TRANSMITTER,
};

use crate::VERSION;

/// Side effects the link owner must carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolAction {
    /// Retune the radio to this channel
    Retune(i16),
    /// Active preset changed
    ParamsChanged,
}

/// Last values of commands that are acted on rather than stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MomentaryValues {
    pub target_position: i32,
    pub speed_percent: i16,
    pub accel_percent: i16,
}

/// Packet dispatcher state
#[derive(Debug, Default)]
pub struct Protocol {
    reassembly: StringReassembly,
    momentary: MomentaryValues,
}

impl Protocol {
    pub const fn new() -> Self {
        Self {
            reassembly: StringReassembly::new(),
            momentary: MomentaryValues {
                target_position: 0,
                speed_percent: 0,
                accel_percent: 0,
            },
        }
    }

    /// Most recent momentary values, sent or received
    pub fn momentary(&self) -> &MomentaryValues {
        &self.momentary
    }

    /// Record a momentary value the transmitter itself is sending
    pub fn note_outgoing(&mut self, packet: &Packet) {
        self.record_momentary(packet);
    }

    fn record_momentary(&mut self, packet: &Packet) {
        match *packet {
            Packet::TargetPositionSet(p) => self.momentary.target_position = p,
            Packet::SpeedPercentSet(p) => self.momentary.speed_percent = p,
            Packet::AccelPercentSet(p) => self.momentary.accel_percent = p,
            _ => {}
        }
    }

    /// Handle one received packet
    ///
    /// Replies are passed to `send` in the order they should go out.
    pub fn handle<S, D, F>(
        &mut self,
        packet: Packet,
        settings: &mut S,
        debug: &mut D,
        mut send: F,
    ) -> Option<ProtocolAction>
    where
        S: SettingsStore,
        D: DebugSink,
        F: FnMut(Packet),
    {
        let tag = packet.packet_type();
        log_trace!("rx {}", tag);

        let mut action = None;
        match packet {
            // Queries answered with a SET
            Packet::MaxSpeedGetSilent => send(Packet::MaxSpeedSet(settings.max_speed())),
            Packet::AccelGetSilent => send(Packet::AccelSet(settings.max_accel())),

            // Queries answered with a PRINT
            Packet::VersionGet => send_string(PacketType::VersionPrint, VERSION, &mut send),
            Packet::RoleGet => send(Packet::RolePrint(ROLE_TRANSMITTER)),
            Packet::MaxSpeedGet => send(Packet::MaxSpeedPrint(settings.max_speed())),
            Packet::AccelGet => send(Packet::AccelPrint(settings.max_accel())),
            Packet::ChannelGet => send(Packet::ChannelPrint(settings.channel())),
            Packet::ProfileIdGet => send(Packet::ProfileIdPrint(settings.device_id())),
            Packet::ProfileNameGet => {
                send_string(PacketType::ProfileNamePrint, settings.device_name(), &mut send)
            }
            Packet::TargetPositionGet => {
                send(Packet::TargetPositionPrint(self.momentary.target_position))
            }
            Packet::PresetIndexGet => {
                send(Packet::PresetIndexPrint(settings.preset_index() as i16))
            }
            Packet::StartStateGet => {
                send(Packet::StartStatePrint(settings.start_in_calibration()))
            }

            // Settings
            Packet::MaxSpeedSet(v) => {
                settings.set_max_speed(v);
                send(Packet::ok(tag));
            }
            Packet::AccelSet(v) => {
                settings.set_max_accel(v);
                send(Packet::ok(tag));
            }
            Packet::ChannelSet(v) => {
                settings.set_channel(v);
                action = Some(ProtocolAction::Retune(v));
                send(Packet::ok(tag));
            }
            Packet::ProfileIdSet(v) => {
                settings.set_device_id(v);
                send(Packet::ok(tag));
            }
            Packet::ProfileNameSet(ref chunk) => {
                if let Some(name) = self.reassembly.feed(tag, chunk) {
                    settings.set_device_name(&name);
                    send(Packet::ok(tag));
                }
            }
            Packet::PresetIndexSet(v) => {
                match u8::try_from(v) {
                    Ok(index) => {
                        settings.set_preset_index(index);
                        action = Some(ProtocolAction::ParamsChanged);
                    }
                    Err(_) => log_warn!("Preset index {} out of range", v),
                }
                send(Packet::ok(tag));
            }
            Packet::StartStateSet(v) => {
                settings.set_start_in_calibration(v);
                send(Packet::ok(tag));
            }
            Packet::SaveConfig => {
                settings.flush_debounced();
                send(Packet::ok(tag));
            }
            Packet::ReloadConfig => {
                send(Packet::MaxSpeedSet(settings.max_speed()));
                send(Packet::AccelSet(settings.max_accel()));
                send(Packet::ok(tag));
            }

            // Momentary commands
            Packet::TargetPositionSet(_) | Packet::SpeedPercentSet(_) | Packet::AccelPercentSet(_) => {
                self.record_momentary(&packet);
                send(Packet::ok(tag));
            }

            // Prints
            Packet::VersionPrint(ref chunk) => {
                if let Some(text) = self.reassembly.feed(tag, chunk) {
                    debug.write_line(&SerialKey::RemoteVersion.value_line(text.as_str()));
                    send(Packet::ok(tag));
                }
            }
            Packet::ProfileNamePrint(ref chunk) => {
                if let Some(text) = self.reassembly.feed(tag, chunk) {
                    debug.write_line(&SerialKey::NameGet.value_line(text.as_str()));
                    send(Packet::ok(tag));
                }
            }
            Packet::RolePrint(v) => print(debug, SerialKey::RemoteRole, v, tag, &mut send),
            Packet::MaxSpeedPrint(v) => print(debug, SerialKey::MaxSpeedGet, v, tag, &mut send),
            Packet::AccelPrint(v) => print(debug, SerialKey::AccelGet, v, tag, &mut send),
            Packet::ChannelPrint(v) => {
                print(debug, SerialKey::RemoteChannelGet, v, tag, &mut send)
            }
            Packet::ProfileIdPrint(v) => print(debug, SerialKey::IdGet, v, tag, &mut send),
            Packet::TargetPositionPrint(v) => {
                print(debug, SerialKey::TargetPositionGet, v, tag, &mut send)
            }
            Packet::PresetIndexPrint(v) => {
                print(debug, SerialKey::PresetIndexGet, v, tag, &mut send)
            }
            Packet::StartStatePrint(v) => {
                print(debug, SerialKey::StartStateGet, v as i16, tag, &mut send)
            }

            Packet::Ok { key } => match ok_code(key) {
                Some(code) => debug.write_line(&code.ok_line()),
                None => log_trace!("ignoring OK for {}", key),
            },
        }

        action
    }
}

fn print<D, F>(
    debug: &mut D,
    key: SerialKey,
    value: impl core::fmt::Display,
    tag: PacketType,
    send: &mut F,
) where
    D: DebugSink,
    F: FnMut(Packet),
{
    debug.write_line(&key.value_line(value));
    send(Packet::ok(tag));
}

/// Queue `text` as a run of string chunks
pub fn send_string<F: FnMut(Packet)>(tag: PacketType, text: &str, send: &mut F) {
    for chunk in string_chunks(text.as_bytes()) {
        if let Some(packet) = Packet::string(tag, chunk) {
            send(packet);
        }
    }
}
