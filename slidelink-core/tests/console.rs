//! Serial console commands end to end

mod common;

use common::{calibrated_record, Harness, MockInputs};
use slidelink_hal::SettingsStore;
use slidelink_protocol::{Packet, PacketType};

fn harness() -> Harness {
    let mut h = Harness::started(calibrated_record(), MockInputs::default());
    h.sent();
    h
}

#[test]
fn test_echo_version_and_role() {
    let mut h = harness();
    h.console("ehello");
    h.console("v");
    h.console("r");

    let version = format!("v={}", slidelink_core::VERSION);
    assert_eq!(h.lines(), ["hello", version.as_str(), "r=1"]);
}

#[test]
fn test_echo_too_long_for_response() {
    let mut h = harness();
    let text = "x".repeat(80);
    h.console(&format!("e{text}"));
    assert_eq!(h.lines(), ["ERR 01"]);
}

#[test]
fn test_local_reads() {
    let mut h = harness();
    h.inputs().encoder = -12;
    h.inputs().pot = 3000;
    h.console("ge");
    h.console("go");
    assert_eq!(h.lines(), ["e=-12", "o=3000"]);
    assert!(h.sent().is_empty());
}

#[test]
fn test_remote_reads_become_queries() {
    let mut h = harness();
    h.console("gm");
    h.console("gn");
    h.console("gu");
    assert_eq!(
        h.sent(),
        vec![Packet::MaxSpeedGet, Packet::ProfileNameGet, Packet::StartStateGet]
    );
}

#[test]
fn test_set_max_speed_locally_and_remotely() {
    let mut h = harness();
    h.console("sM1500");
    assert_eq!(h.tx.settings().max_speed(), 1500);
    assert_eq!(h.sent(), vec![Packet::MaxSpeedSet(1500)]);
}

#[test]
fn test_set_channel_retunes_after_request_is_sent() {
    let mut h = harness();
    h.radio().idle = false;
    h.console("sC12");
    assert_eq!(h.radio().channel(), Some(1));
    assert_eq!(h.tx.settings().channel(), 12);

    h.radio().idle = true;
    h.pump();
    assert_eq!(h.sent(), vec![Packet::ChannelSet(12)]);
    assert_eq!(h.radio().channel(), Some(12));
}

#[test]
fn test_set_channel_out_of_range() {
    let mut h = harness();
    h.console("sC99");
    assert_eq!(h.lines(), ["ERR 04"]);
    assert_eq!(h.tx.settings().channel(), 1);
    assert!(h.sent().is_empty());
}

#[test]
fn test_set_name_sends_chunks() {
    let mut h = harness();
    h.console("sNa twenty byte name..");

    let sent = h.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent
        .iter()
        .all(|p| p.packet_type() == PacketType::ProfileNameSet));
}

#[test]
fn test_set_preset_updates_params() {
    let mut record = calibrated_record();
    record.presets[1].channel = 33;
    let mut h = Harness::started(record, MockInputs::default());
    h.sent();

    h.console("sH1");
    assert_eq!(h.tx.settings().preset_index(), 1);
    assert_eq!(h.radio().channel(), Some(33));
    assert_eq!(h.lines(), ["OK H"]);
    assert_eq!(
        h.sent(),
        vec![Packet::MaxSpeedSet(2000), Packet::AccelSet(400)]
    );
}

#[test]
fn test_set_preset_out_of_range() {
    let mut h = harness();
    h.console("sH4");
    assert_eq!(h.lines(), ["ERR 04"]);
    assert_eq!(h.tx.settings().preset_index(), 0);
}

#[test]
fn test_set_start_state() {
    let mut h = harness();
    h.console("sU1");
    assert!(h.tx.settings().start_in_calibration());
    h.console("sU2");
    assert_eq!(h.lines(), ["OK U", "ERR 04"]);
}

#[test]
fn test_save_and_reload() {
    let mut h = harness();
    h.console("sM1800");
    h.console("sw");
    h.console("sl");

    assert_eq!(
        h.sent(),
        vec![Packet::MaxSpeedSet(1800), Packet::SaveConfig, Packet::ReloadConfig]
    );
    assert!(h.tx.settings_mut().take_flush().is_some());
}

#[test]
fn test_target_position_set_is_momentary() {
    let mut h = harness();
    h.console("sP-250");
    assert_eq!(h.sent(), vec![Packet::TargetPositionSet(-250)]);
    assert_eq!(h.tx.link().momentary().target_position, -250);
}

#[test]
fn test_malformed_and_unknown() {
    let mut h = harness();
    h.console("sMfast");
    h.console("gz");
    h.console("q");
    assert_eq!(h.lines(), ["ERR 04", "ERR 04", "ERR 03"]);
    assert_eq!(h.tx.settings().max_speed(), 2000);
}

#[test]
fn test_acknowledgement_round_trip() {
    let mut h = harness();
    h.console("sA250");
    assert_eq!(h.sent(), vec![Packet::AccelSet(250)]);

    h.radio().deliver(Packet::ok(PacketType::AccelSet));
    h.pump();
    assert_eq!(h.lines(), ["OK A"]);
}
