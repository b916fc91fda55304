//! Radio link scenarios: queueing, inbound dispatch, retuning

mod common;

use common::{calibrated_record, Harness, MockInputs};
use slidelink_core::SettingsRecord;
use slidelink_hal::SettingsStore;
use slidelink_protocol::{string_chunks, Chunk, Packet, PacketType};

#[test]
fn test_queue_is_fifo_and_drops_newest() {
    let mut h = Harness::new(SettingsRecord::default(), MockInputs::default());
    h.radio().idle = false;

    for i in 0..20 {
        h.tx.link_mut().send(Packet::TargetPositionSet(i));
    }
    assert_eq!(h.tx.link().queue().len(), 16);
    assert_eq!(h.tx.link().dropped(), 4);

    h.tx.poll_link();
    assert!(h.radio().sent.is_empty());

    h.radio().idle = true;
    h.pump();
    let expected: Vec<_> = (0..16).map(Packet::TargetPositionSet).collect();
    assert_eq!(h.sent(), expected);
}

#[test]
fn test_one_packet_per_poll() {
    let mut h = Harness::new(SettingsRecord::default(), MockInputs::default());
    h.tx.link_mut().send(Packet::SaveConfig);
    h.tx.link_mut().send(Packet::ReloadConfig);

    h.tx.poll_link();
    assert_eq!(h.sent(), vec![Packet::SaveConfig]);
    h.tx.poll_link();
    assert_eq!(h.sent(), vec![Packet::ReloadConfig]);
}

#[test]
fn test_incoming_setting_is_stored_and_acknowledged() {
    let mut h = Harness::started(calibrated_record(), MockInputs::default());
    h.sent();

    h.radio().deliver(Packet::AccelSet(900));
    h.pump();

    assert_eq!(h.tx.settings().max_accel(), 900);
    assert_eq!(h.sent(), vec![Packet::ok(PacketType::AccelSet)]);
}

#[test]
fn test_incoming_channel_set_retunes() {
    let mut h = Harness::started(calibrated_record(), MockInputs::default());
    h.radio().deliver(Packet::ChannelSet(5));
    h.pump();

    assert_eq!(h.tx.settings().channel(), 5);
    assert_eq!(h.radio().channel(), Some(5));
}

#[test]
fn test_incoming_preset_change_updates_params() {
    let mut record = calibrated_record();
    record.presets[2].channel = 70;
    let mut h = Harness::started(record, MockInputs::default());
    h.sent();

    h.radio().deliver(Packet::PresetIndexSet(2));
    h.pump();

    assert_eq!(h.tx.settings().preset_index(), 2);
    assert_eq!(h.radio().channel(), Some(70));
    assert_eq!(h.sent(), vec![Packet::ok(PacketType::PresetIndexSet)]);
}

#[test]
fn test_silent_get_answers_with_set() {
    let mut h = Harness::started(calibrated_record(), MockInputs::default());
    h.sent();

    h.radio().deliver(Packet::MaxSpeedGetSilent);
    h.pump();
    assert_eq!(h.sent(), vec![Packet::MaxSpeedSet(2000)]);
    assert!(h.lines().is_empty());
}

#[test]
fn test_reload_resends_speed_and_accel() {
    let mut h = Harness::started(calibrated_record(), MockInputs::default());
    h.sent();

    h.radio().deliver(Packet::ReloadConfig);
    h.pump();
    assert_eq!(
        h.sent(),
        vec![
            Packet::MaxSpeedSet(2000),
            Packet::AccelSet(400),
            Packet::ok(PacketType::ReloadConfig),
        ]
    );
}

#[test]
fn test_ok_codes_printed() {
    let mut h = Harness::started(calibrated_record(), MockInputs::default());

    h.radio().deliver(Packet::Ok { key: b'M' });
    h.radio().deliver(Packet::Ok { key: b'K' });
    h.radio().deliver(Packet::Ok { key: b'v' });
    h.pump();

    assert_eq!(h.lines(), ["OK M", "OK N"]);
}

#[test]
fn test_remote_print_is_logged() {
    let mut h = Harness::started(calibrated_record(), MockInputs::default());
    h.sent();

    h.radio().deliver(Packet::MaxSpeedPrint(1234));
    h.pump();

    assert!(h.tx.debug().contains("m=1234"));
    assert_eq!(h.sent(), vec![Packet::ok(PacketType::MaxSpeedPrint)]);
}

#[test]
fn test_remote_name_reassembled() {
    let mut h = Harness::started(calibrated_record(), MockInputs::default());
    let name = "receiver on the long rail";
    for chunk in string_chunks(name.as_bytes()) {
        let packet = Packet::string(PacketType::ProfileNamePrint, chunk).expect("string tag");
        h.radio().deliver(packet);
    }
    h.pump();

    assert_eq!(h.lines(), ["n=receiver on the long rail"]);
}

#[test]
fn test_profile_name_set_stored() {
    let mut h = Harness::started(calibrated_record(), MockInputs::default());
    for chunk in string_chunks(b"dolly") {
        h.radio().deliver(Packet::ProfileNameSet(chunk));
    }
    h.pump();
    assert_eq!(h.tx.settings().device_name(), "dolly");
}

#[test]
fn test_interrupted_string_is_discarded() {
    let mut h = Harness::started(calibrated_record(), MockInputs::default());
    let head = Chunk::from_slice(b"0123456789abcdef").expect("fits");
    h.radio().deliver(Packet::ProfileNamePrint(head));
    h.radio().deliver(Packet::VersionPrint(Chunk::from_slice(b"1.2\0").expect("fits")));
    h.pump();

    assert_eq!(h.lines(), ["V=1.2"]);
}

#[test]
fn test_version_query_answered_in_chunks() {
    let mut h = Harness::started(calibrated_record(), MockInputs::default());
    h.sent();

    h.radio().deliver(Packet::VersionGet);
    h.pump();

    let sent = h.sent();
    let Some(Packet::VersionPrint(chunk)) = sent.first() else {
        panic!("expected a version chunk, got {sent:?}");
    };
    let mut expected = slidelink_core::VERSION.as_bytes().to_vec();
    expected.push(0);
    assert_eq!(chunk.as_slice(), expected.as_slice());
}

#[test]
fn test_target_position_query_uses_last_sent() {
    let mut h = Harness::started(calibrated_record(), MockInputs::default());
    h.tx.link_mut().send(Packet::TargetPositionSet(420));
    h.pump();
    h.sent();

    h.radio().deliver(Packet::TargetPositionGet);
    h.pump();
    assert_eq!(h.sent(), vec![Packet::TargetPositionPrint(420)]);
}
