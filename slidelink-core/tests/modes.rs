//! Mode controller scenarios driven through the transmitter

mod common;

use common::{calibrated_record, Harness, MockInputs};
use slidelink_core::{Event, Mode, SettingsRecord};
use slidelink_hal::{Endpoint, Led, LedState, SettingsStore};
use slidelink_protocol::Packet;

fn free_run_inputs() -> MockInputs {
    MockInputs {
        free_run: true,
        ..MockInputs::default()
    }
}

#[test]
fn test_boot_into_calibration_by_default() {
    let mut h = Harness::started(SettingsRecord::default(), MockInputs::default());

    assert_eq!(h.tx.mode(), Mode::Uncalibrated);
    assert_eq!(h.radio().channel(), Some(1));
    assert_eq!(h.sent(), vec![Packet::TargetPositionSet(0)]);
    assert_eq!(h.tx.indicators().last(Led::EncoderRed), Some(LedState::On));
    // Playback multiplier with no switch on
    assert_eq!(h.tx.context().multiplier, 40);
}

#[test]
fn test_two_press_calibration() {
    let mut h = Harness::started(SettingsRecord::default(), free_run_inputs());
    assert_eq!(h.tx.context().multiplier, 8);
    h.sent();

    // 1.25 detents at 8 units per detent
    h.inputs().encoder = 5;
    h.run_for(10);
    assert_eq!(h.tx.context().position, 10.0);
    assert!(h.tx.debug().contains("e=5"));
    assert!(h.sent().contains(&Packet::TargetPositionSet(10)));

    h.tx.dispatch(Event::ButtonDown);
    assert_eq!(h.tx.mode(), Mode::Flashing);
    assert_eq!(h.tx.settings().calibration_position(Endpoint::First), 10);

    h.run_for(250);
    assert_eq!(h.tx.mode(), Mode::Uncalibrated);
    assert!(h.tx.indicators().count(Led::Speed(2), LedState::Toggle) >= 3);

    h.inputs().encoder = 25;
    h.run_for(10);
    assert_eq!(h.tx.context().position, 50.0);

    h.tx.dispatch(Event::ButtonDown);
    assert_eq!(h.tx.mode(), Mode::Flashing);
    h.run_for(250);

    assert_eq!(h.tx.mode(), Mode::FreeRun);
    assert_eq!(h.tx.context().calibration, [10, 50]);
    assert_eq!(h.tx.settings().calibration_position(Endpoint::Second), 50);
    assert_eq!(h.tx.indicators().last(Led::EncoderGreen), Some(LedState::On));
    assert_eq!(h.tx.indicators().last(Led::EncoderRed), Some(LedState::Off));
}

#[test]
fn test_calibration_encoder_wraps_around() {
    let inputs = MockInputs {
        encoder: i32::MAX - 3,
        ..free_run_inputs()
    };
    let mut h = Harness::started(SettingsRecord::default(), inputs);
    h.sent();

    // 8 counts forward across the i32 boundary: 2 detents at 8 units each
    h.inputs().encoder = i32::MIN + 4;
    h.run_for(10);
    assert_eq!(h.tx.context().position, 16.0);
    assert!(h.sent().contains(&Packet::TargetPositionSet(16)));
}

#[test]
fn test_presses_while_flashing_are_ignored() {
    let mut h = Harness::started(SettingsRecord::default(), free_run_inputs());

    h.tx.dispatch(Event::ButtonDown);
    h.tx.dispatch(Event::ButtonDown);
    h.tx.dispatch(Event::ButtonDown);
    assert_eq!(h.tx.context().presses, 1);

    h.run_for(250);
    assert_eq!(h.tx.mode(), Mode::Uncalibrated);
}

#[test]
fn test_switches_read_when_flash_ends() {
    let mut h = Harness::started(SettingsRecord::default(), free_run_inputs());
    h.tx.dispatch(Event::ButtonDown);
    h.run_for(250);
    h.tx.dispatch(Event::ButtonDown);

    h.inputs().free_run = false;
    h.inputs().z_axis = true;
    h.tx.dispatch(Event::ModeSwitch(slidelink_core::RunMode::ZAxis));
    assert_eq!(h.tx.context().multiplier, 80);
    h.run_for(250);

    assert_eq!(h.tx.mode(), Mode::ZAxis);
}

#[test]
fn test_free_run_switch_wins() {
    let inputs = MockInputs {
        free_run: true,
        z_axis: true,
        ..MockInputs::default()
    };
    let h = Harness::started(calibrated_record(), inputs);
    assert_eq!(h.tx.mode(), Mode::FreeRun);
}

#[test]
fn test_free_run_speed_percent() {
    let mut h = Harness::started(calibrated_record(), free_run_inputs());
    assert_eq!(h.tx.mode(), Mode::FreeRun);
    h.sent();

    h.run_for(10);
    let sent = h.sent();
    assert!(sent.contains(&Packet::SpeedPercentSet(50)));
    assert!(sent.contains(&Packet::TargetPositionSet(0)));
    assert_eq!(h.tx.indicators().last(Led::Speed(2)), Some(LedState::Pwm(255)));

    // 50 percent up at 4 counts per percent
    h.inputs().encoder = 200;
    h.run_for(10);
    assert_eq!(h.sent(), vec![Packet::SpeedPercentSet(100)]);
    assert_eq!(h.tx.indicators().last(Led::Speed(4)), Some(LedState::Pwm(255)));
    assert_eq!(h.tx.indicators().last(Led::Speed(2)), Some(LedState::Pwm(0)));

    // Nothing new to report
    h.run_for(50);
    assert!(h.sent().is_empty());
}

#[test]
fn test_free_run_pot_maps_onto_calibration() {
    let mut h = Harness::started(calibrated_record(), free_run_inputs());
    h.inputs().pot = 4095;
    h.run_for(10);

    assert_eq!(h.tx.context().position, 1000.0);
    assert!(h.tx.debug().contains("o=4095"));
    assert!(h.sent().contains(&Packet::TargetPositionSet(1000)));

    // A reading seen within the last two accepted ones is jitter
    h.inputs().pot = 2048;
    h.run_for(10);
    h.inputs().pot = 4095;
    h.run_for(10);
    let positions: Vec<_> = h
        .sent()
        .into_iter()
        .filter(|p| matches!(p, Packet::TargetPositionSet(_)))
        .collect();
    assert_eq!(positions, vec![Packet::TargetPositionSet(500)]);
}

#[test]
fn test_free_run_saves_slot() {
    let mut h = Harness::started(calibrated_record(), free_run_inputs());
    h.inputs().pot = 4095;
    h.run_for(10);

    h.tx.dispatch(Event::PositionButton(2));
    assert_eq!(h.tx.settings().saved_position(2), 1000);
    assert_eq!(h.tx.indicators().last(Led::Speed(2)), Some(LedState::On));

    // A second press while the indicator is lit is ignored
    h.inputs().pot = 0;
    h.run_for(10);
    h.tx.dispatch(Event::PositionButton(3));
    assert_eq!(h.tx.settings().saved_position(3), 700);

    h.run_for(60);
    assert_eq!(h.tx.indicators().last(Led::Speed(2)), Some(LedState::Off));
    h.tx.dispatch(Event::PositionButton(3));
    assert_eq!(h.tx.settings().saved_position(3), 0);
}

#[test]
fn test_playback_moves_to_saved_position() {
    let mut h = Harness::started(calibrated_record(), MockInputs::default());
    assert_eq!(h.tx.mode(), Mode::Playback);
    h.sent();

    h.tx.dispatch(Event::PositionButton(1));
    h.run_for(10);
    assert!(h.sent().contains(&Packet::TargetPositionSet(300)));
    assert_eq!(h.tx.context().position, 300.0);
    assert_eq!(h.tx.link().momentary().target_position, 300);

    // Announced once per change
    h.run_for(50);
    assert!(!h.sent().contains(&Packet::TargetPositionSet(300)));
}

#[test]
fn test_z_axis_encoder_adjusts_max_speed() {
    let inputs = MockInputs {
        z_axis: true,
        ..MockInputs::default()
    };
    let mut h = Harness::started(calibrated_record(), inputs);
    assert_eq!(h.tx.mode(), Mode::ZAxis);

    h.inputs().encoder = 8;
    h.run_for(10);
    assert_eq!(h.tx.settings().max_speed(), 2128);
    assert!(h.tx.debug().contains("m=2128"));

    h.inputs().encoder = -4000;
    h.run_for(10);
    assert_eq!(h.tx.settings().max_speed(), 1);
}

#[test]
fn test_z_axis_encoder_wraps_around() {
    let inputs = MockInputs {
        z_axis: true,
        encoder: i32::MIN + 2,
        ..MockInputs::default()
    };
    let mut h = Harness::started(calibrated_record(), inputs);

    // 4 counts backward across the i32 boundary: one detent down
    h.inputs().encoder = i32::MAX - 1;
    h.run_for(10);
    assert_eq!(h.tx.settings().max_speed(), 1936);
}

#[test]
fn test_z_axis_button_selects_preset() {
    let mut record = calibrated_record();
    record.presets[1].channel = 40;
    record.presets[1].max_speed = 3000;
    record.presets[1].max_accel = 600;
    let inputs = MockInputs {
        z_axis: true,
        ..MockInputs::default()
    };
    let mut h = Harness::started(record, inputs);
    h.sent();

    h.tx.dispatch(Event::PositionButton(1));
    h.pump();

    assert!(h.tx.debug().contains("h=1"));
    assert_eq!(h.tx.settings().preset_index(), 1);
    assert_eq!(h.radio().channel(), Some(40));
    assert_eq!(
        h.sent(),
        vec![Packet::MaxSpeedSet(3000), Packet::AccelSet(600)]
    );
}

#[test]
fn test_leaving_z_axis_clears_speed_leds() {
    let inputs = MockInputs {
        z_axis: true,
        ..MockInputs::default()
    };
    let mut h = Harness::started(calibrated_record(), inputs);
    h.inputs().z_axis = false;
    h.tx.dispatch(Event::ModeSwitch(slidelink_core::RunMode::Playback));

    assert_eq!(h.tx.mode(), Mode::Playback);
    for i in 0..5 {
        assert_ne!(h.tx.indicators().count(Led::Speed(i), LedState::Off), 0);
    }
}

#[test]
fn test_hold_button_recalibrates() {
    let mut h = Harness::started(calibrated_record(), free_run_inputs());

    // Released early: nothing happens
    h.tx.dispatch(Event::ButtonDown);
    h.run_for(300);
    h.tx.dispatch(Event::ButtonUp);
    h.run_for(500);
    assert_eq!(h.tx.mode(), Mode::FreeRun);

    h.tx.dispatch(Event::ButtonDown);
    h.run_for(500);
    assert_eq!(h.tx.mode(), Mode::Flashing);
    assert_eq!(h.tx.context().presses, 0);

    h.run_for(250);
    assert_eq!(h.tx.mode(), Mode::Uncalibrated);
}

#[test]
fn test_speed_and_accel_resent_periodically() {
    let mut h = Harness::started(calibrated_record(), MockInputs::default());
    h.sent();

    h.run_for(250);
    let sent = h.sent();
    assert!(sent.contains(&Packet::MaxSpeedSet(2000)));
    assert!(sent.contains(&Packet::AccelSet(400)));
}

#[test]
fn test_link_led_follows_radio_probe() {
    let mut h = Harness::started(calibrated_record(), MockInputs::default());
    h.radio().alive = false;
    h.run_for(5000);
    assert_eq!(h.tx.indicators().last(Led::Link), Some(LedState::On));

    h.radio().alive = true;
    h.run_for(5000);
    assert_eq!(h.tx.indicators().last(Led::Link), Some(LedState::Off));
}

#[test]
fn test_settings_flushed_only_when_dirty() {
    let mut h = Harness::started(calibrated_record(), MockInputs::default());
    h.run_for(4000);
    assert!(h.tx.settings_mut().take_flush().is_none());

    h.tx.settings_mut().set_device_id(7);
    h.run_for(4000);
    let record = h.tx.settings_mut().take_flush().expect("flush requested");
    assert_eq!(record.device_id, 7);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "position button")]
fn test_out_of_range_button_panics_in_debug() {
    let mut h = Harness::started(calibrated_record(), free_run_inputs());
    h.tx.dispatch(Event::PositionButton(9));
}

#[cfg(not(debug_assertions))]
#[test]
fn test_out_of_range_button_ignored_in_release() {
    let mut h = Harness::started(calibrated_record(), free_run_inputs());
    h.tx.dispatch(Event::PositionButton(9));
    assert_eq!(h.tx.mode(), Mode::FreeRun);
}
