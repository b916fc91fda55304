//! Button and mode switch task
//!
//! Samples the push button, position buttons and mode switches, debounces
//! them and posts edges as controller events.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};

use slidelink_core::{Event, RunMode, NUM_POSITION_BUTTONS};
use slidelink_hal::ModeSwitch;
use slidelink_hal_rp2040::inputs::publish_switch;

use crate::channels::INPUT_CHANNEL;

/// Sample period
const SAMPLE_INTERVAL_MS: u64 = 5;

/// Consecutive equal samples before a level is accepted
const STABLE_SAMPLES: u8 = 4;

/// Input pins, all active-low with pull-ups
pub struct InputPins {
    pub button: Input<'static>,
    pub positions: [Input<'static>; NUM_POSITION_BUTTONS],
    pub free_run: Input<'static>,
    pub z_axis: Input<'static>,
}

impl InputPins {
    /// Publish the raw switch levels so the controller can read them at boot
    pub fn publish_switches(&self) {
        publish_switch(ModeSwitch::FreeRun, self.free_run.is_low());
        publish_switch(ModeSwitch::ZAxis, self.z_axis.is_low());
    }
}

/// Debounced logical level
#[derive(Clone, Copy)]
struct Debounced {
    level: bool,
    count: u8,
}

impl Debounced {
    const fn new(level: bool) -> Self {
        Self { level, count: 0 }
    }

    /// Returns the new level when it changes
    fn sample(&mut self, raw: bool) -> Option<bool> {
        if raw == self.level {
            self.count = 0;
            return None;
        }
        self.count += 1;
        if self.count < STABLE_SAMPLES {
            return None;
        }
        self.count = 0;
        self.level = raw;
        Some(raw)
    }
}

fn post(event: Event) {
    debug!("Input event: {:?}", event);
    if INPUT_CHANNEL.try_send(event).is_err() {
        warn!("Input channel full, dropping event");
    }
}

#[embassy_executor::task]
pub async fn input_task(pins: InputPins) {
    info!("Input task started");

    let mut button = Debounced::new(pins.button.is_low());
    let mut positions = pins.positions.each_ref().map(|p| Debounced::new(p.is_low()));
    let mut free_run = Debounced::new(pins.free_run.is_low());
    let mut z_axis = Debounced::new(pins.z_axis.is_low());

    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_INTERVAL_MS));

    loop {
        ticker.next().await;

        match button.sample(pins.button.is_low()) {
            Some(true) => post(Event::ButtonDown),
            Some(false) => post(Event::ButtonUp),
            None => {}
        }

        for (index, (state, pin)) in positions.iter_mut().zip(&pins.positions).enumerate() {
            if state.sample(pin.is_low()) == Some(true) {
                post(Event::PositionButton(index as u8));
            }
        }

        let free_changed = free_run.sample(pins.free_run.is_low()).is_some();
        let z_changed = z_axis.sample(pins.z_axis.is_low()).is_some();
        if free_changed || z_changed {
            publish_switch(ModeSwitch::FreeRun, free_run.level);
            publish_switch(ModeSwitch::ZAxis, z_axis.level);
            post(Event::ModeSwitch(RunMode::from_switches(
                free_run.level,
                z_axis.level,
            )));
        }
    }
}
