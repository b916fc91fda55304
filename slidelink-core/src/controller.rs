//! Mode controller
//!
//! Hierarchical state machine over [`Mode`]. Each state handler returns a
//! [`Reaction`]; unhandled events bubble to the parent state. Transitions
//! run exit actions from the active state up to the common ancestor of
//! source and target, then entry actions down to the target:
//!
//! - a state transitioning to itself exits and re-enters;
//! - a transition to an ancestor of the handling state only exits.

use slidelink_hal::{
    ControlInputs, DebugSink, Endpoint, Indicators, Led, LedState, ModeSwitch, SettingsStore,
    SPEED_LED_COUNT,
};
use slidelink_protocol::{Packet, SerialKey};

use crate::board::Board;
use crate::config::timing::{
    ALIVE_PERIOD_MS, CALIBRATION_HOLD_MS, FLASH_DURATION_MS, FLASH_RATE_MS,
    FLUSH_SETTINGS_PERIOD_MS, SEND_PERIOD_MS, SPEED_AND_ACCEL_PERIOD_MS,
};
use crate::config::TransmitterConfig;
use crate::control::speed::START_PERCENT;
use crate::control::{map_range, speed_led_levels, JitterFilter, SpeedPercent, COUNTS_PER_DETENT};
use crate::state::{Event, Mode, Reaction, RunMode, TimerId, Timers};
use crate::NUM_POSITION_BUTTONS;

/// Max speed change per encoder detent in Z mode
pub const MAX_SPEED_PER_DETENT: f32 = 64.0;

/// Max speed limits in Z mode
pub const MAX_SPEED_MIN: i64 = 1;
pub const MAX_SPEED_MAX: i64 = 32768;

/// Speed LED that flashes during calibration
const MIDDLE_SPEED_LED: u8 = 2;

/// Runtime state owned by the controller
#[derive(Debug, Clone)]
pub struct TransmitterContext {
    /// Logical position; fractional so sub-unit encoder moves accumulate
    pub position: f32,
    /// Pot jitter filter
    pub pot_filter: JitterFilter,
    /// Encoder speed percent
    pub speed: SpeedPercent,
    /// Encoder count at the last calibration / Z-mode sample
    pub prev_encoder: i32,
    /// Calibration endpoints the pot range maps onto
    pub calibration: [i32; 2],
    /// Position units per encoder detent while calibrating
    pub multiplier: u8,
    /// Button presses since calibration started
    pub presses: u8,
    /// Saved slot positions
    pub saved_positions: [i32; NUM_POSITION_BUTTONS],
    /// Position playback is driving toward
    pub playback_target: i32,
    /// Slot whose LED shows the last save
    pub flashing_slot: usize,
}

impl Default for TransmitterContext {
    fn default() -> Self {
        Self {
            position: 0.0,
            pot_filter: JitterFilter::new(),
            speed: SpeedPercent::default(),
            prev_encoder: 0,
            calibration: [0, 0],
            multiplier: 1,
            presses: 0,
            saved_positions: [0; NUM_POSITION_BUTTONS],
            playback_target: 0,
            flashing_slot: 0,
        }
    }
}

/// Operating-mode state machine
#[derive(Debug, Clone)]
pub struct ModeController {
    mode: Mode,
    ctx: TransmitterContext,
    timers: Timers,
    config: TransmitterConfig,
}

impl ModeController {
    /// Create a controller; call [`start`](Self::start) before dispatching
    pub fn new(config: TransmitterConfig) -> Self {
        Self {
            mode: Mode::On,
            ctx: TransmitterContext::default(),
            timers: Timers::new(),
            config,
        }
    }

    /// Active state
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn context(&self) -> &TransmitterContext {
        &self.ctx
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Initial transition
    ///
    /// Boots into calibration when the settings ask for it, otherwise into
    /// the run mode the switches select.
    pub fn start<B: Board>(&mut self, now_ms: u64, io: &mut B) {
        self.ctx = TransmitterContext::default();
        self.timers = Timers::new();
        self.timers.advance(now_ms);
        io.send(Packet::TargetPositionSet(0));

        self.timers.arm_periodic(TimerId::Send, SEND_PERIOD_MS);
        self.timers.arm_periodic(TimerId::FlushSettings, FLUSH_SETTINGS_PERIOD_MS);
        self.timers.arm_periodic(TimerId::Alive, ALIVE_PERIOD_MS);
        self.timers.arm_periodic(TimerId::SpeedAndAccel, SPEED_AND_ACCEL_PERIOD_MS);

        let settings = io.settings();
        self.ctx.calibration = [
            settings.calibration_position(Endpoint::First),
            settings.calibration_position(Endpoint::Second),
        ];

        let target = if settings.start_in_calibration() {
            Mode::Uncalibrated
        } else {
            for (slot, position) in self.ctx.saved_positions.iter_mut().enumerate() {
                *position = settings.saved_position(slot);
            }
            selected_run_mode(io).mode()
        };

        log_info!("Starting in {}", target);
        for state in target.path() {
            self.enter(state, io);
        }
        self.mode = target;
    }

    /// Advance the timers and dispatch every expiry
    pub fn tick<B: Board>(&mut self, now_ms: u64, io: &mut B) {
        self.timers.advance(now_ms);
        while let Some(id) = self.timers.take_pending() {
            self.dispatch(Event::Timeout(id), io);
        }
    }

    /// Run one event to completion
    pub fn dispatch<B: Board>(&mut self, event: Event, io: &mut B) {
        let mut state = self.mode;
        loop {
            match self.handle(state, event, io) {
                Reaction::Handled => return,
                Reaction::Transition(target) => {
                    self.transition(state, target, io);
                    return;
                }
                Reaction::Super => match state.parent() {
                    Some(parent) => state = parent,
                    None => {
                        log_trace!("Unhandled {} in {}", event, self.mode);
                        return;
                    }
                },
            }
        }
    }

    fn transition<B: Board>(&mut self, source: Mode, target: Mode, io: &mut B) {
        log_debug!("{} -> {}", self.mode, target);

        // Leave substates of the handling state
        let mut state = self.mode;
        while state != source {
            self.exit(state, io);
            match state.parent() {
                Some(parent) => state = parent,
                None => break,
            }
        }

        if source == target {
            self.exit(source, io);
            self.enter(target, io);
        } else if target.is_ancestor_of(source) {
            let mut state = source;
            while state != target {
                self.exit(state, io);
                match state.parent() {
                    Some(parent) => state = parent,
                    None => break,
                }
            }
        } else {
            // Exit up to the deepest state enclosing the target
            let mut lca = source;
            while !lca.is_ancestor_of(target) {
                self.exit(lca, io);
                match lca.parent() {
                    Some(parent) => lca = parent,
                    None => break,
                }
            }
            let path = target.path();
            let start = path.iter().position(|&s| s == lca).map_or(0, |i| i + 1);
            for &state in &path[start..] {
                self.enter(state, io);
            }
        }

        self.mode = target;
    }

    fn enter<B: Board>(&mut self, state: Mode, io: &mut B) {
        match state {
            Mode::On => {}
            Mode::Uncalibrated => {
                set_led(io, Led::EncoderRed, LedState::On);
                set_led(io, Led::EncoderGreen, LedState::Off);
                self.ctx.prev_encoder = io.inputs().encoder_count();
                self.ctx.multiplier = selected_run_mode(io).calibration_multiplier();
            }
            Mode::Flashing => {
                set_led(io, Led::EncoderRed, LedState::On);
                self.timers.arm_periodic(TimerId::FlashRate, FLASH_RATE_MS);
                self.timers.arm_once(TimerId::Calibration, FLASH_DURATION_MS);
            }
            Mode::Calibrated => {
                set_led(io, Led::EncoderRed, LedState::Off);
                set_led(io, Led::EncoderGreen, LedState::On);
            }
            Mode::FreeRun => {
                set_led(io, Led::EncoderGreen, LedState::On);
                set_led(io, Led::EncoderRed, LedState::Off);
                self.init_speed_percent(io);
            }
            Mode::Playback => {
                self.ctx.playback_target = self.ctx.position as i32;
                set_led(io, Led::EncoderGreen, LedState::On);
                set_led(io, Led::EncoderRed, LedState::Off);
                self.announce_position(io);
                self.init_speed_percent(io);
            }
            Mode::ZAxis => {
                set_led(io, Led::EncoderGreen, LedState::On);
                set_led(io, Led::EncoderRed, LedState::On);
                self.ctx.prev_encoder = io.inputs().encoder_count();
            }
        }
    }

    fn exit<B: Board>(&mut self, state: Mode, io: &mut B) {
        match state {
            Mode::Flashing => {
                self.timers.disarm(TimerId::FlashRate);
                set_led(io, Led::EncoderRed, LedState::On);
            }
            Mode::Playback | Mode::ZAxis => speed_leds_off(io),
            _ => {}
        }
    }

    fn handle<B: Board>(&mut self, state: Mode, event: Event, io: &mut B) -> Reaction {
        match state {
            Mode::On => self.on(event, io),
            Mode::Uncalibrated => self.uncalibrated(event, io),
            Mode::Flashing => self.flashing(event, io),
            Mode::Calibrated => self.calibrated(event),
            Mode::FreeRun => self.free_run(event, io),
            Mode::Playback => self.playback(event, io),
            Mode::ZAxis => self.z_axis(event, io),
        }
    }

    fn on<B: Board>(&mut self, event: Event, io: &mut B) -> Reaction {
        match event {
            Event::Timeout(TimerId::Alive) => {
                let state = if io.is_peer_alive() {
                    LedState::Off
                } else {
                    log_warn!("Radio probe failed");
                    LedState::On
                };
                set_led(io, Led::Link, state);
            }
            Event::Timeout(TimerId::SpeedAndAccel) => send_speed_and_accel(io),
            Event::Timeout(TimerId::FlushSettings) => io.settings().flush_debounced(),
            Event::UpdateParams => {
                let channel = io.settings().channel();
                io.set_channel(channel);
            }
            _ => return Reaction::Super,
        }
        Reaction::Handled
    }

    fn uncalibrated<B: Board>(&mut self, event: Event, io: &mut B) -> Reaction {
        match event {
            Event::Timeout(TimerId::Send) => self.update_position_calibration(io),
            Event::ButtonDown => {
                let endpoint = if self.ctx.presses == 0 {
                    Endpoint::First
                } else {
                    Endpoint::Second
                };
                self.ctx.presses = self.ctx.presses.saturating_add(1);

                let position = self.ctx.position as i32;
                match endpoint {
                    Endpoint::First => self.ctx.calibration[0] = position,
                    Endpoint::Second => self.ctx.calibration[1] = position,
                }
                io.settings().set_calibration_position(endpoint, position);
                log_info!("Calibration {} at {}", endpoint, position);
                return Reaction::Transition(Mode::Flashing);
            }
            Event::ModeSwitch(run) => self.ctx.multiplier = run.calibration_multiplier(),
            _ => return Reaction::Super,
        }
        Reaction::Handled
    }

    fn flashing<B: Board>(&mut self, event: Event, io: &mut B) -> Reaction {
        match event {
            Event::Timeout(TimerId::Calibration) => {
                if self.ctx.presses >= 2 {
                    return Reaction::Transition(selected_run_mode(io).mode());
                }
                return Reaction::Transition(Mode::Uncalibrated);
            }
            Event::Timeout(TimerId::FlashRate) => {
                set_led(io, Led::Speed(MIDDLE_SPEED_LED), LedState::Toggle);
            }
            // Presses while flashing are swallowed
            Event::ButtonDown => {}
            _ => return Reaction::Super,
        }
        Reaction::Handled
    }

    fn calibrated(&mut self, event: Event) -> Reaction {
        match event {
            Event::ButtonDown => self.timers.arm_once(TimerId::Calibration, CALIBRATION_HOLD_MS),
            Event::ButtonUp => self.timers.disarm(TimerId::Calibration),
            Event::Timeout(TimerId::Calibration) => {
                self.ctx.presses = 0;
                return Reaction::Transition(Mode::Flashing);
            }
            Event::ModeSwitch(run) => return Reaction::Transition(run.mode()),
            _ => return Reaction::Super,
        }
        Reaction::Handled
    }

    fn free_run<B: Board>(&mut self, event: Event, io: &mut B) -> Reaction {
        match event {
            Event::Timeout(TimerId::Send) => {
                self.update_speed_percent(io);
                self.update_position_from_pot(io);
            }
            Event::PositionButton(index) => {
                let Some(slot) = checked_slot(index) else {
                    return Reaction::Handled;
                };
                // Only save once the previous save's indicator is off
                if !self.timers.is_active(TimerId::FlashRate) {
                    let position = self.ctx.position as i32;
                    self.ctx.flashing_slot = slot;
                    self.ctx.saved_positions[slot] = position;
                    io.settings().set_saved_position(slot, position);
                    set_led(io, Led::Speed(slot as u8), LedState::On);
                    self.timers.arm_once(TimerId::FlashRate, FLASH_RATE_MS);
                }
            }
            Event::Timeout(TimerId::FlashRate) => {
                set_led(io, Led::Speed(self.ctx.flashing_slot as u8), LedState::Off);
            }
            _ => return Reaction::Super,
        }
        Reaction::Handled
    }

    fn playback<B: Board>(&mut self, event: Event, io: &mut B) -> Reaction {
        match event {
            Event::Timeout(TimerId::Send) => {
                self.update_speed_percent(io);
                if self.ctx.playback_target as f32 != self.ctx.position {
                    self.ctx.position = self.ctx.playback_target as f32;
                    self.announce_position(io);
                }
            }
            Event::PositionButton(index) => {
                if let Some(slot) = checked_slot(index) {
                    self.ctx.playback_target = self.ctx.saved_positions[slot];
                }
            }
            _ => return Reaction::Super,
        }
        Reaction::Handled
    }

    fn z_axis<B: Board>(&mut self, event: Event, io: &mut B) -> Reaction {
        match event {
            Event::Timeout(TimerId::Send) => {
                self.update_max_speed_from_encoder(io);
                self.update_position_from_pot(io);
            }
            Event::PositionButton(index) => {
                if checked_slot(index).is_some() {
                    log_line(io, SerialKey::PresetIndexGet, index);
                    io.settings().set_preset_index(index);
                    let channel = io.settings().channel();
                    io.set_channel(channel);
                    send_speed_and_accel(io);
                }
            }
            _ => return Reaction::Super,
        }
        Reaction::Handled
    }

    fn announce_position<B: Board>(&self, io: &mut B) {
        io.send(Packet::TargetPositionSet(self.ctx.position as i32));
    }

    fn init_speed_percent<B: Board>(&mut self, io: &mut B) {
        let encoder = io.inputs().encoder_count();
        self.ctx.speed.init(encoder, START_PERCENT);
    }

    fn update_speed_percent<B: Board>(&mut self, io: &mut B) {
        let encoder = io.inputs().encoder_count();
        if let Some(percent) = self.ctx.speed.update(encoder) {
            io.send(Packet::SpeedPercentSet(percent as i16));
            for (i, level) in speed_led_levels(percent).into_iter().enumerate() {
                set_led(io, Led::Speed(i as u8), LedState::Pwm(level));
            }
        }
    }

    /// Encoder moves the position directly while calibrating
    fn update_position_calibration<B: Board>(&mut self, io: &mut B) {
        let encoder = io.inputs().encoder_count();
        if encoder != self.ctx.prev_encoder {
            log_line(io, SerialKey::Encoder, encoder);
        }

        let delta = encoder.wrapping_sub(self.ctx.prev_encoder);
        let detents = delta as f32 / COUNTS_PER_DETENT as f32;
        let amount = detents * self.ctx.multiplier as f32;
        self.ctx.position += amount;
        self.ctx.prev_encoder = encoder;

        if amount != 0.0 {
            self.announce_position(io);
        }
    }

    fn update_position_from_pot<B: Board>(&mut self, io: &mut B) {
        let raw = io.inputs().pot_raw();
        if !self.ctx.pot_filter.accept(raw) {
            return;
        }
        log_line(io, SerialKey::Pot, raw);

        let pot = self.config.pot;
        let [first, second] = self.ctx.calibration;
        self.ctx.position = map_range(raw, pot.min, pot.max, first, second) as f32;
        self.announce_position(io);
    }

    fn update_max_speed_from_encoder<B: Board>(&mut self, io: &mut B) {
        let encoder = io.inputs().encoder_count();
        if encoder != self.ctx.prev_encoder {
            log_line(io, SerialKey::Encoder, encoder);
        }

        let delta = encoder.wrapping_sub(self.ctx.prev_encoder);
        let detents = delta as f32 / COUNTS_PER_DETENT as f32;
        let amount = detents * MAX_SPEED_PER_DETENT;
        self.ctx.prev_encoder = encoder;

        if amount != 0.0 {
            let current = io.settings().max_speed() as f32;
            let max_speed = ((current + amount) as i64).clamp(MAX_SPEED_MIN, MAX_SPEED_MAX);
            io.settings().set_max_speed(max_speed as u16);
            log_line(io, SerialKey::MaxSpeedGet, max_speed);
        }
    }
}

/// Run mode currently selected by the switches
fn selected_run_mode<B: Board>(io: &mut B) -> RunMode {
    let inputs = io.inputs();
    RunMode::from_switches(
        inputs.switch_on(ModeSwitch::FreeRun),
        inputs.switch_on(ModeSwitch::ZAxis),
    )
}

/// Slot for a position button, `None` if out of range
///
/// An out-of-range button is a wiring or firmware bug; debug builds stop
/// on it, release builds ignore the press.
fn checked_slot(index: u8) -> Option<usize> {
    let slot = index as usize;
    debug_assert!(
        slot < NUM_POSITION_BUTTONS,
        "position button {} out of range",
        slot
    );
    (slot < NUM_POSITION_BUTTONS).then_some(slot)
}

fn set_led<B: Board>(io: &mut B, led: Led, state: LedState) {
    io.indicators().set_led(led, state);
}

fn speed_leds_off<B: Board>(io: &mut B) {
    for i in 0..SPEED_LED_COUNT {
        set_led(io, Led::Speed(i as u8), LedState::Off);
    }
}

fn send_speed_and_accel<B: Board>(io: &mut B) {
    let max_speed = io.settings().max_speed();
    let max_accel = io.settings().max_accel();
    io.send(Packet::MaxSpeedSet(max_speed));
    io.send(Packet::AccelSet(max_accel));
}

fn log_line<B: Board>(io: &mut B, key: SerialKey, value: impl core::fmt::Display) {
    io.debug().write_line(&key.value_line(value));
}
