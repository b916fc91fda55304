//! Encoder, potentiometer and mode switch inputs
//!
//! The encoder is decoded in its own task from pin edges and published
//! through [`ENCODER_COUNT`]. Mode switches are debounced by the input task
//! and published through [`SWITCHES`]. The pot is read on demand from the
//! ADC.

use embassy_rp::adc::{self, Adc};
use portable_atomic::{AtomicI32, AtomicU8, Ordering};
use slidelink_hal::{ControlInputs, ModeSwitch};

/// Quadrature count written by the encoder task
pub static ENCODER_COUNT: AtomicI32 = AtomicI32::new(0);

/// Debounced mode switch levels, one bit per switch
pub static SWITCHES: AtomicU8 = AtomicU8::new(0);

/// Count change for each (previous, current) AB state pair
const TRANSITIONS: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

/// Quadrature state decoder
#[derive(Debug, Clone, Copy)]
pub struct QuadratureDecoder {
    state: u8,
}

impl QuadratureDecoder {
    pub const fn new(a: bool, b: bool) -> Self {
        Self {
            state: ab_state(a, b),
        }
    }

    /// Feed the current pin levels, returning the count change
    ///
    /// Invalid transitions (both pins changed) count as zero.
    pub fn update(&mut self, a: bool, b: bool) -> i32 {
        let next = ab_state(a, b);
        let delta = TRANSITIONS[((self.state << 2) | next) as usize];
        self.state = next;
        delta as i32
    }
}

const fn ab_state(a: bool, b: bool) -> u8 {
    ((a as u8) << 1) | b as u8
}

/// Add to the shared encoder count
pub fn add_encoder_count(delta: i32) {
    if delta != 0 {
        ENCODER_COUNT.fetch_add(delta, Ordering::Relaxed);
    }
}

fn switch_bit(switch: ModeSwitch) -> u8 {
    match switch {
        ModeSwitch::FreeRun => 1 << 0,
        ModeSwitch::ZAxis => 1 << 1,
    }
}

/// Publish a debounced switch level
pub fn publish_switch(switch: ModeSwitch, on: bool) {
    let bit = switch_bit(switch);
    if on {
        SWITCHES.fetch_or(bit, Ordering::Relaxed);
    } else {
        SWITCHES.fetch_and(!bit, Ordering::Relaxed);
    }
}

/// Pot plus the shared encoder count and switch levels
pub struct Rp2040Inputs<'d> {
    adc: Adc<'d, adc::Blocking>,
    pot: adc::Channel<'d>,
    last_pot: i32,
}

impl<'d> Rp2040Inputs<'d> {
    pub fn new(adc: Adc<'d, adc::Blocking>, pot: adc::Channel<'d>) -> Self {
        Self {
            adc,
            pot,
            last_pot: 0,
        }
    }
}

impl ControlInputs for Rp2040Inputs<'_> {
    fn encoder_count(&mut self) -> i32 {
        ENCODER_COUNT.load(Ordering::Relaxed)
    }

    fn pot_raw(&mut self) -> i32 {
        // A failed conversion repeats the last reading
        if let Ok(raw) = self.adc.blocking_read(&mut self.pot) {
            self.last_pot = raw as i32;
        }
        self.last_pot
    }

    fn switch_on(&self, switch: ModeSwitch) -> bool {
        SWITCHES.load(Ordering::Relaxed) & switch_bit(switch) != 0
    }
}
