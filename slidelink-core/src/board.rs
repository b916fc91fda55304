//! Collaborators the mode controller works against
//!
//! [`Board`] gathers the settings store, control inputs, indicators, debug
//! channel and the outbound side of the link behind one trait so state
//! handlers take a single parameter. [`Peripherals`] is the implementation
//! the [`Transmitter`](crate::Transmitter) owns.

use slidelink_hal::{ControlInputs, DebugSink, Indicators, RadioTransport, SettingsStore};
use slidelink_protocol::Packet;

use crate::config::QUEUE_CAPACITY;
use crate::link::{Link, LinkEvent};

/// Everything a state handler may touch
pub trait Board {
    type Settings: SettingsStore;
    type Inputs: ControlInputs;
    type Indicators: Indicators;
    type Debug: DebugSink;

    fn settings(&mut self) -> &mut Self::Settings;
    fn inputs(&mut self) -> &mut Self::Inputs;
    fn indicators(&mut self) -> &mut Self::Indicators;
    fn debug(&mut self) -> &mut Self::Debug;

    /// Queue a packet for the receiver
    fn send(&mut self, packet: Packet);

    /// Tune the local radio
    fn set_channel(&mut self, channel: i16);

    /// Tune the local radio after queued packets have gone out
    fn retune_after_drain(&mut self, channel: i16);

    /// Probe the radio
    fn is_peer_alive(&mut self) -> bool;
}

/// Owned collaborators plus the radio link
pub struct Peripherals<S, I, L, D, R, const N: usize = QUEUE_CAPACITY> {
    pub settings: S,
    pub inputs: I,
    pub indicators: L,
    pub debug: D,
    pub link: Link<R, N>,
}

impl<S, I, L, D, R, const N: usize> Peripherals<S, I, L, D, R, N>
where
    S: SettingsStore,
    D: DebugSink,
    R: RadioTransport,
{
    /// Run one link step against the owned settings and debug channel
    pub fn poll_link(&mut self) -> Option<LinkEvent> {
        self.link.poll(&mut self.settings, &mut self.debug)
    }
}

impl<S, I, L, D, R, const N: usize> Board for Peripherals<S, I, L, D, R, N>
where
    S: SettingsStore,
    I: ControlInputs,
    L: Indicators,
    D: DebugSink,
    R: RadioTransport,
{
    type Settings = S;
    type Inputs = I;
    type Indicators = L;
    type Debug = D;

    fn settings(&mut self) -> &mut S {
        &mut self.settings
    }

    fn inputs(&mut self) -> &mut I {
        &mut self.inputs
    }

    fn indicators(&mut self) -> &mut L {
        &mut self.indicators
    }

    fn debug(&mut self) -> &mut D {
        &mut self.debug
    }

    fn send(&mut self, packet: Packet) {
        self.link.send(packet);
    }

    fn set_channel(&mut self, channel: i16) {
        self.link.set_channel(channel);
    }

    fn retune_after_drain(&mut self, channel: i16) {
        self.link.retune_after_drain(channel);
    }

    fn is_peer_alive(&mut self) -> bool {
        self.link.is_peer_alive()
    }
}
