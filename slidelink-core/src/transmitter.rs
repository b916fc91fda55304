//! Transmitter top level
//!
//! Owns the mode controller and the peripherals it drives. The firmware
//! calls [`Transmitter::advance`] every tick, forwards input events to
//! [`Transmitter::dispatch`], runs [`Transmitter::poll_link`] as often as
//! it can and hands parsed console lines to
//! [`Transmitter::handle_console`].

use slidelink_hal::{ControlInputs, DebugSink, Indicators, RadioTransport, SettingsStore};
use slidelink_protocol::{Command, ConsoleError};

use crate::board::Peripherals;
use crate::config::{TransmitterConfig, QUEUE_CAPACITY};
use crate::console;
use crate::controller::{ModeController, TransmitterContext};
use crate::link::{Link, LinkEvent};
use crate::state::{Event, Mode};

/// The handheld transmitter
pub struct Transmitter<S, I, L, D, R, const N: usize = QUEUE_CAPACITY> {
    controller: ModeController,
    board: Peripherals<S, I, L, D, R, N>,
}

impl<S, I, L, D, R, const N: usize> Transmitter<S, I, L, D, R, N>
where
    S: SettingsStore,
    I: ControlInputs,
    L: Indicators,
    D: DebugSink,
    R: RadioTransport,
{
    /// Assemble a transmitter; nothing runs until [`start`](Self::start)
    pub fn new(
        settings: S,
        inputs: I,
        indicators: L,
        debug: D,
        radio: R,
        config: TransmitterConfig,
    ) -> Self {
        Self {
            controller: ModeController::new(config),
            board: Peripherals {
                settings,
                inputs,
                indicators,
                debug,
                link: Link::new(radio),
            },
        }
    }

    /// Tune the radio to the stored channel and run the initial transition
    pub fn start(&mut self, now_ms: u64) {
        let channel = self.board.settings.channel();
        self.board.link.set_channel(channel);
        self.controller.start(now_ms, &mut self.board);
    }

    /// Move time forward and dispatch due timers
    pub fn advance(&mut self, now_ms: u64) {
        self.controller.tick(now_ms, &mut self.board);
    }

    /// Dispatch one input event
    pub fn dispatch(&mut self, event: Event) {
        self.controller.dispatch(event, &mut self.board);
    }

    /// Service the radio: handle a received packet, send a queued one
    pub fn poll_link(&mut self) {
        if let Some(LinkEvent::ParamsChanged) = self.board.poll_link() {
            self.controller.dispatch(Event::UpdateParams, &mut self.board);
        }
    }

    /// Execute a console line, reporting errors on the debug channel
    pub fn handle_console(&mut self, parsed: Result<Command, ConsoleError>) {
        let result = parsed.and_then(|command| console::execute(command, &mut self.board));
        match result {
            Ok(Some(event)) => self.controller.dispatch(event, &mut self.board),
            Ok(None) => {}
            Err(e) => {
                log_debug!("Console error {}", e.code());
                self.board.debug.write_line(e.code());
            }
        }
    }

    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    pub fn context(&self) -> &TransmitterContext {
        self.controller.context()
    }

    pub fn settings(&self) -> &S {
        &self.board.settings
    }

    pub fn settings_mut(&mut self) -> &mut S {
        &mut self.board.settings
    }

    pub fn inputs_mut(&mut self) -> &mut I {
        &mut self.board.inputs
    }

    pub fn indicators(&self) -> &L {
        &self.board.indicators
    }

    pub fn debug(&self) -> &D {
        &self.board.debug
    }

    pub fn link(&self) -> &Link<R, N> {
        &self.board.link
    }

    pub fn link_mut(&mut self) -> &mut Link<R, N> {
        &mut self.board.link
    }
}
