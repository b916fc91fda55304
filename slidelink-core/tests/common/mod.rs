//! Host mocks for the transmitter collaborators

#![allow(dead_code)]

use std::collections::VecDeque;

use slidelink_core::{Settings, SettingsRecord, Transmitter, TransmitterConfig};
use slidelink_hal::{
    ControlInputs, DebugSink, Indicators, Led, LedState, ModeSwitch, RadioError, RadioTransport,
};
use slidelink_protocol::{CommandParser, Frame, Packet};

#[derive(Debug, Default)]
pub struct MockInputs {
    pub encoder: i32,
    pub pot: i32,
    pub free_run: bool,
    pub z_axis: bool,
}

impl ControlInputs for MockInputs {
    fn encoder_count(&mut self) -> i32 {
        self.encoder
    }

    fn pot_raw(&mut self) -> i32 {
        self.pot
    }

    fn switch_on(&self, switch: ModeSwitch) -> bool {
        match switch {
            ModeSwitch::FreeRun => self.free_run,
            ModeSwitch::ZAxis => self.z_axis,
        }
    }
}

#[derive(Debug, Default)]
pub struct MockLeds {
    pub log: Vec<(Led, LedState)>,
}

impl MockLeds {
    /// Last state requested for an LED
    pub fn last(&self, led: Led) -> Option<LedState> {
        self.log
            .iter()
            .rev()
            .find(|(l, _)| *l == led)
            .map(|(_, state)| *state)
    }

    pub fn count(&self, led: Led, state: LedState) -> usize {
        self.log.iter().filter(|entry| **entry == (led, state)).count()
    }
}

impl Indicators for MockLeds {
    fn set_led(&mut self, led: Led, state: LedState) {
        self.log.push((led, state));
    }
}

#[derive(Debug, Default)]
pub struct MockDebug {
    pub lines: Vec<String>,
}

impl MockDebug {
    pub fn contains(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l == line)
    }
}

impl DebugSink for MockDebug {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

#[derive(Debug)]
pub struct MockRadio {
    pub inbox: VecDeque<Vec<u8>>,
    pub sent: Vec<Vec<u8>>,
    pub idle: bool,
    pub alive: bool,
    pub channels: Vec<u8>,
}

impl Default for MockRadio {
    fn default() -> Self {
        Self {
            inbox: VecDeque::new(),
            sent: Vec::new(),
            idle: true,
            alive: true,
            channels: Vec::new(),
        }
    }
}

impl MockRadio {
    /// Queue a frame as if the receiver had sent it
    pub fn deliver(&mut self, packet: Packet) {
        self.inbox.push_back(packet.to_frame().as_bytes().to_vec());
    }

    /// Decode and clear everything transmitted so far
    pub fn take_sent(&mut self) -> Vec<Packet> {
        self.sent
            .drain(..)
            .map(|bytes| {
                let frame = Frame::from_bytes(&bytes).expect("valid frame");
                Packet::from_frame(&frame).expect("known packet")
            })
            .collect()
    }

    pub fn channel(&self) -> Option<u8> {
        self.channels.last().copied()
    }
}

impl RadioTransport for MockRadio {
    fn try_receive(&mut self, buffer: &mut [u8]) -> Option<usize> {
        let frame = self.inbox.pop_front()?;
        let len = frame.len().min(buffer.len());
        buffer[..len].copy_from_slice(&frame[..len]);
        Some(len)
    }

    fn is_idle(&mut self) -> bool {
        self.idle
    }

    fn send(&mut self, frame: &[u8]) -> Result<(), RadioError> {
        self.sent.push(frame.to_vec());
        Ok(())
    }

    fn is_peer_alive(&mut self) -> bool {
        self.alive
    }

    fn set_channel(&mut self, channel: u8) {
        self.channels.push(channel);
    }
}

pub type TestTransmitter = Transmitter<Settings, MockInputs, MockLeds, MockDebug, MockRadio>;

/// Test harness: a transmitter plus its clock
pub struct Harness {
    pub tx: TestTransmitter,
    pub now: u64,
    parser: CommandParser,
}

impl Harness {
    pub fn new(record: SettingsRecord, inputs: MockInputs) -> Self {
        let tx = Transmitter::new(
            Settings::new(record),
            inputs,
            MockLeds::default(),
            MockDebug::default(),
            MockRadio::default(),
            TransmitterConfig::default(),
        );
        Self {
            tx,
            now: 0,
            parser: CommandParser::new(),
        }
    }

    /// Build and start at t = 0
    pub fn started(record: SettingsRecord, inputs: MockInputs) -> Self {
        let mut harness = Self::new(record, inputs);
        harness.tx.start(0);
        harness.pump();
        harness
    }

    /// Run the link until nothing is queued or waiting to be received
    pub fn pump(&mut self) {
        for _ in 0..128 {
            let link = self.tx.link();
            if link.queue().is_empty() && link.radio().inbox.is_empty() {
                break;
            }
            self.tx.poll_link();
        }
        // One more pass applies a deferred retune
        self.tx.poll_link();
    }

    /// Advance the clock in 10 ms control ticks
    pub fn run_for(&mut self, ms: u64) {
        let end = self.now + ms;
        while self.now < end {
            self.now = (self.now + 10).min(end);
            self.tx.advance(self.now);
            self.pump();
        }
    }

    /// Feed a console line
    pub fn console(&mut self, line: &str) {
        for &byte in line.as_bytes().iter().chain(b"\n") {
            if let Some(parsed) = self.parser.feed(byte) {
                self.tx.handle_console(parsed);
            }
        }
        self.pump();
    }

    pub fn inputs(&mut self) -> &mut MockInputs {
        self.tx.inputs_mut()
    }

    pub fn radio(&mut self) -> &mut MockRadio {
        self.tx.link_mut().radio_mut()
    }

    pub fn sent(&mut self) -> Vec<Packet> {
        self.radio().take_sent()
    }

    pub fn lines(&self) -> &[String] {
        &self.tx.debug().lines
    }
}

/// Settings that boot straight into a run mode
pub fn calibrated_record() -> SettingsRecord {
    SettingsRecord {
        calibration: [0, 1000],
        saved_positions: [100, 300, 500, 700],
        start_in_calibration: false,
        ..SettingsRecord::default()
    }
}
