//! Radio link to the receiver
//!
//! The link owns the radio transport, the outbound queue and the packet
//! dispatcher. Delivery is best effort: nothing is retransmitted, and the
//! mode controller resends max speed and accel periodically so the receiver
//! converges after losses.

pub mod protocol;
pub mod queue;

pub use protocol::{send_string, MomentaryValues, Protocol, ProtocolAction};
pub use queue::{OutboundQueue, QueueFull};

use slidelink_hal::{DebugSink, RadioTransport, SettingsStore};
use slidelink_protocol::{Frame, Packet, FRAME_SIZE};

use crate::config::QUEUE_CAPACITY;

/// Lowest usable radio channel
pub const MIN_CHANNEL: i16 = 1;

/// Highest usable radio channel
pub const MAX_CHANNEL: i16 = 82;

/// Events the link reports to its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// The far side changed the active preset
    ParamsChanged,
}

/// Radio link state
pub struct Link<R, const N: usize = QUEUE_CAPACITY> {
    radio: R,
    queue: OutboundQueue<N>,
    protocol: Protocol,
    dropped: u32,
    deferred_channel: Option<i16>,
}

impl<R: RadioTransport, const N: usize> Link<R, N> {
    /// Create a link over a radio
    pub fn new(radio: R) -> Self {
        Self {
            radio,
            queue: OutboundQueue::new(),
            protocol: Protocol::new(),
            dropped: 0,
            deferred_channel: None,
        }
    }

    /// Queue a packet for transmission
    ///
    /// When the queue is full the packet is dropped and counted.
    pub fn send(&mut self, packet: Packet) {
        self.protocol.note_outgoing(&packet);
        push(&mut self.queue, &mut self.dropped, packet);
    }

    /// Run one link step
    ///
    /// Handles at most one received frame, then sends at most one queued
    /// packet if the radio is idle.
    pub fn poll<S, D>(&mut self, settings: &mut S, debug: &mut D) -> Option<LinkEvent>
    where
        S: SettingsStore,
        D: DebugSink,
    {
        let event = self.receive(settings, debug);

        if let Some(Err(_e)) = self.queue.drain_one_if_idle(&mut self.radio) {
            log_warn!("Radio send failed: {}", _e);
        }

        if self.queue.is_empty() {
            if let Some(channel) = self.deferred_channel.take() {
                self.set_channel(channel);
            }
        }

        event
    }

    fn receive<S, D>(&mut self, settings: &mut S, debug: &mut D) -> Option<LinkEvent>
    where
        S: SettingsStore,
        D: DebugSink,
    {
        let mut buffer = [0u8; FRAME_SIZE];
        let len = self.radio.try_receive(&mut buffer)?;

        let packet = match Frame::from_bytes(&buffer[..len.min(FRAME_SIZE)]) {
            Ok(frame) => match Packet::from_frame(&frame) {
                Ok(packet) => packet,
                Err(_e) => {
                    log_trace!("Dropping frame: {}", _e);
                    return None;
                }
            },
            Err(_e) => {
                log_trace!("Dropping frame: {}", _e);
                return None;
            }
        };

        let queue = &mut self.queue;
        let dropped = &mut self.dropped;
        let action = self
            .protocol
            .handle(packet, settings, debug, |reply| push(queue, dropped, reply));

        match action? {
            ProtocolAction::Retune(channel) => {
                self.set_channel(channel);
                None
            }
            ProtocolAction::ParamsChanged => Some(LinkEvent::ParamsChanged),
        }
    }

    /// Tune the radio, ignoring channels outside 1..=82
    pub fn set_channel(&mut self, channel: i16) {
        if !(MIN_CHANNEL..=MAX_CHANNEL).contains(&channel) {
            log_warn!("Ignoring out-of-range channel {}", channel);
            return;
        }
        log_debug!("Radio channel {}", channel);
        self.radio.set_channel(channel as u8);
    }

    /// Tune the radio once everything queued so far has gone out
    ///
    /// Used when the far side is told to change channel: our own change
    /// waits until the request has been sent on the old channel.
    pub fn retune_after_drain(&mut self, channel: i16) {
        self.deferred_channel = Some(channel);
    }

    /// Probe the radio
    pub fn is_peer_alive(&mut self) -> bool {
        self.radio.is_peer_alive()
    }

    /// Packets dropped because the queue was full
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Outbound queue
    pub fn queue(&self) -> &OutboundQueue<N> {
        &self.queue
    }

    /// Momentary values last sent or received
    pub fn momentary(&self) -> &MomentaryValues {
        self.protocol.momentary()
    }

    /// Radio transport
    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }
}

fn push<const N: usize>(queue: &mut OutboundQueue<N>, dropped: &mut u32, packet: Packet) {
    if let Err(QueueFull(_refused)) = queue.enqueue(packet) {
        *dropped = dropped.saturating_add(1);
        log_warn!("Outbound queue full, dropped {}", _refused.packet_type());
    }
}
