//! Outbound packet queue
//!
//! Packets wait here until the radio is idle. At most one frame goes out
//! per drain, which keeps every control tick short.

use heapless::Deque;
use slidelink_hal::{RadioError, RadioTransport};
use slidelink_protocol::Packet;

use crate::config::QUEUE_CAPACITY;

/// Queue was full; the refused packet is handed back
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull(pub Packet);

/// Fixed-capacity FIFO of packets awaiting transmission
#[derive(Debug)]
pub struct OutboundQueue<const N: usize = QUEUE_CAPACITY> {
    packets: Deque<Packet, N>,
}

impl<const N: usize> Default for OutboundQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> OutboundQueue<N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            packets: Deque::new(),
        }
    }

    /// Append a packet
    pub fn enqueue(&mut self, packet: Packet) -> Result<(), QueueFull> {
        self.packets.push_back(packet).map_err(QueueFull)
    }

    /// Send the oldest packet if the radio can take it
    ///
    /// Returns `None` when the queue is empty or the radio is busy; the
    /// packet stays queued in that case. A failed send still consumes the
    /// packet.
    pub fn drain_one_if_idle<R: RadioTransport>(
        &mut self,
        radio: &mut R,
    ) -> Option<Result<(), RadioError>> {
        if self.packets.is_empty() || !radio.is_idle() {
            return None;
        }
        let packet = self.packets.pop_front()?;
        let frame = packet.to_frame();
        Some(radio.send(frame.as_bytes()))
    }

    /// Number of queued packets
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    /// Peek at queued packets, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Packet> {
        self.packets.iter()
    }

    /// Drop everything queued
    pub fn clear(&mut self) {
        self.packets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidelink_protocol::{Frame, FRAME_SIZE};

    #[derive(Default)]
    struct FakeRadio {
        busy: bool,
        sent: heapless::Vec<[u8; FRAME_SIZE], 8>,
    }

    impl RadioTransport for FakeRadio {
        fn try_receive(&mut self, _buffer: &mut [u8]) -> Option<usize> {
            None
        }

        fn is_idle(&mut self) -> bool {
            !self.busy
        }

        fn send(&mut self, frame: &[u8]) -> Result<(), RadioError> {
            let mut bytes = [0u8; FRAME_SIZE];
            bytes.copy_from_slice(frame);
            self.sent.push(bytes).map_err(|_| RadioError::Bus)
        }

        fn is_peer_alive(&mut self) -> bool {
            true
        }

        fn set_channel(&mut self, _channel: u8) {}
    }

    fn sent_packets(radio: &FakeRadio) -> heapless::Vec<Packet, 8> {
        radio
            .sent
            .iter()
            .map(|b| Packet::from_frame(&Frame::from_bytes(b).unwrap()).unwrap())
            .collect()
    }

    #[test]
    fn test_fifo_order() {
        let mut queue: OutboundQueue<4> = OutboundQueue::new();
        let mut radio = FakeRadio::default();
        queue.enqueue(Packet::MaxSpeedSet(1)).unwrap();
        queue.enqueue(Packet::AccelSet(2)).unwrap();
        queue.enqueue(Packet::TargetPositionSet(3)).unwrap();

        while queue.drain_one_if_idle(&mut radio).is_some() {}

        assert_eq!(
            &sent_packets(&radio)[..],
            &[
                Packet::MaxSpeedSet(1),
                Packet::AccelSet(2),
                Packet::TargetPositionSet(3)
            ]
        );
    }

    #[test]
    fn test_full_queue_refuses() {
        let mut queue: OutboundQueue<2> = OutboundQueue::new();
        queue.enqueue(Packet::VersionGet).unwrap();
        queue.enqueue(Packet::RoleGet).unwrap();
        assert_eq!(
            queue.enqueue(Packet::ChannelGet),
            Err(QueueFull(Packet::ChannelGet))
        );
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_busy_radio_keeps_packet() {
        let mut queue: OutboundQueue = OutboundQueue::new();
        let mut radio = FakeRadio {
            busy: true,
            ..Default::default()
        };
        queue.enqueue(Packet::SaveConfig).unwrap();
        assert!(queue.drain_one_if_idle(&mut radio).is_none());
        assert_eq!(queue.len(), 1);

        radio.busy = false;
        assert_eq!(queue.drain_one_if_idle(&mut radio), Some(Ok(())));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_one_packet_per_drain() {
        let mut queue: OutboundQueue = OutboundQueue::new();
        let mut radio = FakeRadio::default();
        queue.enqueue(Packet::VersionGet).unwrap();
        queue.enqueue(Packet::RoleGet).unwrap();
        queue.drain_one_if_idle(&mut radio);
        assert_eq!(radio.sent.len(), 1);
        assert_eq!(queue.len(), 1);
    }
}
