//! Radio transport abstraction
//!
//! A single-slot, half-duplex packet radio: at most one frame is in flight,
//! and receive is a non-blocking poll.

/// Errors from the radio transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioError {
    /// Transmission did not complete within the driver's bound
    Timeout,
    /// Peer never acknowledged the frame; retries exhausted
    NoAck,
    /// Payload does not fit the configured frame size
    PayloadSize,
    /// Bus error talking to the radio chip
    Bus,
}

/// Half-duplex radio transport
pub trait RadioTransport {
    /// Poll for a received frame
    ///
    /// Copies the frame into `buffer` and returns its length, or `None`
    /// when nothing is pending.
    fn try_receive(&mut self, buffer: &mut [u8]) -> Option<usize>;

    /// Check whether the transmitter is free for a new frame
    fn is_idle(&mut self) -> bool;

    /// Transmit one frame
    ///
    /// Blocks until the single in-flight transmission completes. The wait
    /// is bounded by the implementation (a few milliseconds) and must stay
    /// short relative to the 10 ms control tick.
    fn send(&mut self, frame: &[u8]) -> Result<(), RadioError>;

    /// Probe whether the radio still answers with the expected address
    fn is_peer_alive(&mut self) -> bool;

    /// Tune to a channel. Callers validate the range.
    fn set_channel(&mut self, channel: u8);
}
