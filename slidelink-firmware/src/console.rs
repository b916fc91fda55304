//! Debug sink backed by the console UART

use defmt::*;
use slidelink_hal::DebugSink;
use slidelink_protocol::DebugLine;

use crate::channels::DEBUG_CHANNEL;

/// Queues debug lines for the console TX task
pub struct ConsoleSink;

impl DebugSink for ConsoleSink {
    fn write_line(&mut self, line: &str) {
        let Ok(line) = DebugLine::try_from(line) else {
            warn!("Debug line too long, dropped");
            return;
        };
        if DEBUG_CHANNEL.try_send(line).is_err() {
            trace!("Debug channel full, dropping line");
        }
    }
}
