//! Console UART receive task
//!
//! Parses console lines and hands them to the transmitter task.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use slidelink_protocol::CommandParser;

use crate::channels::CONSOLE_CHANNEL;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

#[embassy_executor::task]
pub async fn console_rx_task(mut rx: BufferedUartRx) {
    info!("Console RX task started");

    let mut parser = CommandParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                for &byte in &buf[..n] {
                    if let Some(parsed) = parser.feed(byte) {
                        CONSOLE_CHANNEL.send(parsed).await;
                    }
                }
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
