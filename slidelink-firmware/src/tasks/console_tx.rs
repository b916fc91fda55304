//! Console UART transmit task
//!
//! Writes queued debug lines to the console.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::DEBUG_CHANNEL;

#[embassy_executor::task]
pub async fn console_tx_task(mut tx: BufferedUartTx) {
    info!("Console TX task started");

    loop {
        let line = DEBUG_CHANNEL.receive().await;
        let result = match tx.write_all(line.as_bytes()).await {
            Ok(()) => tx.write_all(b"\r\n").await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!("Failed to write console line: {:?}", e);
        }
    }
}
