//! Transmitter task - main control loop
//!
//! Owns the [`Transmitter`]. Wakes on the control tick, an input event or a
//! console command, handles it to completion, services the radio link and
//! hands settings flushes to the settings task.

use defmt::*;
use embassy_futures::select::{select3, Either3};
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::pwm::PwmOutput;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::{Delay, Duration, Instant, Ticker};

use slidelink_core::config::timing::SEND_PERIOD_MS;
use slidelink_core::{Settings, Transmitter};
use slidelink_drivers::radio::Nrf24Radio;
use slidelink_hal_rp2040::{Rp2040Inputs, Rp2040Leds};

use crate::channels::{CONSOLE_CHANNEL, INPUT_CHANNEL, SETTINGS_FLUSH};
use crate::console::ConsoleSink;

/// Radio SPI bus
pub type RadioSpi = Spi<'static, SPI0, Blocking>;

/// Concrete transmitter for this board
pub type FirmwareTransmitter = Transmitter<
    Settings,
    Rp2040Inputs<'static>,
    Rp2040Leds<PwmOutput<'static>, Output<'static>>,
    ConsoleSink,
    Nrf24Radio<RadioSpi, Output<'static>, Delay>,
>;

/// Link steps per wake-up; each sends at most one queued packet
const LINK_POLLS_PER_WAKE: usize = 4;

#[embassy_executor::task]
pub async fn transmitter_task(mut tx: FirmwareTransmitter) {
    info!("Transmitter task started");

    let mut ticker = Ticker::every(Duration::from_millis(SEND_PERIOD_MS));

    loop {
        match select3(
            ticker.next(),
            INPUT_CHANNEL.receive(),
            CONSOLE_CHANNEL.receive(),
        )
        .await
        {
            Either3::First(()) => tx.advance(Instant::now().as_millis()),
            Either3::Second(event) => tx.dispatch(event),
            Either3::Third(parsed) => tx.handle_console(parsed),
        }

        for _ in 0..LINK_POLLS_PER_WAKE {
            tx.poll_link();
            if tx.link().queue().is_empty() {
                break;
            }
        }

        if let Some(record) = tx.settings_mut().take_flush() {
            debug!("Settings flush requested");
            SETTINGS_FLUSH.signal(record);
        }
    }
}
