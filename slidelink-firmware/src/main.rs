//! SlideLink - Handheld Slider Transmitter Firmware
//!
//! Main firmware binary for the RP2040-based transmitter. Reads the
//! encoder, pot and buttons, runs the mode controller and drives the
//! receiver over an nRF24L01+ link.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Delay, Instant};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use slidelink_core::{Transmitter, TransmitterConfig};
use slidelink_drivers::radio::Nrf24Radio;
use slidelink_hal_rp2040::{Rp2040FlashStorage, Rp2040Inputs, Rp2040Leds};

use crate::console::ConsoleSink;
use crate::persistence::load_settings;
use crate::tasks::InputPins;

mod channels;
mod console;
mod persistence;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Channel the radio starts on before the stored channel is applied
const BOOT_CHANNEL: u8 = 1;

/// PWM counter top; duty is set in 1/255 steps
const LED_PWM_TOP: u16 = 255;

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("SlideLink transmitter v{} starting...", slidelink_core::VERSION);

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Load settings from flash (or defaults)
    let mut storage = Rp2040FlashStorage::new(p.FLASH, p.DMA_CH0);
    let settings = load_settings(&mut storage).await;
    info!("Settings loaded");

    // Console UART (GPIO0 TX, GPIO1 RX)
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 64]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (console_tx, console_rx) = uart.split();

    // nRF24L01+ on SPI0 (SCK 18, MOSI 19, MISO 16, CSN 17, CE 20)
    let mut spi_config = spi::Config::default();
    spi_config.frequency = 4_000_000;
    let spi = Spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, spi_config);
    let mut radio = Nrf24Radio::new(
        spi,
        Output::new(p.PIN_17, Level::High),
        Output::new(p.PIN_20, Level::Low),
        Delay,
    );
    if let Err(e) = radio.init(BOOT_CHANNEL) {
        error!("Radio init failed: {:?}", e);
    }

    // Pot on ADC0 (GPIO26)
    let adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let pot = adc::Channel::new_pin(p.PIN_26, Pull::None);
    let inputs = Rp2040Inputs::new(adc, pot);

    // Speed bar on PWM slices 6, 7 and 2; status LEDs on GPIO
    let mut pwm_config = pwm::Config::default();
    pwm_config.top = LED_PWM_TOP;
    let (speed0, speed1) =
        Pwm::new_output_ab(p.PWM_SLICE6, p.PIN_12, p.PIN_13, pwm_config.clone()).split();
    let (speed2, speed3) =
        Pwm::new_output_ab(p.PWM_SLICE7, p.PIN_14, p.PIN_15, pwm_config.clone()).split();
    let (_, speed4) = Pwm::new_output_b(p.PWM_SLICE2, p.PIN_21, pwm_config).split();
    let leds = Rp2040Leds::new(
        [
            unwrap!(speed0),
            unwrap!(speed1),
            unwrap!(speed2),
            unwrap!(speed3),
            unwrap!(speed4),
        ],
        Output::new(p.PIN_25, Level::Low),
        Output::new(p.PIN_22, Level::Low),
        Output::new(p.PIN_27, Level::Low),
    );

    // Encoder A/B GPIO2/3, push button GPIO4, position buttons GPIO5-8,
    // mode switches GPIO9/10
    let input_pins = InputPins {
        button: Input::new(p.PIN_4, Pull::Up),
        positions: [
            Input::new(p.PIN_5, Pull::Up),
            Input::new(p.PIN_6, Pull::Up),
            Input::new(p.PIN_7, Pull::Up),
            Input::new(p.PIN_8, Pull::Up),
        ],
        free_run: Input::new(p.PIN_9, Pull::Up),
        z_axis: Input::new(p.PIN_10, Pull::Up),
    };
    input_pins.publish_switches();
    let encoder_a = Input::new(p.PIN_2, Pull::Up);
    let encoder_b = Input::new(p.PIN_3, Pull::Up);

    let mut transmitter = Transmitter::new(
        settings,
        inputs,
        leds,
        ConsoleSink,
        radio,
        TransmitterConfig::default(),
    );
    transmitter.start(Instant::now().as_millis());
    info!("Transmitter started in {:?}", transmitter.mode());

    // Spawn tasks
    spawner.spawn(tasks::encoder_task(encoder_a, encoder_b)).unwrap();
    spawner.spawn(tasks::input_task(input_pins)).unwrap();
    spawner.spawn(tasks::console_rx_task(console_rx)).unwrap();
    spawner.spawn(tasks::console_tx_task(console_tx)).unwrap();
    spawner.spawn(tasks::settings_task(storage)).unwrap();
    spawner.spawn(tasks::transmitter_task(transmitter)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
