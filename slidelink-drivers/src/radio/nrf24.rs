//! nRF24L01+ radio transport
//!
//! Register-level driver over an embedded-hal `SpiBus` with the CSN and CE
//! pins driven here.
//! The radio idles in primary-RX; a send switches to TX, pulses CE and
//! polls for TX_DS / MAX_RT, bounded by [`SEND_POLLS`] x
//! [`SEND_POLL_INTERVAL_US`], then returns to RX. Frames already waiting in
//! the RX FIFO survive the turnaround; the FIFO is flushed only at init.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use slidelink_hal::{RadioError, RadioTransport};
use slidelink_protocol::FRAME_SIZE;

/// Address length in bytes
pub const ADDRESS_LEN: usize = 5;

/// Address the receiver listens on
pub const TRANSMIT_ADDRESS: [u8; ADDRESS_LEN] = *b"slrx1";

/// Address this transmitter listens on
pub const RECEIVE_ADDRESS: [u8; ADDRESS_LEN] = *b"sltx1";

/// Gap between status polls while a send is in flight
pub const SEND_POLL_INTERVAL_US: u32 = 50;

/// Status polls before a send is abandoned (2 ms in total)
pub const SEND_POLLS: u32 = 40;

/// 1 Mbps, 0 dBm
const RF_SETUP_DEFAULT: u8 = 0x06;

/// 500us delay, 3 retries
const SETUP_RETR_DEFAULT: u8 = 0x13;

mod reg {
    pub const CONFIG: u8 = 0x00;
    pub const EN_AA: u8 = 0x01;
    pub const EN_RXADDR: u8 = 0x02;
    pub const SETUP_RETR: u8 = 0x04;
    pub const RF_CH: u8 = 0x05;
    pub const RF_SETUP: u8 = 0x06;
    pub const STATUS: u8 = 0x07;
    pub const RX_ADDR_P0: u8 = 0x0A;
    pub const RX_ADDR_P1: u8 = 0x0B;
    pub const TX_ADDR: u8 = 0x10;
    pub const RX_PW_P0: u8 = 0x11;
    pub const RX_PW_P1: u8 = 0x12;
    pub const FIFO_STATUS: u8 = 0x17;
}

mod cmd {
    pub const R_REGISTER: u8 = 0x00;
    pub const W_REGISTER: u8 = 0x20;
    pub const R_RX_PAYLOAD: u8 = 0x61;
    pub const W_TX_PAYLOAD: u8 = 0xA0;
    pub const FLUSH_TX: u8 = 0xE1;
    pub const FLUSH_RX: u8 = 0xE2;
}

// CONFIG bits
const EN_CRC: u8 = 1 << 3;
const PWR_UP: u8 = 1 << 1;
const PRIM_RX: u8 = 1 << 0;

// STATUS bits
const RX_DR: u8 = 1 << 6;
const TX_DS: u8 = 1 << 5;
const MAX_RT: u8 = 1 << 4;

// FIFO_STATUS bits
const RX_EMPTY: u8 = 1 << 0;

/// Outcome of one status poll during a send, `None` while still in flight
fn send_outcome(status: u8) -> Option<Result<(), RadioError>> {
    if status & TX_DS != 0 {
        Some(Ok(()))
    } else if status & MAX_RT != 0 {
        Some(Err(RadioError::NoAck))
    } else {
        None
    }
}

/// nRF24L01+ on SPI
pub struct Nrf24Radio<SPI, P, D> {
    spi: SPI,
    csn: P,
    ce: P,
    delay: D,
    channel: u8,
}

impl<SPI, P, D> Nrf24Radio<SPI, P, D>
where
    SPI: SpiBus,
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(spi: SPI, csn: P, ce: P, delay: D) -> Self {
        Self {
            spi,
            csn,
            ce,
            delay,
            channel: 1,
        }
    }

    /// Run one SPI transaction with CSN held low
    fn transaction<T>(
        &mut self,
        f: impl FnOnce(&mut SPI) -> Result<T, SPI::Error>,
    ) -> Result<T, RadioError> {
        self.csn.set_low().map_err(|_| RadioError::Bus)?;
        let result = f(&mut self.spi);
        let flushed = self.spi.flush();
        self.csn.set_high().map_err(|_| RadioError::Bus)?;
        let value = result.map_err(|_| RadioError::Bus)?;
        flushed.map_err(|_| RadioError::Bus)?;
        Ok(value)
    }

    /// Program addresses, payload width and channel, then listen
    pub fn init(&mut self, channel: u8) -> Result<(), RadioError> {
        self.csn.set_high().map_err(|_| RadioError::Bus)?;
        self.ce.set_low().map_err(|_| RadioError::Bus)?;
        self.channel = channel;

        self.write_register_bytes(reg::RX_ADDR_P1, &RECEIVE_ADDRESS)?;
        self.write_register_bytes(reg::TX_ADDR, &TRANSMIT_ADDRESS)?;
        // Pipe 0 receives auto-acks for our own transmissions
        self.write_register_bytes(reg::RX_ADDR_P0, &TRANSMIT_ADDRESS)?;
        self.write_register(reg::EN_RXADDR, 0b11)?;
        self.write_register(reg::EN_AA, 0b11)?;
        self.write_register(reg::SETUP_RETR, SETUP_RETR_DEFAULT)?;
        self.write_register(reg::RX_PW_P0, FRAME_SIZE as u8)?;
        self.write_register(reg::RX_PW_P1, FRAME_SIZE as u8)?;

        // Stale frames from before reset
        self.command(cmd::FLUSH_RX)?;
        self.write_register(reg::STATUS, RX_DR)?;

        self.configure()
    }

    fn configure(&mut self) -> Result<(), RadioError> {
        self.write_register(reg::RF_SETUP, RF_SETUP_DEFAULT)?;
        self.write_register(reg::RF_CH, self.channel)?;
        self.listen()
    }

    /// Enter primary-RX, leaving the RX FIFO and its RX_DR flag intact
    fn listen(&mut self) -> Result<(), RadioError> {
        self.ce.set_low().map_err(|_| RadioError::Bus)?;
        self.write_register(reg::STATUS, TX_DS | MAX_RT)?;
        self.write_register(reg::CONFIG, EN_CRC | PWR_UP | PRIM_RX)?;
        self.ce.set_high().map_err(|_| RadioError::Bus)
    }

    fn power_up_tx(&mut self) -> Result<(), RadioError> {
        self.write_register(reg::CONFIG, EN_CRC | PWR_UP)
    }

    fn status(&mut self) -> Result<u8, RadioError> {
        self.read_register(reg::STATUS)
    }

    fn read_register(&mut self, register: u8) -> Result<u8, RadioError> {
        let mut value = [0u8; 1];
        self.read_register_bytes(register, &mut value)?;
        Ok(value[0])
    }

    fn read_register_bytes(&mut self, register: u8, buf: &mut [u8]) -> Result<(), RadioError> {
        self.transaction(|spi| {
            spi.write(&[cmd::R_REGISTER | register])?;
            spi.read(buf)
        })
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), RadioError> {
        self.write_register_bytes(register, &[value])
    }

    fn write_register_bytes(&mut self, register: u8, data: &[u8]) -> Result<(), RadioError> {
        self.transaction(|spi| {
            spi.write(&[cmd::W_REGISTER | register])?;
            spi.write(data)
        })
    }

    fn command(&mut self, command: u8) -> Result<(), RadioError> {
        self.transaction(|spi| spi.write(&[command]))
    }

    fn data_ready(&mut self) -> Result<bool, RadioError> {
        if self.status()? & RX_DR != 0 {
            return Ok(true);
        }
        Ok(self.read_register(reg::FIFO_STATUS)? & RX_EMPTY == 0)
    }

    fn read_payload(&mut self, buffer: &mut [u8]) -> Result<usize, RadioError> {
        let mut payload = [0u8; FRAME_SIZE];
        self.transaction(|spi| {
            spi.write(&[cmd::R_RX_PAYLOAD])?;
            spi.read(&mut payload)
        })?;
        self.write_register(reg::STATUS, RX_DR)?;

        let len = buffer.len().min(FRAME_SIZE);
        buffer[..len].copy_from_slice(&payload[..len]);
        Ok(len)
    }

    fn transmit(&mut self, frame: &[u8]) -> Result<(), RadioError> {
        if frame.len() > FRAME_SIZE {
            return Err(RadioError::PayloadSize);
        }
        let mut payload = [0u8; FRAME_SIZE];
        payload[..frame.len()].copy_from_slice(frame);

        self.ce.set_low().map_err(|_| RadioError::Bus)?;
        self.power_up_tx()?;
        self.command(cmd::FLUSH_TX)?;
        self.transaction(|spi| {
            spi.write(&[cmd::W_TX_PAYLOAD])?;
            spi.write(&payload)
        })?;
        self.ce.set_high().map_err(|_| RadioError::Bus)?;

        let mut result = Err(RadioError::Timeout);
        for _ in 0..SEND_POLLS {
            if let Some(outcome) = send_outcome(self.status()?) {
                result = outcome;
                break;
            }
            self.delay.delay_us(SEND_POLL_INTERVAL_US);
        }

        self.listen()?;
        result
    }
}

impl<SPI, P, D> RadioTransport for Nrf24Radio<SPI, P, D>
where
    SPI: SpiBus,
    P: OutputPin,
    D: DelayNs,
{
    fn try_receive(&mut self, buffer: &mut [u8]) -> Option<usize> {
        match self.data_ready() {
            Ok(true) => self.read_payload(buffer).ok(),
            _ => None,
        }
    }

    fn is_idle(&mut self) -> bool {
        // Sends complete before returning
        true
    }

    fn send(&mut self, frame: &[u8]) -> Result<(), RadioError> {
        self.transmit(frame)
    }

    fn is_peer_alive(&mut self) -> bool {
        let mut address = [0u8; ADDRESS_LEN];
        match self.read_register_bytes(reg::TX_ADDR, &mut address) {
            Ok(()) => address == TRANSMIT_ADDRESS,
            Err(_) => false,
        }
    }

    fn set_channel(&mut self, channel: u8) {
        self.channel = channel;
        if let Err(_e) = self.configure() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Radio retune failed: {}", _e);
        }
    }
}
