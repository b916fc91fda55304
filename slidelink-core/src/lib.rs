//! Board-agnostic logic for the SlideLink transmitter
//!
//! This crate contains everything the handheld does that does not depend on
//! a specific chip:
//!
//! - Persisted settings record and compile-time configuration
//! - Operating-mode state machine (calibration and the three run modes)
//! - Software timers driving the state machine
//! - Speed-percent and pot jitter-filter algorithms
//! - Outbound packet queue, packet dispatch and the radio link
//! - Serial console command handling
//!
//! [`Transmitter`] ties these together and is what the firmware drives.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod logging;

pub mod board;
pub mod config;
pub mod console;
pub mod control;
pub mod controller;
pub mod link;
pub mod state;
pub mod transmitter;

pub use board::{Board, Peripherals};
pub use config::{Settings, SettingsError, SettingsRecord, TransmitterConfig};
pub use controller::{ModeController, TransmitterContext};
pub use link::{Link, LinkEvent, OutboundQueue, QueueFull};
pub use state::{Event, Mode, RunMode, TimerId, Timers};
pub use transmitter::Transmitter;

/// Firmware version reported over the link and the console
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of position (slot) buttons
pub const NUM_POSITION_BUTTONS: usize = 4;
