//! SlideLink Hardware Abstraction Layer
//!
//! This crate defines the collaborator traits the transmitter logic is
//! written against. Chip-specific crates (RP2040) implement them, and the
//! host tests in `slidelink-core` provide mock implementations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  slidelink-core (mode controller, link) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  slidelink-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ slidelink-hal-│       │  host mocks   │
//! │    rp2040     │       │  (tests)      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`settings::SettingsStore`] - Persistent transmitter settings
//! - [`inputs::ControlInputs`] - Encoder, potentiometer, mode switches
//! - [`indicators::Indicators`] - Status and speed LEDs
//! - [`radio::RadioTransport`] - Single-slot half-duplex radio
//! - [`debug::DebugSink`] - Line-oriented debug text channel
//! - [`flash::FlashStorage`] - Raw key/value flash storage

#![no_std]
#![deny(unsafe_code)]

pub mod debug;
pub mod flash;
pub mod indicators;
pub mod inputs;
pub mod radio;
pub mod settings;

// Re-export key traits at crate root for convenience
pub use debug::DebugSink;
pub use flash::{FlashError, FlashStorage, StorageKey};
pub use indicators::{Indicators, Led, LedState, SPEED_LED_COUNT};
pub use inputs::{ControlInputs, ModeSwitch};
pub use radio::{RadioError, RadioTransport};
pub use settings::{Endpoint, SettingsStore};
