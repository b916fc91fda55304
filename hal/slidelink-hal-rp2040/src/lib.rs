//! RP2040-specific HAL for the SlideLink transmitter
//!
//! This crate provides RP2040 implementations of the shared
//! `slidelink-hal` traits:
//!
//! - Flash storage driver (implements `slidelink_hal::FlashStorage`)
//! - Quadrature encoder decoding, pot ADC and mode switches
//! - PWM speed bar and GPIO status LEDs

#![no_std]

pub mod flash;
pub mod inputs;
pub mod leds;

pub use flash::Rp2040FlashStorage;
pub use inputs::{QuadratureDecoder, Rp2040Inputs, ENCODER_COUNT, SWITCHES};
pub use leds::Rp2040Leds;
pub use slidelink_hal::{FlashStorage as FlashStorageTrait, StorageKey};
