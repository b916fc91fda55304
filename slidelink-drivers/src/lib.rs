//! Peripheral drivers for the SlideLink transmitter
//!
//! Chip-level drivers written against embedded-hal traits, so they run on
//! any board crate and can be exercised on the host:
//!
//! - nRF24L01+ radio transport (implements `slidelink_hal::RadioTransport`)

#![no_std]
#![deny(unsafe_code)]

pub mod radio;
