//! Configuration types
//!
//! Compile-time transmitter configuration, timer periods, and the settings
//! record persisted to flash as postcard binary data.

pub mod hardware;
pub mod settings;
pub mod timing;

pub use hardware::*;
pub use settings::*;
