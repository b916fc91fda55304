//! Control-value algorithms
//!
//! Pure computations on raw input readings: encoder speed percent, pot
//! jitter filtering and position mapping, speed LED brightness.

pub mod leds;
pub mod position;
pub mod speed;

pub use leds::speed_led_levels;
pub use position::{map_range, JitterFilter};
pub use speed::SpeedPercent;

/// Raw encoder counts per mechanical detent
pub const COUNTS_PER_DETENT: i32 = 4;
