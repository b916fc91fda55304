//! Hardware-dependent configuration
//!
//! Values here depend on how the handheld is built rather than on what the
//! user picked, so they are fixed at compile time by the firmware.

/// Outbound queue capacity used unless the firmware picks another one
pub const QUEUE_CAPACITY: usize = 16;

/// Potentiometer ADC range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PotRange {
    /// Raw reading at the low end of travel
    pub min: i32,
    /// Raw reading at the high end of travel
    pub max: i32,
}

impl PotRange {
    /// Create a new range
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }
}

impl Default for PotRange {
    fn default() -> Self {
        // 12-bit ADC
        Self::new(0, 4095)
    }
}

/// Transmitter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransmitterConfig {
    /// Potentiometer range mapped onto the calibration endpoints
    pub pot: PotRange,
}
