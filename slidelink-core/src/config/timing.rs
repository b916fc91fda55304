//! Timer periods (milliseconds)

/// How often the control inputs are sampled and sent
pub const SEND_PERIOD_MS: u64 = 10;

/// LED flash rate (1/16 s)
pub const FLASH_RATE_MS: u64 = 62;

/// How long the calibration LED flashes after a press (1/4 s)
pub const FLASH_DURATION_MS: u64 = 250;

/// Button hold time to re-enter calibration from a run mode
pub const CALIBRATION_HOLD_MS: u64 = 500;

/// How often the radio is probed (catches brown-out after a low battery)
pub const ALIVE_PERIOD_MS: u64 = 5_000;

/// Max speed / accel resync interval
pub const SPEED_AND_ACCEL_PERIOD_MS: u64 = 250;

/// Settings flush interval
pub const FLUSH_SETTINGS_PERIOD_MS: u64 = 4_000;
