//! Persistent transmitter settings
//!
//! Key/value view of everything the transmitter keeps across power cycles.
//! Writes are cheap and land in RAM; [`SettingsStore::flush_debounced`]
//! decides when they reach flash.

/// Which calibration endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Endpoint {
    /// Maps to the low end of the pot range
    First,
    /// Maps to the high end of the pot range
    Second,
}

/// Settings storage trait
///
/// `channel`, `max_speed` and `max_accel` read and write the bundle of the
/// currently selected preset.
pub trait SettingsStore {
    /// Radio channel of the active preset
    fn channel(&self) -> i16;
    fn set_channel(&mut self, channel: i16);

    /// Receiver max speed (1..=32768)
    fn max_speed(&self) -> u16;
    fn set_max_speed(&mut self, max_speed: u16);

    /// Receiver max acceleration
    fn max_accel(&self) -> i16;
    fn set_max_accel(&mut self, max_accel: i16);

    /// Device/profile identifier
    fn device_id(&self) -> u32;
    fn set_device_id(&mut self, id: u32);

    /// Device/profile name
    fn device_name(&self) -> &str;
    /// Store a new name, truncated to the store's capacity
    fn set_device_name(&mut self, name: &str);

    /// Calibrated position for one endpoint
    fn calibration_position(&self, endpoint: Endpoint) -> i32;
    fn set_calibration_position(&mut self, endpoint: Endpoint, position: i32);

    /// Saved slot position, 0 for an out-of-range slot
    fn saved_position(&self, slot: usize) -> i32;
    /// Save a slot position; out-of-range slots are ignored
    fn set_saved_position(&mut self, slot: usize, position: i32);

    /// Active preset index
    fn preset_index(&self) -> u8;
    /// Select a preset; out-of-range indices are ignored
    fn set_preset_index(&mut self, index: u8);

    /// Boot into calibration instead of a run mode
    fn start_in_calibration(&self) -> bool;
    fn set_start_in_calibration(&mut self, start: bool);

    /// Request that pending changes be written to persistent storage
    fn flush_debounced(&mut self);
}
