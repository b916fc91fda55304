//! Persisted transmitter settings
//!
//! The whole record is serialized with postcard and written under a single
//! storage key. Setters only touch RAM and mark the record dirty;
//! [`SettingsStore::flush_debounced`] turns a dirty record into a pending
//! flush that the firmware collects with [`Settings::take_flush`] and writes
//! from its storage task.

use heapless::String;
use serde::{Deserialize, Serialize};
use slidelink_hal::{Endpoint, SettingsStore};

use crate::NUM_POSITION_BUTTONS;

/// Settings layout version; bump when the record changes shape
pub const SETTINGS_VERSION: u8 = 1;

/// Number of speed/channel presets
pub const NUM_PRESETS: usize = 4;

/// Maximum device name length in bytes
pub const MAX_NAME_LEN: usize = 32;

/// Upper bound of an encoded record
pub const MAX_SETTINGS_SIZE: usize = 128;

/// Errors loading or storing the settings record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Record did not fit the buffer
    Encode,
    /// Stored bytes are not a valid record
    Decode,
    /// Stored record was written by another layout version
    VersionMismatch(u8),
}

/// One preset bundle, selected by the preset index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Preset {
    /// Radio channel (1..=82)
    pub channel: i16,
    /// Receiver max speed
    pub max_speed: u16,
    /// Receiver max acceleration
    pub max_accel: i16,
}

impl Default for Preset {
    fn default() -> Self {
        Self {
            channel: 1,
            max_speed: 2000,
            max_accel: 400,
        }
    }
}

/// Everything persisted across power cycles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    pub version: u8,
    pub presets: [Preset; NUM_PRESETS],
    pub preset_index: u8,
    pub device_id: u32,
    pub device_name: String<MAX_NAME_LEN>,
    pub calibration: [i32; 2],
    pub saved_positions: [i32; NUM_POSITION_BUTTONS],
    pub start_in_calibration: bool,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            presets: [Preset::default(); NUM_PRESETS],
            preset_index: 0,
            device_id: 0,
            device_name: String::new(),
            calibration: [0, 0],
            saved_positions: [0; NUM_POSITION_BUTTONS],
            start_in_calibration: true,
        }
    }
}

impl SettingsRecord {
    /// Serialize into `buf`, returning the used part
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], SettingsError> {
        postcard::to_slice(self, buf).map_err(|_| SettingsError::Encode)
    }

    /// Deserialize a stored record
    pub fn decode(bytes: &[u8]) -> Result<Self, SettingsError> {
        let record: Self = postcard::from_bytes(bytes).map_err(|_| SettingsError::Decode)?;
        if record.version != SETTINGS_VERSION {
            return Err(SettingsError::VersionMismatch(record.version));
        }
        Ok(record)
    }

    fn preset(&self) -> &Preset {
        &self.presets[(self.preset_index as usize).min(NUM_PRESETS - 1)]
    }

    fn preset_mut(&mut self) -> &mut Preset {
        &mut self.presets[(self.preset_index as usize).min(NUM_PRESETS - 1)]
    }
}

/// In-RAM settings with debounced persistence
#[derive(Debug, Clone, Default)]
pub struct Settings {
    record: SettingsRecord,
    dirty: bool,
    flush_pending: bool,
}

impl Settings {
    /// Wrap a record loaded from flash
    pub fn new(record: SettingsRecord) -> Self {
        Self {
            record,
            dirty: false,
            flush_pending: false,
        }
    }

    /// Build settings from stored bytes, falling back to defaults
    pub fn load(stored: Option<&[u8]>) -> Self {
        match stored.map(SettingsRecord::decode) {
            Some(Ok(record)) => Self::new(record),
            Some(Err(_e)) => {
                log_warn!("Stored settings unusable ({}), using defaults", _e);
                Self::default()
            }
            None => {
                log_info!("No stored settings, using defaults");
                Self::default()
            }
        }
    }

    /// Current record
    pub fn record(&self) -> &SettingsRecord {
        &self.record
    }

    /// Unsaved changes exist
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Take the record to write if a flush was requested
    pub fn take_flush(&mut self) -> Option<SettingsRecord> {
        if !self.flush_pending {
            return None;
        }
        self.flush_pending = false;
        self.dirty = false;
        Some(self.record.clone())
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

macro_rules! update {
    ($self:ident, $field:expr, $value:expr) => {{
        let value = $value;
        if $field != value {
            $field = value;
            $self.mark_dirty();
        }
    }};
}

impl SettingsStore for Settings {
    fn channel(&self) -> i16 {
        self.record.preset().channel
    }

    fn set_channel(&mut self, channel: i16) {
        update!(self, self.record.preset_mut().channel, channel);
    }

    fn max_speed(&self) -> u16 {
        self.record.preset().max_speed
    }

    fn set_max_speed(&mut self, max_speed: u16) {
        update!(self, self.record.preset_mut().max_speed, max_speed);
    }

    fn max_accel(&self) -> i16 {
        self.record.preset().max_accel
    }

    fn set_max_accel(&mut self, max_accel: i16) {
        update!(self, self.record.preset_mut().max_accel, max_accel);
    }

    fn device_id(&self) -> u32 {
        self.record.device_id
    }

    fn set_device_id(&mut self, id: u32) {
        update!(self, self.record.device_id, id);
    }

    fn device_name(&self) -> &str {
        &self.record.device_name
    }

    fn set_device_name(&mut self, name: &str) {
        let mut end = name.len().min(MAX_NAME_LEN);
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        if self.record.device_name.as_str() == &name[..end] {
            return;
        }
        self.record.device_name.clear();
        // end <= MAX_NAME_LEN, so this always fits
        let _ = self.record.device_name.push_str(&name[..end]);
        self.mark_dirty();
    }

    fn calibration_position(&self, endpoint: Endpoint) -> i32 {
        match endpoint {
            Endpoint::First => self.record.calibration[0],
            Endpoint::Second => self.record.calibration[1],
        }
    }

    fn set_calibration_position(&mut self, endpoint: Endpoint, position: i32) {
        let index = match endpoint {
            Endpoint::First => 0,
            Endpoint::Second => 1,
        };
        update!(self, self.record.calibration[index], position);
    }

    fn saved_position(&self, slot: usize) -> i32 {
        self.record.saved_positions.get(slot).copied().unwrap_or(0)
    }

    fn set_saved_position(&mut self, slot: usize, position: i32) {
        if slot >= NUM_POSITION_BUTTONS {
            return;
        }
        update!(self, self.record.saved_positions[slot], position);
    }

    fn preset_index(&self) -> u8 {
        self.record.preset_index
    }

    fn set_preset_index(&mut self, index: u8) {
        if index as usize >= NUM_PRESETS {
            log_warn!("Preset index {} out of range", index);
            return;
        }
        update!(self, self.record.preset_index, index);
    }

    fn start_in_calibration(&self) -> bool {
        self.record.start_in_calibration
    }

    fn set_start_in_calibration(&mut self, start: bool) {
        update!(self, self.record.start_in_calibration, start);
    }

    fn flush_debounced(&mut self) {
        if self.dirty {
            self.flush_pending = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_encode_decode() {
        let mut record = SettingsRecord::default();
        record.device_id = 0xDEAD_BEEF;
        record.presets[2].channel = 42;
        let _ = record.device_name.push_str("bench slider");

        let mut buf = [0u8; MAX_SETTINGS_SIZE];
        let bytes = record.encode(&mut buf).unwrap();
        assert_eq!(SettingsRecord::decode(bytes).unwrap(), record);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let record = SettingsRecord {
            version: SETTINGS_VERSION + 1,
            ..SettingsRecord::default()
        };
        let mut buf = [0u8; MAX_SETTINGS_SIZE];
        let bytes = record.encode(&mut buf).unwrap();
        assert_eq!(
            SettingsRecord::decode(bytes),
            Err(SettingsError::VersionMismatch(SETTINGS_VERSION + 1))
        );
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let settings = Settings::load(Some(&[0xFF, 0xFF, 0xFF][..]));
        assert_eq!(settings.record(), &SettingsRecord::default());
        let settings = Settings::load(None);
        assert!(settings.start_in_calibration());
    }

    #[test]
    fn test_preset_selects_bundle() {
        let mut settings = Settings::default();
        settings.set_channel(10);
        settings.set_preset_index(1);
        settings.set_channel(20);
        assert_eq!(settings.channel(), 20);
        settings.set_preset_index(0);
        assert_eq!(settings.channel(), 10);
    }

    #[test]
    fn test_out_of_range_preset_ignored() {
        let mut settings = Settings::default();
        settings.set_preset_index(NUM_PRESETS as u8);
        assert_eq!(settings.preset_index(), 0);
        assert!(!settings.is_dirty());
    }

    #[test]
    fn test_flush_only_when_dirty() {
        let mut settings = Settings::default();
        settings.flush_debounced();
        assert!(settings.take_flush().is_none());

        settings.set_max_speed(1234);
        settings.flush_debounced();
        let record = settings.take_flush().unwrap();
        assert_eq!(record.presets[0].max_speed, 1234);
        assert!(!settings.is_dirty());
        assert!(settings.take_flush().is_none());
    }

    #[test]
    fn test_unchanged_value_not_dirty() {
        let mut settings = Settings::default();
        settings.set_channel(settings.channel());
        assert!(!settings.is_dirty());
    }

    #[test]
    fn test_name_truncated() {
        let mut settings = Settings::default();
        settings.set_device_name("a very long device name that exceeds the limit");
        assert_eq!(settings.device_name().len(), MAX_NAME_LEN);
    }
}
