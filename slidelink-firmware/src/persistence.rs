//! Settings persistence
//!
//! Loads the settings record from flash at boot and writes flush requests
//! back. Falls back to defaults if flash is empty or the record is unusable.

use defmt::*;

use slidelink_core::config::MAX_SETTINGS_SIZE;
use slidelink_core::{Settings, SettingsError, SettingsRecord};
use slidelink_hal_rp2040::flash::{FlashError, StorageKey};
use slidelink_hal_rp2040::{FlashStorageTrait, Rp2040FlashStorage};

/// Settings persistence errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// Flash operation failed
    Flash(FlashError),
    /// Record did not encode
    Settings(SettingsError),
}

impl From<FlashError> for PersistError {
    fn from(e: FlashError) -> Self {
        PersistError::Flash(e)
    }
}

impl From<SettingsError> for PersistError {
    fn from(e: SettingsError) -> Self {
        PersistError::Settings(e)
    }
}

/// Load settings, using defaults when nothing usable is stored
pub async fn load_settings(storage: &mut Rp2040FlashStorage<'_>) -> Settings {
    let mut buffer = [0u8; MAX_SETTINGS_SIZE];
    match storage.read(StorageKey::Settings, &mut buffer).await {
        Ok(len) => {
            debug!("Read {} bytes of settings from flash", len);
            Settings::load(Some(&buffer[..len]))
        }
        Err(FlashError::NotFound) => Settings::load(None),
        Err(e) => {
            warn!("Failed to read settings: {:?}", e);
            Settings::load(None)
        }
    }
}

/// Write a settings record
pub async fn save_settings(
    storage: &mut Rp2040FlashStorage<'_>,
    record: &SettingsRecord,
) -> Result<(), PersistError> {
    let mut buffer = [0u8; MAX_SETTINGS_SIZE];
    let bytes = record.encode(&mut buffer)?;
    storage.write(StorageKey::Settings, bytes).await?;
    Ok(())
}
