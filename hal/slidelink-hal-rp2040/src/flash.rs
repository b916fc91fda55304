//! Flash storage driver for RP2040
//!
//! Uses sequential-storage for wear-leveled key-value storage
//! in the last 64KB of flash.
//!
//! Implements the `FlashStorage` trait from `slidelink-hal`.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

pub use slidelink_hal::flash::{FlashError, StorageKey};

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash on the Pico
pub const SETTINGS_PARTITION_SIZE: usize = 64 * 1024;
pub const SETTINGS_PARTITION_START: usize = FLASH_SIZE - SETTINGS_PARTITION_SIZE;

/// Flash range for the settings partition
pub const SETTINGS_RANGE: core::ops::Range<u32> =
    (SETTINGS_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Scratch buffer for one map item (key + settings record + overhead)
const ITEM_BUFFER_SIZE: usize = 256;

/// RP2040 flash storage
pub struct Rp2040FlashStorage<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> Rp2040FlashStorage<'d> {
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }
}

impl<'d> slidelink_hal::FlashStorage for Rp2040FlashStorage<'d> {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let mut data_buffer = [0u8; ITEM_BUFFER_SIZE];

        let result = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
        )
        .await;

        match result {
            Ok(Some(data)) => {
                let len = data.len();
                if buffer.len() < len {
                    return Err(FlashError::BufferTooSmall);
                }
                buffer[..len].copy_from_slice(data);
                Ok(len)
            }
            Ok(None) => Err(FlashError::NotFound),
            Err(_) => Err(FlashError::Storage),
        }
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        let mut data_buffer = [0u8; ITEM_BUFFER_SIZE];

        map::store_item(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
            &data,
        )
        .await
        .map_err(|_| FlashError::Storage)
    }
}
