//! Settings persistence task
//!
//! Owns the flash storage and writes the settings record whenever the
//! transmitter asks for a flush. Flash writes never block the control loop.

use defmt::*;

use slidelink_hal_rp2040::Rp2040FlashStorage;

use crate::channels::SETTINGS_FLUSH;
use crate::persistence::save_settings;

#[embassy_executor::task]
pub async fn settings_task(mut storage: Rp2040FlashStorage<'static>) {
    info!("Settings task started");

    loop {
        let record = SETTINGS_FLUSH.wait().await;

        match save_settings(&mut storage, &record).await {
            Ok(()) => info!("Settings saved"),
            Err(e) => error!("Failed to save settings: {:?}", e),
        }
    }
}
