//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod console_rx;
pub mod console_tx;
pub mod encoder;
pub mod input;
pub mod settings;
pub mod transmitter;

pub use console_rx::console_rx_task;
pub use console_tx::console_tx_task;
pub use encoder::encoder_task;
pub use input::{input_task, InputPins};
pub use settings::settings_task;
pub use transmitter::{transmitter_task, FirmwareTransmitter};
